//! Recovery token generation

/// Source of opaque recovery tokens
pub trait TokenGenerator: Send + Sync {
    /// Generate a fresh, unguessable token
    fn generate_token_key(&self) -> String;
}

/// Generates random UUID v4 tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokenGenerator;

impl TokenGenerator for UuidTokenGenerator {
    fn generate_token_key(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_uniqueness() {
        let generator = UuidTokenGenerator;
        let t1 = generator.generate_token_key();
        let t2 = generator.generate_token_key();
        assert_ne!(t1, t2);
    }

    #[test]
    fn test_token_is_uuid() {
        let token = UuidTokenGenerator.generate_token_key();
        assert!(uuid::Uuid::parse_str(&token).is_ok());
    }
}
