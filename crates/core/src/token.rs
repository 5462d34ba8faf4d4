//! Opaque one-time tokens for email confirmation and password reset.
//!
//! Tokens are UUID v4 strings: 122 bits of randomness from the OS CSPRNG,
//! URL-safe, and single-use (the owning row clears the column on redemption).

use uuid::Uuid;

/// Generate a fresh opaque token.
pub fn generate_token() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_is_uuid() {
        let token = generate_token();
        assert!(Uuid::parse_str(&token).is_ok(), "token must parse as UUID");
    }
}
