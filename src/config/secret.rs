//! Secret values lifted out of configuration documents
//!
//! Values the migrator moves into `.env.<environment>` files are carried as
//! [`SecretString`] so they are zeroed on drop and never show up in `Debug`
//! output or log lines. Reading one requires an explicit
//! [`secrecy::ExposeSecret::expose_secret`] call.
//!
//! ```rust
//! use mcp_config::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let token = secret_string("Bearer abc123xyz".to_string());
//! assert!(format!("{token:?}").contains("REDACTED"));
//! assert_eq!(token.expose_secret().as_ref(), "Bearer abc123xyz");
//! ```

use secrecy::{CloneableSecret, DebugSecret, ExposeSecret, Secret};
use zeroize::Zeroize;

/// String payload of a [`SecretString`]
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// A string zeroed on drop and redacted in `Debug`
pub type SecretString = Secret<SecretValue>;

/// Wraps `value` as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Compares two secrets by value
pub fn same_secret(a: &SecretString, b: &SecretString) -> bool {
    a.expose_secret().as_ref() == b.expose_secret().as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let secret = secret_string("super-secret-token".to_string());
        let debug = format!("{secret:?}");
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_expose_and_compare() {
        let a = secret_string("Bearer abc".to_string());
        let b = secret_string("Bearer abc".to_string());
        let c = secret_string("Bearer xyz".to_string());

        assert!(a.expose_secret() == "Bearer abc");
        assert!(same_secret(&a, &b));
        assert!(!same_secret(&a, &c));
    }

    #[test]
    fn test_clone_preserves_value() {
        let a = secret_string("v".to_string());
        let b = a.clone();
        assert_eq!(b.expose_secret().as_ref(), "v");
    }
}
