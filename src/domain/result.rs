//! Result type alias for mcp-config
//!
//! This module provides a convenient Result type alias that uses McpError
//! as the error type.

use super::errors::McpError;

/// Result type alias for mcp-config operations
///
/// # Examples
///
/// ```
/// use mcp_config::domain::result::Result;
/// use mcp_config::domain::errors::{ConfigError, McpError};
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(McpError::Config(ConfigError::NotLoaded))
/// }
/// ```
pub type Result<T> = std::result::Result<T, McpError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ConfigError;

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(ConfigError::NotLoaded.into());
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
