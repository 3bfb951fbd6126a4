//! Result type alias for Ledgerline

use super::errors::LedgerlineError;

/// Result type alias for Ledgerline operations
///
/// # Examples
///
/// ```
/// use ledgerline::domain::result::Result;
/// use ledgerline::domain::errors::LedgerlineError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(LedgerlineError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, LedgerlineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(LedgerlineError::Validation("test error".to_string()));
        assert!(result.is_err());
    }
}
