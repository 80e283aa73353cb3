//! Validation helpers for path parameters.

use crate::error::AppError;

/// Rejects empty namespaces and player ids, which would alias other keys once concatenated.
///
/// # Examples
///
/// ```ignore
/// validate_key_part("namespace", "tetris") // Ok
/// validate_key_part("player id", "  ")     // Err - blank
/// ```
pub fn validate_key_part(label: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{label} must not be empty")));
    }
    Ok(())
}
