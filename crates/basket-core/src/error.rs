//! # Error Types
//!
//! Domain-specific error types for basket-core.
//!
//! The core surface is deliberately hard to misuse - option validation
//! drops bad input instead of failing, and money math is total - so only a
//! handful of conditions are actual errors.

use thiserror::Error;

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A line quantity must be strictly positive.
    ///
    /// Adding with a zero or negative quantity is rejected outright rather
    /// than merged into an existing line, where it could silently drive a
    /// quantity to zero without removing the row.
    #[error("Quantity must be positive, got {quantity}")]
    InvalidQuantity { quantity: i64 },

    /// A tax mode string from configuration did not match any known mode.
    #[error("Unknown tax mode '{mode}' (expected flat, per-item, or fixed-per-item)")]
    UnknownTaxMode { mode: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidQuantity { quantity: -2 };
        assert_eq!(err.to_string(), "Quantity must be positive, got -2");

        let err = CoreError::UnknownTaxMode {
            mode: "percentage".to_string(),
        };
        assert!(err.to_string().contains("percentage"));
    }
}
