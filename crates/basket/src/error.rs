//! # Facade Error Types
//!
//! One error enum for everything a `BasketManager` call can raise. The
//! not-found cases (unknown item id on update/remove) are deliberately NOT
//! here - those are silent no-ops, and callers who need confirmation check
//! the basket state themselves.

use thiserror::Error;

use basket_core::error::CoreError;
use basket_db::error::DbError;

/// Errors raised by basket operations.
#[derive(Debug, Error)]
pub enum BasketError {
    /// A business rule violation from basket-core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage failure. Propagated as-is - no retry, no local recovery.
    #[error(transparent)]
    Db(#[from] DbError),

    /// A stored item references a buyable the catalog no longer resolves.
    ///
    /// Raised on refresh rather than silently dropping the line, so a
    /// basket never quietly shrinks because a product was deleted.
    #[error("No {buyable_type} #{buyable_id} backs basket item {item_id}")]
    BuyableNotFound {
        buyable_type: String,
        buyable_id: i64,
        item_id: i64,
    },
}

/// Result type for basket operations.
pub type BasketResult<T> = Result<T, BasketError>;
