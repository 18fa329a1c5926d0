//! # Persisted Row Shapes
//!
//! The two tables the basket owns, as Rust structs. These are storage
//! records, not domain objects: derived pricing (description, unit price,
//! subtotal, total) never appears here because it is recomputed live from
//! the buyable on every read.

use basket_core::options::OptionMap;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

/// One row of the `baskets` table.
///
/// `user_id` is null for session-bound baskets and set once the basket is
/// attached to an authenticated user.
#[derive(Debug, Clone, FromRow)]
pub struct BasketRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of the `basket_items` table.
///
/// `(buyable_type, buyable_id)` is a weak polymorphic reference into an
/// external product catalog; nothing here cascades into that catalog.
/// `options` holds the validated option mapping as a JSON object.
#[derive(Debug, Clone, FromRow)]
pub struct BasketItemRow {
    pub id: i64,
    pub basket_id: i64,
    pub buyable_id: i64,
    pub buyable_type: String,
    pub quantity: i64,
    pub options: Json<OptionMap>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
