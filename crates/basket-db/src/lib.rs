//! # basket-db: Database Layer for the Shopping Basket
//!
//! This crate provides SQLite persistence for baskets and their line items,
//! using sqlx for async operations.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`records`] - Persisted row shapes
//! - [`error`] - Database error types
//! - [`repository`] - The basket repository
//!
//! ## Usage
//!
//! ```rust,ignore
//! use basket_db::{Database, DbConfig};
//!
//! // Create database with default config (runs migrations)
//! let db = Database::new(DbConfig::new("path/to/basket.db")).await?;
//!
//! // Use the repository
//! let basket = db.baskets().create(None).await?;
//! db.baskets().insert_item(basket.id, "product", 7, 2, &options).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod records;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use records::{BasketItemRow, BasketRow};
pub use repository::basket::BasketRepository;
