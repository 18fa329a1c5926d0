//! # basket: The Shopping Basket Facade
//!
//! This crate wires the pure business rules from `basket-core` and the
//! SQLite persistence from `basket-db` into a single request-scoped
//! service, [`BasketManager`].
//!
//! ## What the manager does
//!
//! - **Mutations**: `add` (with duplicate-line merging), `update`,
//!   `update_options`, `remove`, `destroy`
//! - **Derived pricing**: memoized `subtotal()` and `tax()`, live per-line
//!   unit prices, fees and totals
//! - **Binding**: keeps the session store pointing at the persisted basket
//!   and hands baskets over to authenticated users on login
//! - **Resolution**: picks the current basket from session, user, or a
//!   signed basket reference, falling back to a fresh one
//!
//! ## Example
//!
//! ```rust,ignore
//! use basket::{BasketConfig, BasketManager, MemoryBuyableSource, MemorySessionStore};
//! use basket_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("basket.db")).await?;
//! let config = BasketConfig::load()?;
//!
//! let mut manager = BasketManager::resolve(
//!     &db,
//!     session,          // impl SessionStore, from the request
//!     catalog,          // impl BuyableSource, the product catalog
//!     &config,
//!     authenticated_id, // Option<i64>
//!     signed_reference, // Option<&SignedBasketRef>
//! ).await?;
//!
//! manager.add(&product, 2, options).await?;
//! let totals = manager.totals();
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod config;
pub mod error;
pub mod line;
pub mod manager;
pub mod session;
pub mod signing;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::{BuyableSource, MemoryBuyableSource};
pub use config::{BasketConfig, ConfigError};
pub use error::{BasketError, BasketResult};
pub use line::BasketLine;
pub use manager::{BasketManager, BasketTotals};
pub use session::{MemorySessionStore, SessionStore, BASKET_SESSION_KEY};
pub use signing::{basket_signature, SignedBasketRef};

// The core vocabulary, re-exported so most hosts only depend on `basket`.
pub use basket_core::buyable::Buyable;
pub use basket_core::identity::Fingerprint;
pub use basket_core::money::Money;
pub use basket_core::options::{AllowedOptions, OptionMap, OptionRule, OptionValue};
pub use basket_core::tax::{TaxConfig, TaxMode, TaxRate};
