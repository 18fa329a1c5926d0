//! # basket-core: Pure Business Logic for the Shopping Basket
//!
//! This crate is the **heart** of the basket. It contains all business rules
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Shopping Basket Layers                         │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                  basket (facade crate)                      │   │
//! │  │   BasketManager: add / update / remove / user binding       │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                    │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │               ★ basket-core (THIS CRATE) ★                  │   │
//! │  │                                                             │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐          │   │
//! │  │   │  money  │ │   tax   │ │ options │ │ identity │          │   │
//! │  │   │  Money  │ │ TaxMode │ │ rules   │ │ SHA-1    │          │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘          │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                    │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │                basket-db (Database Layer)                   │   │
//! │  │           SQLite queries, migrations, repository            │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`tax`] - Tax modes and per-line tax resolution
//! - [`options`] - Option maps and allow-list validation
//! - [`identity`] - Deterministic line-item fingerprints
//! - [`buyable`] - The external product capability trait
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use basket_core::money::Money;
//! use basket_core::tax::TaxRate;
//!
//! // Create money from cents (never from floats!)
//! let price = Money::from_cents(1099); // $10.99
//!
//! // Percentage tax at 8.25%
//! let tax = price.calculate_tax(TaxRate::from_bps(825));
//! assert_eq!(tax.cents(), 91);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod buyable;
pub mod error;
pub mod identity;
pub mod money;
pub mod options;
pub mod tax;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use basket_core::Money` instead of
// `use basket_core::money::Money`

pub use buyable::Buyable;
pub use error::{CoreError, CoreResult};
pub use identity::{compute_identifier, Fingerprint};
pub use money::Money;
pub use options::{
    validate_options, AllowedOptions, OptionMap, OptionRule, OptionValue,
};
pub use tax::{line_tax, TaxConfig, TaxMode, TaxRate};
