//! # The Buyable Capability
//!
//! The basket never owns products. Anything that can be added to a basket -
//! catalog products, bundles, event tickets - implements [`Buyable`] and
//! stays the property of whatever subsystem defines it. Basket rows keep
//! only the `(buyable_type, buyable_id)` back reference, so deleting a
//! basket never touches the catalog.

use crate::money::Money;
use crate::options::{AllowedOptions, OptionMap};
use crate::tax::TaxRate;

/// An external product that can be placed in a basket.
///
/// Implementations must be cheap to query: `price` and `extra_fees` are
/// recomputed on every totals read rather than cached, so the basket always
/// reflects live product state.
pub trait Buyable: Send + Sync {
    /// Stable unique id within this buyable's type.
    fn buyable_id(&self) -> i64;

    /// Type discriminator, e.g. `"product"`. Together with the id this
    /// forms the polymorphic reference stored on each basket row.
    fn buyable_type(&self) -> &str;

    /// Display description for storefront rendering.
    fn description(&self) -> String;

    /// Unit price given the validated options chosen for the line.
    fn price(&self, options: &OptionMap) -> Money;

    /// Extra per-line fees (deposit, handling). Zero for most products.
    fn extra_fees(&self) -> Money {
        Money::zero()
    }

    /// The option keys this buyable understands and the values it accepts.
    /// Keys absent from this map are dropped from incoming options.
    fn allowed_options(&self) -> AllowedOptions {
        AllowedOptions::new()
    }

    /// The tax rate this buyable declares, if it participates in per-item
    /// taxation. `None` means "not taxable on its own" - the basket then
    /// falls back to configured or zero tax.
    fn tax_rate(&self) -> Option<TaxRate> {
        None
    }
}
