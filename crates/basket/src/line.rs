//! # Basket Lines
//!
//! A [`BasketLine`] is one stored item row paired with its resolved
//! buyable. Everything priced - description, unit price, fees, subtotal,
//! total - is computed on access from the live buyable, never cached on the
//! line, so a product price change shows up on the next totals read.

use std::fmt;
use std::sync::Arc;

use basket_core::buyable::Buyable;
use basket_core::identity::{compute_identifier, Fingerprint};
use basket_core::money::Money;
use basket_core::options::OptionMap;
use basket_db::records::BasketItemRow;

/// One line of the basket: a persisted item row plus its live buyable.
#[derive(Clone)]
pub struct BasketLine {
    row: BasketItemRow,
    buyable: Arc<dyn Buyable>,
}

impl BasketLine {
    /// Pairs a stored row with its resolved buyable.
    pub(crate) fn new(row: BasketItemRow, buyable: Arc<dyn Buyable>) -> Self {
        BasketLine { row, buyable }
    }

    /// The persisted item id.
    pub fn id(&self) -> i64 {
        self.row.id
    }

    /// The quantity on this line (always > 0 while persisted).
    pub fn quantity(&self) -> i64 {
        self.row.quantity
    }

    /// The validated options chosen for this line.
    pub fn options(&self) -> &OptionMap {
        &self.row.options.0
    }

    /// The resolved buyable behind this line.
    pub fn buyable(&self) -> &dyn Buyable {
        self.buyable.as_ref()
    }

    /// Display description, straight from the buyable.
    pub fn description(&self) -> String {
        self.buyable.description()
    }

    /// Live unit price for this line's options.
    pub fn unit_price(&self) -> Money {
        self.buyable.price(self.options())
    }

    /// Live extra fees for this line.
    pub fn extra_fees(&self) -> Money {
        self.buyable.extra_fees()
    }

    /// Unit price × quantity.
    pub fn subtotal(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity())
    }

    /// Subtotal plus extra fees.
    pub fn total(&self) -> Money {
        self.subtotal() + self.extra_fees()
    }

    /// The identity fingerprint of this line, computed from its stored
    /// buyable reference and options. Duplicate adds are matched on this.
    pub fn fingerprint(&self) -> Fingerprint {
        compute_identifier(&self.row.buyable_type, self.row.buyable_id, self.options())
    }
}

impl fmt::Debug for BasketLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasketLine")
            .field("id", &self.row.id)
            .field("buyable_type", &self.row.buyable_type)
            .field("buyable_id", &self.row.buyable_id)
            .field("quantity", &self.row.quantity)
            .field("options", &self.row.options.0)
            .finish()
    }
}
