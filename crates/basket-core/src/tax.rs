//! # Tax Module
//!
//! Tax rates, calculation modes, and the per-line tax resolution rule.
//!
//! ## Rate Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │               Where does a line's tax rate come from?               │
//! │                                                                     │
//! │  1. caller override  ── tax(Some(rate)) wins when non-zero          │
//! │  2. flat config rate ── only in Flat mode, when non-zero            │
//! │  3. buyable declared ── the product's own rate, when declared       │
//! │  4. zero             ── no tax                                      │
//! │                                                                     │
//! │  A zero rate at any step defers to the next one, so a flat rate     │
//! │  of 0 still lets individual products declare their own rate.        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01% = 1/10000, so 825 bps = 8.25%. Basis points keep
/// percentage math in integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Reinterprets the rate's raw figure as an absolute money amount.
    ///
    /// Used by [`TaxMode::FixedPerItem`], where the configured or declared
    /// "rate" is a charge per line rather than a percentage. Both carriers
    /// scale the configured figure by 100, so a rate entered as `2.5` is
    /// 250 bps as a percentage and $2.50 as a fixed charge.
    #[inline]
    pub const fn as_fixed_amount(&self) -> Money {
        Money::from_cents(self.0 as i64)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Tax Mode
// =============================================================================

/// How basket tax is calculated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaxMode {
    /// A single configured percentage applied to every line's subtotal.
    Flat,
    /// Each buyable declares its own percentage via `Buyable::tax_rate`.
    PerItem,
    /// The resolved rate is an absolute amount charged once per line,
    /// not a percentage.
    FixedPerItem,
}

impl Default for TaxMode {
    fn default() -> Self {
        TaxMode::Flat
    }
}

impl FromStr for TaxMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flat" => Ok(TaxMode::Flat),
            "per-item" => Ok(TaxMode::PerItem),
            "fixed-per-item" => Ok(TaxMode::FixedPerItem),
            other => Err(CoreError::UnknownTaxMode {
                mode: other.to_string(),
            }),
        }
    }
}

// =============================================================================
// Tax Config
// =============================================================================

/// Injected tax configuration.
///
/// `rate` is only consulted in [`TaxMode::Flat`]; the other modes source
/// their rate from the buyable or a caller override.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TaxConfig {
    pub mode: TaxMode,
    pub rate: TaxRate,
}

impl TaxConfig {
    /// A flat-percentage configuration.
    pub const fn flat(rate: TaxRate) -> Self {
        TaxConfig {
            mode: TaxMode::Flat,
            rate,
        }
    }

    /// A per-item configuration (rates declared by each buyable).
    pub const fn per_item() -> Self {
        TaxConfig {
            mode: TaxMode::PerItem,
            rate: TaxRate::zero(),
        }
    }
}

// =============================================================================
// Per-Line Tax
// =============================================================================

/// Calculates the tax for one basket line.
///
/// The effective rate is the first non-zero of: the caller `override_rate`,
/// the configured flat rate (Flat mode only), the buyable's `declared_rate`.
/// In [`TaxMode::FixedPerItem`] the effective rate is charged as an absolute
/// amount; otherwise it is a percentage of `line_subtotal`, rounded half-up
/// to a cent.
///
/// ## Example
/// ```rust
/// use basket_core::money::Money;
/// use basket_core::tax::{line_tax, TaxConfig, TaxRate};
///
/// let config = TaxConfig::flat(TaxRate::from_percentage(10.0));
/// let tax = line_tax(&config, None, Money::from_cents(1000), None);
/// assert_eq!(tax.cents(), 100); // $10.00 at 10% = $1.00
/// ```
pub fn line_tax(
    config: &TaxConfig,
    override_rate: Option<TaxRate>,
    line_subtotal: Money,
    declared_rate: Option<TaxRate>,
) -> Money {
    let flat_rate = match config.mode {
        TaxMode::Flat => Some(config.rate),
        TaxMode::PerItem | TaxMode::FixedPerItem => None,
    };

    let effective = override_rate
        .filter(|rate| !rate.is_zero())
        .or_else(|| flat_rate.filter(|rate| !rate.is_zero()))
        .or_else(|| declared_rate.filter(|rate| !rate.is_zero()))
        .unwrap_or_default();

    match config.mode {
        TaxMode::FixedPerItem => effective.as_fixed_amount(),
        TaxMode::Flat | TaxMode::PerItem => line_subtotal.calculate_tax(effective),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
