//! # Option Maps
//!
//! Line items carry a mapping of option key → scalar value ("size" → "M",
//! "gift-wrap" → true). A buyable declares which keys it understands and
//! which values it accepts per key; everything else is silently dropped at
//! the door. Dropping instead of rejecting keeps `add` infallible in the
//! face of stale or hand-crafted storefront forms.
//!
//! Option maps are `BTreeMap`s so key order is canonical, which the
//! identity fingerprint relies on.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A scalar option value.
///
/// Deserialization is untagged, so stored JSON like
/// `{"gift-wrap": true, "count": 2, "size": "M"}` maps onto the natural
/// variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(value) => write!(f, "{value}"),
            OptionValue::Int(value) => write!(f, "{value}"),
            OptionValue::Text(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

/// The options chosen for one line item, keyed by option name.
pub type OptionMap = BTreeMap<String, OptionValue>;

/// What a buyable accepts for one option key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionRule {
    /// Wildcard: any value is accepted for this key.
    Any,
    /// Only the enumerated values are accepted.
    OneOf(Vec<OptionValue>),
}

impl OptionRule {
    fn allows(&self, value: &OptionValue) -> bool {
        match self {
            OptionRule::Any => true,
            OptionRule::OneOf(values) => values.contains(value),
        }
    }
}

/// The full allow-list a buyable declares, keyed by option name.
pub type AllowedOptions = BTreeMap<String, OptionRule>;

/// Filters raw options against a buyable's allow-list.
///
/// A key survives only if the buyable declares it AND the declared rule
/// accepts the given value. Unknown keys and disallowed values are dropped,
/// never an error.
///
/// ## Example
/// ```rust
/// use basket_core::options::{validate_options, AllowedOptions, OptionMap, OptionRule};
///
/// let mut allowed = AllowedOptions::new();
/// allowed.insert("color".into(), OptionRule::OneOf(vec!["red".into(), "blue".into()]));
/// allowed.insert("size".into(), OptionRule::Any);
///
/// let mut raw = OptionMap::new();
/// raw.insert("color".into(), "green".into()); // not in the allowed set
/// raw.insert("size".into(), "M".into());      // wildcard
/// raw.insert("gift".into(), true.into());     // unknown key
///
/// let valid = validate_options(&raw, &allowed);
/// assert_eq!(valid.len(), 1);
/// assert!(valid.contains_key("size"));
/// ```
pub fn validate_options(raw: &OptionMap, allowed: &AllowedOptions) -> OptionMap {
    raw.iter()
        .filter(|(key, value)| {
            allowed
                .get(key.as_str())
                .map(|rule| rule.allows(value))
                .unwrap_or(false)
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
