//! Simulated order types.
//!
//! Orders are never transmitted or stored. [`OrderDetails`] holds whatever the
//! checkout form submitted, and [`OrderConfirmation`] is the summary shown once
//! the order has been "placed".

use core::fmt;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::price::Price;

/// Field values submitted with the checkout form, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderDetails(BTreeMap<String, String>);

impl OrderDetails {
    /// Create an empty set of details.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Returns the trimmed value of `field`, or `None` if it is missing or blank.
    #[must_use]
    pub fn filled(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Number of submitted fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no fields were submitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OrderDetails {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Reference number shown on the confirmation view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderReference(Uuid);

impl OrderReference {
    /// Generate a fresh random reference.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Short uppercase form, e.g. `UV-1A2B3C4D`.
    #[must_use]
    pub fn short(&self) -> String {
        let simple = self.0.simple().to_string();
        let head: String = simple.chars().take(8).collect();
        format!("UV-{}", head.to_uppercase())
    }
}

impl fmt::Display for OrderReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Summary of a placed (simulated) order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Random order reference.
    pub reference: OrderReference,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
    /// Number of units in the cart at submission.
    pub item_count: u64,
    /// Cart subtotal at submission.
    pub subtotal: Price,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_trims_and_rejects_blank() {
        let details = OrderDetails::new()
            .with("name", "  Ada  ")
            .with("address", "   ");
        assert_eq!(details.filled("name"), Some("Ada"));
        assert_eq!(details.filled("address"), None);
        assert_eq!(details.filled("email"), None);
    }

    #[test]
    fn test_from_iter() {
        let details: OrderDetails = [("name", "Ada"), ("email", "ada@example.com")]
            .into_iter()
            .collect();
        assert_eq!(details.len(), 2);
        assert!(!details.is_empty());
    }

    #[test]
    fn test_reference_short_form() {
        let reference = OrderReference::generate();
        let short = reference.short();
        assert!(short.starts_with("UV-"));
        assert_eq!(short.len(), 11);
        assert_ne!(reference, OrderReference::generate());
    }

    #[test]
    fn test_details_serialize_as_map() {
        let details = OrderDetails::new().with("name", "Ada");
        let json = serde_json::to_string(&details).unwrap();
        assert_eq!(json, r#"{"name":"Ada"}"#);
    }
}
