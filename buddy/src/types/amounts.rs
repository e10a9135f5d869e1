use std::fmt;

use rust_decimal::Decimal;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Counterparty name -> amount, kept in the order the server sent it.
///
/// A plain `HashMap` would lose the source order, and ledger entries must be
/// listed in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedAmounts(Vec<(String, Decimal)>);

impl OrderedAmounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `name`. Overwriting keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, amount: Decimal) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = amount,
            None => self.0.push((name, amount)),
        }
    }

    pub fn get(&self, name: &str) -> Option<Decimal> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, a)| *a)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(n, a)| (n.as_str(), *a))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of every amount, or `None` if it does not fit in a `Decimal`.
    pub fn total(&self) -> Option<Decimal> {
        self.0
            .iter()
            .try_fold(Decimal::ZERO, |acc, (_, amount)| acc.checked_add(*amount))
    }
}

impl<S: Into<String>> FromIterator<(S, Decimal)> for OrderedAmounts {
    fn from_iter<I: IntoIterator<Item = (S, Decimal)>>(iter: I) -> Self {
        let mut amounts = OrderedAmounts::new();
        for (name, amount) in iter {
            amounts.insert(name, amount);
        }
        amounts
    }
}

impl Serialize for OrderedAmounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, amount) in &self.0 {
            map.serialize_entry(name, amount)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for OrderedAmounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountsVisitor;

        impl<'de> Visitor<'de> for AmountsVisitor {
            type Value = OrderedAmounts;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of counterparty name to amount")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut amounts = OrderedAmounts::new();
                while let Some((name, amount)) = access.next_entry::<String, Decimal>()? {
                    amounts.insert(name, amount);
                }
                Ok(amounts)
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(OrderedAmounts::new())
            }
        }

        deserializer.deserialize_any(AmountsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deserialize_keeps_source_order() {
        let json = r#"{"zoe": 3.5, "adam": "1.25", "mia": 0}"#;
        let amounts: OrderedAmounts = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = amounts.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["zoe", "adam", "mia"]);
        assert_eq!(amounts.get("adam"), Some(dec!(1.25)));
        assert_eq!(amounts.get("mia"), Some(dec!(0)));
        assert_eq!(amounts.total(), Some(dec!(4.75)));
    }

    #[test]
    fn test_null_deserializes_to_empty() {
        let amounts: OrderedAmounts = serde_json::from_str("null").unwrap();
        assert!(amounts.is_empty());
    }

    #[test]
    fn test_insert_overwrite_keeps_position() {
        let mut amounts: OrderedAmounts = [("a", dec!(1)), ("b", dec!(2))].into_iter().collect();
        amounts.insert("a", dec!(5));
        let entries: Vec<(&str, Decimal)> = amounts.iter().collect();
        assert_eq!(entries, vec![("a", dec!(5)), ("b", dec!(2))]);
    }

    #[test]
    fn test_total_overflow_is_none() {
        let amounts: OrderedAmounts = [("a", Decimal::MAX), ("b", dec!(1))].into_iter().collect();
        assert_eq!(amounts.total(), None);
    }
}
