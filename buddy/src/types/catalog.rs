//! Reference catalogs: closed key enumerations with a fallback entry.
//!
//! The backend serves each catalog as a flat `key -> value` map (icon URL or
//! currency symbol). Keys are parsed into one of the enums below; anything
//! unrecognised becomes the enum's `Other` variant.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// A closed set of catalog keys with a designated fallback.
pub trait CatalogKey: Copy + Eq + Hash + fmt::Debug + 'static {
    /// Key used when a value is unknown or missing from the catalog.
    const FALLBACK: Self;

    /// Every key, fallback included.
    fn all() -> &'static [Self];

    /// Wire spelling of the key.
    fn as_key(self) -> &'static str;

    /// Parse a wire key, ignoring ASCII case.
    fn from_key(raw: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|k| k.as_key().eq_ignore_ascii_case(raw.trim()))
    }

    /// Parse a wire key, mapping unknown keys to [`CatalogKey::FALLBACK`].
    fn from_key_or_fallback(raw: &str) -> Self {
        Self::from_key(raw).unwrap_or(Self::FALLBACK)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GroupType {
    Home,
    Trip,
    Couple,
    Other,
}

impl CatalogKey for GroupType {
    const FALLBACK: Self = GroupType::Other;

    fn all() -> &'static [Self] {
        &[
            GroupType::Home,
            GroupType::Trip,
            GroupType::Couple,
            GroupType::Other,
        ]
    }

    fn as_key(self) -> &'static str {
        match self {
            GroupType::Home => "HOME",
            GroupType::Trip => "TRIP",
            GroupType::Couple => "COUPLE",
            GroupType::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Currency {
    Aud,
    Usd,
    Eur,
    Gbp,
    Cny,
    Jpy,
    Other,
}

impl CatalogKey for Currency {
    const FALLBACK: Self = Currency::Other;

    fn all() -> &'static [Self] {
        &[
            Currency::Aud,
            Currency::Usd,
            Currency::Eur,
            Currency::Gbp,
            Currency::Cny,
            Currency::Jpy,
            Currency::Other,
        ]
    }

    fn as_key(self) -> &'static str {
        match self {
            Currency::Aud => "AUD",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Cny => "CNY",
            Currency::Jpy => "JPY",
            Currency::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExpenseType {
    Food,
    Transport,
    Accommodation,
    Entertainment,
    Shopping,
    Utilities,
    Other,
}

impl CatalogKey for ExpenseType {
    const FALLBACK: Self = ExpenseType::Other;

    fn all() -> &'static [Self] {
        &[
            ExpenseType::Food,
            ExpenseType::Transport,
            ExpenseType::Accommodation,
            ExpenseType::Entertainment,
            ExpenseType::Shopping,
            ExpenseType::Utilities,
            ExpenseType::Other,
        ]
    }

    fn as_key(self) -> &'static str {
        match self {
            ExpenseType::Food => "FOOD",
            ExpenseType::Transport => "TRANSPORT",
            ExpenseType::Accommodation => "ACCOMMODATION",
            ExpenseType::Entertainment => "ENTERTAINMENT",
            ExpenseType::Shopping => "SHOPPING",
            ExpenseType::Utilities => "UTILITIES",
            ExpenseType::Other => "OTHER",
        }
    }
}

macro_rules! string_conversions {
    ($($ty:ty),*) => {$(
        impl From<String> for $ty {
            fn from(raw: String) -> Self {
                <$ty>::from_key_or_fallback(&raw)
            }
        }

        impl From<$ty> for String {
            fn from(key: $ty) -> Self {
                key.as_key().to_string()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_key())
            }
        }
    )*};
}

string_conversions!(GroupType, Currency, ExpenseType);

/// Key -> icon URL or symbol, resolved through [`Catalog::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: CatalogKey + Serialize",
    deserialize = "K: CatalogKey + Deserialize<'de>"
))]
pub struct Catalog<K: CatalogKey> {
    entries: HashMap<K, String>,
}

impl<K: CatalogKey> Default for Catalog<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: CatalogKey> Catalog<K> {
    /// Build from the raw map served by the backend. Unknown keys are dropped,
    /// except that they fill the fallback slot if the server sent no explicit one.
    pub fn from_raw(raw: HashMap<String, String>) -> Self {
        let mut entries = HashMap::new();
        let mut unknown = Vec::new();
        for (key, value) in raw {
            match K::from_key(&key) {
                Some(k) => {
                    entries.insert(k, value);
                }
                None => unknown.push((key, value)),
            }
        }
        if !entries.contains_key(&K::FALLBACK) {
            // Sort so the choice does not depend on HashMap order.
            unknown.sort();
            if let Some((key, value)) = unknown.into_iter().next() {
                tracing::debug!(key = %key, "unknown catalog key used as fallback");
                entries.insert(K::FALLBACK, value);
            }
        }
        Self { entries }
    }

    /// Value for `key`, or the fallback entry's value when `key` is absent.
    pub fn resolve(&self, key: K) -> Option<&str> {
        self.entries
            .get(&key)
            .or_else(|| self.entries.get(&K::FALLBACK))
            .map(String::as_str)
    }

    /// Resolve a raw wire key.
    pub fn resolve_raw(&self, raw: &str) -> Option<&str> {
        self.resolve(K::from_key_or_fallback(raw))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
