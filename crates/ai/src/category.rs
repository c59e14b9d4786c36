use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Category reported for crops missing from the table.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Static crop → category lookup.
///
/// Keys are stored lowercase; lookups ignore case and surrounding whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct CategoryTable {
    entries: BTreeMap<String, String>,
}

impl CategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, crop: &str) -> Option<&str> {
        self.entries.get(&normalize(crop)).map(String::as_str)
    }

    /// Category for `crop`, or [`UNKNOWN_CATEGORY`].
    pub fn lookup(&self, crop: &str) -> &str {
        self.get(crop).unwrap_or(UNKNOWN_CATEGORY)
    }
}

fn normalize(crop: &str) -> String {
    crop.trim().to_lowercase()
}

impl From<BTreeMap<String, String>> for CategoryTable {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<CategoryTable> for BTreeMap<String, String> {
    fn from(table: CategoryTable) -> Self {
        table.entries
    }
}

impl<K, V> FromIterator<(K, V)> for CategoryTable
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (normalize(k.as_ref()), v.into()))
                .collect(),
        }
    }
}
