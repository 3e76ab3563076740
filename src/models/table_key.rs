use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Remote collections that carry a last-modified timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TableKey {
    Users,
    Products,
    Containers,
    Measures,
    Orders,
    OrderLines,
    News,
}

impl TableKey {
    pub const ALL: [TableKey; 7] = [
        TableKey::Users,
        TableKey::Products,
        TableKey::Containers,
        TableKey::Measures,
        TableKey::Orders,
        TableKey::OrderLines,
        TableKey::News,
    ];

    /// Collection name, as used in remote paths and timestamp documents.
    pub fn collection(self) -> &'static str {
        match self {
            TableKey::Users => "users",
            TableKey::Products => "products",
            TableKey::Containers => "containers",
            TableKey::Measures => "measures",
            TableKey::Orders => "orders",
            TableKey::OrderLines => "orderLines",
            TableKey::News => "news",
        }
    }

    /// Tables whose staleness blocks correct behavior when not synced.
    pub fn default_critical() -> Vec<TableKey> {
        vec![
            TableKey::Users,
            TableKey::Products,
            TableKey::Containers,
            TableKey::Measures,
            TableKey::OrderLines,
        ]
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.collection())
    }
}

impl FromStr for TableKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TableKey::ALL
            .into_iter()
            .find(|t| t.collection().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "Unknown table '{}'. Valid options: users, products, containers, measures, orders, orderLines, news",
                    s
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_names_match_serde() {
        for table in TableKey::ALL {
            let json = serde_json::to_string(&table).unwrap();
            assert_eq!(json, format!("\"{}\"", table.collection()));
        }
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(TableKey::from_str("orderlines").unwrap(), TableKey::OrderLines);
        assert_eq!(TableKey::from_str("News").unwrap(), TableKey::News);
        assert!(TableKey::from_str("invoices").is_err());
    }
}
