use serde::{Deserialize, Serialize};

/// Unit of measure products are priced in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub abbreviation: String,
}

impl Measure {
    pub fn new(id: impl Into<String>, name: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            abbreviation: abbreviation.into(),
        }
    }
}
