use serde::Deserialize;
use serde_json::Value;

/// Top-level response for Reddit listings
#[derive(Deserialize, Debug)]
pub struct Listing {
    #[serde(default)]
    pub kind: Option<String>,
    pub data: ListingData,
}

/// Children of a listing plus the cursor for the next page
#[derive(Deserialize, Debug)]
pub struct ListingData {
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub before: Option<String>,
    pub children: Vec<Thing>,
}

/// A Reddit thing with `kind` and `data` fields
#[derive(Deserialize, Debug)]
pub struct Thing {
    #[serde(default)]
    pub kind: Option<String>,
    pub data: Value,
}

impl Listing {
    /// Parses a listing page, `None` if the value is not listing-shaped.
    pub fn parse(value: Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }

    /// Unwrapped `data` of every child.
    pub fn into_records(self) -> Vec<Value> {
        self.data.children.into_iter().map(|thing| thing.data).collect()
    }
}
