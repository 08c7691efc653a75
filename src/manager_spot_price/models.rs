use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::Value;
use crate::models::PriceRecord;

/// Payload shapes returned by the pricing API, either a bare array or an array wrapped in `data`
///
/// Array elements are kept as raw JSON so that one element that isn't a record object
/// is dropped on its own instead of failing the whole array.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum Payload {
    Records(Vec<Value>),
    Wrapped { data: Vec<Value> },
    Other(IgnoredAny),
}

impl Payload {
    /// Returns the records of the payload, or None if the payload carries no record array
    pub fn into_records(self) -> Option<Vec<PriceRecord>> {
        let elements = match self {
            Payload::Records(elements) => elements,
            Payload::Wrapped { data } => data,
            Payload::Other(_) => return None,
        };

        Some(elements
            .into_iter()
            .filter_map(|v| PriceRecord::deserialize(v).ok())
            .collect())
    }
}
