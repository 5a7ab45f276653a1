//! Wire helpers for the json-server style catalog backend.

use serde::{Deserialize, Deserializer};

use crate::domain::MovieId;

/// Ids are strings in the seeded data but numbers for records the backend
/// created itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for MovieId {
    fn from(value: RawId) -> Self {
        match value {
            RawId::Text(text) => MovieId(text),
            RawId::Number(number) => MovieId(number.to_string()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRating {
    Number(f32),
    Text(String),
}

/// Ratings show up as numbers, numeric strings, empty strings or null.
pub fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawRating>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawRating::Number(value)) => Some(value),
        Some(RawRating::Text(text)) => text.trim().parse::<f32>().ok(),
        None => None,
    })
}

/// Name of the backend resource holding the favourites listing.
pub const FAVOURITES_RESOURCE: &str = "favourit";
