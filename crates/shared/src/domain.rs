use std::{fmt, str::FromStr, time::Duration};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::protocol::{lenient_rating, RawId, FAVOURITES_RESOURCE};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct MovieId(pub String);

impl MovieId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MovieId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<MovieId> for String {
    fn from(value: MovieId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    NowPlaying,
    ComingSoon,
    TopRatedIndia,
    TopRated,
    Favourites,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::NowPlaying,
        Category::ComingSoon,
        Category::TopRatedIndia,
        Category::TopRated,
        Category::Favourites,
    ];

    /// Backend resource the category is served from.
    pub fn path(self) -> &'static str {
        match self {
            Category::NowPlaying => "movies-in-theaters",
            Category::ComingSoon => "movies-coming",
            Category::TopRatedIndia => "top-rated-india",
            Category::TopRated => "top-rated-movies",
            Category::Favourites => FAVOURITES_RESOURCE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::NowPlaying => "now_playing",
            Category::ComingSoon => "coming_soon",
            Category::TopRatedIndia => "top_rated_india",
            Category::TopRated => "top_rated",
            Category::Favourites => "favourites",
        }
    }

    /// Category assumed by detail pages that were opened without a hint.
    pub fn default_detail() -> Self {
        Category::ComingSoon
    }

    pub fn is_favourites(self) -> bool {
        self == Category::Favourites
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Category::ALL
            .into_iter()
            .find(|category| {
                category.as_str() == normalized
                    || category.path().replace('-', "_") == normalized
            })
            .ok_or_else(|| UnknownCategory(raw.to_string()))
    }
}

/// A movie record as served by the catalog backend. Never mutated after it
/// has been fetched; favouriting is tracked outside the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[serde(default, rename = "posterurl", skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    /// ISO-8601 duration text, e.g. `PT100M`.
    #[serde(default)]
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storyline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actors: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient_rating",
        skip_serializing_if = "Option::is_none"
    )]
    pub imdb_rating: Option<f32>,
}

impl Movie {
    pub fn new(id: impl Into<MovieId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            poster_url: None,
            duration: String::new(),
            content_rating: None,
            storyline: None,
            release_date: None,
            genres: Vec::new(),
            actors: Vec::new(),
            imdb_rating: None,
        }
    }

    pub fn runtime(&self) -> Option<Duration> {
        parse_iso_duration(&self.duration)
    }

    /// Runtime rendered as `HHH mmM`, e.g. `01H 40M`.
    pub fn runtime_label(&self) -> Option<String> {
        let minutes = self.runtime()?.as_secs() / 60;
        Some(format!("{:02}H {:02}M", minutes / 60, minutes % 60))
    }

    pub fn release_date(&self) -> Option<NaiveDate> {
        let raw = self.release_date.as_deref()?.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }
}

impl From<String> for MovieId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Parses the subset of ISO-8601 durations the backend emits:
/// `P[nD]T[nH][nM][nS]` with integer components. Totals that do not fit in
/// a `u64` of seconds are rejected.
pub fn parse_iso_duration(raw: &str) -> Option<Duration> {
    let rest = raw.trim().strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut secs = 0u64;
    let mut seen = false;

    for (value, unit) in components(date_part)? {
        let unit_secs = match unit {
            'D' => 86_400,
            'W' => 7 * 86_400,
            _ => return None,
        };
        secs = secs.checked_add(value.checked_mul(unit_secs)?)?;
        seen = true;
    }

    if let Some(time_part) = time_part {
        let parts = components(time_part)?;
        if parts.is_empty() {
            return None;
        }
        for (value, unit) in parts {
            let unit_secs = match unit {
                'H' => 3_600,
                'M' => 60,
                'S' => 1,
                _ => return None,
            };
            secs = secs.checked_add(value.checked_mul(unit_secs)?)?;
            seen = true;
        }
    }

    seen.then(|| Duration::from_secs(secs))
}

fn components(part: &str) -> Option<Vec<(u64, char)>> {
    let mut out = Vec::new();
    let mut digits = String::new();
    for ch in part.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else {
            if digits.is_empty() {
                return None;
            }
            out.push((digits.parse().ok()?, ch.to_ascii_uppercase()));
            digits.clear();
        }
    }
    digits.is_empty().then_some(out)
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
