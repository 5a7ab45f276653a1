//! Display data for a movie card, computed from the record alone so any
//! front end renders the same fallbacks.

use shared::domain::Movie;

pub const DEFAULT_POSTER: &str = "images/default-movie-image.jpg";
pub const UNKNOWN_DURATION: &str = "Unknown";
pub const UNRATED: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardLayout {
    List,
    FullPage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieCard {
    pub layout: CardLayout,
    pub link: String,
    pub title: String,
    pub poster: String,
    pub poster_alt: String,
    pub duration: String,
    pub content_rating: String,
    /// Only shown on cards without a favourite control.
    pub storyline: Option<String>,
    /// `None` when the card has no favourite control.
    pub favourite: Option<bool>,
}

impl MovieCard {
    pub fn new(movie: &Movie, layout: CardLayout, favourite: Option<bool>) -> Self {
        Self {
            layout,
            link: movie.id.to_string(),
            title: movie.title.clone(),
            poster: non_empty(movie.poster_url.as_deref())
                .unwrap_or(DEFAULT_POSTER)
                .to_string(),
            poster_alt: format!("{}'s Poster", movie.title),
            duration: movie
                .runtime_label()
                .unwrap_or_else(|| UNKNOWN_DURATION.to_string()),
            content_rating: non_empty(movie.content_rating.as_deref())
                .unwrap_or(UNRATED)
                .to_string(),
            storyline: match favourite {
                Some(_) => None,
                None => non_empty(movie.storyline.as_deref()).map(str::to_string),
            },
            favourite,
        }
    }

    pub fn list_item(movie: &Movie, is_favourite: bool) -> Self {
        Self::new(movie, CardLayout::List, Some(is_favourite))
    }

    pub fn full_page(movie: &Movie) -> Self {
        Self::new(movie, CardLayout::FullPage, None)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
#[path = "tests/card_tests.rs"]
mod tests;
