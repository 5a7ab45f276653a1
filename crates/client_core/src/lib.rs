//! Data-fetch and favourite-mutation controllers for the movie catalog.
//!
//! Each controller publishes a [`FetchState`] through a `watch` channel; the
//! view subscribes and renders, and calls back into the controller for
//! actions.

pub mod card;
pub mod category_list;
pub mod favourite_toggle;
pub mod favourites;
pub mod fetch_state;
pub mod http;
pub mod movie_detail;
pub mod service;
pub mod session;

pub use card::{CardLayout, MovieCard};
pub use category_list::CategoryList;
pub use favourite_toggle::{FavouriteChange, FavouriteToggle, ToggleOutcome};
pub use favourites::{FavouritesStore, InFlightToken};
pub use fetch_state::{FetchState, Phase, View};
pub use http::{HttpMovieService, ServiceError, DEFAULT_REQUEST_TIMEOUT};
pub use movie_detail::MovieDetail;
pub use service::MovieService;
pub use session::CatalogSession;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
