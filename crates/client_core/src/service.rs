use anyhow::Result;
use async_trait::async_trait;
use shared::domain::{Category, Movie, MovieId};

/// The backend data service the controllers consume.
///
/// A falsy answer is not an error: `add_favourite` yields `None` and
/// `remove_favourite` yields `false` when the backend declined the change.
#[async_trait]
pub trait MovieService: Send + Sync {
    async fn list_movies(&self, category: Category) -> Result<Vec<Movie>>;
    async fn get_movie_by_id(&self, category: Category, id: &MovieId) -> Result<Movie>;
    async fn add_favourite(&self, movie: &Movie) -> Result<Option<Movie>>;
    async fn remove_favourite(&self, id: &MovieId) -> Result<bool>;
}
