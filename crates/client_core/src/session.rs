use std::sync::Arc;

use anyhow::{Context, Result};
use shared::domain::{Category, Movie};
use tracing::info;

use crate::{
    category_list::CategoryList, favourite_toggle::FavouriteToggle, favourites::FavouritesStore,
    movie_detail::MovieDetail, service::MovieService,
};

/// Page-level scope owning the favourites set; controllers created from a
/// session share its store.
#[derive(Clone)]
pub struct CatalogSession {
    service: Arc<dyn MovieService>,
    favourites: FavouritesStore,
}

impl CatalogSession {
    pub fn new(service: Arc<dyn MovieService>) -> Self {
        Self {
            service,
            favourites: FavouritesStore::new(),
        }
    }

    /// Loads the backend's favourites listing into the store.
    pub async fn mount(&self) -> Result<usize> {
        let movies = self
            .service
            .list_movies(Category::Favourites)
            .await
            .context("failed to load favourites")?;
        self.favourites.reset(movies);
        let count = self.favourites.len();
        info!(count, "catalog session mounted");
        Ok(count)
    }

    pub fn reset(&self) {
        self.favourites.reset(Vec::new());
        info!("catalog session reset");
    }

    pub fn favourites(&self) -> &FavouritesStore {
        &self.favourites
    }

    pub fn service(&self) -> Arc<dyn MovieService> {
        Arc::clone(&self.service)
    }

    pub fn category_list(&self, category: Category) -> Arc<CategoryList> {
        CategoryList::new(self.service(), self.favourites.clone(), category)
    }

    pub fn movie_detail(&self) -> MovieDetail {
        MovieDetail::new(self.service())
    }

    pub fn favourite_toggle(&self, movie: Movie) -> FavouriteToggle {
        FavouriteToggle::new(self.service(), self.favourites.clone(), movie)
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
