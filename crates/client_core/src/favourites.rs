//! The session-wide favourites set. Cloning a [`FavouritesStore`] hands out
//! another handle to the same set; every mutation publishes a fresh snapshot
//! so subscribers can tell the set changed by pointer identity.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};

use shared::domain::{Movie, MovieId};
use tokio::sync::watch;
use tracing::debug;

#[derive(Clone)]
pub struct FavouritesStore {
    inner: Arc<FavouritesInner>,
}

struct FavouritesInner {
    movies: watch::Sender<Arc<Vec<Movie>>>,
    in_flight: Mutex<HashSet<MovieId>>,
}

impl Default for FavouritesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FavouritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavouritesStore")
            .field("len", &self.len())
            .finish()
    }
}

impl FavouritesStore {
    pub fn new() -> Self {
        Self::with_movies(Vec::new())
    }

    pub fn with_movies(movies: Vec<Movie>) -> Self {
        let (movies_tx, _) = watch::channel(Arc::new(dedup_by_id(movies)));
        Self {
            inner: Arc::new(FavouritesInner {
                movies: movies_tx,
                in_flight: Mutex::new(HashSet::new()),
            }),
        }
    }

    pub fn snapshot(&self) -> Arc<Vec<Movie>> {
        self.inner.movies.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.movies.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.movies.borrow().is_empty()
    }

    /// Notified with every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Movie>>> {
        self.inner.movies.subscribe()
    }

    /// Appends `movie` unless an entry with the same id is already present.
    pub fn append(&self, movie: Movie) -> bool {
        self.inner.movies.send_if_modified(|movies| {
            if movies.iter().any(|existing| existing.id == movie.id) {
                debug!(movie_id = %movie.id, "favourites: already present");
                return false;
            }
            let mut next = movies.as_ref().clone();
            next.push(movie);
            *movies = Arc::new(next);
            true
        })
    }

    /// Removes every entry with `id`; returns how many were dropped.
    pub fn remove_by_id(&self, id: &MovieId) -> usize {
        let mut removed = 0;
        self.inner.movies.send_if_modified(|movies| {
            let next: Vec<Movie> = movies
                .iter()
                .filter(|existing| &existing.id != id)
                .cloned()
                .collect();
            removed = movies.len() - next.len();
            if removed == 0 {
                return false;
            }
            *movies = Arc::new(next);
            true
        });
        removed
    }

    /// Replaces the whole set. Only meant for session mount and reset.
    pub fn reset(&self, movies: Vec<Movie>) {
        self.inner.movies.send_replace(Arc::new(dedup_by_id(movies)));
    }

    /// Favourite status as the list view decides it: by title.
    pub fn is_favourite(&self, movie: &Movie) -> bool {
        self.inner
            .movies
            .borrow()
            .iter()
            .any(|favourite| favourite.title == movie.title)
    }

    pub fn contains_id(&self, id: &MovieId) -> bool {
        self.inner
            .movies
            .borrow()
            .iter()
            .any(|favourite| &favourite.id == id)
    }

    /// Claims the favourite action for `id`. `None` while another action on
    /// the same movie still holds its token.
    pub fn try_begin(&self, id: &MovieId) -> Option<InFlightToken> {
        let mut in_flight = self
            .inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(id.clone()) {
            return None;
        }
        Some(InFlightToken {
            inner: Arc::clone(&self.inner),
            id: id.clone(),
        })
    }

    pub fn is_in_flight(&self, id: &MovieId) -> bool {
        self.inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }
}

#[must_use = "the in-flight claim is released when the token is dropped"]
pub struct InFlightToken {
    inner: Arc<FavouritesInner>,
    id: MovieId,
}

impl InFlightToken {
    pub fn id(&self) -> &MovieId {
        &self.id
    }
}

impl Drop for InFlightToken {
    fn drop(&mut self) {
        self.inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

fn dedup_by_id(movies: Vec<Movie>) -> Vec<Movie> {
    let mut seen = HashSet::new();
    movies
        .into_iter()
        .filter(|movie| seen.insert(movie.id.clone()))
        .collect()
}

#[cfg(test)]
#[path = "tests/favourites_tests.rs"]
mod tests;
