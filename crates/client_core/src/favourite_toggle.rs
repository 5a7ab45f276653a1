//! Add/remove-favourite action for a single movie card.

use std::sync::Arc;

use shared::{
    domain::{Movie, MovieId},
    error::{ControllerError, COULD_NOT_FAVOUR, COULD_NOT_UNFAVOUR},
};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    favourites::FavouritesStore,
    fetch_state::{FetchState, LoadingGuard},
    service::MovieService,
};

/// Last change a toggle applied to the favourites set.
#[derive(Debug, Clone, PartialEq)]
pub enum FavouriteChange {
    Added(Movie),
    Removed(MovieId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    Added(Movie),
    Removed(MovieId),
    /// The service answered with a falsy result.
    Denied,
    /// The service call failed.
    Failed,
    /// Another action on the same movie is still in flight.
    Busy,
}

pub struct FavouriteToggle {
    service: Arc<dyn MovieService>,
    favourites: FavouritesStore,
    movie: Movie,
    state: watch::Sender<FetchState<FavouriteChange>>,
}

impl FavouriteToggle {
    pub fn new(service: Arc<dyn MovieService>, favourites: FavouritesStore, movie: Movie) -> Self {
        let (state, _) = watch::channel(FetchState::idle());
        Self {
            service,
            favourites,
            movie,
            state,
        }
    }

    pub fn movie(&self) -> &Movie {
        &self.movie
    }

    pub fn is_favourite(&self) -> bool {
        self.favourites.is_favourite(&self.movie)
    }

    pub fn state(&self) -> FetchState<FavouriteChange> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<FavouriteChange>> {
        self.state.subscribe()
    }

    /// Dismisses a stale error without starting a new action.
    pub fn clear_error(&self) {
        self.state.send_if_modified(|state| state.error.take().is_some());
    }

    /// Adds the movie to the favourites if it is not one yet, removes it
    /// otherwise. A previous error is left in place.
    pub async fn toggle(&self) -> ToggleOutcome {
        let Some(_claim) = self.favourites.try_begin(&self.movie.id) else {
            debug!(movie_id = %self.movie.id, "favourite toggle ignored, already in flight");
            return ToggleOutcome::Busy;
        };

        let guard = LoadingGuard::begin(&self.state, None, |_| {});
        if self.is_favourite() {
            self.remove(guard).await
        } else {
            self.add(guard).await
        }
    }

    async fn add(&self, guard: LoadingGuard<'_, FavouriteChange>) -> ToggleOutcome {
        match self.service.add_favourite(&self.movie).await {
            Ok(Some(created)) => {
                debug!(movie_id = %created.id, "favourite added");
                self.favourites.append(created.clone());
                let change = FavouriteChange::Added(created.clone());
                guard.finish(|state| state.data = Some(change));
                ToggleOutcome::Added(created)
            }
            Ok(None) => {
                guard.finish(|state| state.error = Some(ControllerError::denied(COULD_NOT_FAVOUR)));
                ToggleOutcome::Denied
            }
            Err(err) => {
                warn!(movie_id = %self.movie.id, "add favourite failed: {err:#}");
                guard.finish(|state| state.error = Some(ControllerError::transport(&err)));
                ToggleOutcome::Failed
            }
        }
    }

    async fn remove(&self, guard: LoadingGuard<'_, FavouriteChange>) -> ToggleOutcome {
        let id = self.movie.id.clone();
        match self.service.remove_favourite(&id).await {
            Ok(true) => {
                let removed = self.favourites.remove_by_id(&id);
                debug!(movie_id = %id, removed, "favourite removed");
                let change = FavouriteChange::Removed(id.clone());
                guard.finish(|state| state.data = Some(change));
                ToggleOutcome::Removed(id)
            }
            Ok(false) => {
                guard.finish(|state| {
                    state.error = Some(ControllerError::denied(COULD_NOT_UNFAVOUR))
                });
                ToggleOutcome::Denied
            }
            Err(err) => {
                warn!(movie_id = %id, "remove favourite failed: {err:#}");
                guard.finish(|state| state.error = Some(ControllerError::transport(&err)));
                ToggleOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/favourite_toggle_tests.rs"]
mod tests;
