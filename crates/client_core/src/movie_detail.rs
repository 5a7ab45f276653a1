//! Single-movie fetch behind the detail page.

use std::sync::Arc;

use shared::{
    domain::{Category, Movie, MovieId},
    error::ControllerError,
};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    fetch_state::{FetchState, Generations, LoadingGuard, RequestTag},
    service::MovieService,
};

pub struct MovieDetail {
    service: Arc<dyn MovieService>,
    request: watch::Sender<Option<(Category, MovieId)>>,
    state: watch::Sender<FetchState<Movie>>,
    generations: Generations,
}

impl MovieDetail {
    pub fn new(service: Arc<dyn MovieService>) -> Self {
        let (request, _) = watch::channel(None);
        let (state, _) = watch::channel(FetchState::loading());
        Self {
            service,
            request,
            state,
            generations: Generations::default(),
        }
    }

    pub fn state(&self) -> FetchState<Movie> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<Movie>> {
        self.state.subscribe()
    }

    pub fn current_request(&self) -> Option<(Category, MovieId)> {
        self.request.borrow().clone()
    }

    /// Fetches `id`, once per distinct `(category, id)` pair. Without a
    /// category hint the coming-soon listing is assumed.
    pub async fn load(&self, category: Option<Category>, id: MovieId) {
        let category = category.unwrap_or_else(Category::default_detail);
        let key = (category, id);
        // The tag is issued under the request lock so that the latest
        // recorded pair always owns the latest generation.
        let mut tag = None;
        self.request.send_if_modified(|current| {
            if current.as_ref() == Some(&key) {
                return false;
            }
            *current = Some(key.clone());
            tag = Some(self.generations.issue());
            true
        });
        let Some(tag) = tag else {
            debug!(%category, movie_id = %key.1, "movie detail: already requested");
            return;
        };
        let (category, id) = key;
        self.run(category, id, tag).await;
    }

    /// Re-issues the current request; there is no automatic retry.
    pub async fn reload(&self) {
        let (category, id, tag) = {
            let current = self.request.borrow();
            let Some((category, id)) = current.as_ref() else {
                return;
            };
            (*category, id.clone(), self.generations.issue())
        };
        self.run(category, id, tag).await;
    }

    async fn run(&self, category: Category, id: MovieId, tag: RequestTag<'_>) {
        let guard = LoadingGuard::begin(&self.state, Some(tag), |state| {
            state.data = None;
            state.error = None;
        });
        debug!(%category, movie_id = %id, generation = tag.value(), "movie detail: fetching");

        let applied = match self.service.get_movie_by_id(category, &id).await {
            Ok(movie) => guard.finish(|state| state.data = Some(movie)),
            Err(err) => {
                warn!(%category, movie_id = %id, "movie detail fetch failed: {err:#}");
                guard.finish(|state| state.error = Some(ControllerError::transport(&err)))
            }
        };

        if !applied {
            debug!(movie_id = %id, "movie detail: discarded superseded response");
        }
    }
}

#[cfg(test)]
#[path = "tests/movie_detail_tests.rs"]
mod tests;
