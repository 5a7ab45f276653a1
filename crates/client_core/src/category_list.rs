//! Movie listing for one category at a time.
//!
//! Remote categories are fetched through the [`MovieService`]; the
//! favourites category mirrors the session's [`FavouritesStore`] and never
//! touches the network. Every fetch is tagged, and a response that arrives
//! after a newer request was issued is dropped.

use std::sync::{Arc, Weak};

use shared::{
    domain::{Category, Movie},
    error::ControllerError,
};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};

use crate::{
    favourites::FavouritesStore,
    fetch_state::{FetchState, Generations, LoadingGuard},
    service::MovieService,
};

pub struct CategoryList {
    service: Arc<dyn MovieService>,
    favourites: FavouritesStore,
    category: watch::Sender<Category>,
    state: watch::Sender<FetchState<Vec<Movie>>>,
    generations: Generations,
    follower: JoinHandle<()>,
}

impl CategoryList {
    /// Must be called from within a tokio runtime: a follower task keeps the
    /// favourites view in sync with the store for as long as the list lives.
    /// A remote category starts loading and its first fetch is already
    /// issued when this returns.
    pub fn new(
        service: Arc<dyn MovieService>,
        favourites: FavouritesStore,
        category: Category,
    ) -> Arc<Self> {
        let initial = if category.is_favourites() {
            FetchState::ready(favourites.snapshot().as_ref().clone())
        } else {
            FetchState::loading()
        };
        let (state, _) = watch::channel(initial);
        let (category, _) = watch::channel(category);

        let list = Arc::new_cyclic(|weak| {
            let follower = spawn_favourites_follower(weak.clone(), favourites.subscribe());
            Self {
                service,
                favourites,
                category,
                state,
                generations: Generations::default(),
                follower,
            }
        });
        if !list.category().is_favourites() {
            let _ = list.spawn_fetch();
        }
        list
    }

    pub fn category(&self) -> Category {
        *self.category.borrow()
    }

    pub fn state(&self) -> FetchState<Vec<Movie>> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<Vec<Movie>>> {
        self.state.subscribe()
    }

    /// Title-based, like the cards rendered from this list.
    pub fn is_favourite(&self, movie: &Movie) -> bool {
        self.favourites.is_favourite(movie)
    }

    /// Switches category; only an actual change triggers a new fetch.
    pub async fn set_category(&self, category: Category) {
        let changed = self.category.send_if_modified(|current| {
            if *current == category {
                return false;
            }
            *current = category;
            true
        });
        if changed {
            self.fetch().await;
        }
    }

    /// Loads the current category, replacing the list on success.
    pub async fn fetch(&self) {
        // Issue before reading the category: a later switch always issues a
        // newer tag than the one that fetches the old category.
        let tag = self.generations.issue();
        let category = self.category();

        if category.is_favourites() {
            self.mirror_favourites();
            return;
        }

        let guard = LoadingGuard::begin(&self.state, Some(tag), |state| state.error = None);
        debug!(%category, generation = tag.value(), "category list: fetching");

        let applied = match self.service.list_movies(category).await {
            Ok(movies) => {
                let count = movies.len();
                let applied = guard.finish(|state| state.data = Some(movies));
                if applied {
                    debug!(%category, count, "category list: loaded");
                }
                applied
            }
            Err(err) => {
                warn!(%category, "category list fetch failed: {err:#}");
                guard.finish(|state| {
                    state.data = None;
                    state.error = Some(ControllerError::transport(&err));
                })
            }
        };

        if !applied {
            debug!(
                %category,
                generation = tag.value(),
                "category list: discarded superseded response"
            );
        }
    }

    /// Runs [`fetch`](Self::fetch) as a detached task.
    pub fn spawn_fetch(self: &Arc<Self>) -> JoinHandle<()> {
        let list = Arc::clone(self);
        tokio::spawn(async move { list.fetch().await })
    }

    fn mirror_favourites(&self) {
        let movies = self.favourites.snapshot().as_ref().clone();
        self.state.send_if_modified(|state| {
            if !self.category().is_favourites() {
                return false;
            }
            state.loading = false;
            state.error = None;
            state.data = Some(movies);
            true
        });
    }
}

impl Drop for CategoryList {
    fn drop(&mut self) {
        self.follower.abort();
    }
}

fn spawn_favourites_follower(
    list: Weak<CategoryList>,
    mut revisions: watch::Receiver<Arc<Vec<Movie>>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while revisions.changed().await.is_ok() {
            let Some(controller) = list.upgrade() else {
                continue;
            };
            if controller.category().is_favourites() {
                controller.mirror_favourites();
            }
        }
    })
}

#[cfg(test)]
#[path = "tests/category_list_tests.rs"]
mod tests;
