//! Loading/error/data triple shared by every controller, plus the scoped
//! finaliser that guarantees `loading` is cleared on every exit path.

use std::sync::atomic::{AtomicU64, Ordering};

use shared::error::ControllerError;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub loading: bool,
    pub error: Option<ControllerError>,
    pub data: Option<T>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<T> FetchState<T> {
    pub fn idle() -> Self {
        Self {
            loading: false,
            error: None,
            data: None,
        }
    }

    pub fn loading() -> Self {
        Self {
            loading: true,
            error: None,
            data: None,
        }
    }

    pub fn ready(data: T) -> Self {
        Self {
            loading: false,
            error: None,
            data: Some(data),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Error
        } else if self.data.is_some() {
            Phase::Success
        } else {
            Phase::Idle
        }
    }

    /// What the view should render: while loading, error and data are stale.
    pub fn view(&self) -> View<'_, T> {
        match (self.loading, &self.error, &self.data) {
            (true, _, _) => View::Loading,
            (false, Some(error), _) => View::Error(error),
            (false, None, Some(data)) => View::Ready(data),
            (false, None, None) => View::Empty,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(ControllerError::message)
    }
}

#[derive(Debug, PartialEq)]
pub enum View<'a, T> {
    Loading,
    Error(&'a ControllerError),
    Ready(&'a T),
    Empty,
}

/// Monotonic request counter; only the latest issued tag may touch state.
#[derive(Debug, Default)]
pub(crate) struct Generations(AtomicU64);

impl Generations {
    pub(crate) fn issue(&self) -> RequestTag<'_> {
        let value = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        RequestTag {
            counter: &self.0,
            value,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RequestTag<'a> {
    counter: &'a AtomicU64,
    value: u64,
}

impl RequestTag<'_> {
    pub(crate) fn value(&self) -> u64 {
        self.value
    }

    pub(crate) fn is_current(&self) -> bool {
        self.counter.load(Ordering::SeqCst) == self.value
    }
}

/// Sets `loading` on creation and clears it when dropped, unless a newer
/// request has been issued in the meantime. The generation is checked inside
/// each watch update, so a superseded request cannot write after a newer one
/// has begun.
pub(crate) struct LoadingGuard<'a, T> {
    state: &'a watch::Sender<FetchState<T>>,
    tag: Option<RequestTag<'a>>,
    finished: bool,
}

impl<'a, T> LoadingGuard<'a, T> {
    pub(crate) fn begin(
        state: &'a watch::Sender<FetchState<T>>,
        tag: Option<RequestTag<'a>>,
        reset: impl FnOnce(&mut FetchState<T>),
    ) -> Self {
        let guard = Self {
            state,
            tag,
            finished: false,
        };
        guard.update(|current| {
            reset(current);
            current.loading = true;
        });
        guard
    }

    /// Applies the outcome and clears `loading` in one update. Returns
    /// `false` when the request was superseded and nothing was written.
    pub(crate) fn finish(mut self, apply: impl FnOnce(&mut FetchState<T>)) -> bool {
        self.finished = true;
        self.update(|current| {
            apply(current);
            current.loading = false;
        })
    }

    fn update(&self, write: impl FnOnce(&mut FetchState<T>)) -> bool {
        let tag = self.tag;
        self.state.send_if_modified(|current| {
            if !tag.as_ref().map_or(true, RequestTag::is_current) {
                return false;
            }
            write(current);
            true
        })
    }
}

impl<T> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.update(|current| current.loading = false);
    }
}

#[cfg(test)]
#[path = "tests/fetch_state_tests.rs"]
mod tests;
