//! Fake data services shared by the controller tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::domain::{Category, Movie, MovieId};
use tokio::sync::{mpsc, oneshot};

use crate::service::MovieService;

pub(crate) fn movie(id: &str, title: &str) -> Movie {
    let mut movie = Movie::new(id, title);
    movie.duration = "PT100M".into();
    movie
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    List(Category),
    Get(Category, MovieId),
    Add(MovieId),
    Remove(MovieId),
}

#[derive(Debug, Clone)]
pub(crate) enum AddReply {
    Echo,
    Falsy,
    Fail(String),
}

#[derive(Debug, Clone)]
pub(crate) enum RemoveReply {
    Truthy,
    Falsy,
    Fail(String),
}

/// Answers from canned data and records every call.
pub(crate) struct ScriptedService {
    lists: Mutex<HashMap<Category, Result<Vec<Movie>, String>>>,
    movies: Mutex<HashMap<MovieId, Movie>>,
    add_reply: Mutex<AddReply>,
    remove_reply: Mutex<RemoveReply>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedService {
    pub(crate) fn new() -> Self {
        Self {
            lists: Mutex::new(HashMap::new()),
            movies: Mutex::new(HashMap::new()),
            add_reply: Mutex::new(AddReply::Echo),
            remove_reply: Mutex::new(RemoveReply::Truthy),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_list(self, category: Category, movies: Vec<Movie>) -> Self {
        self.lists.lock().unwrap().insert(category, Ok(movies));
        self
    }

    pub(crate) fn with_list_failure(self, category: Category, message: &str) -> Self {
        self.lists
            .lock()
            .unwrap()
            .insert(category, Err(message.to_string()));
        self
    }

    pub(crate) fn with_movie(self, movie: Movie) -> Self {
        self.movies.lock().unwrap().insert(movie.id.clone(), movie);
        self
    }

    pub(crate) fn with_add_reply(self, reply: AddReply) -> Self {
        *self.add_reply.lock().unwrap() = reply;
        self
    }

    pub(crate) fn with_remove_reply(self, reply: RemoveReply) -> Self {
        *self.remove_reply.lock().unwrap() = reply;
        self
    }

    pub(crate) fn set_add_reply(&self, reply: AddReply) {
        *self.add_reply.lock().unwrap() = reply;
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::List(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MovieService for ScriptedService {
    async fn list_movies(&self, category: Category) -> Result<Vec<Movie>> {
        self.record(Call::List(category));
        match self.lists.lock().unwrap().get(&category) {
            Some(Ok(movies)) => Ok(movies.clone()),
            Some(Err(message)) => Err(anyhow!(message.clone())),
            None => Ok(Vec::new()),
        }
    }

    async fn get_movie_by_id(&self, category: Category, id: &MovieId) -> Result<Movie> {
        self.record(Call::Get(category, id.clone()));
        self.movies
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("movie {id} not found"))
    }

    async fn add_favourite(&self, movie: &Movie) -> Result<Option<Movie>> {
        self.record(Call::Add(movie.id.clone()));
        let reply = self.add_reply.lock().unwrap().clone();
        match reply {
            AddReply::Echo => Ok(Some(movie.clone())),
            AddReply::Falsy => Ok(None),
            AddReply::Fail(message) => Err(anyhow!(message)),
        }
    }

    async fn remove_favourite(&self, id: &MovieId) -> Result<bool> {
        self.record(Call::Remove(id.clone()));
        let reply = self.remove_reply.lock().unwrap().clone();
        match reply {
            RemoveReply::Truthy => Ok(true),
            RemoveReply::Falsy => Ok(false),
            RemoveReply::Fail(message) => Err(anyhow!(message)),
        }
    }
}

/// Holds every call until the test releases it, so tests can observe the
/// in-flight state and choose the order responses arrive in.
pub(crate) struct GatedService {
    inner: Arc<ScriptedService>,
    started: mpsc::UnboundedSender<(Call, oneshot::Sender<()>)>,
}

pub(crate) struct GateControl {
    started: mpsc::UnboundedReceiver<(Call, oneshot::Sender<()>)>,
}

impl GateControl {
    /// Waits for the next call to reach the service.
    pub(crate) async fn next_call(&mut self) -> (Call, oneshot::Sender<()>) {
        tokio::time::timeout(std::time::Duration::from_secs(5), self.started.recv())
            .await
            .expect("call started in time")
            .expect("service alive")
    }
}

impl GatedService {
    pub(crate) fn new(inner: Arc<ScriptedService>) -> (Arc<Self>, GateControl) {
        let (started, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { inner, started }), GateControl { started: rx })
    }

    async fn wait(&self, call: Call) {
        let (release, released) = oneshot::channel();
        if self.started.send((call, release)).is_ok() {
            let _ = released.await;
        }
    }
}

#[async_trait]
impl MovieService for GatedService {
    async fn list_movies(&self, category: Category) -> Result<Vec<Movie>> {
        self.wait(Call::List(category)).await;
        self.inner.list_movies(category).await
    }

    async fn get_movie_by_id(&self, category: Category, id: &MovieId) -> Result<Movie> {
        self.wait(Call::Get(category, id.clone())).await;
        self.inner.get_movie_by_id(category, id).await
    }

    async fn add_favourite(&self, movie: &Movie) -> Result<Option<Movie>> {
        self.wait(Call::Add(movie.id.clone())).await;
        self.inner.add_favourite(movie).await
    }

    async fn remove_favourite(&self, id: &MovieId) -> Result<bool> {
        self.wait(Call::Remove(id.clone())).await;
        self.inner.remove_favourite(id).await
    }
}
