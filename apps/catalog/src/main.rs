use std::{process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{CatalogSession, FetchState, HttpMovieService, MovieCard, ToggleOutcome};
use futures::StreamExt;
use shared::domain::{Category, MovieId};
use tokio::{sync::watch, task::JoinHandle};
use tokio_stream::wrappers::WatchStream;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::load_settings;
use render::{render_card, render_detail, render_list};

#[derive(Parser, Debug)]
#[command(name = "catalog", about = "Browse the movie catalog and manage favourites")]
struct Args {
    /// Backend base url, e.g. http://localhost:3001
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    /// Log every state transition of the driven controller.
    #[arg(long, global = true)]
    watch: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the movies of a category.
    List {
        #[arg(long)]
        category: Option<Category>,
    },
    /// Show one movie in full.
    Show {
        id: String,
        #[arg(long)]
        category: Option<Category>,
    },
    /// Mark or unmark a movie as favourite.
    Toggle {
        id: String,
        #[arg(long)]
        category: Option<Category>,
    },
    /// List the favourites of this session.
    Favourites,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let args = Args::parse();

    let settings = load_settings().with_overrides(args.server_url.clone(), args.timeout_secs);
    info!(server_url = %settings.server_url, "using catalog backend");

    let service = HttpMovieService::with_timeout(&settings.server_url, settings.request_timeout())
        .context("failed to set up catalog backend client")?;
    let session = CatalogSession::new(Arc::new(service));
    if let Err(err) = session.mount().await {
        warn!("{err:#}; continuing without favourites");
    }

    let ok = match args.command {
        Command::List { category } => {
            list(&session, category.unwrap_or(settings.default_category), args.watch).await
        }
        Command::Show { id, category } => show(&session, category, id.into(), args.watch).await,
        Command::Toggle { id, category } => {
            toggle(&session, category, id.into(), args.watch).await
        }
        Command::Favourites => list(&session, Category::Favourites, args.watch).await,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn list(session: &CatalogSession, category: Category, watch: bool) -> bool {
    let list = session.category_list(category);
    let logger = watch.then(|| spawn_state_logger("category_list", list.subscribe()));

    let _ = list.subscribe().wait_for(|state| !state.loading).await;
    let state = list.state();
    print!("{}", render_list(&state, |movie| list.is_favourite(movie)));

    drop(list);
    finish_logger(logger).await;
    state.error.is_none()
}

async fn show(
    session: &CatalogSession,
    category: Option<Category>,
    id: MovieId,
    watch: bool,
) -> bool {
    let detail = session.movie_detail();
    let logger = watch.then(|| spawn_state_logger("movie_detail", detail.subscribe()));

    detail.load(category, id).await;
    let state = detail.state();
    print!("{}", render_detail(&state));

    drop(detail);
    finish_logger(logger).await;
    state.error.is_none()
}

async fn toggle(
    session: &CatalogSession,
    category: Option<Category>,
    id: MovieId,
    watch: bool,
) -> bool {
    let detail = session.movie_detail();
    detail.load(category, id).await;
    let Some(movie) = detail.state().data else {
        print!("{}", render_detail(&detail.state()));
        return false;
    };

    let toggle = session.favourite_toggle(movie);
    let logger = watch.then(|| spawn_state_logger("favourite_toggle", toggle.subscribe()));

    let outcome = toggle.toggle().await;
    let state = toggle.state();
    match &outcome {
        ToggleOutcome::Added(movie) => println!("Added {} to favourites.", movie.title),
        ToggleOutcome::Removed(id) => println!("Removed {id} from favourites."),
        ToggleOutcome::Busy => println!("Already updating this movie."),
        ToggleOutcome::Denied | ToggleOutcome::Failed => {
            if let Some(message) = state.error_message() {
                println!("error: {message}");
            }
        }
    }
    print!(
        "{}",
        render_card(&MovieCard::list_item(toggle.movie(), toggle.is_favourite()))
    );
    println!("Favourites: {}", session.favourites().len());

    drop(toggle);
    finish_logger(logger).await;
    matches!(outcome, ToggleOutcome::Added(_) | ToggleOutcome::Removed(_))
}

fn spawn_state_logger<T>(
    controller: &'static str,
    rx: watch::Receiver<FetchState<T>>,
) -> JoinHandle<()>
where
    T: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut states = WatchStream::new(rx);
        while let Some(state) = states.next().await {
            info!(
                controller,
                phase = ?state.phase(),
                error = state.error_message(),
                "state changed"
            );
        }
    })
}

async fn finish_logger(logger: Option<JoinHandle<()>>) {
    if let Some(logger) = logger {
        let _ = logger.await;
    }
}
