//! `movie-search`: search TMDB from the terminal.
//!
//! ```text
//! TMDB_API_TOKEN=... movie-search "blade runner" --pages-to-walk 2
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` to change the filter.

use anyhow::{bail, Context};
use clap::Parser;
use movie_search::{MovieCard, MovieSearch, SearchAction, SearchEnvironment, SessionStore};
use movie_search_runtime::{metrics::describe_metrics, StoreConfig};
use movie_search_tmdb::{TmdbCatalog, TmdbConfig};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const UNMOUNT_TIMEOUT: Duration = Duration::from_secs(5);

/// Search movies on The Movie Database
#[derive(Parser, Debug)]
#[command(name = "movie-search")]
#[command(version)]
#[command(about = "Search movies on The Movie Database", long_about = None)]
struct Cli {
    /// Free-text query
    #[arg(allow_hyphen_values = true)]
    query: String,

    /// Page to start on
    #[arg(short, long, default_value_t = 1)]
    page: u32,

    /// Further pages to show after the first one
    #[arg(long, default_value_t = 0)]
    pages_to_walk: u32,

    /// Result language, overrides TMDB_LANGUAGE
    #[arg(short, long)]
    language: Option<String>,

    /// Width of the text inside each card
    #[arg(long, default_value_t = movie_search::card::DEFAULT_CONTENT_WIDTH)]
    width: usize,

    /// Print each page as JSON instead of cards
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_search=info,movie_search_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    describe_metrics();

    let cli = Cli::parse();
    if cli.query.is_empty() {
        bail!("the query must not be empty");
    }

    let mut config = TmdbConfig::from_env().context("TMDB credentials are not configured")?;
    if let Some(language) = cli.language.clone() {
        config = config.with_language(language);
    }
    let wait = config.timeout + Duration::from_secs(5);

    let environment = SearchEnvironment::new(TmdbCatalog::new(config), SessionStore::new());
    let store_config = StoreConfig::default().with_shutdown_timeout(UNMOUNT_TIMEOUT);
    let search = MovieSearch::mount_with_config(environment, store_config).await?;

    tracing::info!(query = %cli.query, "Searching");
    fetch(&search, SearchAction::SetQuery { query: cli.query.clone() }, wait).await?;

    while search.state().await.page < cli.page {
        if !advance(&search, wait).await? {
            break;
        }
    }
    print_page(&search, &cli).await?;

    for _ in 0..cli.pages_to_walk {
        if !advance(&search, wait).await? {
            tracing::info!("No more pages");
            break;
        }
        print_page(&search, &cli).await?;
    }

    search.close().await?;
    Ok(())
}

/// Send an intent that fetches and wait until its result is applied.
async fn fetch(search: &MovieSearch, action: SearchAction, wait: Duration) -> anyhow::Result<()> {
    let outcome = search
        .send_and_wait_for_outcome(action, wait)
        .await
        .context("search did not finish in time")?;
    search.settle(wait).await?;

    if let SearchAction::FetchFailed { reason, .. } = &outcome {
        if outcome.is_current(&search.state().await) {
            bail!("search failed: {reason}");
        }
        tracing::debug!(error = %reason, "Ignoring failure of a superseded search");
    }
    Ok(())
}

/// Move to the next known page; `false` when already on the last one.
async fn advance(search: &MovieSearch, wait: Duration) -> anyhow::Result<bool> {
    let state = search.state().await;
    if state.number_of_pages == 0 || state.page >= state.number_of_pages {
        return Ok(false);
    }

    fetch(search, SearchAction::IncrementPage, wait).await?;
    Ok(true)
}

async fn print_page(search: &MovieSearch, cli: &Cli) -> anyhow::Result<()> {
    let snapshot = search.snapshot().await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    if snapshot.movies.is_empty() {
        println!("No movies found for \"{}\"", snapshot.search_query);
        return Ok(());
    }

    println!(
        "Page {} of {} for \"{}\"\n",
        snapshot.page, snapshot.number_of_pages, snapshot.search_query
    );
    for movie in &snapshot.movies {
        print!("{}", MovieCard::new(movie).with_width(cli.width));
    }
    Ok(())
}
