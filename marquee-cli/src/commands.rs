//! CLI command implementations

use std::sync::Arc;

use clap::Subcommand;
use marquee_core::{MarqueeConfig, MarqueeError, Result};
use marquee_search::{Completion, QueryDebouncer, SearchController, SearchService};
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::render::{render_results, render_trending};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
        /// Use demo data instead of TMDB
        #[arg(long)]
        demo: bool,
    },
    /// Search once and print the results
    Search {
        /// Search text; omit for popular movies
        #[arg(default_value = "")]
        query: String,
        /// Use demo data instead of TMDB
        #[arg(long)]
        demo: bool,
    },
    /// Show trending searches
    Trending {
        /// Number of searches to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Search interactively; each input line replaces the query
    Browse {
        /// Use demo data instead of TMDB
        #[arg(long)]
        demo: bool,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands) -> Result<()> {
    let config = MarqueeConfig::from_env();
    if config.tmdb.api_token.is_none() {
        warn!("TMDB_API_KEY is not set; movie lookups will be unauthenticated");
    }

    match command {
        Commands::Serve { host, port, demo } => serve(config, host, port, demo).await,
        Commands::Search { query, demo } => search_once(config, query, demo).await,
        Commands::Trending { limit } => show_trending(config, limit).await,
        Commands::Browse { demo } => browse(config, demo).await,
    }
}

/// Lookups spawned by `browse`. Finished ones are reaped whenever a new one
/// starts, so the set only holds lookups still in flight.
#[derive(Clone, Default)]
struct LookupTasks {
    tasks: Arc<Mutex<JoinSet<()>>>,
}

impl LookupTasks {
    fn spawn<F>(&self, lookup: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks.lock();
        while let Some(result) = tasks.try_join_next() {
            if let Err(e) = result {
                warn!(error = %e, "lookup task failed");
            }
        }
        tasks.spawn(lookup);
        debug!(in_flight = tasks.len(), "lookup started");
    }

    fn in_flight(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Waits for every lookup still running.
    async fn finish(self) {
        debug!(in_flight = self.in_flight(), "waiting for lookups");
        let mut tasks = std::mem::take(&mut *self.tasks.lock());
        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                warn!(error = %e, "lookup task failed");
            }
        }
    }
}

fn build_service(config: &MarqueeConfig, demo: bool) -> Result<SearchService> {
    if demo {
        SearchService::new_demo(config)
    } else {
        SearchService::from_config(config)
    }
}

/// Start the web server
///
/// # Errors
/// - `MarqueeError::Io` - Failed to bind the address
/// - `MarqueeError::Server` - Server stopped with an error
pub async fn serve(
    mut config: MarqueeConfig,
    host: Option<String>,
    port: Option<u16>,
    demo: bool,
) -> Result<()> {
    if let Some(host) = host {
        config.web.host = host;
    }
    if let Some(port) = port {
        config.web.port = port;
    }

    marquee_web::run_server(config, demo).await
}

/// Run one search and print it
///
/// # Errors
/// - `MarqueeError::Trending` - Trending store settings are malformed
pub async fn search_once(config: MarqueeConfig, query: String, demo: bool) -> Result<()> {
    let service = build_service(&config, demo)?;
    let outcome = service.run(&query).await;

    println!("{}", render_results(outcome.view()));
    Ok(())
}

/// Print the trending list
///
/// # Errors
/// - `MarqueeError::Trending` - Store is misconfigured or unreachable
pub async fn show_trending(mut config: MarqueeConfig, limit: Option<usize>) -> Result<()> {
    if let Some(limit) = limit {
        config.trending.limit = limit;
    }

    let service = SearchService::from_config(&config)?;
    let records = service.reporter().load_trending().await?;

    if records.is_empty() {
        println!("No trending searches yet.");
    } else {
        println!("{}", render_trending(&records));
    }
    Ok(())
}

/// Interactive search driven by stdin
///
/// Shows popular movies first, then looks up each line typed once input has
/// been quiet for the configured debounce delay. Lookups are not awaited by
/// the input loop; results from superseded queries are dropped.
///
/// # Errors
/// - `MarqueeError::Trending` - Trending store settings are malformed
/// - `MarqueeError::Io` - Reading stdin failed
pub async fn browse(config: MarqueeConfig, demo: bool) -> Result<()> {
    let controller = SearchController::new(build_service(&config, demo)?);

    let trending = controller.load_trending().await;
    if !trending.is_empty() {
        println!("{}\n", render_trending(&trending));
    }

    controller.search("").await;
    println!("{}", render_results(controller.snapshot().await.view()));
    println!("\nType to search, Ctrl-D to quit.");

    let (sender, receiver) = watch::channel(String::new());
    let lookups = LookupTasks::default();
    let debouncer = QueryDebouncer::new(config.search.debounce);
    let on_settled = {
        let controller = controller.clone();
        let lookups = lookups.clone();
        move |query: String| {
            let controller = controller.clone();
            lookups.spawn(async move {
                let settled = controller.search(&query).await;
                if settled.completion == Completion::Applied {
                    let state = controller.snapshot().await;
                    println!("\n[{}]\n{}", state.query(), render_results(state.view()));
                }
            });
        }
    };
    let debounce_task = tokio::spawn(debouncer.run(receiver, on_settled));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        sender.send_replace(line);
    }

    drop(sender);
    debounce_task
        .await
        .map_err(|e| MarqueeError::from_server_error(format!("debounce task failed: {e}")))?;

    lookups.finish().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_finished_lookups_are_reaped() {
        let lookups = LookupTasks::default();
        for _ in 0..3 {
            lookups.spawn(async {});
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        lookups.spawn(async {
            tokio::time::sleep(Duration::from_millis(20)).await;
        });
        assert_eq!(lookups.in_flight(), 1);
    }

    #[tokio::test]
    async fn test_finish_waits_for_running_lookups() {
        let lookups = LookupTasks::default();
        let done = Arc::new(AtomicUsize::new(0));
        for delay in [10, 30] {
            let done = done.clone();
            lookups.spawn(async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                done.fetch_add(1, Ordering::SeqCst);
            });
        }

        lookups.clone().finish().await;

        assert_eq!(done.load(Ordering::SeqCst), 2);
        assert_eq!(lookups.in_flight(), 0);
    }
}
