use chrono::Utc;
use clap::{Parser, Subcommand};
use semantic_search_client_core::{
    project, HttpSearchClient, QueryState, RenderBranch, SearchBackend, SearchController,
    SubmitOutcome, SubmitPolicy, NO_RESULTS_MESSAGE,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "semantic-search", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Base URL of the search API
    #[arg(long, env = "SEARCH_API_URL", default_value = "http://127.0.0.1:5000")]
    endpoint: String,

    /// Abort requests that take longer than this many seconds
    #[arg(long, env = "SEARCH_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// In interactive mode, let a new query replace one that is still in flight
    #[arg(long, default_value_t = false)]
    supersede: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run one query and print the results.
    Search {
        /// Search query
        #[arg(long)]
        query: String,
    },
    /// Read queries from stdin, one per line. `:q` or EOF quits.
    Interactive,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let backend = match cli.timeout_secs {
        Some(seconds) => {
            HttpSearchClient::with_timeout(&cli.endpoint, Duration::from_secs(seconds))?
        }
        None => HttpSearchClient::new(&cli.endpoint)?,
    };
    let policy = if cli.supersede {
        SubmitPolicy::Supersede
    } else {
        SubmitPolicy::RejectWhileLoading
    };

    info!(
        version = app_version,
        endpoint = %backend.search_url(),
        started_at = %Utc::now().to_rfc3339(),
        "semantic-search boot"
    );

    let controller = Arc::new(SearchController::with_policy(backend, policy));
    let renderer = spawn_renderer(controller.store().subscribe());

    match cli.command {
        Command::Search { query } => {
            let outcome = controller.submit(&query).await;
            if outcome == SubmitOutcome::Skipped {
                println!("nothing to search for");
            }
        }
        Command::Interactive => {
            println!("Type a query and press enter. `:q` quits.");
            let stdin = BufReader::new(tokio::io::stdin());
            run_interactive(Arc::clone(&controller), stdin).await?;
        }
    }

    // Dropping the controller closes the state channel, which ends the renderer
    // after it has drawn the last state.
    drop(controller);
    renderer.await?;

    Ok(())
}

/// Reads one query per line. Each accepted query runs on its own task so the
/// next line can arrive while a request is still in flight; what happens to
/// it then is up to the store's submit policy.
async fn run_interactive<B, R>(
    controller: Arc<SearchController<B>>,
    input: R,
) -> anyhow::Result<Vec<SubmitOutcome>>
where
    B: SearchBackend + Send + Sync + 'static,
    R: AsyncBufRead + Unpin,
{
    let mut outcomes = Vec::new();
    let mut in_flight = JoinSet::new();
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim() == ":q" {
            break;
        }

        match controller.begin(&line) {
            Ok(pending) => {
                let controller = Arc::clone(&controller);
                in_flight.spawn(async move { controller.finish(pending).await });
            }
            Err(outcome) => {
                report(&outcome);
                outcomes.push(outcome);
            }
        }

        while let Some(done) = in_flight.try_join_next() {
            let outcome = done?;
            report(&outcome);
            outcomes.push(outcome);
        }
    }

    while let Some(done) = in_flight.join_next().await {
        let outcome = done?;
        report(&outcome);
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

fn report(outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Rejected => println!("a search is already running; query ignored"),
        _ => debug!(?outcome, "submission finished"),
    }
}

fn spawn_renderer(mut states: watch::Receiver<QueryState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        // Keyed by request so a repeated query with identical results is drawn again.
        let mut last: Option<(u64, RenderBranch)> = None;
        while states.changed().await.is_ok() {
            let frame = {
                let state = states.borrow_and_update();
                (state.last_issued(), project(&state))
            };
            if last.as_ref() != Some(&frame) {
                draw(&frame.1);
                last = Some(frame);
            }
        }
    })
}

fn draw(branch: &RenderBranch) {
    match branch {
        RenderBranch::Blank => {}
        RenderBranch::Loading => println!("searching..."),
        RenderBranch::ErrorBanner(message) => println!("error: {message}"),
        RenderBranch::NoResults => println!("{NO_RESULTS_MESSAGE}"),
        RenderBranch::Results(cards) => {
            for card in cards {
                println!("[{}] score={} {}", card.id_label, card.score_label, card.line_label);
                if let Some(source) = &card.source {
                    println!("  source={source}");
                }
                println!("  {}", card.document);
            }
        }
    }
}
