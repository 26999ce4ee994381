mod interactive;

use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use bizsearch_client::{SearchClient, SearchService};
use bizsearch_core::{
    load_fallback_file, AppConfig, DemoDataset, FallbackProvider, NoFallback, TransportKind,
};
use bizsearch_view::render::{render, render_plain, to_json};
use bizsearch_view::SearchView;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "bizsearch")]
#[command(about = "Search Toronto businesses from the terminal")]
struct Cli {
    #[command(flatten)]
    service: ServiceArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Overrides for the `BIZSEARCH_*` environment configuration.
#[derive(Debug, Default, Args)]
struct ServiceArgs {
    /// Search service base URL.
    #[arg(long, global = true)]
    service_url: Option<String>,

    /// Wire shape: `get` or `post`.
    #[arg(long, global = true)]
    transport: Option<TransportKind>,

    /// Request timeout in milliseconds.
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_ms: Option<u64>,

    /// Result limit sent with GET requests.
    #[arg(long, global = true)]
    limit: Option<u32>,

    /// YAML file with records to show when the service is unavailable.
    #[arg(long, global = true, conflicts_with = "no_fallback")]
    fallback_file: Option<PathBuf>,

    /// Show an empty result instead of demo data when the service fails.
    #[arg(long, global = true)]
    no_fallback: bool,
}

impl ServiceArgs {
    fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(url) = self.service_url {
            config.service_url = url;
        }
        if let Some(transport) = self.transport {
            config.transport = transport;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(limit) = self.limit {
            config.result_limit = limit;
        }
        if let Some(path) = self.fallback_file {
            config.fallback_path = Some(path);
            config.fallback_enabled = true;
        }
        if self.no_fallback {
            config.fallback_enabled = false;
        }
        config
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one search and print the result screen.
    Search {
        #[arg(required = true)]
        query: Vec<String>,

        /// Print the view state as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Read queries line by line and redraw after every change (the default).
    Interactive,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.service.apply(bizsearch_core::load_app_config()?);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        service_url = %config.service_url,
        transport = %config.transport,
        timeout_ms = config.timeout_ms,
        "starting bizsearch"
    );

    let service = SearchClient::from_config(&config)?;
    let fallback = build_fallback(&config)?;
    let mut view = SearchView::new(service, fallback);

    match cli.command {
        Some(Commands::Search { query, json }) => {
            let query = query.join(" ");
            run_search(&mut view, &query, json).await?;
        }
        Some(Commands::Interactive) | None => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            let hyperlinks = stdout.is_terminal();
            interactive::run(&mut view, stdin, &mut stdout, hyperlinks).await?;
        }
    }

    Ok(())
}

fn build_fallback(config: &AppConfig) -> anyhow::Result<Box<dyn FallbackProvider>> {
    if !config.fallback_enabled {
        return Ok(Box::new(NoFallback));
    }
    match &config.fallback_path {
        Some(path) => Ok(Box::new(load_fallback_file(path)?)),
        None => Ok(Box::new(DemoDataset)),
    }
}

/// One-shot search. Demo mode is a normal outcome, so this only fails on I/O.
async fn run_search<S, F>(
    view: &mut SearchView<S, F>,
    query: &str,
    json: bool,
) -> anyhow::Result<()>
where
    S: SearchService,
    F: FallbackProvider,
{
    if view.submit_search(query).await.is_none() {
        tracing::debug!("blank query ignored");
    }

    let mut stdout = std::io::stdout().lock();
    if json {
        writeln!(stdout, "{}", to_json(view.state())?)?;
    } else if stdout.is_terminal() {
        write!(stdout, "{}", render(view.state()))?;
    } else {
        write!(stdout, "{}", render_plain(view.state()))?;
    }
    Ok(())
}
