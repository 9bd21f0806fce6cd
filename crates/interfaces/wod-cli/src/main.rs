use std::time::Duration;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use wod_cli::{commands, CliCategory, RemoteTarget};
use wod_config::{DB_PATH_ENV, DEFAULT_REMOTE_TIMEOUT_SECS, REMOTE_URL_ENV};
use wod_core::EventPatch;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    /// HTTP catalog to hydrate from and mirror edits to
    #[arg(long, global = true, env = REMOTE_URL_ENV, conflicts_with = "db")]
    remote_url: Option<String>,
    /// Directory holding the local redb catalog
    #[arg(long, global = true, env = DB_PATH_ENV)]
    db: Option<Utf8PathBuf>,
    /// Remote request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_REMOTE_TIMEOUT_SECS)]
    timeout: u64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List events, optionally filtered
    List {
        #[arg(short, long, value_enum, default_value_t = CliCategory::All)]
        category: CliCategory,
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Show the effective fields of one event
    Show {
        identity: String,
        #[arg(long)]
        variant: Option<String>,
    },
    /// Print the floor plan of one event
    Map {
        identity: String,
        #[arg(long)]
        variant: Option<String>,
    },
    /// Edit title, time cap or flow of one event
    Edit {
        identity: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        time_cap: Option<String>,
        #[arg(long)]
        flow: Option<String>,
    },
    /// Check catalog invariants
    Validate,
    /// Dump the catalog as JSON
    Export,
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let builder = FmtSubscriber::builder().with_writer(std::io::stderr);
    let result = match EnvFilter::try_from_default_env() {
        Ok(filter) if !verbose => tracing::subscriber::set_global_default(
            builder.with_env_filter(filter).finish(),
        ),
        _ => tracing::subscriber::set_global_default(builder.with_max_level(level).finish()),
    };
    result.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        if let Some(hint) = wod_cli::error_hint(&err) {
            eprintln!("hint: {hint}");
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let target = match (cli.remote_url, cli.db) {
        (Some(url), _) => RemoteTarget::Http {
            url,
            timeout_secs: cli.timeout,
        },
        (None, Some(root)) => RemoteTarget::Redb { root },
        (None, None) => RemoteTarget::None,
    };
    let mut store = commands::open_store(&target).await?;

    let output = match cli.command {
        Commands::List { category, query } => commands::cmd_list(store, category, query)?,
        Commands::Show { identity, variant } => {
            commands::cmd_show(&store, &identity, variant.as_deref())?
        }
        Commands::Map { identity, variant } => {
            commands::cmd_map(&store, &identity, variant.as_deref())?
        }
        Commands::Edit {
            identity,
            title,
            time_cap,
            flow,
        } => {
            let patch = EventPatch {
                title,
                time_cap,
                flow,
            };
            let timeout = Duration::from_secs(wod_config::clamp_timeout_secs(cli.timeout));
            commands::cmd_edit(&mut store, &identity, patch, timeout).await?
        }
        Commands::Validate => commands::cmd_validate(&store)?,
        Commands::Export => commands::cmd_export(&store)?,
    };
    print!("{output}");

    Ok(())
}
