use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use checkd::{cli, config::ServiceConfig, rest, AppContext};

#[derive(Parser)]
#[command(
    name = "checkd",
    about = "Checkd — admin dashboard checklist service",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// REST API port
    #[arg(long, env = "CHECKD_PORT")]
    port: Option<u16>,

    /// Data directory for config, the SQLite database, and the admin token
    #[arg(long, env = "CHECKD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CHECKD_LOG")]
    log: Option<String>,

    /// Bind address for the REST server (default: 127.0.0.1)
    #[arg(long, env = "CHECKD_BIND")]
    bind_address: Option<String>,

    /// Write logs to this file path (rotated daily). Optional.
    #[arg(long, env = "CHECKD_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Emit structured JSON logs instead of the compact format
    #[arg(long, env = "CHECKD_LOG_JSON")]
    log_json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List tasks
    List {
        /// Show only completed (true) or only open (false) tasks
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Add a task
    Add { description: String },
    /// Flip a task's completed flag
    Toggle { id: i64 },
    /// Mark a task completed
    Done { id: i64 },
    /// Mark a task open again
    Undone { id: i64 },
    /// Delete a task
    Rm { id: i64 },
    /// Delete all completed tasks
    ClearCompleted,
    /// Delete every task
    ClearAll,
    /// List the predefined checklists offered by the remote service
    Lists,
    /// Import a predefined checklist, appending its tasks one by one
    Import { name: String },
    /// Show or set the remote checklist service token
    Token { value: Option<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Arc::new(ServiceConfig::new(
        args.port,
        args.data_dir,
        args.log,
        args.bind_address,
    ));

    let _log_guard = init_tracing(&config.log, args.log_file.as_deref(), args.log_json)?;

    match args.command {
        None => {
            let ctx = AppContext::new(config).await?;
            rest::start_rest_server(ctx).await
        }
        Some(Command::List { completed }) => cli::list(&config, completed).await,
        Some(Command::Add { description }) => cli::add(&config, &description).await,
        Some(Command::Toggle { id }) => cli::toggle(&config, id).await,
        Some(Command::Done { id }) => cli::done(&config, id, true).await,
        Some(Command::Undone { id }) => cli::done(&config, id, false).await,
        Some(Command::Rm { id }) => cli::rm(&config, id).await,
        Some(Command::ClearCompleted) => cli::clear_completed(&config).await,
        Some(Command::ClearAll) => cli::clear_all(&config).await,
        Some(Command::Lists) => cli::lists(&config).await,
        Some(Command::Import { name }) => cli::import(&config, &name).await,
        Some(Command::Token { value }) => cli::token(&config, value.as_deref()).await,
    }
}

/// Initialize tracing. Returns the appender guard when file logging is on;
/// the guard must stay alive for the duration of the process.
fn init_tracing(
    log_level: &str,
    log_file: Option<&std::path::Path>,
    json: bool,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    match log_file {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "checkd.log".to_string());
            let appender = tracing_appender::rolling::daily(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            if json {
                tracing_subscriber::registry()
                    .with(EnvFilter::new(log_level))
                    .with(fmt::layer().json())
                    .with(fmt::layer().json().with_writer(writer).with_ansi(false))
                    .init();
            } else {
                tracing_subscriber::registry()
                    .with(EnvFilter::new(log_level))
                    .with(fmt::layer().compact())
                    .with(fmt::layer().with_writer(writer).with_ansi(false))
                    .init();
            }
            Ok(Some(guard))
        }
        None => {
            if json {
                tracing_subscriber::fmt()
                    .json()
                    .with_env_filter(log_level)
                    .init();
            } else {
                tracing_subscriber::fmt()
                    .with_env_filter(log_level)
                    .compact()
                    .init();
            }
            Ok(None)
        }
    }
}
