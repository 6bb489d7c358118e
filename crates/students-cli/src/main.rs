//! Students CLI - query the students provider from a terminal
//!
//! Resolves `content://` addresses against the students templates and either
//! prints the resulting query descriptor or runs it against the database.

mod commands;

use clap::{Parser, Subcommand};
use commands::{QueryCommand, ResolveCommand, RoutesCommand};
use tracing_subscriber::{layer::SubscriberExt, Layer};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "STUDENTS_LOG_LEVEL", global = true)]
    log_level: String,

    /// Log format: compact, full
    #[arg(
        long,
        default_value = "compact",
        env = "STUDENTS_LOG_FORMAT",
        global = true
    )]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query against the database and print the rows as JSON
    Query(QueryCommand),
    /// Print the query descriptor an address resolves to
    Resolve(ResolveCommand),
    /// List the registered resource templates
    Routes(RoutesCommand),
}

fn init_tracing(log_level: &str, log_format: &str) -> anyhow::Result<()> {
    // RUST_LOG takes precedence when set
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::try_from_default_env()?
    } else {
        tracing_subscriber::EnvFilter::try_new(format!(
            "students_cli={level},\
             students_provider={level},\
             students_routes={level},\
             students_query={level},\
             students_query_sqlite={level},\
             rusqlite=warn",
            level = log_level
        ))?
    };

    // Logs go to stderr so stdout stays valid JSON
    let fmt_layer = match log_format {
        "full" => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, &cli.log_format)?;

    match cli.command {
        Commands::Query(query_cmd) => query_cmd.execute(),
        Commands::Resolve(resolve_cmd) => resolve_cmd.execute(),
        Commands::Routes(routes_cmd) => routes_cmd.execute(),
    }
}
