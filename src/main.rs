use anyhow::Result;
use clap::{Parser, Subcommand};
use schedcore::Config;

#[derive(Parser)]
#[command(name = "schedcore")]
#[command(about = "Retail merchandising event scheduling core", long_about = None)]
struct Cli {
    /// Path to a configuration file overriding config/default.toml.
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server and the background sync worker.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations.
    Migrate,
    /// Drop the database if it exists and recreate it via migrations.
    Reset,
    /// Run the auto-scheduling engine once, outside the HTTP surface.
    Schedule,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    schedcore::observability::init_observability(&config.logging.level, config.logging.format == "json")?;

    match cli.command {
        Commands::Serve { host, port } => schedcore::cli::serve(config, host, port).await,
        Commands::Migrate => schedcore::cli::migrate(config).await,
        Commands::Reset => schedcore::cli::reset(config).await,
        Commands::Schedule => schedcore::cli::run_schedule(config).await,
    }
}
