use anyhow::Result;
use clap::{Parser, Subcommand};
use liftlog_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Strength-training log: routines, workouts and sets", long_about = None)]
struct Cli {
    /// PostgreSQL URL; overrides LIFTLOG_DATABASE_URL / DATABASE_URL
    #[arg(long, global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
        #[arg(short = 'H', long)]
        host: Option<String>,
    },
    /// Create or upgrade the PostgreSQL schema
    Migrate,
    /// Insert the built-in global exercise catalog
    Seed,
    /// List routines for an owner
    Routines {
        #[arg(short, long)]
        owner: Option<String>,
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// List workouts for an owner, most recent first
    Workouts {
        #[arg(short, long)]
        owner: Option<String>,
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Print one workout with its derived metrics
    Show {
        id: String,
        #[arg(short, long)]
        owner: Option<String>,
    },
    /// Print dashboard statistics
    Stats {
        #[arg(short, long)]
        owner: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    if cli.database_url.is_some() {
        config.database_url = cli.database_url;
    }

    match cli.command {
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            commands::serve::run(config).await?;
        },
        Commands::Migrate => commands::migrate::run(&config).await?,
        Commands::Seed => commands::query::run_seed(&config).await?,
        Commands::Routines { owner, limit } => {
            let owner = owner.unwrap_or_else(|| config.default_owner.clone());
            commands::query::run_routines(&config, &owner, limit).await?;
        },
        Commands::Workouts { owner, limit } => {
            let owner = owner.unwrap_or_else(|| config.default_owner.clone());
            commands::query::run_workouts(&config, &owner, limit).await?;
        },
        Commands::Show { id, owner } => {
            let owner = owner.unwrap_or_else(|| config.default_owner.clone());
            commands::query::run_show(&config, &owner, &id).await?;
        },
        Commands::Stats { owner } => {
            let owner = owner.unwrap_or_else(|| config.default_owner.clone());
            commands::query::run_stats(&config, &owner).await?;
        },
    }

    Ok(())
}
