//! reindex - maintenance commands of the publishing platform.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reindex::{
    config::Config, repository::DocRepository, security::role::Role,
    stores::fs::FileSystemStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "reindex")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "reindex.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error), overrides the configuration
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Grant a role to a member
    Grant {
        /// guest, member, editor, reviewer, moderator or admin
        role: Role,
        username: String,
    },

    /// Revoke a role from a member
    Revoke { role: Role, username: String },

    /// List the roles of a member
    Roles { username: String },

    /// Import the legacy dump
    Import {
        /// Path to the JSON dump
        dump: PathBuf,

        /// Entities to import: users, articles, books, tags, classifications, favorites, tutorials,
        /// subscriptions, replies or all
        entities: Vec<String>,

        /// Maximum number of rows imported per entity, 0 for no limit
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    Config::from_file(path).with_context(|| format!("failed to load {}", path.display()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log.level);
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let store = FileSystemStore::new(config.store.path.clone());
    tracing::debug!(path = %store.base_directory().display(), "opened the store");

    match cli.command {
        Commands::Grant { role, username } => {
            let repo = DocRepository::new(store);
            println!("{}", commands::role::grant(&repo, role, &username).await?);
        }
        Commands::Revoke { role, username } => {
            let repo = DocRepository::new(store);
            println!("{}", commands::role::revoke(&repo, role, &username).await?);
        }
        Commands::Roles { username } => {
            let repo = DocRepository::new(store);
            println!("{}", commands::role::roles(&repo, &username).await?);
        }
        Commands::Import {
            dump,
            entities,
            limit,
        } => {
            let report = commands::import::run(store, &config.import, &dump, &entities, limit).await?;
            print!("{report}");

            if report.failed() > 0 {
                tracing::warn!(failed = report.failed(), "some documents could not be imported");
            }
        }
    }

    Ok(())
}
