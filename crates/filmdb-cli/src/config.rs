use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use filmdb_dal::Pool;
use filmdb_service::Services;
use tracing::{debug, info};

use crate::commands::{
    character::CharacterCmd, franchise::FranchiseCmd, movie::MovieCmd, setup::InitCmd,
    setup::SeedCmd,
};

#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "CLI for filmdb - manage movies, characters and franchises stored in a local database."
)]
pub struct CliConfig {
    #[command(flatten)]
    pub backend: BackendConfig,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create or upgrade the database schema
    Init(InitCmd),
    /// Load the demo catalogue
    Seed(SeedCmd),
    /// Manage characters
    #[command(subcommand)]
    Character(CharacterCmd),
    /// Manage movies
    #[command(subcommand)]
    Movie(MovieCmd),
    /// Manage franchises
    #[command(subcommand)]
    Franchise(FranchiseCmd),
}

impl crate::commands::Executor for Command {
    async fn run(self, services: &Services) -> anyhow::Result<()> {
        match self {
            Command::Init(cmd) => cmd.run(services).await,
            Command::Seed(cmd) => cmd.run(services).await,
            Command::Character(cmd) => cmd.run(services).await,
            Command::Movie(cmd) => cmd.run(services).await,
            Command::Franchise(cmd) => cmd.run(services).await,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct BackendConfig {
    #[arg(
        long,
        global = true,
        env = "FILMDB_DATABASE_URL",
        help = "Database URL e.g. sqlite://file.db, default is sqlite://[data-dir]/filmdb.db, where data-dir is set by --data-dir"
    )]
    database_url: Option<String>,

    #[arg(
        long,
        global = true,
        env = "FILMDB_DATA_DIR",
        help = "Data directory, default is system default like ~/.local/share/filmdb"
    )]
    data_dir: Option<PathBuf>,
}

impl BackendConfig {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|p| p.join("filmdb"))
                .unwrap_or_else(|| PathBuf::from("filmdb"))
        })
    }

    pub fn database_url(&self) -> String {
        self.database_url.clone().unwrap_or_else(|| {
            format!("sqlite://{}", self.data_dir().join("filmdb.db").display())
        })
    }

    /// Opens the database, creating the data directory when the default location is used,
    /// and brings the schema up to date.
    pub async fn connect(&self) -> anyhow::Result<Pool> {
        if self.database_url.is_none() {
            let dir = self.data_dir();
            if !tokio::fs::try_exists(&dir).await? {
                tokio::fs::create_dir_all(&dir).await?;
                info!("Created data directory {}", dir.display());
            } else if !dir.is_dir() {
                anyhow::bail!("Data directory {} is not a directory", dir.display());
            }
        }
        let url = self.database_url();
        debug!("Connecting to {url}");
        let pool = filmdb_dal::new_pool(&url).await?;
        filmdb_dal::migrate(&pool).await?;
        Ok(pool)
    }
}
