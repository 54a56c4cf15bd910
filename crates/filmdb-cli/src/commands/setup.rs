use clap::Parser;
use filmdb_service::Services;
use tracing::info;

use crate::commands::Executor;

#[derive(Parser, Debug)]
pub struct InitCmd {}

impl Executor for InitCmd {
    async fn run(self, _services: &Services) -> anyhow::Result<()> {
        // schema is migrated on connect
        info!("Database is ready");
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct SeedCmd {}

impl Executor for SeedCmd {
    async fn run(self, services: &Services) -> anyhow::Result<()> {
        filmdb_dal::sample::load_sample_data(services.pool()).await?;
        Ok(())
    }
}
