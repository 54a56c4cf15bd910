use crate::{
    commands::{Executor as _, not_found_report, print_json},
    config::CliConfig,
};
use anyhow::Result;
use filmdb_service::Services;

pub async fn run(config: CliConfig) -> Result<()> {
    let pool = config.backend.connect().await?;
    let services = Services::new(pool);
    let result = config.command.run(&services).await;
    if let Some(report) = result.as_ref().err().and_then(not_found_report) {
        print_json(&report)?;
    }
    result
}
