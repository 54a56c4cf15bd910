use clap::Parser;
use filmdb_cli::{config::CliConfig, run::run};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout is reserved for JSON output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let config = CliConfig::parse();

    run(config).await
}
