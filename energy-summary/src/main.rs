use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use energy_summary::{cli::Cli, config::AppConfig, observability, orchestrator::Orchestrator};
use samples_client::SamplesApi;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let cli = Cli::parse();

    // Usage problems are reported on stdout and end the process successfully,
    // before the config file is read or any request is made.
    let invocation = match cli.resolve(Utc::now()) {
        Ok(invocation) => invocation,
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };

    // Load configuration
    let cfg = AppConfig::load()?;
    let query = invocation.query(&cfg.api.base_url)?;

    println!("{}", invocation.window);

    let api = SamplesApi::new(
        Duration::from_millis(cfg.api.request_timeout_ms),
        cfg.api.max_pages,
    )?;
    let orchestrator = Orchestrator::new(api);

    orchestrator
        .run(
            &query,
            &cfg.run.levels,
            cfg.run.failure_policy,
            |line| println!("{line}"),
        )
        .await?;

    Ok(())
}
