//! `sasb` command line entry point.

use anyhow::Context;
use clap::Parser;

use sasb_client::ApiClient;
use sasb_client::cli::{Args, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.pretty {
        sasb_observability::init_pretty();
    } else {
        sasb_observability::init();
    }

    let config = args.config().context("failed to load client configuration")?;
    tracing::debug!(api_url = %config.api_url, token_path = ?config.token_path, "client configured");

    let client = ApiClient::from_config(&config).context("failed to build API client")?;

    if args.command.needs_session() {
        let state = client.initialize().await;
        tracing::debug!(authenticated = state.user().is_some(), "session initialized");
    }

    let output = match run(&client, args.command).await {
        Ok(output) => output,
        Err(err) => {
            if let Some(reason) = err.api_error().and_then(|body| body.summary()) {
                anyhow::bail!("{err} ({reason})");
            }
            return Err(err.into());
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
