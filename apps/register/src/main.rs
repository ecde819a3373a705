use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use checkout_client::{CheckoutController, HttpCheckoutBackend, Session};
use clap::Parser;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod command;
mod config;
mod view;

use command::{execute, Outcome, RegisterCommand, HELP};
use config::load_settings;

#[derive(Parser, Debug)]
#[command(about = "Terminal checkout register")]
struct Args {
    /// Base URL serving `/products/{code}` and `/purchase`.
    #[arg(long)]
    api_base_url: Option<String>,
    /// TOML config file; defaults to ./register.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(args.config.as_deref(), args.api_base_url.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(api_base_url = %settings.api_base_url, "register starting");
    let backend = HttpCheckoutBackend::with_timeout(
        settings.api_base_url.clone(),
        settings.request_timeout,
    )
    .context("failed to build http client")?;
    let controller = CheckoutController::new(Arc::new(backend));
    tokio::spawn(trace_session_changes(controller.subscribe()));

    println!("{}", view::render(&controller.snapshot().await));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(cmd) = RegisterCommand::parse(&line) else {
            continue;
        };
        match execute(&controller, cmd).await {
            Outcome::Render => println!("{}", view::render(&controller.snapshot().await)),
            Outcome::Notice(notice) => println!("{notice}"),
            Outcome::Help => println!("{HELP}"),
            Outcome::Quit => break,
        }
    }

    info!("register stopped");
    Ok(())
}

async fn trace_session_changes(mut events: broadcast::Receiver<Session>) {
    loop {
        match events.recv().await {
            Ok(session) => debug!(
                cart_lines = session.cart.len(),
                popup = session.popup_visible,
                in_flight = session.purchase_in_flight,
                "session changed"
            ),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(skipped, "session trace lagged")
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
