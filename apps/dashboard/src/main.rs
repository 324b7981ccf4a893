mod client;
mod config;
mod poller;
mod sensors;
mod view;

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::client::HttpReadingSource;
use crate::config::Config;
use crate::poller::Poller;
use crate::view::ViewState;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr so they don't tear the table on stdout.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting sensor dashboard v{} against {}", env!("CARGO_PKG_VERSION"), config.api_url);

    let source = HttpReadingSource::new(config.api_url.clone(), config.request_timeout)?;
    let handle = Poller::new(Arc::new(source), config.poll_interval).start();
    let mut state = handle.state();

    draw(&state.borrow_and_update())?;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = state.borrow_and_update().clone();
                draw(&current)?;
            }
        }
    }

    info!("Shutting down dashboard");
    handle.stop().await;
    Ok(())
}

fn draw(state: &ViewState) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{CLEAR_SCREEN}{}", state.render())?;
    stdout.flush()?;
    Ok(())
}
