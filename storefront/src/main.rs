//! Terminal storefront for the sweet shop API.
//!
//! Loads the catalog on start, lets the user purchase a sweet by id and
//! re-fetches the list after every successful purchase.

use std::sync::Arc;

use sweets_core::{Storefront, SweetsClient};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use storefront::app::App;
use storefront::config::StorefrontConfig;
use storefront::runtime;
use storefront::transport::UreqTransport;

fn main() -> anyhow::Result<()> {
    // stdout is the page; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = StorefrontConfig::from_env()?;
    tracing::info!(base_url = %config.api_base_url, login = config.login.is_some(), "starting storefront");

    let client = SweetsClient::new(&config.api_base_url, config.initial_credential());
    let app = App::new(Storefront::new(client), config.login_request(), config.currency.clone());

    let (tx, rx) = mpsc::unbounded_channel();
    runtime::spawn_stdin_reader(tx.clone());

    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let result = rt.block_on(runtime::run(
        app,
        Arc::new(UreqTransport::new()),
        tx,
        rx,
        std::io::stdout(),
    ));
    // don't wait on requests that are still in flight
    rt.shutdown_background();
    result?;
    Ok(())
}
