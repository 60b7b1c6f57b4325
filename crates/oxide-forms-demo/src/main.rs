//! oxide-forms-demo server
//!
//! Serves the form demos over HTTP.

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_forms_demo::app::{build_router, AppState};
use oxide_forms_demo::server;
use oxide_forms_demo::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Setup logging
    let log_level = if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(AppState::new(&config.default_locale));
    let router = Arc::new(build_router(state));

    let addr = config.addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("Serving demos at http://{addr}");

    server::serve(listener, router, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    })
    .await?;

    Ok(())
}
