mod api_client;
mod config;
mod console;
mod errors;
mod forms;
mod models;
mod render;
mod session;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api_client::ApiClient;
use crate::config::Config;
use crate::console::Startup;
use crate::session::Portal;

#[derive(Parser)]
#[command(name = "placement-portal")]
#[command(about = "Terminal client for the college placement management system", long_about = None)]
struct Cli {
    /// Backend base address (overrides PORTAL_API_BASE)
    #[arg(long)]
    api_base: Option<String>,
    /// Log in as this student at startup
    #[arg(long, conflicts_with = "admin")]
    student: Option<i64>,
    /// Open the placement officer dashboard at startup
    #[arg(long)]
    admin: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?.with_api_base(cli.api_base);

    // Logs go to stderr so they never interleave with the rendered views
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("placement_portal={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "Starting placement portal v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.api_base
    );

    let api = ApiClient::new(&config.api_base, config.http_timeout)?;
    let (portal, events) = Portal::new(Arc::new(api));

    let startup = match (cli.student, cli.admin) {
        (Some(id), _) => Startup::Student(id),
        (None, true) => Startup::Admin,
        (None, false) => Startup::Login,
    };

    console::run(portal, events, startup).await
}
