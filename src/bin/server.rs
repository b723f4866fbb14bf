//! Local control server for shotlog capture sessions.
//!
//! Exposes start/stop/status over HTTP so a browser extension or script can
//! drive captures; each run is a `shotlog` child process.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use shotlog::server::manager::SessionManager;

#[derive(Parser, Debug)]
#[command(name = "shotlog-server")]
#[command(about = "Local HTTP control surface for shotlog capture sessions")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 5000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let addr = format!("{}:{}", args.host, args.port);

    println!("Screenshot to PDF server is running at http://{addr}");
    println!("Press Ctrl+C to shut down the server.");

    shotlog::server::serve(&addr, Arc::new(SessionManager::new())).await?;
    Ok(())
}
