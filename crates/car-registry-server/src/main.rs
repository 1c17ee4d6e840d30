//! Car Registry Server - REST backend over the in-memory car store.

mod error;
mod handlers;
mod server;

use anyhow::Result;
use car_registry::{CarStore, ServerConfig};
use clap::Parser;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "car-registry-server")]
#[command(about = "REST server for the car registry")]
struct Args {
    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, default_value_t = ServerConfig::DEFAULT_PORT)]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value_t = ServerConfig::DEFAULT_HOST.to_string())]
    host: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn init_logging(args: &Args) {
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    if args.json_logs {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    info!("Starting car registry server");

    let store = CarStore::seeded();
    info!("Seeded {} cars", store.len()?);

    let mut handle = server::start_server(store, &args.host, args.port).await?;

    // Stdout carries only the port line; logs go to stderr.
    println!("{}{}", ServerConfig::PORT_ANNOUNCE_PREFIX, handle.addr().port());

    info!("Car registry running on {}", handle.addr());

    let served = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            None
        }
        served = handle.stopped() => Some(served),
    };

    match served {
        None => {
            info!("Shutdown signal received, exiting");
            handle.shutdown().await?;
            Ok(())
        }
        Some(result) => {
            result?;
            anyhow::bail!("Server stopped unexpectedly")
        }
    }
}
