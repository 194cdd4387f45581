//! `kitpay` command line entrypoint.
//!
//! - `kitpay serve` - HTTP catalog (`GET /product`, `/chains`, `/chains/{id}/tokens`,
//!   `/chains/{id}/quote/{symbol}`) with CORS and request tracing
//! - `kitpay pay --chain <id> --token <symbol>` - pay with the configured wallet
//! - `kitpay catalog` - print accepted chains, tokens and amounts
//!
//! Environment:
//! - `.env` values loaded at startup
//! - `CONFIG` path of the JSON config file (default `config.json`)
//! - `HOST`, `PORT` control the bind address
//! - `RUST_LOG` log filter, `OTEL_*` variables enable OpenTelemetry export

use clap::Parser;
use dotenvy::dotenv;
use kitpay::config::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let args = CliArgs::parse();
    kitpay::run::run(args).await
}
