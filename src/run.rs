//! Entry points behind the `kitpay` subcommands.

use axum::Router;
use axum::http::Method;
use kitpay_evm::EvmWallet;
use kitpay_types::chain::ChainId;
use kitpay_types::networks::{known_chains, tokens_for};
use kitpay_types::pricing::fixed_amount_for;
use std::error::Error;
use std::io::Write;
use std::net::SocketAddr;
use tower_http::cors;

use crate::config::{CliArgs, Command, Config};
use crate::handlers;
use crate::session::WalletSessionAdapter;
use crate::storefront::{Storefront, manual_payment};
use crate::util::{SigDown, Telemetry};

/// Runs the subcommand selected on the command line.
pub async fn run(args: CliArgs) -> Result<(), Box<dyn Error>> {
    let telemetry = Telemetry::new()?;
    let config = Config::load(&args.config)?;
    match args.command {
        Command::Serve => serve(&config, &telemetry).await,
        Command::Pay { chain, token } => pay(&config, chain, &token).await,
        Command::Catalog => {
            print_catalog(&mut std::io::stdout().lock())?;
            Ok(())
        }
    }
}

/// Serves the catalog until SIGTERM or SIGINT.
pub async fn serve(config: &Config, telemetry: &Telemetry) -> Result<(), Box<dyn Error>> {
    let http_endpoints = Router::new()
        .merge(handlers::routes())
        .layer(telemetry.http_tracing())
        .layer(
            cors::CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_methods([Method::GET])
                .allow_headers(cors::Any),
        );

    let addr = SocketAddr::new(config.host(), config.port());
    tracing::info!("Starting server at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .inspect_err(|e| tracing::error!("Failed to bind to {}: {}", addr, e))?;

    let sig_down = SigDown::try_new()?;
    let axum_cancellation_token = sig_down.cancellation_token();
    let axum_graceful_shutdown = async move { axum_cancellation_token.cancelled().await };
    axum::serve(listener, http_endpoints)
        .with_graceful_shutdown(axum_graceful_shutdown)
        .await?;
    Ok(())
}

/// Walks the checkout with the configured wallet: buy now, connect, select
/// chain and token, pay, then print the hash, explorer link and download link.
pub async fn pay(config: &Config, chain_id: ChainId, symbol: &str) -> Result<(), Box<dyn Error>> {
    let wallet = EvmWallet::from_config(config.wallet()?)?;
    let session = WalletSessionAdapter::new(wallet);
    let mut storefront = Storefront::new(session.clone());
    let checkout = storefront.buy_now();

    session.connect().await?;
    checkout.sync_session();
    checkout.select_chain(chain_id).await?;
    // A refused switch leaves the wallet elsewhere; token contracts differ per chain.
    if session.session().active_chain_id != Some(chain_id) {
        return Err(format!("Wallet is not on chain {chain_id}, refusing to pay").into());
    }
    checkout.select_token(symbol)?;

    if let Some(quote) = checkout.quote() {
        println!(
            "Paying {} {} on chain {} to {}",
            quote.amount, quote.token.symbol, quote.chain_id, quote.recipient
        );
    }
    let result = checkout.submit().await?;

    println!("Transaction: {}", result.hash);
    if let Some(url) = result.explorer_url() {
        println!("Explorer:    {url}");
    }
    if let Some(link) = checkout.download_link() {
        println!("Download:    {link}");
    }
    Ok(())
}

/// Writes the accepted chains, tokens and fixed amounts as a table.
pub fn print_catalog(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{:<18} {:<6} {:<8} {:>8}  CONTRACT", "CHAIN", "ID", "TOKEN", "AMOUNT")?;
    for chain in known_chains() {
        for token in tokens_for(chain.id) {
            let contract = token
                .contract_address
                .map(|address| address.to_string())
                .unwrap_or_else(|| "native".to_string());
            writeln!(
                out,
                "{:<18} {:<6} {:<8} {:>8}  {}",
                chain.display_name,
                chain.id,
                token.symbol,
                fixed_amount_for(Some(token)),
                contract
            )?;
        }
    }
    let manual = manual_payment();
    writeln!(out)?;
    writeln!(out, "Manual payment: send to {} on any chain above,", manual.recipient)?;
    writeln!(out, "then contact {} or {}", manual.contact_url, manual.contact_email)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitpay_types::networks::KnownNetwork;

    #[test]
    fn test_catalog_lists_every_token() {
        let mut out = Vec::new();
        print_catalog(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let rows: Vec<&str> = text.lines().skip(1).take_while(|l| !l.is_empty()).collect();
        assert_eq!(rows.len(), 9);
        assert!(rows[0].starts_with("Ethereum"));
        assert!(rows[0].contains("0.068"));
        assert!(rows.iter().any(|row| row.contains("MATIC") && row.contains("600")));
        assert!(text.contains("https://t.me/ihrahat0"));
    }

    #[tokio::test]
    async fn test_pay_requires_wallet_config() {
        let result = pay(&Config::default(), ChainId::bsc(), "BNB").await;
        assert!(result.unwrap_err().to_string().contains("No wallet configured"));
    }
}
