//! Interroge le solde et le relevé d'un compte Yo! Payments (bac à sable)
//!
//! ```text
//! PMOYOPAY__USERNAME=9000... PMOYOPAY__PASSWORD=... cargo run -p pmoyopay --example account_balance [config.yaml]
//! ```

use pmoyopay::{ClientConfig, Endpoint, MiniStatementQuery, YoPayClient};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "pmoyopay=debug".into()))
        .init();

    let mut config = match std::env::args().nth(1) {
        Some(path) => ClientConfig::from_yaml_file(path)?,
        None => ClientConfig::default().with_endpoint(Endpoint::Sandbox),
    };
    config.apply_env_overrides()?;
    config.validate()?;

    let client = YoPayClient::new(config);

    println!("=== Solde ===");
    let call = client.account_balance();
    if let Some(code) = call.trace.status_code {
        println!("HTTP {}", code);
    }
    let balance = call.into_result()?;
    println!("{} ({})", balance.status.status, balance.status.status_code);
    for currency in &balance.balances {
        println!("  {:<12} {}", currency.code, currency.balance);
    }

    println!("\n=== Relevé (5 dernières lignes) ===");
    let statement = client
        .mini_statement(&MiniStatementQuery::new().with_limit(5))
        .into_result()?;
    println!(
        "{} / {} transaction(s)",
        statement.returned_transactions, statement.total_transactions
    );
    for line in &statement.transactions {
        println!(
            "  {} {:>10} {} {}",
            line.initiation_date, line.amount, line.currency, line.transaction_status
        );
    }

    Ok(())
}
