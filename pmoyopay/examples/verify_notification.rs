//! Vérifie une notification de paiement reçue (champs passés en arguments)
//!
//! ```text
//! cargo run -p pmoyopay --example verify_notification -- \
//!     "<date_time>" <amount> "<narrative>" <network_ref> <external_ref> <msisdn> <signature>
//! ```

use pmoyopay::{PaymentNotification, YoPayClient};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [date_time, amount, narrative, network_ref, external_ref, msisdn, signature] =
        <[String; 7]>::try_from(args).map_err(|args| {
            anyhow::anyhow!("expected 7 arguments, got {}", args.len())
        })?;

    let client = YoPayClient::with_credentials("", "");
    let receipt = client.receive_payment_notification(PaymentNotification {
        date_time,
        amount,
        narrative,
        network_ref,
        external_ref,
        msisdn,
        signature,
    });

    if receipt.verified {
        println!("✓ notification authentique");
    } else {
        println!("✗ notification rejetée");
    }
    receipt.into_result()?;
    Ok(())
}
