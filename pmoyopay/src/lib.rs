//! # pmoyopay - Client Yo! Payments
//!
//! Cette crate fournit un client Rust bloquant pour la passerelle de paiement
//! mobile money Yo! Payments : construction des requêtes XML, envoi HTTPS,
//! lecture des réponses typées et vérification des signatures des
//! notifications poussées par la passerelle.
//!
//! ## Architecture
//!
//! - `YoPayClient` : une méthode par opération de la passerelle
//! - `config` : credentials, URL et champs optionnels des requêtes
//! - `envelope` : enveloppes `AutoCreate` (requêtes et réponses)
//! - `models` : résultats par opération et notifications
//! - `transport` : POST HTTPS et trace de chaque appel
//! - `signature` : vérification SHA-1 / RSA des notifications
//!
//! ```text
//! pmoyopay/
//! ├── src/
//! │   ├── lib.rs              # Module principal (ce fichier)
//! │   ├── client.rs           # Client Yo! Payments
//! │   ├── config.rs           # Configuration (YAML + environnement)
//! │   ├── envelope/
//! │   │   ├── mod.rs
//! │   │   ├── builder.rs      # Requêtes XML
//! │   │   ├── operation.rs    # Méthodes et ordre des champs
//! │   │   └── parser.rs       # Réponses XML
//! │   ├── models.rs           # Structures de données
//! │   ├── signature.rs        # Notifications signées
//! │   ├── transport.rs        # HTTP
//! │   └── error.rs            # Gestion des erreurs
//! ```
//!
//! ## Utilisation
//!
//! ```rust,no_run
//! use pmoyopay::{ClientConfig, Endpoint, YoPayClient};
//!
//! fn main() -> pmoyopay::Result<()> {
//!     let config = ClientConfig::new("90001234567", "secret")
//!         .with_endpoint(Endpoint::Sandbox)
//!         .with_external_reference("INV-42");
//!     let client = YoPayClient::new(config);
//!
//!     let call = client.deposit_funds("256772123456", 2000, "Invoice 42");
//!     println!("sent: {}", call.trace.request);
//!
//!     let response = call.into_result()?;
//!     if response.status.is_ok() {
//!         println!("transaction {}", response.transaction_reference);
//!     } else {
//!         println!("refused: {}", response.status.error_message);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Gestion des erreurs
//!
//! Les erreurs de transport, de lecture XML et de signature sont des
//! variantes distinctes de [`YoPayError`]. Un refus métier de la passerelle
//! (compte invalide, solde insuffisant, ...) n'est pas une erreur : il se lit
//! dans le [`ResponseStatus`] du résultat.
//!
//! ## Notifications
//!
//! ```rust,no_run
//! use pmoyopay::{PaymentNotification, YoPayClient};
//!
//! let client = YoPayClient::with_credentials("90001234567", "secret");
//! let receipt = client.receive_payment_notification(PaymentNotification {
//!     date_time: "2024-03-01 10:15:30".into(),
//!     amount: "25000".into(),
//!     narrative: "Invoice 42".into(),
//!     network_ref: "MTN-998877".into(),
//!     external_ref: "INV-42".into(),
//!     msisdn: "256772123456".into(),
//!     signature: "...".into(),
//! });
//! if !receipt.verified {
//!     eprintln!("rejected: {:?}", receipt.error);
//! }
//! ```

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod models;
pub mod signature;
pub mod transport;

pub use client::YoPayClient;
pub use config::{ClientConfig, DepositTransactionType, Endpoint};
pub use envelope::{Method, MiniStatementQuery, Operation, RequestEnvelope};
pub use error::{Result, YoPayError};
pub use models::{
    AccountValidity, BalanceResponse, CurrencyBalance, MiniStatementResponse, OperationResult,
    PaymentFailureNotification, PaymentNotification, ResponseStatus, SignedNotification,
    StatementLine, TransactionResponse, TransactionStatusResponse,
};
pub use signature::{NotificationReceipt, TrustAnchor};
pub use transport::{Call, CallTrace};
