//! Client Yo! Payments principal
//!
//! Une méthode par opération de la passerelle. Chaque appel construit son
//! enveloppe, effectue un seul POST HTTPS puis interprète la réponse; le
//! résultat est renvoyé avec la trace de l'appel ([`Call`]).

use crate::config::ClientConfig;
use crate::envelope::{MiniStatementQuery, Operation, parser};
use crate::error::Result;
use crate::models::{
    BalanceResponse, MiniStatementResponse, OperationResult, PaymentFailureNotification,
    PaymentNotification, TransactionResponse, TransactionStatusResponse,
};
use crate::signature::{NotificationReceipt, TrustAnchor, check_notification};
use crate::transport::{Call, CallTrace, Transport};
use tracing::{debug, warn};

/// Client de l'API Yo! Payments
///
/// Le client ne contient que sa configuration : il peut être partagé entre
/// threads, chaque appel renvoyant sa propre trace.
///
/// # Exemple
///
/// ```rust,no_run
/// use pmoyopay::{ClientConfig, Endpoint, YoPayClient};
///
/// let config = ClientConfig::new("90001234567", "secret").with_endpoint(Endpoint::Sandbox);
/// let client = YoPayClient::new(config);
///
/// let call = client.account_balance();
/// match call.into_result() {
///     Ok(balance) => println!("{:?}", balance.balances),
///     Err(e) => eprintln!("balance query failed: {e}"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct YoPayClient {
    config: ClientConfig,
    transport: Transport,
    trust_anchor: Option<TrustAnchor>,
}

impl YoPayClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            transport: Transport::new(),
            trust_anchor: None,
        }
    }

    /// Client sur le serveur de production principal
    pub fn with_credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(ClientConfig::new(username, password))
    }

    /// Remplace le certificat Yo! Payments embarqué pour la vérification des notifications
    pub fn with_trust_anchor(mut self, anchor: TrustAnchor) -> Self {
        self.trust_anchor = Some(anchor);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ClientConfig {
        &mut self.config
    }

    /// Exécute n'importe quelle opération et renvoie le résultat étiqueté
    pub fn execute(&self, operation: &Operation) -> Call<OperationResult> {
        self.round_trip(operation)
            .and_then(|body| operation.parse_response(&body))
    }

    /// Demande à un abonné mobile money de déposer des fonds sur le compte
    ///
    /// L'abonné reçoit une notification sur son téléphone et doit autoriser
    /// le débit. Non supporté par tous les opérateurs.
    ///
    /// * `msisdn` - numéro au format 256772123456
    /// * `amount` - montant entier dans la plus petite unité
    /// * `narrative` - motif du dépôt
    pub fn deposit_funds(
        &self,
        msisdn: &str,
        amount: u64,
        narrative: &str,
    ) -> Call<TransactionResponse> {
        self.call(
            Operation::DepositFunds {
                msisdn: msisdn.to_string(),
                amount,
                narrative: narrative.to_string(),
            },
            parser::parse_transaction,
        )
    }

    /// Retire des fonds du compte vers un numéro mobile money
    pub fn withdraw_funds(
        &self,
        msisdn: &str,
        amount: u64,
        narrative: &str,
    ) -> Call<TransactionResponse> {
        self.call(
            Operation::WithdrawFunds {
                msisdn: msisdn.to_string(),
                amount,
                narrative: narrative.to_string(),
            },
            parser::parse_transaction,
        )
    }

    /// Statut d'une transaction soumise précédemment, utile en mode non bloquant
    ///
    /// * `transaction_reference` - référence renvoyée par la passerelle
    /// * `private_transaction_reference` - référence externe utilisée lors de la transaction
    pub fn check_transaction_status(
        &self,
        transaction_reference: &str,
        private_transaction_reference: &str,
    ) -> Call<TransactionStatusResponse> {
        self.call(
            Operation::CheckTransactionStatus {
                transaction_reference: transaction_reference.to_string(),
                private_transaction_reference: private_transaction_reference.to_string(),
            },
            parser::parse_transaction_status,
        )
    }

    /// Transfère des fonds vers un autre compte Yo! Payments
    pub fn internal_transfer(
        &self,
        currency_code: &str,
        amount: u64,
        beneficiary_account: &str,
        beneficiary_email: &str,
        narrative: &str,
    ) -> Call<TransactionResponse> {
        self.call(
            Operation::InternalTransfer {
                currency_code: currency_code.to_string(),
                amount,
                beneficiary_account: beneficiary_account.to_string(),
                beneficiary_email: beneficiary_email.to_string(),
                narrative: narrative.to_string(),
            },
            parser::parse_transaction,
        )
    }

    /// Soldes du compte, une entrée par devise (crédit téléphonique compris)
    pub fn account_balance(&self) -> Call<BalanceResponse> {
        self.call(Operation::AccountBalance, parser::parse_balance)
    }

    /// Relevé des transactions du compte
    pub fn mini_statement(&self, query: &MiniStatementQuery) -> Call<MiniStatementResponse> {
        self.call(
            Operation::MiniStatement(query.clone()),
            parser::parse_mini_statement,
        )
    }

    /// Envoie du crédit téléphonique à un numéro mobile
    pub fn send_airtime_mobile(
        &self,
        msisdn: &str,
        amount: u64,
        narrative: &str,
    ) -> Call<TransactionResponse> {
        self.call(
            Operation::SendAirtimeMobile {
                msisdn: msisdn.to_string(),
                amount,
                narrative: narrative.to_string(),
            },
            parser::parse_transaction,
        )
    }

    /// Envoie du crédit téléphonique vers un autre compte Yo! Payments
    pub fn send_airtime_internal(
        &self,
        currency_code: &str,
        amount: u64,
        beneficiary_account: u64,
        beneficiary_email: &str,
        narrative: &str,
    ) -> Call<TransactionResponse> {
        self.call(
            Operation::SendAirtimeInternal {
                currency_code: currency_code.to_string(),
                amount,
                beneficiary_account,
                beneficiary_email: beneficiary_email.to_string(),
                narrative: narrative.to_string(),
            },
            parser::parse_transaction,
        )
    }

    /// Vérifie qu'un compte mobile money existe
    ///
    /// Vrai seulement si `Status` vaut `OK` et `Valid` vaut `TRUE`; en cas
    /// d'erreur [`Call::value_or_default`] donne `false`.
    pub fn verify_account_validity(&self, msisdn: &str) -> Call<bool> {
        self.call(
            Operation::VerifyAccountValidity {
                msisdn: msisdn.to_string(),
            },
            parser::parse_account_validity,
        )
        .map(|validity| validity.is_valid())
    }

    /// Vérifie une notification de paiement poussée par la passerelle
    pub fn receive_payment_notification(
        &self,
        notification: PaymentNotification,
    ) -> NotificationReceipt<PaymentNotification> {
        check_notification(self.trust_anchor.as_ref(), notification)
    }

    /// Vérifie une notification d'échec de paiement
    pub fn receive_payment_failure_notification(
        &self,
        notification: PaymentFailureNotification,
    ) -> NotificationReceipt<PaymentFailureNotification> {
        check_notification(self.trust_anchor.as_ref(), notification)
    }

    fn call<T>(&self, operation: Operation, parse: fn(&str) -> Result<T>) -> Call<T> {
        self.round_trip(&operation).and_then(|body| {
            parse(&body).inspect_err(|e| {
                warn!(method = %operation.method(), error = %e, "Failed to parse gateway response");
            })
        })
    }

    fn round_trip(&self, operation: &Operation) -> Call<String> {
        let method = operation.method();
        let request = match operation.to_envelope(&self.config).render() {
            Ok(xml) => xml,
            Err(e) => return Call::failed(CallTrace::default(), e),
        };

        debug!(method = %method, url = %self.config.url, "Calling Yo! Payments");
        self.transport.post(&self.config.url, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = YoPayClient::with_credentials("user", "pass");
        assert_eq!(client.config().username, "user");
        assert_eq!(client.config().url, crate::Endpoint::Primary.url());
    }

    #[test]
    fn test_config_mut() {
        let mut client = YoPayClient::with_credentials("user", "pass");
        client.config_mut().non_blocking = true;
        assert!(client.config().non_blocking);
    }

    #[test]
    fn test_client_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<YoPayClient>();
    }

    #[test]
    fn test_unreachable_gateway_yields_transport_error() {
        // Port 9 (discard) sur la boucle locale : connexion refusée
        let client = YoPayClient::new(
            ClientConfig::new("user", "pass").with_url("http://127.0.0.1:9/task.php"),
        );
        let call = client.account_balance();
        assert!(call.error().is_some_and(|e| e.is_transport()));
        assert!(call.trace.request.contains("<Method>acacctbalance</Method>"));
        assert!(call.trace.status_code.is_none());
        assert!(call.trace.error.is_some());
        assert_eq!(call.value_or_default(), BalanceResponse::default());
    }
}
