//! Structures de données des réponses et des notifications Yo! Payments
//!
//! Chaque opération a sa propre forme de résultat; toutes partagent le
//! [`ResponseStatus`] qui porte le statut métier renvoyé par la passerelle.
//! Les éléments absents de la réponse sont représentés par des chaînes vides.

use crate::envelope::Method;
use serde::Serialize;

/// Valeur de `Status` pour une requête acceptée
pub const STATUS_OK: &str = "OK";

/// Statut commun à toutes les réponses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseStatus {
    /// `OK` ou `ERROR`
    pub status: String,
    pub status_code: String,
    pub status_message: String,
    pub error_message_code: String,
    pub error_message: String,
}

impl ResponseStatus {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Réponse des dépôts, retraits, transferts internes et envois de crédit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionResponse {
    pub status: ResponseStatus,
    /// `SUCCEEDED`, `PENDING`, `FAILED`, ...
    pub transaction_status: String,
    /// Identifiant de la transaction chez Yo! Payments
    pub transaction_reference: String,
    /// Identifiant de la transaction chez l'opérateur mobile
    pub mno_transaction_reference_id: String,
    pub issued_receipt_number: String,
}

/// Réponse de `actransactioncheckstatus`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionStatusResponse {
    pub transaction: TransactionResponse,
    pub amount: String,
    pub amount_formatted: String,
    pub currency_code: String,
    pub transaction_initiation_date: String,
    pub transaction_completion_date: String,
}

/// Solde du compte pour une devise
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CurrencyBalance {
    /// ex: `UGX-MTNMM`
    pub code: String,
    pub balance: String,
}

/// Réponse de `acacctbalance`, crédit téléphonique compris
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BalanceResponse {
    pub status: ResponseStatus,
    pub balances: Vec<CurrencyBalance>,
}

impl BalanceResponse {
    pub fn balance_for(&self, code: &str) -> Option<&str> {
        self.balances
            .iter()
            .find(|b| b.code == code)
            .map(|b| b.balance.as_str())
    }
}

/// Ligne du relevé de compte
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatementLine {
    pub transaction_system_id: String,
    pub transaction_reference: String,
    pub transaction_status: String,
    pub initiation_date: String,
    pub completion_date: String,
    pub narrative_base64: String,
    pub currency: String,
    pub amount: String,
    pub balance: String,
    pub general_type: String,
    pub detailed_type: String,
    pub beneficiary_msisdn: String,
    pub beneficiary_base64: String,
    pub sender_msisdn: String,
    pub sender_base64: String,
    pub base64_transaction_external_reference: String,
    pub transaction_entry_designation: String,
}

/// Réponse de `acgetministatement`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MiniStatementResponse {
    pub status: ResponseStatus,
    pub total_transactions: String,
    pub returned_transactions: String,
    pub transactions: Vec<StatementLine>,
}

/// Réponse brute de `acverifyaccountvalidity`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountValidity {
    pub status: ResponseStatus,
    /// `TRUE` ou `FALSE`
    pub valid: String,
}

impl AccountValidity {
    /// Vrai seulement si la requête a abouti et que le compte est déclaré valide
    pub fn is_valid(&self) -> bool {
        self.status.is_ok() && self.valid == "TRUE"
    }
}

/// Résultat typé d'une opération, une variante par opération
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "operation", content = "result", rename_all = "snake_case")]
pub enum OperationResult {
    Deposit(TransactionResponse),
    Withdrawal(TransactionResponse),
    TransactionStatus(TransactionStatusResponse),
    InternalTransfer(TransactionResponse),
    Balance(BalanceResponse),
    MiniStatement(MiniStatementResponse),
    AirtimeMobile(TransactionResponse),
    AirtimeInternal(TransactionResponse),
    AccountValidity(AccountValidity),
}

impl OperationResult {
    pub fn method(&self) -> Method {
        match self {
            OperationResult::Deposit(_) => Method::DepositFunds,
            OperationResult::Withdrawal(_) => Method::WithdrawFunds,
            OperationResult::TransactionStatus(_) => Method::CheckTransactionStatus,
            OperationResult::InternalTransfer(_) => Method::InternalTransfer,
            OperationResult::Balance(_) => Method::AccountBalance,
            OperationResult::MiniStatement(_) => Method::MiniStatement,
            OperationResult::AirtimeMobile(_) => Method::SendAirtimeMobile,
            OperationResult::AirtimeInternal(_) => Method::SendAirtimeInternal,
            OperationResult::AccountValidity(_) => Method::VerifyAccountValidity,
        }
    }

    pub fn status(&self) -> &ResponseStatus {
        match self {
            OperationResult::Deposit(r)
            | OperationResult::Withdrawal(r)
            | OperationResult::InternalTransfer(r)
            | OperationResult::AirtimeMobile(r)
            | OperationResult::AirtimeInternal(r) => &r.status,
            OperationResult::TransactionStatus(r) => &r.transaction.status,
            OperationResult::Balance(r) => &r.status,
            OperationResult::MiniStatement(r) => &r.status,
            OperationResult::AccountValidity(r) => &r.status,
        }
    }
}

/// Données signées d'une notification entrante
pub trait SignedNotification {
    /// Concaténation, sans séparateur, des champs couverts par la signature
    fn signed_data(&self) -> String;

    /// Signature RSA encodée en base64
    fn signature(&self) -> &str;
}

/// Notification de paiement poussée par la passerelle (IPN)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaymentNotification {
    pub date_time: String,
    pub amount: String,
    pub narrative: String,
    pub network_ref: String,
    pub external_ref: String,
    pub msisdn: String,
    pub signature: String,
}

impl SignedNotification for PaymentNotification {
    fn signed_data(&self) -> String {
        [
            self.date_time.as_str(),
            self.amount.as_str(),
            self.narrative.as_str(),
            self.network_ref.as_str(),
            self.external_ref.as_str(),
            self.msisdn.as_str(),
        ]
        .concat()
    }

    fn signature(&self) -> &str {
        &self.signature
    }
}

/// Notification d'échec de paiement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaymentFailureNotification {
    pub failed_transaction_reference: String,
    pub transaction_init_date: String,
    pub verification: String,
}

impl SignedNotification for PaymentFailureNotification {
    fn signed_data(&self) -> String {
        [
            self.failed_transaction_reference.as_str(),
            self.transaction_init_date.as_str(),
        ]
        .concat()
    }

    fn signature(&self) -> &str {
        &self.verification
    }
}
