//! Opérations de la passerelle et ordre des champs de chaque requête

use super::RequestEnvelope;
use super::parser;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::models::OperationResult;
use chrono::NaiveDateTime;
use std::fmt;

/// Format des dates attendu par `acgetministatement`
pub const STATEMENT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Désignation par défaut des lignes de relevé
pub const DEFAULT_ENTRY_DESIGNATION: &str = "ANY";

/// Nom de méthode envoyé dans l'élément `<Method>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    DepositFunds,
    CheckTransactionStatus,
    InternalTransfer,
    AccountBalance,
    MiniStatement,
    SendAirtimeMobile,
    SendAirtimeInternal,
    VerifyAccountValidity,
    WithdrawFunds,
}

impl Method {
    pub const ALL: [Method; 9] = [
        Method::DepositFunds,
        Method::CheckTransactionStatus,
        Method::InternalTransfer,
        Method::AccountBalance,
        Method::MiniStatement,
        Method::SendAirtimeMobile,
        Method::SendAirtimeInternal,
        Method::VerifyAccountValidity,
        Method::WithdrawFunds,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Method::DepositFunds => "acdepositfunds",
            Method::CheckTransactionStatus => "actransactioncheckstatus",
            Method::InternalTransfer => "acinternaltransfer",
            Method::AccountBalance => "acacctbalance",
            Method::MiniStatement => "acgetministatement",
            Method::SendAirtimeMobile => "acsendairtimemobile",
            Method::SendAirtimeInternal => "acsendairtimeinternal",
            Method::VerifyAccountValidity => "acverifyaccountvalidity",
            Method::WithdrawFunds => "acwithdrawfunds",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filtres de `acgetministatement`
///
/// Les devises (`UGX-MTNMM`, `UGX-MTNAT`, ...), statuts (`FAILED`,
/// `SUCCEEDED`, `FAILED,SUCCEEDED`, ...) et désignations (`TRANSACTION`,
/// `CHARGES`, `ANY`) sont transmis tels quels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MiniStatementQuery {
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub transaction_status: String,
    pub currency_code: String,
    /// `Some(0)` demande toutes les lignes; la passerelle en renvoie 15 par défaut
    pub result_set_limit: Option<u32>,
    /// Vide = `ANY`
    pub entry_designation: String,
    pub external_reference: String,
}

impl MiniStatementQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn between(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.transaction_status = status.into();
        self
    }

    pub fn with_currency(mut self, currency_code: impl Into<String>) -> Self {
        self.currency_code = currency_code.into();
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.result_set_limit = Some(limit);
        self
    }

    pub fn with_entry_designation(mut self, designation: impl Into<String>) -> Self {
        self.entry_designation = designation.into();
        self
    }

    pub fn with_external_reference(mut self, reference: impl Into<String>) -> Self {
        self.external_reference = reference.into();
        self
    }

    pub fn entry_designation(&self) -> &str {
        if self.entry_designation.is_empty() {
            DEFAULT_ENTRY_DESIGNATION
        } else {
            &self.entry_designation
        }
    }
}

/// Une requête à la passerelle, avec ses arguments propres
///
/// Les montants sont des entiers dans la plus petite unité de la devise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Demande à un abonné mobile money de déposer des fonds sur le compte
    DepositFunds {
        msisdn: String,
        amount: u64,
        narrative: String,
    },
    /// Retire des fonds du compte vers un abonné mobile money
    WithdrawFunds {
        msisdn: String,
        amount: u64,
        narrative: String,
    },
    /// Statut d'une transaction soumise précédemment
    CheckTransactionStatus {
        transaction_reference: String,
        private_transaction_reference: String,
    },
    /// Transfert vers un autre compte Yo! Payments
    InternalTransfer {
        currency_code: String,
        amount: u64,
        beneficiary_account: String,
        beneficiary_email: String,
        narrative: String,
    },
    AccountBalance,
    MiniStatement(MiniStatementQuery),
    SendAirtimeMobile {
        msisdn: String,
        amount: u64,
        narrative: String,
    },
    SendAirtimeInternal {
        currency_code: String,
        amount: u64,
        beneficiary_account: u64,
        beneficiary_email: String,
        narrative: String,
    },
    VerifyAccountValidity {
        msisdn: String,
    },
}

impl Operation {
    pub fn method(&self) -> Method {
        match self {
            Operation::DepositFunds { .. } => Method::DepositFunds,
            Operation::WithdrawFunds { .. } => Method::WithdrawFunds,
            Operation::CheckTransactionStatus { .. } => Method::CheckTransactionStatus,
            Operation::InternalTransfer { .. } => Method::InternalTransfer,
            Operation::AccountBalance => Method::AccountBalance,
            Operation::MiniStatement(_) => Method::MiniStatement,
            Operation::SendAirtimeMobile { .. } => Method::SendAirtimeMobile,
            Operation::SendAirtimeInternal { .. } => Method::SendAirtimeInternal,
            Operation::VerifyAccountValidity { .. } => Method::VerifyAccountValidity,
        }
    }

    /// Construit l'enveloppe de requête à partir des arguments et de la configuration
    pub fn to_envelope(&self, config: &ClientConfig) -> RequestEnvelope {
        let envelope = RequestEnvelope::new(&config.username, &config.password, self.method());

        match self {
            Operation::DepositFunds {
                msisdn,
                amount,
                narrative,
            } => envelope
                .field("Account", msisdn)
                .field("Amount", amount.to_string())
                .field("Narrative", narrative)
                .optional_field("ExternalReference", &config.external_reference)
                .optional_field("InternalReference", &config.internal_reference)
                .optional_field("ProviderReferenceText", &config.provider_reference_text)
                .flag("NonBlocking", config.non_blocking)
                .optional_field("InstantNotificationUrl", &config.instant_notification_url)
                .optional_field("FailureNotificationUrl", &config.failure_notification_url)
                .optional_field(
                    "AuthenticationSignatureBase64",
                    &config.authentication_signature_base64,
                ),

            Operation::WithdrawFunds {
                msisdn,
                amount,
                narrative,
            } => envelope
                .flag("NonBlocking", config.non_blocking)
                .field("Account", msisdn)
                .field("Amount", amount.to_string())
                .field("Narrative", narrative)
                .optional_field("ExternalReference", &config.external_reference)
                .optional_field("InternalReference", &config.internal_reference)
                .optional_field("ProviderReferenceText", &config.provider_reference_text),

            Operation::CheckTransactionStatus {
                transaction_reference,
                private_transaction_reference,
            } => envelope
                .field(
                    "DepositTransactionType",
                    config.deposit_transaction_type.as_str(),
                )
                .optional_field("TransactionReference", transaction_reference)
                .optional_field("PrivateTransactionReference", private_transaction_reference),

            Operation::InternalTransfer {
                currency_code,
                amount,
                beneficiary_account,
                beneficiary_email,
                narrative,
            } => envelope
                .field("CurrencyCode", currency_code)
                .field("BeneficiaryAccount", beneficiary_account)
                .field("BeneficiaryEmail", beneficiary_email)
                .field("Narrative", narrative)
                .field("Amount", amount.to_string())
                .optional_field("InternalReference", &config.internal_reference)
                .optional_field("ExternalReference", &config.external_reference),

            Operation::AccountBalance => envelope,

            Operation::MiniStatement(query) => envelope
                .field("TransactionEntryDesignation", query.entry_designation())
                .optional_field("StartDate", &format_date(query.start_date))
                .optional_field("EndDate", &format_date(query.end_date))
                .optional_field("TransactionStatus", &query.transaction_status)
                .optional_field("CurrencyCode", &query.currency_code)
                .optional_field(
                    "ResultSetLimit",
                    &query
                        .result_set_limit
                        .map(|limit| limit.to_string())
                        .unwrap_or_default(),
                )
                .optional_field("ExternalReference", &query.external_reference),

            Operation::SendAirtimeMobile {
                msisdn,
                amount,
                narrative,
            } => envelope
                .field("Account", msisdn)
                .field("Amount", amount.to_string())
                .field("Narrative", narrative)
                .flag("NonBlocking", config.non_blocking)
                .optional_field("ExternalReference", &config.external_reference)
                .optional_field("InternalReference", &config.internal_reference)
                .optional_field("ProviderReferenceText", &config.provider_reference_text),

            Operation::SendAirtimeInternal {
                currency_code,
                amount,
                beneficiary_account,
                beneficiary_email,
                narrative,
            } => envelope
                .field("Amount", amount.to_string())
                .field("Narrative", narrative)
                .field("CurrencyCode", currency_code)
                .field("BeneficiaryAccount", beneficiary_account.to_string())
                .field("BeneficiaryEmail", beneficiary_email)
                .optional_field("InternalReference", &config.internal_reference)
                .optional_field("ExternalReference", &config.external_reference),

            Operation::VerifyAccountValidity { msisdn } => envelope.field("Account", msisdn),
        }
    }

    /// Interprète le corps de réponse selon la forme propre à l'opération
    pub fn parse_response(&self, body: &str) -> Result<OperationResult> {
        Ok(match self {
            Operation::DepositFunds { .. } => {
                OperationResult::Deposit(parser::parse_transaction(body)?)
            }
            Operation::WithdrawFunds { .. } => {
                OperationResult::Withdrawal(parser::parse_transaction(body)?)
            }
            Operation::CheckTransactionStatus { .. } => {
                OperationResult::TransactionStatus(parser::parse_transaction_status(body)?)
            }
            Operation::InternalTransfer { .. } => {
                OperationResult::InternalTransfer(parser::parse_transaction(body)?)
            }
            Operation::AccountBalance => OperationResult::Balance(parser::parse_balance(body)?),
            Operation::MiniStatement(_) => {
                OperationResult::MiniStatement(parser::parse_mini_statement(body)?)
            }
            Operation::SendAirtimeMobile { .. } => {
                OperationResult::AirtimeMobile(parser::parse_transaction(body)?)
            }
            Operation::SendAirtimeInternal { .. } => {
                OperationResult::AirtimeInternal(parser::parse_transaction(body)?)
            }
            Operation::VerifyAccountValidity { .. } => {
                OperationResult::AccountValidity(parser::parse_account_validity(body)?)
            }
        })
    }
}

fn format_date(date: Option<NaiveDateTime>) -> String {
    date.map(|d| d.format(STATEMENT_DATE_FORMAT).to_string())
        .unwrap_or_default()
}
