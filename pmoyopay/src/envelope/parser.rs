//! Parser des réponses XML `AutoCreate/Response`
//!
//! Les structures brutes suivent le schéma de la passerelle; tout élément
//! absent vaut une chaîne vide et les éléments inconnus sont ignorés.

use crate::error::Result;
use crate::models::{
    AccountValidity, BalanceResponse, CurrencyBalance, MiniStatementResponse, ResponseStatus,
    StatementLine, TransactionResponse, TransactionStatusResponse,
};
use quick_xml::DeError;
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;
use serde::de::{DeserializeOwned, Error as _};

/// Élément racine de toutes les réponses de la passerelle
pub const ROOT_ELEMENT: &str = "AutoCreate";

/// Enveloppe de réponse : `<AutoCreate><Response>...</Response></AutoCreate>`
#[derive(Debug, Deserialize)]
#[serde(rename = "AutoCreate")]
struct AutoCreate<T> {
    #[serde(rename = "Response")]
    response: T,
}

/// Désérialise le contenu de l'élément `Response`
///
/// Les erreurs de quick-xml sont remontées telles quelles. Le désérialiseur
/// ignore le nom de la racine : un document dont la racine n'est pas
/// `AutoCreate` est rejeté avant lecture.
pub fn parse_response<T: DeserializeOwned>(xml: &str) -> Result<T> {
    check_root(xml)?;
    let envelope: AutoCreate<T> = quick_xml::de::from_str(xml)?;
    Ok(envelope.response)
}

fn check_root(xml: &str) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event().map_err(DeError::from)? {
            Event::Start(e) | Event::Empty(e) => {
                if e.name().as_ref() == ROOT_ELEMENT.as_bytes() {
                    return Ok(());
                }
                let found = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                return Err(DeError::custom(format!(
                    "unexpected root element <{found}>, expected <{ROOT_ELEMENT}>"
                ))
                .into());
            }
            Event::Eof => return Err(DeError::custom("empty response document").into()),
            _ => {}
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTransaction {
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "StatusCode")]
    status_code: String,
    #[serde(rename = "StatusMessage")]
    status_message: String,
    #[serde(rename = "TransactionStatus")]
    transaction_status: String,
    #[serde(rename = "ErrorMessageCode")]
    error_message_code: String,
    #[serde(rename = "ErrorMessage")]
    error_message: String,
    #[serde(rename = "TransactionReference")]
    transaction_reference: String,
    #[serde(rename = "MNOTransactionReferenceId")]
    mno_transaction_reference_id: String,
    #[serde(rename = "IssuedReceiptNumber")]
    issued_receipt_number: String,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "AmountFormatted")]
    amount_formatted: String,
    #[serde(rename = "CurrencyCode")]
    currency_code: String,
    #[serde(rename = "TransactionInitiationDate")]
    transaction_initiation_date: String,
    #[serde(rename = "TransactionCompletionDate")]
    transaction_completion_date: String,
}

impl RawTransaction {
    fn status(&self) -> ResponseStatus {
        ResponseStatus {
            status: self.status.clone(),
            status_code: self.status_code.clone(),
            status_message: self.status_message.clone(),
            error_message_code: self.error_message_code.clone(),
            error_message: self.error_message.clone(),
        }
    }
}

impl From<RawTransaction> for TransactionResponse {
    fn from(raw: RawTransaction) -> Self {
        Self {
            status: raw.status(),
            transaction_status: raw.transaction_status,
            transaction_reference: raw.transaction_reference,
            mno_transaction_reference_id: raw.mno_transaction_reference_id,
            issued_receipt_number: raw.issued_receipt_number,
        }
    }
}

impl From<RawTransaction> for TransactionStatusResponse {
    fn from(mut raw: RawTransaction) -> Self {
        let amount = std::mem::take(&mut raw.amount);
        let amount_formatted = std::mem::take(&mut raw.amount_formatted);
        let currency_code = std::mem::take(&mut raw.currency_code);
        let transaction_initiation_date = std::mem::take(&mut raw.transaction_initiation_date);
        let transaction_completion_date = std::mem::take(&mut raw.transaction_completion_date);
        Self {
            transaction: raw.into(),
            amount,
            amount_formatted,
            currency_code,
            transaction_initiation_date,
            transaction_completion_date,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStatus {
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "StatusCode")]
    status_code: String,
    #[serde(rename = "StatusMessage")]
    status_message: String,
    #[serde(rename = "ErrorMessageCode")]
    error_message_code: String,
    #[serde(rename = "ErrorMessage")]
    error_message: String,
}

impl From<RawStatus> for ResponseStatus {
    fn from(raw: RawStatus) -> Self {
        Self {
            status: raw.status,
            status_code: raw.status_code,
            status_message: raw.status_message,
            error_message_code: raw.error_message_code,
            error_message: raw.error_message,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCurrency {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Balance")]
    balance: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBalances {
    #[serde(rename = "Currency")]
    currencies: Vec<RawCurrency>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBalance {
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "StatusCode")]
    status_code: String,
    #[serde(rename = "StatusMessage")]
    status_message: String,
    #[serde(rename = "ErrorMessageCode")]
    error_message_code: String,
    #[serde(rename = "ErrorMessage")]
    error_message: String,
    #[serde(rename = "Balance")]
    balance: RawBalances,
}

impl From<RawBalance> for BalanceResponse {
    fn from(raw: RawBalance) -> Self {
        Self {
            status: ResponseStatus {
                status: raw.status,
                status_code: raw.status_code,
                status_message: raw.status_message,
                error_message_code: raw.error_message_code,
                error_message: raw.error_message,
            },
            balances: raw
                .balance
                .currencies
                .into_iter()
                .map(|c| CurrencyBalance {
                    code: c.code,
                    balance: c.balance,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStatementLine {
    #[serde(rename = "TransactionSystemId")]
    transaction_system_id: String,
    #[serde(rename = "TransactionReference")]
    transaction_reference: String,
    #[serde(rename = "TransactionStatus")]
    transaction_status: String,
    #[serde(rename = "InitiationDate")]
    initiation_date: String,
    #[serde(rename = "CompletionDate")]
    completion_date: String,
    #[serde(rename = "NarrativeBase64")]
    narrative_base64: String,
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Balance")]
    balance: String,
    #[serde(rename = "GeneralType")]
    general_type: String,
    #[serde(rename = "DetailedType")]
    detailed_type: String,
    #[serde(rename = "BeneficiaryMsisdn")]
    beneficiary_msisdn: String,
    #[serde(rename = "BeneficiaryBase64")]
    beneficiary_base64: String,
    #[serde(rename = "SenderMsisdn")]
    sender_msisdn: String,
    #[serde(rename = "SenderBase64")]
    sender_base64: String,
    #[serde(rename = "Base64TransactionExternalReference")]
    base64_transaction_external_reference: String,
    #[serde(rename = "TransactionEntryDesignation")]
    transaction_entry_designation: String,
}

impl From<RawStatementLine> for StatementLine {
    fn from(raw: RawStatementLine) -> Self {
        Self {
            transaction_system_id: raw.transaction_system_id,
            transaction_reference: raw.transaction_reference,
            transaction_status: raw.transaction_status,
            initiation_date: raw.initiation_date,
            completion_date: raw.completion_date,
            narrative_base64: raw.narrative_base64,
            currency: raw.currency,
            amount: raw.amount,
            balance: raw.balance,
            general_type: raw.general_type,
            detailed_type: raw.detailed_type,
            beneficiary_msisdn: raw.beneficiary_msisdn,
            beneficiary_base64: raw.beneficiary_base64,
            sender_msisdn: raw.sender_msisdn,
            sender_base64: raw.sender_base64,
            base64_transaction_external_reference: raw.base64_transaction_external_reference,
            transaction_entry_designation: raw.transaction_entry_designation,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTransactions {
    #[serde(rename = "Transaction")]
    lines: Vec<RawStatementLine>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMiniStatement {
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "StatusCode")]
    status_code: String,
    #[serde(rename = "StatusMessage")]
    status_message: String,
    #[serde(rename = "ErrorMessageCode")]
    error_message_code: String,
    #[serde(rename = "ErrorMessage")]
    error_message: String,
    #[serde(rename = "TotalTransactions")]
    total_transactions: String,
    #[serde(rename = "ReturnedTransactions")]
    returned_transactions: String,
    #[serde(rename = "Transactions")]
    transactions: RawTransactions,
}

impl From<RawMiniStatement> for MiniStatementResponse {
    fn from(raw: RawMiniStatement) -> Self {
        Self {
            status: ResponseStatus {
                status: raw.status,
                status_code: raw.status_code,
                status_message: raw.status_message,
                error_message_code: raw.error_message_code,
                error_message: raw.error_message,
            },
            total_transactions: raw.total_transactions,
            returned_transactions: raw.returned_transactions,
            transactions: raw
                .transactions
                .lines
                .into_iter()
                .map(StatementLine::from)
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAccountValidity {
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "StatusCode")]
    status_code: String,
    #[serde(rename = "StatusMessage")]
    status_message: String,
    #[serde(rename = "ErrorMessageCode")]
    error_message_code: String,
    #[serde(rename = "ErrorMessage")]
    error_message: String,
    #[serde(rename = "Valid")]
    valid: String,
}

impl From<RawAccountValidity> for AccountValidity {
    fn from(raw: RawAccountValidity) -> Self {
        Self {
            status: ResponseStatus {
                status: raw.status,
                status_code: raw.status_code,
                status_message: raw.status_message,
                error_message_code: raw.error_message_code,
                error_message: raw.error_message,
            },
            valid: raw.valid,
        }
    }
}

/// Statut seul, quelle que soit l'opération
pub fn parse_status(xml: &str) -> Result<ResponseStatus> {
    parse_response::<RawStatus>(xml).map(ResponseStatus::from)
}

/// Dépôt, retrait, transfert interne, envoi de crédit
pub fn parse_transaction(xml: &str) -> Result<TransactionResponse> {
    parse_response::<RawTransaction>(xml).map(TransactionResponse::from)
}

pub fn parse_transaction_status(xml: &str) -> Result<TransactionStatusResponse> {
    parse_response::<RawTransaction>(xml).map(TransactionStatusResponse::from)
}

pub fn parse_balance(xml: &str) -> Result<BalanceResponse> {
    parse_response::<RawBalance>(xml).map(BalanceResponse::from)
}

pub fn parse_mini_statement(xml: &str) -> Result<MiniStatementResponse> {
    parse_response::<RawMiniStatement>(xml).map(MiniStatementResponse::from)
}

pub fn parse_account_validity(xml: &str) -> Result<AccountValidity> {
    parse_response::<RawAccountValidity>(xml).map(AccountValidity::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_status() {
        let xml = "<AutoCreate><Response><Status>OK</Status><StatusCode>0</StatusCode></Response></AutoCreate>";
        let status = parse_status(xml).unwrap();
        assert_eq!(status.status, "OK");
        assert_eq!(status.status_code, "0");
        assert_eq!(status.status_message, "");
        assert!(status.is_ok());
    }

    #[test]
    fn test_parse_deposit_response() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<AutoCreate>
  <Response>
    <Status>OK</Status>
    <StatusCode>1</StatusCode>
    <StatusMessage>Pending</StatusMessage>
    <TransactionStatus>PENDING</TransactionStatus>
    <TransactionReference>8uQ2v7tWm3</TransactionReference>
    <MNOTransactionReferenceId>MTN-5551</MNOTransactionReferenceId>
    <IssuedReceiptNumber>R-77</IssuedReceiptNumber>
    <SomethingNew>ignored</SomethingNew>
  </Response>
</AutoCreate>"#;
        let response = parse_transaction(xml).unwrap();
        assert_eq!(response.status.status, "OK");
        assert_eq!(response.status.status_code, "1");
        assert_eq!(response.status.status_message, "Pending");
        assert_eq!(response.transaction_status, "PENDING");
        assert_eq!(response.transaction_reference, "8uQ2v7tWm3");
        assert_eq!(response.mno_transaction_reference_id, "MTN-5551");
        assert_eq!(response.issued_receipt_number, "R-77");
        assert_eq!(response.status.error_message, "");
    }

    #[test]
    fn test_parse_business_error() {
        let xml = r#"<AutoCreate><Response>
            <Status>ERROR</Status>
            <StatusCode>-22</StatusCode>
            <ErrorMessageCode>-22</ErrorMessageCode>
            <ErrorMessage>Insufficient balance</ErrorMessage>
        </Response></AutoCreate>"#;
        let response = parse_transaction(xml).unwrap();
        assert!(!response.status.is_ok());
        assert_eq!(response.status.error_message_code, "-22");
        assert_eq!(response.status.error_message, "Insufficient balance");
    }

    #[test]
    fn test_parse_transaction_status() {
        let xml = r#"<AutoCreate><Response>
            <Status>OK</Status>
            <StatusCode>0</StatusCode>
            <TransactionStatus>SUCCEEDED</TransactionStatus>
            <Amount>2000</Amount>
            <AmountFormatted>2,000</AmountFormatted>
            <CurrencyCode>UGX-MTNMM</CurrencyCode>
            <TransactionInitiationDate>2019-02-26 10:00:00</TransactionInitiationDate>
            <TransactionCompletionDate>2019-02-26 10:01:00</TransactionCompletionDate>
        </Response></AutoCreate>"#;
        let response = parse_transaction_status(xml).unwrap();
        assert_eq!(response.transaction.transaction_status, "SUCCEEDED");
        assert_eq!(response.amount, "2000");
        assert_eq!(response.amount_formatted, "2,000");
        assert_eq!(response.currency_code, "UGX-MTNMM");
        assert_eq!(response.transaction_completion_date, "2019-02-26 10:01:00");
    }

    #[test]
    fn test_parse_balance() {
        let xml = r#"<AutoCreate><Response>
            <Status>OK</Status>
            <StatusCode>0</StatusCode>
            <Balance>
              <Currency><Code>UGX-MTNMM</Code><Balance>15000</Balance></Currency>
              <Currency><Code>UGX-MTNAT</Code><Balance>300</Balance></Currency>
            </Balance>
        </Response></AutoCreate>"#;
        let response = parse_balance(xml).unwrap();
        assert_eq!(response.balances.len(), 2);
        assert_eq!(response.balances[0].code, "UGX-MTNMM");
        assert_eq!(response.balances[0].balance, "15000");
        assert_eq!(response.balance_for("UGX-MTNAT"), Some("300"));
    }

    #[test]
    fn test_parse_balance_without_currencies() {
        let xml = "<AutoCreate><Response><Status>ERROR</Status></Response></AutoCreate>";
        let response = parse_balance(xml).unwrap();
        assert!(response.balances.is_empty());
    }

    #[test]
    fn test_parse_mini_statement() {
        let xml = r#"<AutoCreate><Response>
            <Status>OK</Status>
            <StatusCode>0</StatusCode>
            <TotalTransactions>2</TotalTransactions>
            <ReturnedTransactions>1</ReturnedTransactions>
            <Transactions>
              <Transaction>
                <TransactionSystemId>991</TransactionSystemId>
                <TransactionReference>REF-1</TransactionReference>
                <TransactionStatus>SUCCEEDED</TransactionStatus>
                <InitiationDate>2019-02-01 08:00:00</InitiationDate>
                <CompletionDate>2019-02-01 08:00:05</CompletionDate>
                <NarrativeBase64>cmVudA==</NarrativeBase64>
                <Currency>UGX-MTNMM</Currency>
                <Amount>-500</Amount>
                <Balance>14500</Balance>
                <GeneralType>WITHDRAWAL</GeneralType>
                <DetailedType>MOBILE MONEY WITHDRAWAL</DetailedType>
                <BeneficiaryMsisdn>256772123456</BeneficiaryMsisdn>
                <BeneficiaryBase64>Sm9obg==</BeneficiaryBase64>
                <SenderMsisdn></SenderMsisdn>
                <SenderBase64/>
                <Base64TransactionExternalReference>SU5WLTc=</Base64TransactionExternalReference>
                <TransactionEntryDesignation>TRANSACTION</TransactionEntryDesignation>
              </Transaction>
            </Transactions>
        </Response></AutoCreate>"#;
        let response = parse_mini_statement(xml).unwrap();
        assert_eq!(response.total_transactions, "2");
        assert_eq!(response.returned_transactions, "1");
        assert_eq!(response.transactions.len(), 1);

        let line = &response.transactions[0];
        assert_eq!(line.transaction_system_id, "991");
        assert_eq!(line.amount, "-500");
        assert_eq!(line.balance, "14500");
        assert_eq!(line.currency, "UGX-MTNMM");
        assert_eq!(line.sender_msisdn, "");
        assert_eq!(line.sender_base64, "");
        assert_eq!(line.transaction_entry_designation, "TRANSACTION");
    }

    #[test]
    fn test_parse_account_validity() {
        let xml = "<AutoCreate><Response><Status>OK</Status><StatusCode>0</StatusCode><Valid>TRUE</Valid></Response></AutoCreate>";
        assert!(parse_account_validity(xml).unwrap().is_valid());

        let xml = "<AutoCreate><Response><Status>OK</Status><Valid>FALSE</Valid></Response></AutoCreate>";
        assert!(!parse_account_validity(xml).unwrap().is_valid());
    }

    #[test]
    fn test_malformed_xml_is_reported() {
        let err = parse_transaction("<AutoCreate><Response><Status>OK</Response>").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_foreign_root_is_rejected() {
        let html = "<html><Response><Status>OK</Status><StatusCode>0</StatusCode></Response></html>";
        let err = parse_transaction(html).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("<html>"), "{err}");

        let wrapped = "<Error><Response><Status>OK</Status><Valid>TRUE</Valid></Response></Error>";
        assert!(parse_account_validity(wrapped).is_err());
    }

    #[test]
    fn test_root_after_declaration_is_accepted() {
        let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
                   <AutoCreate><Response><Status>OK</Status></Response></AutoCreate>";
        assert!(parse_status(xml).unwrap().is_ok());
    }

    #[test]
    fn test_empty_body_is_an_error() {
        assert!(parse_status("").unwrap_err().is_parse());
    }

    #[test]
    fn test_missing_response_element_is_an_error() {
        let err = parse_balance("<AutoCreate></AutoCreate>").unwrap_err();
        assert!(err.is_parse());
    }
}
