use mockito::{Matcher, Server};
use pmoyopay::{
    ClientConfig, MiniStatementQuery, Operation, OperationResult, TransactionResponse,
    YoPayClient,
};

const CONTENT_TYPE: &str = "text/xml; charset=utf-8";

fn client_for(server: &Server, config: ClientConfig) -> YoPayClient {
    YoPayClient::new(config.with_url(format!("{}/ybs/task.php", server.url())))
}

fn method(name: &str) -> Matcher {
    Matcher::Regex(format!("<Method>{name}</Method>"))
}

#[test]
fn deposit_round_trip() -> anyhow::Result<()> {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/ybs/task.php")
        .match_header("content-type", CONTENT_TYPE)
        .match_body(Matcher::AllOf(vec![
            method("acdepositfunds"),
            Matcher::Regex("<APIUsername>90001234567</APIUsername>".into()),
            Matcher::Regex("<Account>256772123456</Account>".into()),
            Matcher::Regex("<Amount>2000</Amount>".into()),
            Matcher::Regex("<Narrative>Tom &amp; Jerry</Narrative>".into()),
            Matcher::Regex("<NonBlocking>TRUE</NonBlocking>".into()),
            Matcher::Regex("<ExternalReference>INV-42</ExternalReference>".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(
            "<AutoCreate><Response><Status>OK</Status><StatusCode>1</StatusCode>\
             <TransactionStatus>PENDING</TransactionStatus>\
             <TransactionReference>TX-100</TransactionReference></Response></AutoCreate>",
        )
        .create();

    let config = ClientConfig::new("90001234567", "secret")
        .with_non_blocking(true)
        .with_external_reference("INV-42");
    let client = client_for(&server, config);

    let call = client.deposit_funds("256772123456", 2000, "Tom & Jerry");
    mock.assert();

    assert_eq!(call.trace.status_code, Some(200));
    assert!(call.trace.error.is_none());
    assert!(call.trace.request.contains("<Method>acdepositfunds</Method>"));
    assert!(!call.trace.request.contains("InternalReference"));

    let response = call.into_result()?;
    assert!(response.status.is_ok());
    assert_eq!(response.status.status_code, "1");
    assert_eq!(response.transaction_status, "PENDING");
    assert_eq!(response.transaction_reference, "TX-100");
    Ok(())
}

#[test]
fn server_error_yields_transport_error_and_default_value() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/ybs/task.php")
        .with_status(500)
        .with_body("gateway down")
        .create();

    let client = client_for(&server, ClientConfig::new("user", "pass"));
    let call = client.withdraw_funds("256772123456", 500, "refund");
    mock.assert();

    let error = call.error().expect("non-200 must fail");
    assert!(error.is_transport());
    assert_eq!(error.status_code(), Some(500));

    assert_eq!(call.trace.status_code, Some(500));
    assert_eq!(call.trace.response.as_deref(), Some("gateway down"));
    let recorded = call.trace.error.clone().unwrap_or_default();
    assert!(recorded.contains("500"), "{recorded}");
    assert!(recorded.contains("Internal Server Error"), "{recorded}");

    assert_eq!(call.value_or_default(), TransactionResponse::default());
}

#[test]
fn malformed_response_yields_parse_error() {
    let mut server = Server::new();
    server
        .mock("POST", "/ybs/task.php")
        .with_status(200)
        .with_body("<AutoCreate><Response><Status>OK</Status>")
        .create();

    let client = client_for(&server, ClientConfig::new("user", "pass"));
    let call = client.account_balance();

    assert!(call.error().is_some_and(|e| e.is_parse()));
    assert_eq!(call.trace.status_code, Some(200));
    assert!(call.trace.error.is_some());
    assert!(call.value_or_default().balances.is_empty());
}

#[test]
fn traces_only_describe_their_own_call() {
    let mut server = Server::new();
    server
        .mock("POST", "/ybs/task.php")
        .match_body(method("acacctbalance"))
        .with_status(503)
        .with_body("busy")
        .create();
    server
        .mock("POST", "/ybs/task.php")
        .match_body(method("actransactioncheckstatus"))
        .with_status(200)
        .with_body(
            "<AutoCreate><Response><Status>OK</Status><StatusCode>0</StatusCode>\
             <TransactionStatus>SUCCEEDED</TransactionStatus><Amount>2000</Amount>\
             </Response></AutoCreate>",
        )
        .create();

    let client = client_for(&server, ClientConfig::new("user", "pass"));

    let first = client.account_balance();
    assert_eq!(first.trace.status_code, Some(503));
    assert!(first.trace.error.is_some());

    let second = client.check_transaction_status("TX-100", "");
    assert_eq!(second.trace.status_code, Some(200));
    assert!(second.trace.error.is_none());
    assert!(second.trace.request.contains("<TransactionReference>TX-100</TransactionReference>"));
    assert!(!second.trace.request.contains("acacctbalance"));
    assert_ne!(second.trace.response.as_deref(), Some("busy"));

    let status = second.into_result().expect("second call succeeds");
    assert_eq!(status.transaction.transaction_status, "SUCCEEDED");
    assert_eq!(status.amount, "2000");
}

#[test]
fn account_validity_is_reduced_to_a_boolean() {
    let mut server = Server::new();
    server
        .mock("POST", "/ybs/task.php")
        .match_body(Matcher::Regex("<Account>256700000001</Account>".into()))
        .with_status(200)
        .with_body(
            "<AutoCreate><Response><Status>OK</Status><Valid>TRUE</Valid></Response></AutoCreate>",
        )
        .create();
    server
        .mock("POST", "/ybs/task.php")
        .match_body(Matcher::Regex("<Account>256700000002</Account>".into()))
        .with_status(200)
        .with_body(
            "<AutoCreate><Response><Status>ERROR</Status><Valid>TRUE</Valid></Response></AutoCreate>",
        )
        .create();
    server
        .mock("POST", "/ybs/task.php")
        .match_body(Matcher::Regex("<Account>256700000003</Account>".into()))
        .with_status(200)
        .with_body("not xml at all <")
        .create();

    let client = client_for(&server, ClientConfig::new("user", "pass"));

    let valid = client.verify_account_validity("256700000001");
    assert_eq!(valid.value(), Some(&true));

    let refused = client.verify_account_validity("256700000002");
    assert_eq!(refused.value(), Some(&false));

    let broken = client.verify_account_validity("256700000003");
    assert!(broken.error().is_some());
    assert!(!broken.value_or_default());
}

#[test]
fn execute_returns_tagged_result() -> anyhow::Result<()> {
    let mut server = Server::new();
    server
        .mock("POST", "/ybs/task.php")
        .match_body(Matcher::AllOf(vec![
            method("acgetministatement"),
            Matcher::Regex(
                "<TransactionEntryDesignation>ANY</TransactionEntryDesignation>".into(),
            ),
            Matcher::Regex("<CurrencyCode>UGX-MTNMM</CurrencyCode>".into()),
        ]))
        .with_status(200)
        .with_body(
            "<AutoCreate><Response><Status>OK</Status><StatusCode>0</StatusCode>\
             <TotalTransactions>1</TotalTransactions><ReturnedTransactions>1</ReturnedTransactions>\
             <Transactions><Transaction><TransactionReference>REF-1</TransactionReference>\
             <Amount>700</Amount></Transaction></Transactions></Response></AutoCreate>",
        )
        .create();

    let client = client_for(&server, ClientConfig::new("user", "pass"));
    let query = MiniStatementQuery::new().with_currency("UGX-MTNMM");
    let result = client.execute(&Operation::MiniStatement(query)).into_result()?;

    assert!(result.status().is_ok());
    match result {
        OperationResult::MiniStatement(statement) => {
            assert_eq!(statement.total_transactions, "1");
            assert_eq!(statement.transactions[0].transaction_reference, "REF-1");
            assert_eq!(statement.transactions[0].amount, "700");
        }
        other => panic!("unexpected result {other:?}"),
    }
    Ok(())
}

#[test]
fn airtime_internal_sends_beneficiary_fields() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/ybs/task.php")
        .match_body(Matcher::AllOf(vec![
            method("acsendairtimeinternal"),
            Matcher::Regex("<CurrencyCode>UGX-MTNAT</CurrencyCode>".into()),
            Matcher::Regex("<BeneficiaryAccount>90002</BeneficiaryAccount>".into()),
            Matcher::Regex("<BeneficiaryEmail>b@example.com</BeneficiaryEmail>".into()),
        ]))
        .with_status(200)
        .with_body(
            "<AutoCreate><Response><Status>ERROR</Status><StatusCode>-1</StatusCode>\
             <ErrorMessage>Unknown beneficiary</ErrorMessage></Response></AutoCreate>",
        )
        .create();

    let client = client_for(&server, ClientConfig::new("user", "pass"));
    let call = client.send_airtime_internal("UGX-MTNAT", 1000, 90002, "b@example.com", "gift");
    mock.assert();

    // Un refus métier arrive dans une réponse 200 : ce n'est pas une erreur
    let response = call.into_result().expect("business errors are not transport errors");
    assert!(!response.status.is_ok());
    assert_eq!(response.status.error_message, "Unknown beneficiary");
}
