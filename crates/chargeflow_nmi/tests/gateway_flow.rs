// Integration tests for the NMI adapter against a mocked gateway endpoint.

use std::sync::{Arc, Mutex};

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chargeflow_common::models::{Address, OrderContext, PaymentInstrument, PaymentStatus};
use chargeflow_common::services::{BoxFuture, BoxedError, Notifier, NotifyOptions};
use chargeflow_config::{AppConfig, NmiConfig};
use chargeflow_nmi::service::NmiPaymentMethod;
use chargeflow_nmi::{logic, GatewayClient, NmiError};
use chargeflow_common::services::PaymentMethod;

const TRANSACT_PATH: &str = "/api/transact.php";

fn nmi_config(server: &MockServer) -> NmiConfig {
    NmiConfig {
        test_mode: true,
        username: "merchant_user".to_string(),
        password: "s3cret-pw".to_string(),
        gateway_url: Some(format!("{}{}", server.uri(), TRANSACT_PATH)),
    }
}

fn gateway_client(server: &MockServer) -> GatewayClient {
    GatewayClient::new(Some(&format!("{}{}", server.uri(), TRANSACT_PATH))).unwrap()
}

fn sample_order() -> OrderContext {
    OrderContext {
        increment_id: "100000001".to_string(),
        remote_ip: "203.0.113.7".to_string(),
        customer_email: "jane@example.com".to_string(),
        base_tax_amount: 0,
        base_shipping_amount: 0,
        billing: Address {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            street1: "1 Main St".to_string(),
            city: "Minneapolis".to_string(),
            region_code: "MN".to_string(),
            postcode: "55401".to_string(),
            country: "US".to_string(),
            ..Default::default()
        },
        shipping: Address {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            street1: "1 Main St".to_string(),
            city: "Minneapolis".to_string(),
            region_code: "MN".to_string(),
            postcode: "55401".to_string(),
            country: "US".to_string(),
            ..Default::default()
        },
        store_name: "My Store".to_string(),
    }
}

fn sample_payment() -> PaymentInstrument {
    PaymentInstrument {
        cc_number: "4111111111111111".to_string(),
        cc_exp_month: 4,
        cc_exp_year: 2027,
        cc_cid: "123".to_string(),
        ..Default::default()
    }
}

/// Test double that records every alert it is asked to deliver.
#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn send<'a>(
        &'a self,
        message: &'a str,
        _options: &'a NotifyOptions,
    ) -> BoxFuture<'a, (), BoxedError> {
        Box::pin(async move {
            self.messages.lock().unwrap().push(message.to_string());
            Ok(())
        })
    }
}

#[tokio::test]
async fn approved_authorize_attaches_gateway_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TRANSACT_PATH))
        .and(body_string_contains("type=sale"))
        .and(body_string_contains("ccnumber=4111111111111111"))
        .and(body_string_contains("username=demo"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "response=1&transactionid=T1&authcode=A1&avsresponse=Y&cvvresponse=M&responsetext=SUCCESS",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let config = nmi_config(&server);
    let client = gateway_client(&server);
    let order = sample_order();
    let mut payment = sample_payment();
    payment.parent_transaction_id = Some("stale".to_string());

    logic::authorize(&client, &config, None, &order, &mut payment, 1000)
        .await
        .unwrap();

    assert_eq!(payment.status, Some(PaymentStatus::Approved));
    assert_eq!(payment.transaction_id.as_deref(), Some("T1"));
    assert_eq!(payment.approval_code.as_deref(), Some("A1"));
    assert_eq!(payment.avs_status.as_deref(), Some("Y"));
    assert_eq!(payment.cvv_status.as_deref(), Some("M"));
    assert!(payment.is_transaction_closed);
    assert_eq!(payment.parent_transaction_id, None);
    assert_eq!(payment.amount, 1000);
}

#[tokio::test]
async fn declined_authorize_maps_the_response_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TRANSACT_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("response=2&responsetext=Insufficient+funds"),
        )
        .mount(&server)
        .await;

    let config = nmi_config(&server);
    let client = gateway_client(&server);
    let order = sample_order();
    let mut payment = sample_payment();

    let err = logic::authorize(&client, &config, None, &order, &mut payment, 1000)
        .await
        .unwrap_err();

    match err {
        NmiError::Declined { code, message } => {
            assert_eq!(code, "2");
            assert!(message.contains("credit card limit"), "message: {}", message);
        }
        other => panic!("expected Declined, got {:?}", other),
    }
    assert_eq!(payment.status, Some(PaymentStatus::Error));
    assert_eq!(payment.transaction_id, None);
}

#[tokio::test]
async fn declined_authorize_without_text_reports_unknown_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TRANSACT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("response=3"))
        .mount(&server)
        .await;

    let config = nmi_config(&server);
    let client = gateway_client(&server);
    let order = sample_order();
    let mut payment = sample_payment();

    let err = logic::authorize(&client, &config, None, &order, &mut payment, 1000)
        .await
        .unwrap_err();

    match err {
        NmiError::Declined { code, message } => {
            assert_eq!(code, "3");
            assert_eq!(message, "Unknown error");
        }
        other => panic!("expected Declined, got {:?}", other),
    }
}

#[tokio::test]
async fn transport_failure_is_classified_and_never_approved() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TRANSACT_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let config = nmi_config(&server);
    let client = gateway_client(&server);
    let order = sample_order();
    let mut payment = sample_payment();

    let err = logic::authorize(&client, &config, None, &order, &mut payment, 1000)
        .await
        .unwrap_err();

    match err {
        NmiError::Transport { code, message } => {
            assert_eq!(code, "500");
            assert!(message.contains("upstream exploded"));
        }
        other => panic!("expected Transport, got {:?}", other),
    }
    assert_eq!(payment.transaction_id, None);
}

#[tokio::test]
async fn refund_posts_against_the_parent_transaction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TRANSACT_PATH))
        .and(body_string_contains("type=refund"))
        .and(body_string_contains("transactionid=P1"))
        .and(body_string_contains("amount=2.50"))
        .respond_with(ResponseTemplate::new(200).set_body_string("response=1&transactionid=T9"))
        .expect(1)
        .mount(&server)
        .await;

    let config = nmi_config(&server);
    let client = gateway_client(&server);
    let mut payment = sample_payment();
    payment.parent_transaction_id = Some("P1".to_string());
    payment.refund_transaction_id = Some("R1".to_string());

    logic::refund(&client, &config, None, &mut payment, 250)
        .await
        .unwrap();

    assert_eq!(payment.status, Some(PaymentStatus::Success));
}

#[tokio::test]
async fn rejected_refund_marks_the_instrument_errored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TRANSACT_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("response=3&responsetext=Transaction+not+found"),
        )
        .mount(&server)
        .await;

    let config = nmi_config(&server);
    let client = gateway_client(&server);
    let mut payment = sample_payment();
    payment.parent_transaction_id = Some("P1".to_string());
    payment.refund_transaction_id = Some("R1".to_string());

    let err = logic::refund(&client, &config, None, &mut payment, 250)
        .await
        .unwrap_err();

    assert!(matches!(err, NmiError::RefundFailed { ref code } if code == "3"));
    assert_eq!(err.to_string(), "Refund Failed: Invalid transaction ID");
    assert_eq!(payment.status, Some(PaymentStatus::Error));
}

#[tokio::test]
async fn refund_precondition_failure_makes_no_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("response=1"))
        .expect(0)
        .mount(&server)
        .await;

    let config = nmi_config(&server);
    let client = gateway_client(&server);
    let mut payment = sample_payment();
    payment.parent_transaction_id = Some("P1".to_string());

    let err = logic::refund(&client, &config, None, &mut payment, 1000)
        .await
        .unwrap_err();

    assert!(matches!(err, NmiError::RefundPreconditionFailed));
    assert_eq!(payment.status, Some(PaymentStatus::Error));
}

#[tokio::test]
async fn invalid_amount_makes_no_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("response=1"))
        .expect(0)
        .mount(&server)
        .await;

    let config = nmi_config(&server);
    let client = gateway_client(&server);
    let order = sample_order();

    for amount in [0, -5] {
        let mut payment = sample_payment();
        let err = logic::authorize(&client, &config, None, &order, &mut payment, amount)
            .await
            .unwrap_err();
        assert!(matches!(err, NmiError::InvalidAmount(a) if a == amount));
    }
}

#[tokio::test]
async fn void_and_cancel_behave_identically() {
    for use_cancel in [false, true] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(TRANSACT_PATH))
            .and(body_string_contains("type=void"))
            .and(body_string_contains("transactionid=P1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("response=1"))
            .expect(1)
            .mount(&server)
            .await;

        let config = nmi_config(&server);
        let client = gateway_client(&server);
        let mut payment = sample_payment();
        payment.amount = 1000;
        payment.parent_transaction_id = Some("P1".to_string());

        let result = if use_cancel {
            logic::cancel(&client, &config, None, &mut payment).await
        } else {
            logic::void(&client, &config, None, &mut payment).await
        };

        result.unwrap();
        assert_eq!(payment.status, Some(PaymentStatus::Success));
    }

    // Failure path is identical too
    for use_cancel in [false, true] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(TRANSACT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("response=3"))
            .mount(&server)
            .await;

        let config = nmi_config(&server);
        let client = gateway_client(&server);
        let mut payment = sample_payment();
        payment.parent_transaction_id = Some("P1".to_string());

        let err = if use_cancel {
            logic::cancel(&client, &config, None, &mut payment).await
        } else {
            logic::void(&client, &config, None, &mut payment).await
        }
        .unwrap_err();

        assert!(matches!(err, NmiError::VoidFailed { ref code } if code == "3"));
        assert_eq!(err.to_string(), "Void Failed: Invalid transaction ID");
        assert_eq!(payment.status, Some(PaymentStatus::Error));
    }
}

#[tokio::test]
async fn failure_alerts_carry_only_redacted_payloads() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TRANSACT_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("response=2&responsetext=Issuer+Declined"),
        )
        .mount(&server)
        .await;

    let notifier = Arc::new(RecordingNotifier::default());
    let config = NmiConfig {
        test_mode: false,
        ..nmi_config(&server)
    };
    let client = gateway_client(&server);
    let order = sample_order();
    let mut payment = sample_payment();

    let result = logic::authorize(
        &client,
        &config,
        Some(notifier.as_ref()),
        &order,
        &mut payment,
        1000,
    )
    .await;
    assert!(result.is_err());

    let messages = notifier.messages.lock().unwrap();
    assert_eq!(messages.len(), 1);
    let alert = &messages[0];
    assert!(alert.contains("Gateway response"));
    assert!(alert.contains("***1111"), "card not masked: {}", alert);
    assert!(!alert.contains("4111111111111111"));
    assert!(!alert.contains("s3cret-pw"));
    assert!(!alert.contains("merchant_user"));
}

#[tokio::test]
async fn payment_method_service_drives_the_full_flow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TRANSACT_PATH))
        .and(body_string_contains("type=sale"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "response=1&transactionid=T1&authcode=A1&avsresponse=Y&cvvresponse=M",
        ))
        .mount(&server)
        .await;

    let app_config = Arc::new(AppConfig {
        nmi: Some(nmi_config(&server)),
        slack: None,
    });
    let method_impl = NmiPaymentMethod::new(app_config, None).unwrap();

    let caps = method_impl.capabilities();
    assert!(caps.is_gateway);
    assert!(caps.can_authorize);
    assert!(!caps.can_capture);
    assert!(caps.can_refund);
    assert!(caps.can_void);

    let order = sample_order();
    let mut payment = sample_payment();
    method_impl
        .authorize(&order, &mut payment, 1000)
        .await
        .unwrap();
    assert_eq!(payment.status, Some(PaymentStatus::Approved));

    let info = method_impl.fetch_transaction_info(&payment);
    assert_eq!(info.transaction_id.as_deref(), Some("T1"));
    assert_eq!(info.approval_code.as_deref(), Some("A1"));
    assert!(info.is_closed);
    assert_eq!(info.status, Some(PaymentStatus::Approved));
}
