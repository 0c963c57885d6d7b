use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Request, StatusCode},
    Router,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;
use tracehold_core_calculator_contracts::MockCalculatorFeatureService;
use tracehold_core_config_contracts::MockConfigFeatureService;
use tracehold_core_contact_contracts::{
    ContactSubmitError, DeliveryOutcome, DeliveryReport, MockContactFeatureService,
};
use tracehold_core_health_contracts::{HealthStatus, MockHealthFeatureService};
use tracehold_demo::contact::{CLIENT_IP, MARCO_RAW};
use tracehold_models::{
    calculator::{SavingsEstimate, SavingsInput, SavingsRange},
    contact::{ContactField, ContactSubmissionViolations, FieldViolation},
};

use crate::{middlewares::request_id::REQUEST_ID_HEADER, RestServer, RestServerConfig};

type Sut = RestServer<
    MockHealthFeatureService,
    MockConfigFeatureService,
    MockContactFeatureService,
    MockCalculatorFeatureService,
>;

fn sut() -> Sut {
    RestServer {
        config: RestServerConfig {
            addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            real_ip_config: None,
        },
        health_feature_service: MockHealthFeatureService::new(),
        config_feature_service: MockConfigFeatureService::new(),
        contact_feature_service: MockContactFeatureService::new(),
        calculator_feature_service: MockCalculatorFeatureService::new(),
    }
}

struct TestResponse {
    status: StatusCode,
    request_id: Option<String>,
    body: Value,
}

async fn send(router: Router, mut request: Request<Body>) -> TestResponse {
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::new(CLIENT_IP, 51234)));
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .map(|x| x.to_str().unwrap().to_owned());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    TestResponse {
        status,
        request_id,
        body,
    }
}

fn post_contact(body: impl Into<Body>) -> Request<Body> {
    Request::post("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn submit(result: Result<(), ContactSubmitError>) -> TestResponse {
    let sut = Sut {
        contact_feature_service: MockContactFeatureService::new().with_submit(
            MARCO_RAW.clone(),
            Some(CLIENT_IP),
            result,
        ),
        ..sut()
    };
    send(sut.router(), post_contact(MARCO_RAW.to_string())).await
}

#[tokio::test]
async fn contact_ok() {
    let response = submit(Ok(())).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({"message": "Form submitted successfully"})
    );
    assert!(response.request_id.is_some());
}

#[tokio::test]
async fn contact_invalid_input() {
    let violations = ContactSubmissionViolations(vec![
        FieldViolation {
            field: Some(ContactField::Name),
            message: "Name must be at least 2 characters",
        },
        FieldViolation {
            field: Some(ContactField::GdprConsent),
            message: "You must accept the privacy policy",
        },
    ]);

    let response = submit(Err(violations.into())).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({
            "error": "Invalid form data",
            "details": "name: Name must be at least 2 characters; gdprConsent: You must accept the privacy policy",
        })
    );
}

#[tokio::test]
async fn contact_malformed_json() {
    let response = send(sut().router(), post_contact("{\"name\": ")).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Invalid form data");
    assert!(response.body["details"].is_string());
}

#[tokio::test]
async fn contact_without_content_type() {
    let sut = Sut {
        contact_feature_service: MockContactFeatureService::new().with_submit(
            MARCO_RAW.clone(),
            Some(CLIENT_IP),
            Ok(()),
        ),
        ..sut()
    };
    let request = Request::post("/api/contact")
        .body(Body::from(MARCO_RAW.to_string()))
        .unwrap();

    let response = send(sut.router(), request).await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn contact_rate_limited() {
    let response = submit(Err(ContactSubmitError::RateLimited)).await;

    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.body, json!({"error": "Too many requests"}));
}

#[tokio::test]
async fn contact_captcha_failed() {
    let response = submit(Err(ContactSubmitError::Captcha)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({"error": "Captcha verification failed"}));
}

#[tokio::test]
async fn contact_delivery_failed() {
    let report = DeliveryReport {
        owner_notification: DeliveryOutcome::Failed,
        confirmation: DeliveryOutcome::Sent,
    };

    let response = submit(Err(ContactSubmitError::Delivery(report))).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, json!({"error": "Failed to send message"}));
}

#[tokio::test]
async fn contact_internal_error() {
    let response = submit(Err(anyhow::anyhow!("smtp pool poisoned").into())).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn calculator_estimate() {
    let sut = Sut {
        calculator_feature_service: MockCalculatorFeatureService::new().with_compute_savings(
            SavingsInput::from_raw(Some("100"), None, None),
            Some(SavingsEstimate {
                total_bls: 150.0,
                min_paper_cost: 60.0,
                max_paper_cost: 80.0,
                monthly_savings: SavingsRange {
                    min: 7200,
                    max: 10200,
                },
                annual_savings: SavingsRange {
                    min: 86400,
                    max: 122400,
                },
            }),
        ),
        ..sut()
    };
    let request = Request::get("/api/calculator/savings?teusPerMonth=100")
        .body(Body::empty())
        .unwrap();

    let response = send(sut.router(), request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({
            "totalBLs": 150.0,
            "minPaperCost": 60.0,
            "maxPaperCost": 80.0,
            "monthlySavings": {"min": 7200, "max": 10200},
            "annualSavings": {"min": 86400, "max": 122400},
        })
    );
}

#[tokio::test]
async fn calculator_no_estimate() {
    let sut = Sut {
        calculator_feature_service: MockCalculatorFeatureService::new().with_compute_savings(
            SavingsInput::from_raw(Some("lots"), Some("2"), Some("65")),
            None,
        ),
        ..sut()
    };
    let request =
        Request::get("/api/calculator/savings?teusPerMonth=lots&blsPerTeu=2&avgCostPerBL=65")
            .body(Body::empty())
            .unwrap();

    let response = send(sut.router(), request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, Value::Null);
}

#[tokio::test]
async fn captcha_sitekey() {
    let sut = Sut {
        config_feature_service: MockConfigFeatureService::new()
            .with_get_captcha_sitekey("1x00000000000000000000AA"),
        ..sut()
    };
    let request = Request::get("/api/captcha").body(Body::empty()).unwrap();

    let response = send(sut.router(), request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"sitekey": "1x00000000000000000000AA"}));
}

#[tokio::test]
async fn health() {
    for email in [true, false] {
        let sut = Sut {
            health_feature_service: MockHealthFeatureService::new()
                .with_get_status(HealthStatus { email }),
            ..sut()
        };
        let request = Request::get("/health").body(Body::empty()).unwrap();

        let response = send(sut.router(), request).await;

        let expected_status = if email {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        assert_eq!(response.status, expected_status);
        assert_eq!(response.body, json!({"http": true, "email": email}));
    }
}

#[tokio::test]
async fn not_found_has_request_id() {
    let request = Request::get("/api/unknown").body(Body::empty()).unwrap();

    let response = send(sut().router(), request).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.request_id.is_some());
}
