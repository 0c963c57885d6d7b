use std::net::{IpAddr, Ipv4Addr};

use tokio::net::TcpListener;
use tracehold_extern_contracts::turnstile::{TurnstileApiService, TurnstileSiteverifyResponse};
use tracehold_extern_impl::turnstile::{TurnstileApiServiceConfig, TurnstileApiServiceImpl};
use tracehold_testing::turnstile::SITEVERIFY_ROUTE;

const SECRET: &str = "test-secret";
const CLIENT_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7));

#[tokio::test]
async fn success() {
    let sut = make_sut().await;
    let result = sut.siteverify("success", SECRET, Some(CLIENT_IP)).await.unwrap();
    assert_eq!(
        result,
        TurnstileSiteverifyResponse {
            success: true,
            error_codes: Vec::new(),
            hostname: Some("localhost".into()),
        }
    );
}

#[tokio::test]
async fn success_hostname_unknown_ip() {
    let sut = make_sut().await;
    let result = sut
        .siteverify("success-tracehold.com", SECRET, None)
        .await
        .unwrap();
    assert_eq!(
        result,
        TurnstileSiteverifyResponse {
            success: true,
            error_codes: Vec::new(),
            hostname: Some("tracehold.com".into()),
        }
    );
}

#[tokio::test]
async fn invalid_response() {
    let sut = make_sut().await;
    let result = sut.siteverify("failure", SECRET, Some(CLIENT_IP)).await.unwrap();
    assert_eq!(
        result,
        TurnstileSiteverifyResponse {
            success: false,
            error_codes: vec!["invalid-input-response".into()],
            hostname: None,
        }
    );
}

#[tokio::test]
async fn invalid_secret() {
    let sut = make_sut().await;
    let result = sut
        .siteverify("success", "wrong-secret", Some(CLIENT_IP))
        .await
        .unwrap();
    assert_eq!(
        result,
        TurnstileSiteverifyResponse {
            success: false,
            error_codes: vec!["invalid-input-secret".into()],
            hostname: None,
        }
    );
}

#[tokio::test]
async fn unreachable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let sut = make_sut_with_endpoint(&format!("http://{addr}{SITEVERIFY_ROUTE}"));
    let result = sut.siteverify("success", SECRET, Some(CLIENT_IP)).await;
    assert!(result.is_err());
}

async fn make_sut() -> TurnstileApiServiceImpl {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, tracehold_testing::turnstile::router(SECRET.into()))
            .await
            .unwrap();
    });

    make_sut_with_endpoint(&format!("http://{addr}{SITEVERIFY_ROUTE}"))
}

fn make_sut_with_endpoint(endpoint: &str) -> TurnstileApiServiceImpl {
    tracehold_di::provider! {
        Provider { turnstile_api_service_config: TurnstileApiServiceConfig, }
    }

    let mut provider = Provider {
        _cache: Default::default(),
        turnstile_api_service_config: TurnstileApiServiceConfig::new(Some(
            endpoint.parse().unwrap(),
        ))
        .unwrap(),
    };

    tracehold_di::Provide::provide(&mut provider)
}
