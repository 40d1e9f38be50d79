use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
};
use http_body_util::BodyExt;
use oracle_engine::test_utils::{StubPriceFeed, StubTransport};
use oracle_server::{config::Config, test_utils::app::TestApp};
use oracle_types::{ErrorResponse, FieldId, HealthResponse, PricesResponse, Protocol};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

const ETH_RAW: u128 = 350000000000;
const BTC_RAW: u128 = 6000000000000;

async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    app.http_router().oneshot(req).await.unwrap()
}

async fn map_response<T: DeserializeOwned>(response: Response<Body>) -> T {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn app_with(feed: StubPriceFeed, transport: StubTransport) -> TestApp {
    TestApp::new_with_stubs(TestApp::zeroed_cli_args(), feed, transport)
}

#[tokio::test]
async fn http_not_found() {
    let response = get(&TestApp::new(), "/does_not_exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_prices_full_success() {
    let app = app_with(
        StubPriceFeed::new()
            .with_price(FieldId::Eth, Protocol::Modern, ETH_RAW)
            .with_price(FieldId::Btc, Protocol::Modern, BTC_RAW),
        StubTransport::new(),
    );

    let response = get(&app, "/prices").await;
    assert_eq!(response.status(), StatusCode::OK);

    let prices: PricesResponse = map_response(response).await;
    assert_eq!(
        prices,
        PricesResponse {
            eth: Some(3500.0),
            btc: Some(60000.0),
        }
    );
}

#[tokio::test]
async fn http_prices_partial_is_null() {
    let app = app_with(
        StubPriceFeed::new().with_price(FieldId::Eth, Protocol::Modern, ETH_RAW),
        StubTransport::new(),
    );

    let response = get(&app, "/prices").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, serde_json::json!({ "eth": 3500.0, "btc": null }));
}

#[tokio::test]
async fn http_prices_no_wrapper_is_500() {
    let app = app_with(
        StubPriceFeed::new().with_price_everywhere(FieldId::Eth, ETH_RAW),
        StubTransport::new()
            .reject_service("redstone-main-demo")
            .reject_service("redstone-primary-prod"),
    );

    let response = get(&app, "/prices").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let error: ErrorResponse = map_response(response).await;
    assert!(error.error.starts_with("NoWrapperAvailable: "));
    assert_eq!(app.feed.calls(), 0);
}

#[tokio::test]
async fn http_prices_all_fields_lost_is_500() {
    let app = app_with(StubPriceFeed::new(), StubTransport::new());

    let response = get(&app, "/prices").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let error: ErrorResponse = map_response(response).await;
    assert!(error.error.starts_with("AllFieldsUnavailable: "));
    assert!(error.error.contains("ETH"));
    assert!(error.error.contains("BTC"));
    // two fields, two attempts each
    assert_eq!(app.feed.calls(), 4);
}

#[tokio::test]
async fn http_multiple_prices() {
    let app = app_with(
        StubPriceFeed::new().with_multiple(Protocol::Modern, ETH_RAW, BTC_RAW),
        StubTransport::new(),
    );

    let response = get(&app, "/prices/multiple").await;
    assert_eq!(response.status(), StatusCode::OK);

    let prices: PricesResponse = map_response(response).await;
    assert_eq!(prices.eth, Some(3500.0));
    assert_eq!(prices.btc, Some(60000.0));
    assert_eq!(app.feed.calls(), 1);
}

#[tokio::test]
async fn http_health() {
    let app = TestApp::new();

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let health: HealthResponse = map_response(response).await;
    assert_eq!(health.status, "ok");
    assert_eq!(health.strategies, 3);
    assert_eq!(health.rpc_block_height, None);
}

#[tokio::test]
async fn http_config() {
    let app = TestApp::new();

    let response = get(&app, "/config").await;
    assert!(response.status().is_success());

    let config: Config = map_response(response).await;
    assert_eq!(&config, app.config.as_ref());
}

#[tokio::test]
async fn http_openapi() {
    let response = get(&TestApp::new(), "/api-docs/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);

    let doc: serde_json::Value = map_response(response).await;
    assert!(doc["paths"]["/prices"].is_object());
    assert!(doc["paths"]["/prices/multiple"].is_object());
}

#[tokio::test]
async fn http_cors_wildcard() {
    let app = TestApp::new_with_args(oracle_server::args::CliArgs {
        cors_allowed_origins: vec!["https://*.example.com".to_string()],
        ..TestApp::zeroed_cli_args()
    });

    let req = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header(header::ORIGIN, "https://app.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.http_router().oneshot(req).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "https://app.example.com"
    );

    let req = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header(header::ORIGIN, "https://evil.test")
        .body(Body::empty())
        .unwrap();
    let response = app.http_router().oneshot(req).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
