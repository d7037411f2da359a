use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tao_income_api::TaoError;
use tao_income_api::auth::StaticCredentials;
use tao_income_api::rest::{
    DateRangeRequest, PortfolioEventsRequest, RootApyRequest, SubnetOhlcRequest,
    SubnetTransactionsRequest, TaoRestClient, MetagraphRequest,
};

fn build_client(server: &MockServer) -> TaoRestClient {
    TaoRestClient::builder()
        .base_url(server.uri())
        .credentials(Arc::new(StaticCredentials::new("test_key")))
        .build()
}

#[tokio::test]
async fn test_current_sends_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current"))
        .and(header("X-API-Key", "test_key"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "block": 5_000_000 })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let current = client.current().await.unwrap();

    assert_eq!(current["block"], 5_000_000);
}

#[tokio::test]
async fn test_fear_greed_omits_absent_bounds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/analytics/macro/fear_greed"))
        .and(query_param("start", "2025-01-01"))
        .and(query_param_is_missing("end"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let request = DateRangeRequest {
        start: Some("2025-01-01".to_string()),
        end: None,
    };
    let data = client.fear_greed(&request).await.unwrap();

    assert_eq!(data, json!([]));
}

#[tokio::test]
async fn test_root_apy_sends_defaults() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/apy/root"))
        .and(query_param("interval", "1hour"))
        .and(query_param("page", "1"))
        .and(query_param("page_size", "100"))
        .and(query_param_is_missing("start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "apy": 0.17 })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let request: RootApyRequest = serde_json::from_value(json!({})).unwrap();
    client.root_apy(&request).await.unwrap();
}

#[tokio::test]
async fn test_subnet_transactions_with_coldkey() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/analytics/subnets/transactions"))
        .and(query_param("netuid", "19"))
        .and(query_param("coldkey", "5Cold"))
        .and(query_param("page_size", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let request = SubnetTransactionsRequest::new(19).coldkey("5Cold");
    client.subnet_transactions(&request).await.unwrap();
}

#[tokio::test]
async fn test_subnet_ohlc_and_metagraph_paths() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subnets/ohlc"))
        .and(query_param("netuid", "3"))
        .and(query_param("start", "2025-07-01"))
        .and(query_param("end", "2025-07-02"))
        .and(query_param("interval_minutes", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/analytics/subnets/metagraph/3"))
        .and(query_param_is_missing("timestamp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "neurons": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    client
        .subnet_ohlc(&SubnetOhlcRequest::new(3, "2025-07-01", "2025-07-02"))
        .await
        .unwrap();
    let metagraph = client
        .subnet_metagraph(3, &MetagraphRequest::default())
        .await
        .unwrap();
    assert!(metagraph["neurons"].is_array());
}

#[tokio::test]
async fn test_portfolio_events_block_range() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounting/events"))
        .and(query_param("coldkey", "5Cold"))
        .and(query_param("start_block", "100"))
        .and(query_param_is_missing("end_block"))
        .and(query_param("page_size", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let request = PortfolioEventsRequest {
        start_block: Some(100),
        ..PortfolioEventsRequest::new("5Cold")
    };
    client.portfolio_events(&request).await.unwrap();
}

#[tokio::test]
async fn test_non_success_status_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/analytics/subnets/info/999"))
        .respond_with(ResponseTemplate::new(404).set_body_string("subnet not found"))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let err = client.subnet_info(999).await.unwrap_err();

    match err {
        TaoError::Api(api) => {
            assert_eq!(api.status, 404);
            assert_eq!(api.body, "subnet not found");
            assert_eq!(api.to_string(), "Tao API returned status code 404");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_body_is_null() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subnet_tags"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = build_client(&server);
    assert!(client.subnet_tags().await.unwrap().is_null());
}

#[tokio::test]
async fn test_invalid_json_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/validator_identities"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let err = client.validator_identities().await.unwrap_err();
    assert!(matches!(err, TaoError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = TaoRestClient::builder()
        .base_url(server.uri())
        .credentials(Arc::new(StaticCredentials::new("test_key")))
        .timeout(Duration::from_millis(200))
        .build();
    let err = client.current().await.unwrap_err();

    assert!(matches!(err, TaoError::Timeout));
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_missing_credentials_never_calls_upstream() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = TaoRestClient::builder().base_url(server.uri()).build();
    let err = client.subnets().await.unwrap_err();

    assert!(matches!(err, TaoError::MissingCredentials));
    assert!(!client.has_credentials());
}
