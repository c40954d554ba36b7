mod common;

use axum::Router;
use axum_test::TestServer;
use common::{MockConnectInfoLayer, TestBackend};
use domain_search::api::middleware::rate_limit;
use domain_search::api::routes::public_routes;
use domain_search::domain::availability::AvailabilityState;
use domain_search::domain::history_event::HistoryEvent;
use domain_search::state::AppState;
use serde_json::json;

fn test_server(state: AppState) -> TestServer {
    let app = Router::new()
        .nest("/api", public_routes().layer(rate_limit::layer()))
        .layer(MockConnectInfoLayer)
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_search_orders_and_enriches_results() {
    let (state, _rx) = TestBackend::coffee().into_state();
    let server = test_server(state);

    let response = server
        .get("/api/search")
        .add_query_param("query", "coffee")
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["query"], "coffee");
    assert!(json["timestamp"].is_string());

    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);

    assert_eq!(results[0]["domain"], "coffee.io");
    assert_eq!(results[0]["zone"], ".io");
    assert_eq!(results[0]["status"], "available");
    assert_eq!(results[0]["fresh"], true);
    assert!(results[0].get("whois").is_none());

    let registrars = results[0]["registrars"].as_array().unwrap();
    assert_eq!(registrars.len(), 2);
    assert_eq!(registrars[0]["name"], "Cheap");
    assert_eq!(registrars[0]["normalized_price"], 29.0);
    assert_eq!(
        registrars[0]["register_url"],
        "https://cheap.example/buy?domain=coffee.io"
    );
    assert_eq!(registrars[1]["name"], "Pricey");

    assert_eq!(results[1]["domain"], "coffee.com");
    assert_eq!(results[1]["status"], "taken");
    assert_eq!(results[1]["whois"], "pending");
    assert!(results[1].get("registrars").is_none());
}

#[tokio::test]
async fn test_search_accepts_json_body() {
    let (state, _rx) = TestBackend::coffee().into_state();
    let server = test_server(state);

    let response = server
        .post("/api/search")
        .json(&json!({ "query": "  Coffee  " }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["query"], "coffee");
    assert_eq!(json["results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_search_records_history_with_client_metadata() {
    let (state, mut rx) = TestBackend::coffee().into_state();
    let server = test_server(state);

    server
        .get("/api/search")
        .add_query_param("query", "coffee")
        .add_header("user-agent", "integration-test/1.0")
        .await
        .assert_status_ok();

    let events = common::drain(&mut rx);
    assert_eq!(events.len(), 2);

    let mut request_ids = Vec::new();
    for event in &events {
        let HistoryEvent::Record(entry) = event else {
            panic!("expected a record event, got {event:?}");
        };
        assert_eq!(entry.query, "coffee");
        assert_eq!(entry.client_ip.as_deref(), Some("127.0.0.1"));
        assert_eq!(entry.user_agent.as_deref(), Some("integration-test/1.0"));
        request_ids.push(entry.request_id);
    }
    assert_eq!(request_ids[0], request_ids[1]);
}

#[tokio::test]
async fn test_search_writes_status_cache() {
    let backend = TestBackend::coffee();
    let cache = backend.cache.clone();
    let (state, _rx) = backend.into_state();
    let server = test_server(state);

    server
        .get("/api/search")
        .add_query_param("query", "coffee")
        .await
        .assert_status_ok();

    // Cache writes are spawned off the request path.
    for _ in 0..50 {
        if cache.get("coffee.com").is_some() && cache.get("coffee.io").is_some() {
            break;
        }
        tokio::task::yield_now().await;
    }

    assert_eq!(cache.get("coffee.com"), Some(AvailabilityState::Taken));
    assert_eq!(cache.get("coffee.io"), Some(AvailabilityState::Available));
    assert_eq!(cache.get("coffee.xyz"), None);
}

#[tokio::test]
async fn test_search_region_candidate_from_accept_language() {
    let mut backend = TestBackend::coffee();
    backend
        .suggestions
        .statuses
        .insert("coffee.ru".to_string(), common::status("inactive"));
    let (state, _rx) = backend.into_state();
    let server = test_server(state);

    let response = server
        .get("/api/search")
        .add_query_param("query", "coffee")
        .add_header("accept-language", "ru-RU,ru;q=0.9,en;q=0.8")
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    let domains: Vec<&str> = json["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["domain"].as_str().unwrap())
        .collect();
    assert_eq!(domains, vec!["coffee.io", "coffee.ru", "coffee.com"]);
    assert_eq!(json["results"][1]["registrars"], json!([]));
}

#[tokio::test]
async fn test_search_explicit_language_overrides_header() {
    let mut backend = TestBackend::coffee();
    backend
        .suggestions
        .statuses
        .insert("coffee.ru".to_string(), common::status("inactive"));
    let (state, _rx) = backend.into_state();
    let server = test_server(state);

    let response = server
        .get("/api/search")
        .add_query_param("query", "coffee")
        .add_query_param("language", "en")
        .add_header("accept-language", "ru")
        .await;

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_search_dns_fallback_for_inconclusive_status() {
    let mut backend = TestBackend::default();
    backend.suggestions.suggestions = vec!["brew.dev".to_string()];
    backend
        .suggestions
        .statuses
        .insert("brew.dev".to_string(), common::status("unknown"));
    backend
        .dns
        .answers
        .insert("brew.dev".to_string(), AvailabilityState::Taken);
    let (state, _rx) = backend.into_state();
    let server = test_server(state);

    let response = server
        .get("/api/search")
        .add_query_param("query", "brew")
        .await;

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["results"][0]["domain"], "brew.dev");
    assert_eq!(json["results"][0]["status"], "taken");
}

#[tokio::test]
async fn test_search_no_suggestions_is_empty() {
    let (state, _rx) = TestBackend::default().into_state();
    let server = test_server(state);

    let response = server
        .get("/api/search")
        .add_query_param("query", "zzzz")
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["results"], json!([]));
}

#[tokio::test]
async fn test_search_empty_query_is_bad_request() {
    let (state, _rx) = TestBackend::coffee().into_state();
    let server = test_server(state);

    let response = server
        .get("/api/search")
        .add_query_param("query", "   ")
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(json["error"]["details"]["field"], "query");
}

#[tokio::test]
async fn test_search_missing_query_param_is_bad_request() {
    let (state, _rx) = TestBackend::coffee().into_state();
    let server = test_server(state);

    let response = server.get("/api/search").await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_search_invalid_language_is_bad_request() {
    let (state, _rx) = TestBackend::coffee().into_state();
    let server = test_server(state);

    let response = server
        .get("/api/search")
        .add_query_param("query", "coffee")
        .add_query_param("language", "ru;q=0.9")
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_search_malformed_json_is_bad_request() {
    let (state, _rx) = TestBackend::coffee().into_state();
    let server = test_server(state);

    let response = server
        .post("/api/search")
        .content_type("application/json")
        .text("{not json")
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "validation_error"
    );
}

#[tokio::test]
async fn test_search_without_credential_is_unavailable() {
    let mut backend = TestBackend::coffee();
    backend.suggestions.configured = false;
    let (state, mut rx) = backend.into_state();
    let server = test_server(state);

    let response = server
        .get("/api/search")
        .add_query_param("query", "coffee")
        .await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "service_unavailable");
    assert_eq!(json["error"]["details"]["provider"], "Domainr");
    assert!(
        json["error"]["details"]["hint"]
            .as_str()
            .unwrap()
            .contains("DOMAINR_API_KEY")
    );
    assert!(common::drain(&mut rx).is_empty());
}
