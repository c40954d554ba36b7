use mockito::{Matcher, Server};
use std::time::Duration;

use domain_search::domain::availability::AvailabilityState;
use domain_search::domain::providers::DnsResolver;
use domain_search::infrastructure::providers::{DohResolver, http_client};

fn resolver(server: &Server) -> DohResolver {
    DohResolver::new(
        http_client(Duration::from_secs(2)),
        &format!("{}/resolve", server.url()),
    )
}

async fn answer_with(body: &str) -> AvailabilityState {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/resolve")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "coffee.io".into()),
            Matcher::UrlEncoded("type".into(), "A".into()),
        ]))
        .match_header("accept", "application/dns-json")
        .with_status(200)
        .with_header("content-type", "application/dns-json")
        .with_body(body)
        .create_async()
        .await;

    let state = resolver(&server).check("coffee.io").await;
    mock.assert_async().await;
    state
}

#[tokio::test]
async fn test_nxdomain_is_available() {
    let state = answer_with(r#"{"Status":3,"TC":false,"Question":[{"name":"coffee.io.","type":1}]}"#).await;
    assert_eq!(state, AvailabilityState::Available);
}

#[tokio::test]
async fn test_a_record_is_taken() {
    let state = answer_with(
        r#"{"Status":0,"Answer":[{"name":"coffee.io.","type":1,"TTL":300,"data":"192.0.2.1"}]}"#,
    )
    .await;
    assert_eq!(state, AvailabilityState::Taken);
}

#[tokio::test]
async fn test_noerror_without_a_record_is_unknown() {
    let state = answer_with(r#"{"Status":0}"#).await;
    assert_eq!(state, AvailabilityState::Unknown);
}

#[tokio::test]
async fn test_http_error_is_unknown() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/resolve")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    assert_eq!(
        resolver(&server).check("coffee.io").await,
        AvailabilityState::Unknown
    );
}

#[tokio::test]
async fn test_garbage_body_is_unknown() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/resolve")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("garbage")
        .create_async()
        .await;

    assert_eq!(
        resolver(&server).check("coffee.io").await,
        AvailabilityState::Unknown
    );
}
