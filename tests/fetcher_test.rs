//! Wiremock integration tests for the HTTP fetcher.
//!
//! Exercises one request per call against a fake upstream: status
//! classification, payload decoding, query forwarding and timeouts.

use std::time::Duration;

use holonet::{Fetcher, HolonetError, HttpFetcher, Locator, Query};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher_for(server: &MockServer) -> HttpFetcher {
    HttpFetcher::new(&format!("{}/api", server.uri()), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn fetch_returns_parsed_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/people/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Luke Skywalker",
            "height": "172",
            "homeworld": "https://swapi.dev/api/planets/1/"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);
    let record = fetcher
        .fetch_locator(&Locator::from("people/1/"), &Query::new())
        .await
        .expect("fetch should succeed");

    assert_eq!(record.get_str("name"), Some("Luke Skywalker"));
    assert_eq!(record.get_str("height"), Some("172"));
    assert_eq!(fetcher.name(), "http");
}

#[tokio::test]
async fn fetch_forwards_query_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/people/"))
        .and(query_param("page", "2"))
        .and(query_param("search", "sky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "results": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);
    let query = Query::new().param("page", 2).param("search", "sky");
    let record = fetcher
        .fetch_locator(&Locator::from("people/"), &query)
        .await
        .unwrap();

    assert_eq!(record.get("count"), Some(&json!(3)));
}

#[tokio::test]
async fn fetch_forwards_query_embedded_in_locator() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/planets/"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);
    let next = format!("{}/api/planets/?page=3", server.uri());
    fetcher
        .fetch_locator(&Locator::from(next), &Query::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn not_found_maps_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/people/999/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Not found" })))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);
    let err = fetcher
        .fetch_locator(&Locator::from("people/999/"), &Query::new())
        .await
        .unwrap_err();

    assert!(err.is_not_found(), "expected NotFound, got {err:?}");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn server_error_maps_to_upstream_with_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/films/1/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);
    let err = fetcher
        .fetch_locator(&Locator::from("films/1/"), &Query::new())
        .await
        .unwrap_err();

    match err {
        HolonetError::Upstream { status, ref message } => {
            assert_eq!(status, Some(503));
            assert!(message.contains("503"), "message: {message}");
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
}

#[tokio::test]
async fn client_error_other_than_404_maps_to_upstream() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/people/1/"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);
    let err = fetcher
        .fetch_locator(&Locator::from("people/1/"), &Query::new())
        .await
        .unwrap_err();

    assert!(err.is_upstream());
    assert_eq!(err.status(), Some(429));
}

#[tokio::test]
async fn malformed_body_maps_to_upstream() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/people/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);
    let err = fetcher
        .fetch_locator(&Locator::from("people/1/"), &Query::new())
        .await
        .unwrap_err();

    assert!(err.is_upstream());
    assert!(err.to_string().contains("malformed"), "got: {err}");
}

#[tokio::test]
async fn non_object_body_maps_to_upstream() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/people/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);
    let err = fetcher
        .fetch_locator(&Locator::from("people/"), &Query::new())
        .await
        .unwrap_err();

    assert!(err.is_upstream());
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/people/1/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "name": "Luke Skywalker" }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let fetcher =
        HttpFetcher::new(&format!("{}/api", server.uri()), Duration::from_millis(100)).unwrap();
    let err = fetcher
        .fetch_locator(&Locator::from("people/1/"), &Query::new())
        .await
        .unwrap_err();

    assert!(err.is_upstream(), "expected Upstream, got {err:?}");
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn connection_failure_maps_to_upstream() {
    // Nothing listens on port 1.
    let fetcher = HttpFetcher::new("http://127.0.0.1:1/api", Duration::from_secs(2)).unwrap();
    let err = fetcher
        .fetch_locator(&Locator::from("people/1/"), &Query::new())
        .await
        .unwrap_err();

    assert!(err.is_upstream());
}

#[test]
fn invalid_base_url_is_configuration_error() {
    let err = HttpFetcher::new("not a url", Duration::from_secs(1)).unwrap_err();
    assert!(matches!(err, HolonetError::Configuration(_)));
}
