use std::time::{Duration, Instant};

use netclient::{CancellationToken, Client, ClientConfig, RetryConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_retry_config() -> ClientConfig {
    ClientConfig {
        retry: RetryConfig {
            max_retries: 3,
            base_delay: Duration::from_millis(1),
            factor: 2.0,
            max_delay: Duration::from_millis(20),
            jitter: 0.0,
        },
        requests_per_second_per_host: None,
        ..Default::default()
    }
}

#[tokio::test]
async fn get_succeeds_after_transient_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let client = Client::new(fast_retry_config()).unwrap();
    let token = CancellationToken::new();
    let body = client
        .get_text(&format!("{}/flaky", server.uri()), &token)
        .await
        .unwrap();
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn get_maps_404_to_not_found_without_retrying() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(fast_retry_config()).unwrap();
    let token = CancellationToken::new();
    let err = client
        .get_text(&format!("{}/missing", server.uri()), &token)
        .await
        .unwrap_err();
    assert!(matches!(err, netclient::NetError::NotFound(_)));
}

#[tokio::test]
async fn get_exhausts_retries_on_persistent_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = Client::new(fast_retry_config()).unwrap();
    let token = CancellationToken::new();
    let err = client
        .get_text(&format!("{}/down", server.uri()), &token)
        .await
        .unwrap_err();
    assert!(matches!(err, netclient::NetError::Http { status: 500, .. }));
}

#[tokio::test]
async fn honors_retry_after_header_on_429() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/throttled"))
        .respond_with(
            ResponseTemplate::new(429).insert_header("Retry-After", "1"),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/throttled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    // base_delay is far smaller than the server's Retry-After: a client
    // that ignored the header would come back in well under a second.
    let client = Client::new(fast_retry_config()).unwrap();
    let token = CancellationToken::new();
    let started = Instant::now();
    let body = client
        .get_text(&format!("{}/throttled", server.uri()), &token)
        .await
        .unwrap();

    assert_eq!(body, "ok");
    assert!(started.elapsed() >= Duration::from_millis(900));
}
