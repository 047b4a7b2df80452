use std::time::Duration;

use verse_engine::{FailureKind, FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_USER_AGENT};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serving(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

fn fetcher_with(settings: FetchSettings) -> ReqwestFetcher {
    ReqwestFetcher::new(settings).expect("client")
}

#[tokio::test]
async fn chapter_page_is_decoded_and_sent_with_browser_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rvr60/gen/1/1/"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<p>En el principio creó Dios</p>", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/rvr60/gen/1/1/", server.uri());
    let page = fetcher_with(FetchSettings::default())
        .fetch(&url)
        .await
        .expect("fetch ok");

    assert_eq!(page.html, "<p>En el principio creó Dios</p>");
    assert_eq!(page.metadata.requested_url, url);
    assert!(!page.metadata.redirected());
    assert_eq!(page.metadata.encoding, "UTF-8");
}

#[tokio::test]
async fn latin1_page_is_transcoded() {
    let server = serving(
        ResponseTemplate::new(200).set_body_raw(b"<p>G\xe9nesis</p>".to_vec(), "text/html; charset=iso-8859-1"),
    )
    .await;

    let page = fetcher_with(FetchSettings::default())
        .fetch(&server.uri())
        .await
        .expect("fetch ok");
    assert_eq!(page.html, "<p>Génesis</p>");
    assert_eq!(page.metadata.byte_len, 14);
}

#[tokio::test]
async fn configured_user_agent_replaces_the_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "verse-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>ok</p>", "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    fetcher_with(FetchSettings {
        user_agent: "verse-test/1.0".to_string(),
        ..FetchSettings::default()
    })
    .fetch(&server.uri())
    .await
    .expect("fetch ok");
}

#[tokio::test]
async fn error_status_is_reported_and_retryable() {
    let server = serving(ResponseTemplate::new(503)).await;

    let err = fetcher_with(FetchSettings::default())
        .fetch(&server.uri())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
    assert!(err.kind.is_retryable());
}

#[tokio::test]
async fn redirect_is_followed_and_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>moved</p>", "text/html"))
        .mount(&server)
        .await;

    let page = fetcher_with(FetchSettings::default())
        .fetch(&format!("{}/old", server.uri()))
        .await
        .expect("fetch ok");
    assert!(page.metadata.redirected());
    assert!(page.metadata.final_url.ends_with("/new"));
}

#[tokio::test]
async fn redirect_loop_hits_the_limit() {
    let server = serving(ResponseTemplate::new(302).insert_header("location", "/")).await;

    let err = fetcher_with(FetchSettings {
        redirect_limit: 2,
        ..FetchSettings::default()
    })
    .fetch(&server.uri())
    .await
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::RedirectLimitExceeded);
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = serving(
        ResponseTemplate::new(200)
            .set_body_raw("<html></html>", "text/html")
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let err = fetcher_with(FetchSettings {
        request_timeout: Duration::from_millis(200),
        ..FetchSettings::default()
    })
    .fetch(&server.uri())
    .await
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn body_over_the_cap_is_rejected() {
    let server = serving(ResponseTemplate::new(200).set_body_raw("v".repeat(64), "text/html")).await;

    let err = fetcher_with(FetchSettings {
        max_bytes: 16,
        ..FetchSettings::default()
    })
    .fetch(&server.uri())
    .await
    .unwrap_err();
    assert!(matches!(err.kind, FailureKind::TooLarge { max_bytes: 16, .. }));
}

#[tokio::test]
async fn json_response_is_not_a_chapter_page() {
    let server = serving(ResponseTemplate::new(200).set_body_raw("{}", "application/json")).await;

    let err = fetcher_with(FetchSettings::default())
        .fetch(&server.uri())
        .await
        .unwrap_err();
    assert!(matches!(err.kind, FailureKind::UnsupportedContentType { .. }));
}

#[tokio::test]
async fn malformed_url_fails_without_retry() {
    let err = fetcher_with(FetchSettings::default())
        .fetch("not a url")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
    assert!(!err.kind.is_retryable());
}
