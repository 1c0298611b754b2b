use std::time::Duration;

use rs_fragments::{Error, FetchProfile, Fetcher};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(profile: &FetchProfile) -> Fetcher {
    match Fetcher::new(profile, Duration::from_secs(5)) {
        Ok(fetcher) => fetcher,
        Err(err) => panic!("expected a fetcher, got {err:?}"),
    }
}

#[tokio::test]
async fn fetch_sends_profile_headers() {
    let server = MockServer::start().await;
    let profile = FetchProfile {
        session_cookie: Some("bid=abc".to_string()),
        ..FetchProfile::default()
    };

    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header("user-agent", profile.user_agent.as_str()))
        .and(header("sec-fetch-mode", "navigate"))
        .and(header("cookie", "bid=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>ok</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/page", server.uri());
    match fetcher(&profile).fetch(&url).await {
        Ok(page) => {
            assert_eq!(page.url, url);
            assert_eq!(page.html, "<p>ok</p>");
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[tokio::test]
async fn fetch_without_cookie_sends_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("cookie", "bid=abc"))
        .respond_with(ResponseTemplate::new(418))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("fine"))
        .mount(&server)
        .await;

    let result = fetcher(&FetchProfile::default()).fetch(&server.uri()).await;
    assert!(matches!(result, Ok(ref page) if page.html == "fine"), "{result:?}");
}

#[tokio::test]
async fn fetch_maps_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    match fetcher(&FetchProfile::default()).fetch(&server.uri()).await {
        Err(Error::Upstream { status, status_text }) => {
            assert_eq!(status, 404);
            assert_eq!(status_text, "Not Found");
        }
        other => panic!("expected Upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_decodes_declared_charset() {
    let server = MockServer::start().await;
    let (body, _, _) = encoding_rs::GBK.encode("<ul id=\"comments\"><li>你好</li></ul>");
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.into_owned(), "text/html; charset=gbk"))
        .mount(&server)
        .await;

    match fetcher(&FetchProfile::default()).fetch(&server.uri()).await {
        Ok(page) => assert!(page.html.contains("你好"), "{}", page.html),
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[tokio::test]
async fn fetch_refused_connection_is_network_error() {
    let result = fetcher(&FetchProfile::default())
        .fetch("http://127.0.0.1:1/")
        .await;

    match result {
        Err(err @ Error::Network(_)) => assert!(!err.is_client_error()),
        other => panic!("expected Network error, got {other:?}"),
    }
}

#[test]
fn invalid_header_is_config_error() {
    let mut profile = FetchProfile::default();
    profile.headers.insert("bad header".to_string(), "x".to_string());

    assert!(matches!(
        Fetcher::new(&profile, Duration::from_secs(1)),
        Err(Error::Config(_))
    ));
}

#[test]
fn profile_debug_redacts_cookie() {
    let profile = FetchProfile {
        session_cookie: Some("secret-value".to_string()),
        ..FetchProfile::default()
    };
    let debug = format!("{profile:?}");

    assert!(!debug.contains("secret-value"));
    assert!(debug.contains("<redacted>"));
}
