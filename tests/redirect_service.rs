//! End-to-end tests for the redirect service.

use std::time::Duration;

use reqwest::StatusCode;

use redirector::config::{parse_config, RedirectConfig, RedirectorConfig};

mod common;

const RULES: &str = r#"
[[redirects]]
domainPattern = "old.example.com"
target = "https://new.example.com/"
statusCode = 308

  [[redirects.rules]]
  pattern = "^/blog/(.*)$"
  replacement = "/articles/$1"
  statusCode = 302

  [[redirects.rules]]
  pattern = "^/docs/(.*)$"
  replacement = "https://docs.example.com/$1"

[[redirects]]
domainPattern = "(\\w+)\\.legacy\\.com"
target = "https://$1.example.com"

[[redirects]]
domainPattern = "((("
target = "https://never.example.com"
"#;

fn location(response: &reqwest::Response) -> &str {
    response.headers()["location"].to_str().unwrap()
}

#[tokio::test]
async fn test_redirect_tiers_over_http() {
    let redirector = common::start_redirector(parse_config(RULES).unwrap()).await;
    let client = common::client();
    let url = |path: &str| format!("http://{}{}", redirector.addr, path);

    let res = client
        .get(url("/blog/hello"))
        .header("Host", "old.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "https://new.example.com/articles/hello");

    let res = client
        .get(url("/docs/intro"))
        .header("Host", "old.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&res), "https://docs.example.com/intro");

    let res = client
        .get(url("/pricing"))
        .header("Host", "Old.Example.com:8443")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(location(&res), "https://new.example.com/");

    let res = client
        .get(url("/cart"))
        .header("Host", "shop.legacy.com")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&res), "https://shop.example.com/cart");

    redirector.shutdown.trigger();
}

#[tokio::test]
async fn test_unmatched_requests_reach_upstream_unchanged() {
    let upstream = common::start_echo_upstream().await;

    let mut config = parse_config(RULES).unwrap();
    config.upstream.address = Some(upstream.to_string());
    let redirector = common::start_redirector(config).await;

    let res = common::client()
        .get(format!("http://{}/blog/hello?page=2", redirector.addr))
        .header("Host", "unrelated.example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "GET /blog/hello?page=2 HTTP/1.1");

    redirector.shutdown.trigger();
}

#[tokio::test]
async fn test_unmatched_without_upstream_is_not_found() {
    let redirector = common::start_redirector(parse_config(RULES).unwrap()).await;

    let res = common::client()
        .get(format!("http://{}/", redirector.addr))
        .header("Host", "unrelated.example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    redirector.shutdown.trigger();
}

#[tokio::test]
async fn test_config_update_replaces_rules() {
    let redirector = common::start_redirector(RedirectorConfig::default()).await;
    let client = common::client();
    let url = format!("http://{}/", redirector.addr);

    let res = client
        .get(&url)
        .header("Host", "moved.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let mut config = RedirectorConfig::default();
    config.redirects.push(RedirectConfig {
        domain_pattern: Some("moved.example.com".into()),
        target: Some("https://home.example.com".into()),
        status_code: Some(307),
        ..RedirectConfig::default()
    });
    redirector.updates.send(config).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let res = client
        .get(&url)
        .header("Host", "moved.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), "https://home.example.com");

    redirector.shutdown.trigger();
}

#[tokio::test]
async fn test_graceful_shutdown_stops_server() {
    let redirector = common::start_redirector(RedirectorConfig::default()).await;

    redirector.shutdown.trigger();

    let result = tokio::time::timeout(Duration::from_secs(5), redirector.handle)
        .await
        .expect("server should stop after shutdown")
        .unwrap();
    assert!(result.is_ok());
}
