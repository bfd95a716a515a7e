//! End-to-end tests for the remote rule over real HTTP
//!
//! Each test starts a local mock endpoint and runs the rule through the
//! reqwest transport, the way a form host would.

use mockito::Matcher;
use remote_validation::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn transport() -> ReqwestTransport {
    ReqwestTransport::new(&TransportConfig::default()).unwrap()
}

#[tokio::test]
async fn test_matching_body_is_valid() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/check")
        .match_query(Matcher::UrlEncoded("v".into(), "anything".into()))
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    let options = RuleOptions::new(format!("{}/check", server.url()), "ok");
    let rule = RemoteValidationRule::new(options, transport()).unwrap();

    assert!(rule.check(&json!("anything")).await.unwrap());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_static_params_travel_with_value() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/username")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("scope".into(), "sign up".into()),
            Matcher::UrlEncoded("lang".into(), "en".into()),
            Matcher::UrlEncoded("v".into(), "alice smith".into()),
        ]))
        .with_body("free")
        .create_async()
        .await;

    let options = RuleOptions::new(format!("{}/username", server.url()), "free")
        .with_params("scope=sign+up&lang=en&v=shadowed");
    let rule = RemoteValidationRule::new(options, transport()).unwrap();

    assert!(rule.check(&json!("alice smith")).await.unwrap());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_existing_url_query_is_kept() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/check")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("tenant".into(), "7".into()),
            Matcher::UrlEncoded("v".into(), "x".into()),
        ]))
        .with_body("ok")
        .create_async()
        .await;

    let options = RuleOptions::new(format!("{}/check?tenant=7", server.url()), "ok");
    let rule = RemoteValidationRule::new(options, transport()).unwrap();

    assert!(rule.check(&json!("x")).await.unwrap());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_json_number_matches_string_expectation() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/count")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body("42")
        .create_async()
        .await;

    let options = RuleOptions::new(format!("{}/count", server.url()), "42");
    let rule = RemoteValidationRule::new(options, transport()).unwrap();

    assert!(rule.check(&json!(1)).await.unwrap());
}

#[tokio::test]
async fn test_decimal_text_does_not_match_integer_expectation() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/count")
        .match_query(Matcher::Any)
        .with_body("\"42.0\"")
        .create_async()
        .await;

    let options = RuleOptions::new(format!("{}/count", server.url()), "42");
    let rule = RemoteValidationRule::new(options, transport()).unwrap();

    assert!(!rule.check(&json!("x")).await.unwrap());
}

#[tokio::test]
async fn test_error_status_is_an_error_not_invalid() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/check")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;

    let options = RuleOptions::new(format!("{}/check", server.url()), "maintenance");
    let rule = RemoteValidationRule::new(options, transport()).unwrap();

    let err = rule.check(&json!("x")).await.unwrap_err();
    assert!(err.is_transport());
    assert!(matches!(
        err,
        RuleError::Transport(TransportError::Status { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_an_error() {
    // Nothing listens on the discard port
    let options = RuleOptions::new("http://127.0.0.1:9/check", "ok");
    let rule = RemoteValidationRule::new(options, transport()).unwrap();

    let err = rule.check(&json!("x")).await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/slow")
        .match_query(Matcher::Any)
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_millis(500));
            std::io::Write::write_all(w, b"ok")
        })
        .create_async()
        .await;

    let config = TransportConfig {
        timeout_ms: Some(50),
        ..TransportConfig::default()
    };
    let options = RuleOptions::new(format!("{}/slow", server.url()), "ok");
    let rule = RemoteValidationRule::new(options, ReqwestTransport::new(&config).unwrap()).unwrap();

    let err = rule.check(&json!("x")).await.unwrap_err();
    assert!(matches!(err, RuleError::Transport(TransportError::Timeout(_))));
}

#[tokio::test]
async fn test_every_check_issues_its_own_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/check")
        .match_query(Matcher::Regex("v=".into()))
        .with_body("ok")
        .expect(3)
        .create_async()
        .await;

    let shared = Arc::new(transport());
    let options = RuleOptions::new(format!("{}/check", server.url()), "ok");
    let rule = Arc::new(RemoteValidationRule::new(options, Arc::clone(&shared)).unwrap());

    let handles: Vec<_> = ["a", "a", "b"]
        .into_iter()
        .map(|value| {
            let rule = Arc::clone(&rule);
            tokio::spawn(async move { rule.check(&json!(value)).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().unwrap());
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_sequenced_rule_settles_single_call() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/check")
        .match_query(Matcher::Any)
        .with_body("ok")
        .create_async()
        .await;

    let options = RuleOptions::new(format!("{}/check", server.url()), "ok");
    let rule = SequencedRule::new(RemoteValidationRule::new(options, transport()).unwrap());

    assert_eq!(
        rule.check_latest(&json!("x")).await.unwrap(),
        CheckOutcome::Settled(true)
    );
    assert_eq!(rule.index_name(), "remote");
}
