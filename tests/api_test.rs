mod common;

use std::collections::HashMap;

use axum::{
    Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};
use vkdl::{
    error::Error,
    types::AudioQuery,
    vk::{ApiClient, api::unwrap_response},
};

/// Mock of `https://api.vk.com/method/<name>`.
///
/// Answers like VK does: a token error without the right token, otherwise
/// per-method canned responses. `echo.params` returns the query it got.
async fn method(
    Path(name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    if params.get("access_token").map(String::as_str) != Some("T") {
        let body = json!({"error": {"error_code": 5, "error_msg": "User authorization failed: no access_token passed."}});
        return (StatusCode::OK, body.to_string());
    }

    let body = match name.as_str() {
        "echo.params" => json!({ "response": params }),
        "numbers.get" => json!({ "response": [1, 2, 3] }),
        "fail.get" => json!({ "error": { "error_code": 100, "error_msg": "bad" } }),
        "weird.get" => json!({ "result": "ok" }),
        "html.get" => return (StatusCode::BAD_GATEWAY, "<html>502</html>".to_string()),
        "audio.get" => {
            let owner = params.get("owner_id").cloned().unwrap_or_default();
            json!({
                "response": {
                    "count": 2,
                    "items": [
                        {"id": 1, "owner_id": owner.parse::<i64>().unwrap_or(0), "artist": "Artist", "title": "First", "duration": 125, "url": "https://cs1.vk.me/1.mp3"},
                        {"id": 2, "owner_id": owner.parse::<i64>().unwrap_or(0), "artist": "Other", "title": "Second", "duration": 61, "url": "https://cs1.vk.me/2.mp3", "genre_id": 18}
                    ]
                }
            })
        }
        _ => json!({ "error": { "error_code": 3, "error_msg": "Unknown method passed" } }),
    };
    (StatusCode::OK, body.to_string())
}

async fn start_api(token: &str) -> ApiClient {
    let (listener, base) = common::bind().await;
    let router = Router::new().route("/method/{name}", get(method));
    common::serve(listener, router);

    ApiClient::with_base_url(common::session(token, "7"), &format!("{base}/method")).unwrap()
}

#[tokio::test]
async fn test_call_returns_response_value() {
    let client = start_api("T").await;

    let value = client.call("numbers.get", &[]).await.unwrap();
    assert_eq!(value, json!([1, 2, 3]));
}

#[tokio::test]
async fn test_call_injects_token_and_version() {
    let client = start_api("T").await;

    let value = client
        .call("echo.params", &[("owner_id", "42"), ("count", "5")])
        .await
        .unwrap();

    assert_eq!(value["access_token"], "T");
    assert_eq!(value["v"], "5.29");
    assert_eq!(value["owner_id"], "42");
    assert_eq!(value["count"], "5");
}

#[tokio::test]
async fn test_call_reports_api_error() {
    let client = start_api("T").await;

    match client.call("fail.get", &[]).await {
        Err(Error::Api { code, message }) => {
            assert_eq!(code, Some(100));
            assert_eq!(message, "bad");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_call_with_invalid_token() {
    let client = start_api("expired").await;

    let err = client.call("numbers.get", &[]).await.unwrap_err();
    assert!(matches!(err, Error::Api { code: Some(5), .. }));
    assert!(err.to_string().contains("User authorization failed"));
}

#[tokio::test]
async fn test_call_unrecognized_payload() {
    let client = start_api("T").await;

    let err = client.call("weird.get", &[]).await.unwrap_err();
    assert!(matches!(err, Error::Api { code: None, .. }));

    let err = client.call("html.get", &[]).await.unwrap_err();
    assert!(matches!(err, Error::Api { code: None, .. }));
}

#[tokio::test]
async fn test_namespace_call() {
    let client = start_api("T").await;

    let ns = client.namespace("numbers");
    assert_eq!(ns.name(), "numbers");
    assert_eq!(ns.call("get", &[]).await.unwrap(), json!([1, 2, 3]));

    let err = client.namespace("fail").call("get", &[]).await.unwrap_err();
    assert!(matches!(err, Error::Api { .. }));
}

#[tokio::test]
async fn test_audio_get_defaults_to_session_user() {
    let client = start_api("T").await;

    let audio = client.audio().get(&AudioQuery::default()).await.unwrap();

    assert_eq!(audio.count, 2);
    assert_eq!(audio.items.len(), 2);
    assert_eq!(audio.items[0].owner_id, Some(7));
    assert_eq!(audio.items[0].artist, "Artist");
    assert_eq!(audio.items[0].title, "First");
    assert_eq!(audio.items[0].duration, Some(125));
    assert_eq!(audio.items[1].url, "https://cs1.vk.me/2.mp3");
    assert_eq!(audio.items[1].display_name(), "Other - Second");
}

#[tokio::test]
async fn test_audio_get_with_owner() {
    let client = start_api("T").await;

    let query = AudioQuery {
        owner_id: Some("-1001".to_string()),
        count: Some(50),
        offset: Some(0),
    };
    let audio = client.audio().get(&query).await.unwrap();
    assert_eq!(audio.items[0].owner_id, Some(-1001));
}

#[test]
fn test_unwrap_response_shapes() {
    assert_eq!(
        unwrap_response(json!({"response": [1, 2, 3]})).unwrap(),
        json!([1, 2, 3])
    );
    assert_eq!(
        unwrap_response(json!({"response": null})).unwrap(),
        Value::Null
    );

    match unwrap_response(json!({"error": {"error_msg": "bad"}})) {
        Err(Error::Api { code, message }) => {
            assert_eq!(code, None);
            assert_eq!(message, "bad");
        }
        other => panic!("expected API error, got {other:?}"),
    }

    assert!(matches!(
        unwrap_response(json!({"error": "oops"})),
        Err(Error::Api { .. })
    ));
    assert!(matches!(
        unwrap_response(json!({})),
        Err(Error::Api { .. })
    ));
    assert!(matches!(
        unwrap_response(json!([1, 2])),
        Err(Error::Api { .. })
    ));
}

#[test]
fn test_invalid_base_url() {
    let err = ApiClient::with_base_url(common::session("T", "7"), "not a url").unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
