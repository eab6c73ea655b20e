//! Tests for the farmer mood check-in endpoint

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{post_json, unloaded_app};

#[tokio::test]
async fn anxious_farmer_gets_reassurance() {
    let (status, body) = post_json(
        unloaded_app(),
        "/api/v1/mood",
        json!({"text": "I'm really worried the rains are late"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["emotion"], "anxious");
    assert_eq!(body["message"]["tone"], "info");
    assert_eq!(
        body["message"]["text"],
        "You're not alone. Let's look at your crop health and find a way forward."
    );
}

#[tokio::test]
async fn joy_and_anger_have_messages() {
    let (_, joy) = post_json(
        unloaded_app(),
        "/api/v1/mood",
        json!({"text": "So happy, the maize looks great"}),
    )
    .await;
    assert_eq!(joy["emotion"], "joy");
    assert_eq!(joy["message"]["tone"], "success");

    let (_, anger) = post_json(
        unloaded_app(),
        "/api/v1/mood",
        json!({"text": "Frustrated and angry about seed prices"}),
    )
    .await;
    assert_eq!(anger["emotion"], "anger");
    assert_eq!(anger["message"]["tone"], "warning");
}

#[tokio::test]
async fn other_labels_have_no_message() {
    let (status, body) = post_json(
        unloaded_app(),
        "/api/v1/mood",
        json!({"text": "Feeling tired and lonely this week"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["emotion"], "sadness");
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn blank_text_is_rejected() {
    let (status, body) = post_json(unloaded_app(), "/api/v1/mood", json!({"text": "   "})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "text");
}
