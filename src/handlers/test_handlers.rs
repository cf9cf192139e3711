use super::*;
use crate::config::OllamaConfig;
use crate::error::{AdvisorError, RelayError};
use crate::extract::LineSelection;
use crate::models::GenerateResponse;
use crate::relay::FALLBACK_REPLY;
use crate::scorer::{MockScorerClient, ScoringInvocation};
use crate::server::build_router;
use crate::transport::MockTransport;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app(scorer: MockScorerClient, transport: MockTransport) -> axum::Router {
    let recommender = RecommendationService::new(Arc::new(scorer), LineSelection::First);
    let relay = ChatRelay::new(Arc::new(transport), &OllamaConfig::default());
    build_router(AppState::new(recommender, relay))
}

/// Scorer that fails the test if it is ever run
fn untouched_scorer() -> MockScorerClient {
    let mut scorer = MockScorerClient::new();
    scorer.expect_invoke().never();
    scorer
}

fn scorer_printing(stdout: &'static str, stderr: &'static str, code: i32) -> MockScorerClient {
    let mut scorer = MockScorerClient::new();
    scorer.expect_invoke().times(1).returning(move |args| {
        Ok(ScoringInvocation {
            arguments: args.to_vec(),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code: Some(code),
        })
    });
    scorer
}

async fn post_json(app: axum::Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn recommend_returns_ranked_entries() {
    let scorer = scorer_printing(
        "Loading dataset...\n[{'name': 'Tata Nano', 'price': 400000, 'mileage': 28, 'type': 'family', 'reason': 'Cheapest', 'imageUrl': 'https://img/nano'}, {'name': 'Renault Kwid', 'price': 600000, 'mileage': 25, 'type': 'family', 'reason': 'Affordable'}]\n",
        "",
        0,
    );
    let (status, body) = post_json(
        app(scorer, MockTransport::new()),
        "/api/recommend",
        r#"{"budget": 700000, "mileage": 20, "usage": "family"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0]["name"], "Tata Nano");
    assert_eq!(recs[0]["imageUrl"], "https://img/nano");
    assert_eq!(recs[1]["name"], "Renault Kwid");
}

#[tokio::test]
async fn invalid_input_is_rejected_without_running_scorer() {
    for body in [
        r#"{"mileage": 15, "usage": "family"}"#,
        r#"{"budget": 30000, "usage": "family"}"#,
        r#"{"budget": 30000, "mileage": 15}"#,
        r#"{"budget": "lots", "mileage": 15, "usage": "family"}"#,
        r#"{"budget": 30000, "mileage": 15, "usage": ["family"]}"#,
        r#"not json"#,
    ] {
        let (status, json) =
            post_json(app(untouched_scorer(), MockTransport::new()), "/api/recommend", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert!(json["error"].is_string());
    }
}

#[tokio::test]
async fn scorer_failure_surfaces_stderr() {
    let scorer = scorer_printing("", "model file missing", 1);
    let (status, body) = post_json(
        app(scorer, MockTransport::new()),
        "/api/recommend",
        r#"{"budget": 30000, "mileage": 15, "usage": "sports"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to get recommendations from AI model");
    assert_eq!(body["details"], "model file missing");
}

#[tokio::test]
async fn unparsable_output_is_a_500() {
    let scorer = scorer_printing("nothing useful here\n", "", 0);
    let (status, body) = post_json(
        app(scorer, MockTransport::new()),
        "/api/recommend",
        r#"{"budget": 30000, "mileage": 15, "usage": "family"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "No recommendations found");
    assert!(body["details"].as_str().unwrap().contains("nothing useful here"));
}

#[tokio::test]
async fn malformed_record_line_is_a_500_with_the_raw_line() {
    let scorer = scorer_printing("Scoring...\n[{'name': 'Broken', 'price': }]\n", "", 0);
    let (status, body) = post_json(
        app(scorer, MockTransport::new()),
        "/api/recommend",
        r#"{"budget": 30000, "mileage": 15, "usage": "family"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Malformed recommendation payload");
    assert_eq!(body["details"], "[{'name': 'Broken', 'price': }]");
}

#[tokio::test]
async fn scorer_timeout_is_a_500() {
    let mut scorer = MockScorerClient::new();
    scorer
        .expect_invoke()
        .returning(|_| Err(AdvisorError::TimedOut(30)));
    let (status, body) = post_json(
        app(scorer, MockTransport::new()),
        "/api/recommend",
        r#"{"budget": 30000, "mileage": 15, "usage": "family"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Recommendation model timed out");
}

#[tokio::test]
async fn chat_returns_trimmed_reply() {
    let mut transport = MockTransport::new();
    transport.expect_generate().times(1).returning(|_| {
        Ok(GenerateResponse {
            response: " Hello! ".to_string(),
        })
    });
    let (status, body) = post_json(
        app(untouched_scorer(), transport),
        "/api/chat",
        r#"{"message": "hi"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "response": "Hello!" }));
}

#[tokio::test]
async fn chat_failure_is_a_200_with_fallback() {
    let mut transport = MockTransport::new();
    transport.expect_generate().returning(|_| {
        Err(RelayError::Status {
            status: 500,
            body: "oom".to_string(),
        })
    });
    let (status, body) = post_json(
        app(untouched_scorer(), transport),
        "/api/chat",
        r#"{"message": "hi"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], FALLBACK_REPLY);
}

#[tokio::test]
async fn chat_without_message_is_a_400() {
    let mut transport = MockTransport::new();
    transport.expect_generate().never();
    let (status, body) = post_json(app(untouched_scorer(), transport), "/api/chat", "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message is required");
}

#[tokio::test]
async fn index_and_health_are_served() {
    let router = app(untouched_scorer(), MockTransport::new());
    let page = router
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    let html = page.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&html).contains("/api/recommend"));

    let health = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);
}
