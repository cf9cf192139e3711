use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::OllamaConfig;
use crate::error::{AdvisorError, RelayError, RelayResult, Result};
use crate::models::{GenerateRequest, GenerateResponse};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn generate(&self, req: &GenerateRequest) -> RelayResult<GenerateResponse>;
}

/// Non-streaming client for Ollama's `/api/generate`. Single attempt, no retry.
pub struct OllamaTransport {
    client: Client,
    endpoint: String,
}

impl OllamaTransport {
    pub fn new(cfg: &OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_seconds))
            .build()
            .map_err(|e| AdvisorError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/generate", cfg.base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl Transport for OllamaTransport {
    async fn generate(&self, req: &GenerateRequest) -> RelayResult<GenerateResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(req)
            .send()
            .await
            .map_err(RelayError::Unreachable)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RelayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(RelayError::Unreachable)?;
        serde_json::from_str(&body).map_err(|e| {
            RelayError::Malformed(format!("Failed to parse Ollama response: {e}. Raw: {body}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    /// Serves `router` on an ephemeral port and returns its base URL.
    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn transport(base_url: String, timeout_secs: u64) -> OllamaTransport {
        OllamaTransport::new(&OllamaConfig {
            base_url,
            request_timeout_seconds: timeout_secs,
            ..OllamaConfig::default()
        })
        .unwrap()
    }

    fn request() -> GenerateRequest {
        GenerateRequest {
            model: "llama3:latest".to_string(),
            prompt: "hello".to_string(),
            stream: false,
        }
    }

    #[tokio::test]
    async fn sends_non_streaming_generate_request() {
        let router = Router::new().route(
            "/api/generate",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["model"], "llama3:latest");
                assert_eq!(body["prompt"], "hello");
                assert_eq!(body["stream"], false);
                Json(json!({ "response": " Hello! ", "done": true }))
            }),
        );
        let base = spawn_upstream(router).await;

        let res = transport(format!("{base}/"), 5).generate(&request()).await.unwrap();
        assert_eq!(res.response, " Hello! ");
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let router = Router::new().route(
            "/api/generate",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model not loaded") }),
        );
        let base = spawn_upstream(router).await;

        match transport(base, 5).generate(&request()).await {
            Err(RelayError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "model not loaded");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn body_without_response_field_is_malformed() {
        let router = Router::new().route(
            "/api/generate",
            post(|| async { Json(json!({ "done": true })) }),
        );
        let base = spawn_upstream(router).await;

        assert!(matches!(
            transport(base, 5).generate(&request()).await,
            Err(RelayError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn slow_upstream_hits_client_timeout() {
        let router = Router::new().route(
            "/api/generate",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({ "response": "too late" }))
            }),
        );
        let base = spawn_upstream(router).await;

        assert!(matches!(
            transport(base, 1).generate(&request()).await,
            Err(RelayError::Unreachable(_))
        ));
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        // Bind then drop to get a port nobody listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        assert!(matches!(
            transport(format!("http://{addr}"), 2).generate(&request()).await,
            Err(RelayError::Unreachable(_))
        ));
    }
}
