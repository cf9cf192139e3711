use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::RelayResult;
use crate::models::GenerateRequest;
use crate::transport::Transport;

/// Keeps the chat model resident in Ollama by pinging it periodically.
pub struct KeepAlive {
    tx: Arc<dyn Transport>,
    model: String,
    interval: Duration,
}

impl KeepAlive {
    pub fn new(tx: Arc<dyn Transport>, model: String, interval: Duration) -> Self {
        Self {
            tx,
            model,
            interval,
        }
    }

    pub async fn ping(&self) -> RelayResult<()> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: "ping".to_string(),
            stream: false,
        };
        self.tx.generate(&request).await.map(|_| ())
    }

    /// Pings immediately, then once per interval, until the task is aborted.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match self.ping().await {
                    Ok(()) => tracing::debug!(model = %self.model, "Keep-alive ping sent"),
                    Err(e) => tracing::warn!(model = %self.model, error = %e, "Keep-alive ping failed"),
                }
            }
        })
    }
}
