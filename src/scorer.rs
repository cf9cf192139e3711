use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::sync::Semaphore;

use crate::config::ScorerConfig;
use crate::error::{AdvisorError, Result};

#[cfg(test)]
use mockall::automock;

/// Everything captured from one scorer run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringInvocation {
    pub arguments: Vec<String>,
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl ScoringInvocation {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ScorerClient: Send + Sync {
    /// Runs the scorer once with `args` as trailing positional arguments.
    async fn invoke(&self, args: &[String]) -> Result<ScoringInvocation>;
}

/// Runs the scorer as a child process, one per call.
pub struct ProcessScorer {
    program: String,
    prefix_args: Vec<String>,
    timeout: Duration,
    permits: Arc<Semaphore>,
}

impl ProcessScorer {
    pub fn new(cfg: &ScorerConfig) -> Self {
        Self {
            program: cfg.program.clone(),
            prefix_args: cfg.args.clone(),
            timeout: Duration::from_secs(cfg.timeout_seconds),
            permits: Arc::new(Semaphore::new(cfg.max_concurrent.max(1))),
        }
    }
}

#[async_trait]
impl ScorerClient for ProcessScorer {
    async fn invoke(&self, args: &[String]) -> Result<ScoringInvocation> {
        // Queue behind other requests rather than spawning without bound
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| AdvisorError::Invocation {
                program: self.program.clone(),
                source: std::io::Error::other(e),
            })?;

        let start = Instant::now();
        let child = Command::new(&self.program)
            .args(&self.prefix_args)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the request future (client went away, timeout) kills the child
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| {
                tracing::error!(program = %self.program, error = %source, "Failed to spawn scorer");
                AdvisorError::Invocation {
                    program: self.program.clone(),
                    source,
                }
            })?;

        tracing::debug!(program = %self.program, ?args, pid = ?child.id(), "Scorer started");

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                tracing::error!(program = %self.program, error = %source, "Failed to collect scorer output");
                return Err(AdvisorError::Invocation {
                    program: self.program.clone(),
                    source,
                });
            }
            Err(_) => {
                tracing::warn!(
                    program = %self.program,
                    timeout_secs = self.timeout.as_secs(),
                    "Scorer timed out, killing child"
                );
                return Err(AdvisorError::TimedOut(self.timeout.as_secs()));
            }
        };

        let invocation = ScoringInvocation {
            arguments: args.to_vec(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        };

        tracing::info!(
            exit_code = ?invocation.exit_code,
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Scorer finished"
        );

        Ok(invocation)
    }
}
