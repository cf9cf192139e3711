use std::sync::Arc;

use crate::error::{AdvisorError, ExtractionError, Result};
use crate::extract::{LineSelection, extract_recommendations};
use crate::models::{PreferenceRequest, RecommendationEntry};
use crate::scorer::ScorerClient;

/// Runs the scorer for a request and turns its output into entries.
pub struct RecommendationService {
    scorer: Arc<dyn ScorerClient>,
    selection: LineSelection,
}

impl RecommendationService {
    pub fn new(scorer: Arc<dyn ScorerClient>, selection: LineSelection) -> Self {
        Self { scorer, selection }
    }

    pub async fn recommend(&self, req: &PreferenceRequest) -> Result<Vec<RecommendationEntry>> {
        let args = req.scorer_args().to_vec();
        tracing::info!(
            budget = %args[0],
            mileage = %args[1],
            usage = %args[2],
            "Requesting recommendations"
        );

        let run = self.scorer.invoke(&args).await?;

        if !run.succeeded() {
            tracing::error!(
                exit_code = ?run.exit_code,
                stderr = %run.stderr,
                "Scorer exited unsuccessfully"
            );
            return Err(AdvisorError::ScoringProcess {
                exit_code: run.exit_code,
                stderr: run.stderr,
            });
        }

        let entries = extract_recommendations(&run.stdout, self.selection).map_err(|e| {
            match &e {
                ExtractionError::MalformedPayload { raw, normalized, .. } => tracing::error!(
                    error = %e,
                    raw = %raw,
                    normalized = %normalized,
                    "Recommendation line is not valid JSON after normalization"
                ),
                ExtractionError::NoRecommendations { raw_output } => tracing::error!(
                    error = %e,
                    raw_output = %raw_output,
                    "Could not extract recommendations"
                ),
            }
            AdvisorError::from(e)
        })?;

        tracing::info!(count = entries.len(), "Recommendations extracted");
        Ok(entries)
    }
}
