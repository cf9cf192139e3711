use serde_json::json;

use crate::error::{AdvisorError, Result};
use crate::models::{PreferenceRequest, Usage};
use crate::validation::InputValidator;

/// The preference form: three fields and a submitting flag.
#[derive(Debug, Clone)]
pub struct PreferenceForm {
    pub budget: f64,
    pub mileage: f64,
    pub usage: Usage,
    submitting: bool,
}

impl Default for PreferenceForm {
    fn default() -> Self {
        Self {
            budget: 30000.0,
            mileage: 15.0,
            usage: Usage::Family,
            submitting: false,
        }
    }
}

impl PreferenceForm {
    /// JSON body posted to `/api/recommend`.
    pub fn request_body(&self) -> serde_json::Value {
        json!({
            "budget": self.budget,
            "mileage": self.mileage,
            "usage": self.usage.as_str(),
        })
    }

    /// Validates the fields with the same rules the server applies and
    /// marks the form as submitting.
    pub fn submit(&mut self) -> Result<PreferenceRequest> {
        if self.submitting {
            return Err(AdvisorError::Validation(
                "a search is already running".to_string(),
            ));
        }
        // budget/mileage of NaN serialize as null and are rejected there
        let body = self.request_body().to_string();
        let req = InputValidator::new().preference_request(body.as_bytes())?;
        self.submitting = true;
        Ok(req)
    }

    pub fn finish(&mut self) {
        self.submitting = false;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }
}
