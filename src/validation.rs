use serde_json::Value;

use crate::error::{AdvisorError, Result};
use crate::models::{PreferenceRequest, Usage};

/// Checks raw request bodies before anything external is touched.
#[derive(Debug, Default, Clone)]
pub struct InputValidator;

impl InputValidator {
    pub fn new() -> Self {
        Self
    }

    /// Parses a `/api/recommend` body into a `PreferenceRequest`.
    pub fn preference_request(&self, body: &[u8]) -> Result<PreferenceRequest> {
        let value = parse_object(body)?;

        let budget = positive_number(&value, "budget")?;
        let min_efficiency = positive_number(&value, "mileage")?;
        let usage = match value.get("usage") {
            Some(Value::String(raw)) => Usage::parse(raw).ok_or_else(|| {
                AdvisorError::Validation("usage must be one of: family, sports".to_string())
            })?,
            Some(_) => {
                return Err(AdvisorError::Validation(
                    "usage must be a string".to_string(),
                ));
            }
            None => return Err(AdvisorError::Validation("usage is required".to_string())),
        };

        Ok(PreferenceRequest {
            budget,
            min_efficiency,
            usage,
        })
    }

    /// Extracts the message from a `/api/chat` body.
    pub fn chat_message(&self, body: &[u8]) -> Result<String> {
        let value = parse_object(body)?;
        match value.get("message") {
            Some(Value::String(msg)) if !msg.trim().is_empty() => Ok(msg.clone()),
            Some(Value::String(_)) | None | Some(Value::Null) => {
                Err(AdvisorError::Validation("Message is required".to_string()))
            }
            Some(_) => Err(AdvisorError::Validation(
                "message must be a string".to_string(),
            )),
        }
    }
}

fn parse_object(body: &[u8]) -> Result<serde_json::Map<String, Value>> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AdvisorError::Validation(
            "request body must be a JSON object".to_string(),
        )),
        Err(e) => Err(AdvisorError::Validation(format!(
            "request body is not valid JSON: {e}"
        ))),
    }
}

fn positive_number(map: &serde_json::Map<String, Value>, field: &str) -> Result<f64> {
    match map.get(field) {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) if v.is_finite() && v > 0.0 => Ok(v),
            _ => Err(AdvisorError::Validation(format!(
                "{field} must be a positive number"
            ))),
        },
        Some(_) => Err(AdvisorError::Validation(format!(
            "{field} must be a number"
        ))),
        None => Err(AdvisorError::Validation(format!("{field} is required"))),
    }
}
