use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Primary usage category for a recommendation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Usage {
    Family,
    Sports,
}

impl Usage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Usage::Family => "family",
            Usage::Sports => "sports",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "family" => Some(Usage::Family),
            "sports" => Some(Usage::Sports),
            _ => None,
        }
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated user preferences. Only `InputValidator` builds these.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceRequest {
    pub budget: f64,
    pub min_efficiency: f64,
    pub usage: Usage,
}

impl PreferenceRequest {
    /// Positional arguments handed to the scoring program, in order.
    pub fn scorer_args(&self) -> [String; 3] {
        [
            format_number(self.budget),
            format_number(self.min_efficiency),
            self.usage.as_str().to_string(),
        ]
    }
}

/// Renders integral values without a trailing `.0`.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// A single ranked match as printed by the scorer.
///
/// Re-serializes to the scorer's own JSON: integers stay integers, and an
/// optional key the scorer set to `None` comes back as `null` rather than
/// being dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub name: String,
    pub price: serde_json::Number,
    /// Fuel efficiency (kmpl)
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub mileage: Option<Option<serde_json::Number>>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub usage: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub reason: Option<Option<String>>,
    #[serde(
        rename = "imageUrl",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<Option<String>>,
    #[serde(
        rename = "brandLogoUrl",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub brand_logo_url: Option<Option<String>>,
    #[serde(
        rename = "infoUrl",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub info_url: Option<Option<String>>,
    /// Any other scorer keys, passed through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Outer `Some` = key was present, inner `None` = it was `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl RecommendationEntry {
    pub fn price(&self) -> Option<f64> {
        self.price.as_f64()
    }

    pub fn mileage(&self) -> Option<f64> {
        self.mileage.clone().flatten().and_then(|n| n.as_f64())
    }

    pub fn usage(&self) -> Option<&str> {
        self.usage.as_ref().and_then(|u| u.as_deref())
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_ref().and_then(|r| r.as_deref())
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_ref().and_then(|u| u.as_deref())
    }

    pub fn brand_logo_url(&self) -> Option<&str> {
        self.brand_logo_url.as_ref().and_then(|u| u.as_deref())
    }

    pub fn info_url(&self) -> Option<&str> {
        self.info_url.as_ref().and_then(|u| u.as_deref())
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<RecommendationEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

// Ollama generate request format
#[derive(Debug, Serialize, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

// Ollama generate response format
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}
