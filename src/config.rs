use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::extract::LineSelection;

const DEFAULT_CHAT_PROMPT: &str = "You are a helpful car recommendation assistant. A user asked: \"{message}\". Provide a helpful, friendly response about cars and recommend they use the car recommendation feature if relevant. Keep your response concise and helpful.";

/// Main configuration structure for car-advisor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub scorer: ScorerConfig,
    pub ollama: OllamaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// host:port the HTTP server binds to
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Executable for the external recommendation model
    pub program: String,
    /// Arguments placed before budget/mileage/usage (e.g. the script path)
    pub args: Vec<String>,
    pub timeout_seconds: u64,
    /// Upper bound on scorer processes running at the same time
    pub max_concurrent: usize,
    pub line_selection: LineSelection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    /// Prompt sent upstream; `{message}` is replaced with the user's text
    pub prompt_template: String,
    pub request_timeout_seconds: u64,
    /// Ping interval that keeps the model loaded. `None` or 0 disables it.
    pub keepalive_interval_minutes: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            program: "python3".to_string(),
            args: vec!["scripts/recommendation_model.py".to_string()],
            timeout_seconds: 30,
            max_concurrent: 4,
            line_selection: LineSelection::First,
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3:latest".to_string(),
            prompt_template: DEFAULT_CHAT_PROMPT.to_string(),
            request_timeout_seconds: 120,
            keepalive_interval_minutes: None,
        }
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides
    /// ALWAYS returns a valid config - never fails
    pub fn load() -> Self {
        let env_paths = ["../.env", ".env"];

        let mut env_loaded = false;
        for path in &env_paths {
            if dotenvy::from_path(path).is_ok() {
                tracing::info!("Loaded .env from: {}", path);
                env_loaded = true;
                break;
            }
        }

        if !env_loaded {
            tracing::debug!("No .env file found - continuing with env vars only");
        }

        let config_path =
            env::var("ADVISOR_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            match fs::read_to_string(&config_path) {
                Ok(contents) => match Self::from_yaml(&contents) {
                    Ok(config) => {
                        tracing::info!("Loaded configuration from {}", config_path);
                        config
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to parse config file {}: {} - using defaults",
                            config_path,
                            e
                        );
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::error!(
                        "Failed to read config file {}: {} - using defaults",
                        config_path,
                        e
                    );
                    Self::default()
                }
            }
        } else {
            tracing::warn!("Config file not found at {} - using defaults", config_path);
            Self::default()
        };

        config.apply_overrides(|key| env::var(key).ok());

        // Validate configuration - log warnings but don't fail
        if let Err(e) = config.validate() {
            tracing::warn!("Config validation warnings: {} - continuing anyway", e);
        }

        config
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    /// Apply overrides from `lookup` (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(bind) = lookup("ADVISOR_HTTP_BIND") {
            self.server.bind = bind;
        }

        // Scorer overrides
        if let Some(program) = lookup("ADVISOR_SCORER_PROGRAM") {
            self.scorer.program = program;
        }
        if let Some(args) = lookup("ADVISOR_SCORER_ARGS") {
            self.scorer.args = args.split_whitespace().map(str::to_string).collect();
        }
        if let Some(timeout) = lookup("ADVISOR_SCORER_TIMEOUT_SECONDS") {
            if let Ok(secs) = timeout.parse() {
                self.scorer.timeout_seconds = secs;
            }
        }
        if let Some(max) = lookup("ADVISOR_SCORER_MAX_CONCURRENT") {
            if let Ok(max) = max.parse() {
                self.scorer.max_concurrent = max;
            }
        }
        if let Some(selection) = lookup("ADVISOR_LINE_SELECTION") {
            match LineSelection::parse(&selection) {
                Some(s) => self.scorer.line_selection = s,
                None => tracing::warn!(
                    "Unknown ADVISOR_LINE_SELECTION '{}', keeping {:?}",
                    selection,
                    self.scorer.line_selection
                ),
            }
        }

        // Ollama overrides
        if let Some(url) = lookup("OLLAMA_BASE_URL") {
            self.ollama.base_url = url;
        }
        if let Some(model) = lookup("OLLAMA_MODEL") {
            self.ollama.model = model;
        }
        if let Some(timeout) = lookup("OLLAMA_TIMEOUT_SECONDS") {
            if let Ok(secs) = timeout.parse() {
                self.ollama.request_timeout_seconds = secs;
            }
        }
        if let Some(minutes) = lookup("OLLAMA_KEEPALIVE_MINUTES") {
            if let Ok(minutes) = minutes.parse() {
                self.ollama.keepalive_interval_minutes = Some(minutes);
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.server.bind.parse::<SocketAddr>().is_err() {
            return Err(format!("server.bind '{}' is not host:port", self.server.bind).into());
        }

        if self.scorer.program.trim().is_empty() {
            return Err("scorer.program cannot be empty".into());
        }
        if self.scorer.timeout_seconds == 0 {
            return Err("scorer.timeout_seconds cannot be 0".into());
        }
        if self.scorer.max_concurrent == 0 {
            return Err("scorer.max_concurrent cannot be 0".into());
        }

        if !self.ollama.base_url.starts_with("http://")
            && !self.ollama.base_url.starts_with("https://")
        {
            return Err("ollama.base_url must start with http:// or https://".into());
        }
        if !self.ollama.prompt_template.contains("{message}") {
            return Err("ollama.prompt_template must contain {message}".into());
        }

        Ok(())
    }

    /// Keep-alive interval, if enabled
    pub fn keepalive_interval(&self) -> Option<Duration> {
        match self.ollama.keepalive_interval_minutes {
            Some(0) | None => None,
            Some(minutes) => Some(Duration::from_secs(minutes * 60)),
        }
    }
}
