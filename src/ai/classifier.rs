//! Classifier backend capability and the OpenAI-compatible implementation

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;
use crate::{
    ai::{build_prompt, extract_content, parse_opinion},
    config::ClassifierBackendConfig,
    errors::{OracleError, OracleResult},
    network::{build_http_client, send_json},
    types::ClassifierOpinion,
};

const TEMPERATURE: f64 = 0.0;
const SEED: u64 = 42;

/// One AI backend. Implementations own their transport and deadline.
#[async_trait]
pub trait RiskClassifier: Send + Sync {
    fn model_name(&self) -> &str;

    async fn classify(&self, context_json: &str) -> OracleResult<ClassifierOpinion>;
}

/// Chat completions over any OpenAI-compatible endpoint (OpenAI, Groq).
pub struct OpenAiCompatibleClassifier {
    client: Client,
    backend: ClassifierBackendConfig,
}

impl OpenAiCompatibleClassifier {
    pub fn new(client: Client, backend: ClassifierBackendConfig) -> Self {
        Self { client, backend }
    }

    pub fn from_config(backend: &ClassifierBackendConfig, timeout_secs: u64) -> OracleResult<Self> {
        let client = build_http_client(timeout_secs).map_err(|e| OracleError::Configuration {
            message: format!("{} HTTP client: {:#}", backend.name, e),
        })?;
        Ok(Self::new(client, backend.clone()))
    }

    fn unavailable(&self, message: impl Into<String>) -> OracleError {
        OracleError::ClassifierUnavailable {
            model: self.backend.model.clone(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl RiskClassifier for OpenAiCompatibleClassifier {
    fn model_name(&self) -> &str {
        &self.backend.model
    }

    async fn classify(&self, context_json: &str) -> OracleResult<ClassifierOpinion> {
        let api_key = self
            .backend
            .api_key
            .as_deref()
            .ok_or_else(|| self.unavailable(format!("{} backend has no API key", self.backend.name)))?;

        let payload = json!({
            "model": self.backend.model,
            "temperature": TEMPERATURE,
            "seed": SEED,
            "response_format": { "type": "json_object" },
            "messages": [{ "role": "system", "content": build_prompt(context_json) }],
        });

        debug!("Dispatching classification to {} ({})", self.backend.name, self.backend.model);
        let request = self
            .client
            .post(&self.backend.endpoint)
            .bearer_auth(api_key)
            .json(&payload);

        let body = send_json(request, &self.backend.name)
            .await
            .map_err(|e| self.unavailable(format!("{:#}", e)))?;

        let content = extract_content(&self.backend.model, body)?;
        parse_opinion(&self.backend.model, &content)
    }
}
