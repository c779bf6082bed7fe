//! Cliente HTTP del servicio de generación de texto.
//!
//! Wire format mínimo: `POST {endpoint}` con `{"model", "prompt"}` y
//! respuesta `{"text": "..."}`. La clave de API se lee de la variable de
//! entorno `PRESS_GENERATION_API_KEY`.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

use press_core::{GenerationConfig, PipelineError};

use super::{ClientError, GenerationApi};

pub const API_KEY_VAR: &str = "PRESS_GENERATION_API_KEY";

pub struct HttpGenerationClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl HttpGenerationClient {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self { http: Client::new(),
               endpoint: endpoint.into(),
               model: model.into(),
               api_key: api_key.into() }
    }

    pub fn from_config(config: &GenerationConfig) -> Result<Self, PipelineError> {
        if config.endpoint.is_empty() {
            return Err(PipelineError::Configuration("generation endpoint is not configured".into()));
        }
        let api_key = std::env::var(API_KEY_VAR)
            .map_err(|_| PipelineError::Configuration(format!("environment variable {API_KEY_VAR} is not set")))?;
        Ok(Self::new(config.endpoint.clone(), config.model.clone(), api_key))
    }
}

#[async_trait]
impl GenerationApi for HttpGenerationClient {
    async fn generate(&self, prompt: &str) -> Result<String, ClientError> {
        debug!("POST {} (model {})", self.endpoint, self.model);
        let response = self.http
                           .post(&self.endpoint)
                           .bearer_auth(&self.api_key)
                           .json(&json!({ "model": self.model, "prompt": prompt }))
                           .send()
                           .await
                           .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            return Err(ClientError::Rejected { status: status.as_u16(),
                                               body });
        }
        body.get("text")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ClientError::Rejected { status: status.as_u16(),
                                                   body: json!({"error": "response without a text field"}) })
    }
}
