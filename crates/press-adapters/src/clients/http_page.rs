//! Cliente HTTP del sink de páginas.
//!
//! Habla el wire format del workspace remoto: `POST /search` para localizar
//! una página por título y `POST /pages` para crearla. El token viaja como
//! bearer; se lee de la variable de entorno que nombra `credentials_ref`,
//! nunca de la configuración misma.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

use press_core::{PipelineError, SinkConfig};

use super::{ClientError, PageApi};

pub struct HttpPageClient {
    http: Client,
    endpoint: String,
    token: String,
}

impl HttpPageClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self { http: Client::new(),
               endpoint: endpoint.into(),
               token: token.into() }
    }

    /// Construye el cliente desde la entrada de sink configurada, resolviendo
    /// la credencial vía la variable de entorno que nombra `credentials_ref`.
    pub fn from_sink_config(sink: &SinkConfig) -> Result<Self, PipelineError> {
        let token = std::env::var(&sink.credentials_ref).map_err(|_| {
                        PipelineError::Configuration(format!("environment variable {} is not set",
                                                             sink.credentials_ref))
                    })?;
        Ok(Self::new(sink.endpoint.clone(), token))
    }

    async fn post(&self, path: &str, payload: &Value) -> Result<Value, ClientError> {
        let url = format!("{}{path}", self.endpoint);
        debug!("POST {url}");
        let response = self.http
                           .post(&url)
                           .bearer_auth(&self.token)
                           .json(payload)
                           .send()
                           .await
                           .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            return Err(ClientError::Rejected { status: status.as_u16(),
                                               body });
        }
        Ok(body)
    }
}

#[async_trait]
impl PageApi for HttpPageClient {
    async fn find_page(&self, title: &str) -> Result<Option<String>, ClientError> {
        let body = self.post("/search", &json!({ "query": title })).await?;
        let hit = body.get("results")
                      .and_then(Value::as_array)
                      .into_iter()
                      .flatten()
                      .find(|page| {
                          page.pointer("/properties/title").and_then(Value::as_str) == Some(title)
                      })
                      .and_then(|page| page.get("url").and_then(Value::as_str))
                      .map(str::to_string);
        Ok(hit)
    }

    async fn create_page(&self, title: &str, body: &str) -> Result<String, ClientError> {
        let payload = json!({
            "properties": { "title": title },
            "children": [
                { "type": "paragraph", "text": body }
            ]
        });
        let created = self.post("/pages", &payload).await?;
        created.get("url")
               .and_then(Value::as_str)
               .map(str::to_string)
               .ok_or_else(|| ClientError::Rejected { status: 200,
                                                      body: json!({"error": "response without a page url"}) })
    }
}
