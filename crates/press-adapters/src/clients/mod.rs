//! Puertos hacia los servicios colaboradores y su envelope de error.
//!
//! Los adapters de step trabajan contra estos traits, nunca contra un vendor
//! concreto: el wire format queda en la implementación del cliente (HTTP, en
//! memoria) y el step sólo ve éxito/fallo clasificado.

mod http_generation;
mod http_page;
mod memory;

pub use http_generation::HttpGenerationClient;
pub use http_page::HttpPageClient;
pub use memory::{CannedGenerationApi, InMemoryMarketplaceApi, InMemoryPageApi, InMemoryStorageApi};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use press_core::{StepError, StepErrorKind};

/// Fallo de una llamada a un servicio colaborador.
///
/// `Transport` es red/conexión (el servicio nunca respondió); `Rejected` es
/// una respuesta del servicio declinando la petición, con su payload de
/// error adjunto para diagnóstico.
#[derive(Debug, Error, Clone)]
pub enum ClientError {
    #[error("transport: {0}")]
    Transport(String),
    #[error("remote rejected the request (HTTP {status})")]
    Rejected { status: u16, body: Value },
}

impl ClientError {
    /// Rechazo por recurso ya existente, cuando el servicio lo hace
    /// detectable (HTTP 409 o código `already_exists` en el cuerpo).
    pub fn is_already_exists(&self) -> bool {
        match self {
            ClientError::Transport(_) => false,
            ClientError::Rejected { status, body } => {
                *status == 409 || body.get("code").and_then(Value::as_str) == Some("already_exists")
            }
        }
    }
}

impl From<ClientError> for StepError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport(msg) => StepError::new(StepErrorKind::Transport, msg),
            ClientError::Rejected { status, body } => {
                StepError::rejection(format!("remote rejected the request (HTTP {status})"), body)
            }
        }
    }
}

/// Referencia a un producto del marketplace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRef {
    pub id: String,
    pub permalink: String,
}

/// Metadatos de creación de un producto.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price_cents: u32,
    pub permalink: String,
}

/// API de creación de páginas (workspace remoto).
#[async_trait]
pub trait PageApi: Send + Sync {
    /// Busca una página por título exacto; `None` si no existe.
    async fn find_page(&self, title: &str) -> Result<Option<String>, ClientError>;
    /// Crea la página y devuelve su URL.
    async fn create_page(&self, title: &str, body: &str) -> Result<String, ClientError>;
}

/// API del marketplace de bienes digitales.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    async fn lookup_product(&self, permalink: &str) -> Result<Option<ProductRef>, ClientError>;
    async fn create_product(&self, product: &NewProduct) -> Result<ProductRef, ClientError>;
    /// Adjunta (o reemplaza) un fichero del producto.
    async fn attach_file(&self, product_id: &str, file_name: &str, bytes: &[u8]) -> Result<(), ClientError>;
    /// Publica el producto y devuelve la URL pública del listing.
    async fn publish_product(&self, product_id: &str) -> Result<String, ClientError>;
}

/// API de almacenamiento de ficheros.
#[async_trait]
pub trait StorageApi: Send + Sync {
    async fn upload(&self, path: &str, bytes: &[u8], overwrite: bool) -> Result<String, ClientError>;
}

/// Servicio de generación de texto.
#[async_trait]
pub trait GenerationApi: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transport_maps_to_transport_kind() {
        let step_err: StepError = ClientError::Transport("connection refused".into()).into();
        assert_eq!(step_err.kind, StepErrorKind::Transport);
        assert!(step_err.remote.is_none());
    }

    #[test]
    fn rejection_keeps_the_remote_payload() {
        let body = json!({"error": "invalid token"});
        let step_err: StepError = ClientError::Rejected { status: 401,
                                                          body: body.clone() }.into();
        assert_eq!(step_err.kind, StepErrorKind::RemoteRejection);
        assert_eq!(step_err.remote, Some(body));
    }

    #[test]
    fn already_exists_detection() {
        assert!(ClientError::Rejected { status: 409,
                                        body: json!({}) }.is_already_exists());
        assert!(ClientError::Rejected { status: 422,
                                        body: json!({"code": "already_exists"}) }.is_already_exists());
        assert!(!ClientError::Rejected { status: 500,
                                         body: json!({}) }.is_already_exists());
        assert!(!ClientError::Transport("down".into()).is_already_exists());
    }
}
