//! Artifact: la unidad de contenido que atraviesa el pipeline.
//!
//! Inmutable una vez producido: los steps lo leen, nunca lo mutan (los campos
//! son privados y sólo hay accessors). El `content_hash` se calcula sobre el
//! JSON canónico del contenido (texto) o sobre los bytes crudos (binario) y
//! sirve como identidad para deduplicación e idempotencia en los sinks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::hashing;

/// Cuerpo del artifact: markdown u otro texto, o un payload binario
/// (por ejemplo un PDF ya maquetado).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactBody {
    Text(String),
    Binary(Vec<u8>),
}

impl ArtifactBody {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArtifactBody::Text(t) => Some(t),
            ArtifactBody::Binary(_) => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ArtifactBody::Text(t) => t.as_bytes(),
            ArtifactBody::Binary(b) => b,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    title: String,
    body: ArtifactBody,
    topic: String,
    created_at: DateTime<Utc>,
}

impl Artifact {
    pub fn new(title: impl Into<String>, body: ArtifactBody, topic: impl Into<String>) -> Self {
        Self { title: title.into(),
               body,
               topic: topic.into(),
               created_at: Utc::now() }
    }

    /// Atajo para artifacts de texto.
    pub fn text(title: impl Into<String>, body: impl Into<String>, topic: impl Into<String>) -> Self {
        Self::new(title, ArtifactBody::Text(body.into()), topic)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &ArtifactBody {
        &self.body
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Identidad de contenido. `created_at` queda fuera a propósito: dos
    /// corridas que generan el mismo contenido deben compartir identidad.
    pub fn content_hash(&self) -> String {
        match &self.body {
            ArtifactBody::Text(t) => hashing::hash_value(&json!({
                                         "title": self.title,
                                         "topic": self.topic,
                                         "body": t,
                                     })),
            ArtifactBody::Binary(b) => hashing::hash_bytes(b),
        }
    }
}
