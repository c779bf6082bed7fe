//! Modelo de datos del pipeline: artifact, referencias producidas y contexto
//! de ejecución de un step.

mod artifact;
mod context;

pub use artifact::{Artifact, ArtifactBody};
pub use context::StepContext;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Referencia opaca (id o URL) que un step exitoso expone a sus dependientes
/// y al operador. El engine no interpreta su contenido.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProducedRef(String);

impl ProducedRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ProducedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ProducedRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ProducedRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
