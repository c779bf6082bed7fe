//! Taxonomía de errores del pipeline.
//!
//! Dos niveles bien distintos:
//! - `StepError` se captura en la frontera del step y queda registrado en el
//!   resultado de ese step; nunca se propaga a steps hermanos (sólo provoca
//!   `Skipped` en los dependientes).
//! - `PipelineError` aborta la corrida completa: configuración inválida antes
//!   de ejecutar step alguno, o fallo del productor de contenido antes del
//!   primer sink.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Clasificación de fallos en la frontera de un step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepErrorKind {
    /// Fallo de red alcanzando el sink (inalcanzable, conexión caída).
    Transport,
    /// El sink respondió pero rechazó la petición (envelope de error remoto).
    RemoteRejection,
    /// El step excedió su presupuesto de ejecución.
    Timeout,
    /// La automatización de UI no encontró un elemento esperado.
    UiElementNotFound,
    /// Una interacción de UI no terminó dentro de su ventana acotada.
    UiActionTimeout,
    /// Error interno del adapter (entrada incompatible, invariante rota).
    Internal,
}

impl StepErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepErrorKind::Transport => "transport",
            StepErrorKind::RemoteRejection => "remote-rejection",
            StepErrorKind::Timeout => "timeout",
            StepErrorKind::UiElementNotFound => "ui-element-not-found",
            StepErrorKind::UiActionTimeout => "ui-action-timeout",
            StepErrorKind::Internal => "internal",
        }
    }
}

/// Error estructurado de un step. Serializable para poder viajar dentro de
/// los eventos de la corrida.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
#[error("{}: {message}", kind.as_str())]
pub struct StepError {
    pub kind: StepErrorKind,
    pub message: String,
    /// Payload de error del servicio remoto, si lo hubo (sólo diagnóstico).
    pub remote: Option<Value>,
}

impl StepError {
    pub fn new(kind: StepErrorKind, message: impl Into<String>) -> Self {
        Self { kind,
               message: message.into(),
               remote: None }
    }

    /// Adjunta el cuerpo de error remoto para diagnóstico.
    pub fn with_remote(mut self, remote: Value) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(StepErrorKind::Transport, message)
    }

    pub fn rejection(message: impl Into<String>, remote: Value) -> Self {
        Self::new(StepErrorKind::RemoteRejection, message).with_remote(remote)
    }

    pub fn timeout(budget_ms: u64) -> Self {
        Self::new(StepErrorKind::Timeout, format!("step exceeded its {budget_ms}ms budget"))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StepErrorKind::Internal, message)
    }
}

/// Fallo del productor de contenido.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationError {
    #[error("generation service unreachable: {0}")]
    Unreachable(String),
    #[error("generation returned invalid output: {0}")]
    InvalidOutput(String),
    #[error("generated body too long: {len} chars (hard cap {max})")]
    TooLong { len: usize, max: usize },
}

/// Error terminal de la corrida. `Configuration` se detecta antes de ejecutar
/// cualquier step; `Generation` aborta antes del primer sink.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration: {0}")]
    Configuration(String),
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),
}
