use std::sync::Arc;

use super::{Artifact, ProducedRef};
use crate::errors::StepError;

/// Contexto de ejecución entregado a `PublishStep::execute`.
///
/// Sólo lectura: el artifact se comparte entre steps vía `Arc` y el ref de
/// entrada es una copia del que expuso el step anterior.
pub struct StepContext {
    /// Artifact de la corrida.
    pub artifact: Arc<Artifact>,
    /// `ProducedRef` del step inmediatamente anterior; presente exactamente
    /// cuando el step declaró `InputBinding::PrecedingRef`.
    pub input_ref: Option<ProducedRef>,
}

impl StepContext {
    pub fn seeded(artifact: Arc<Artifact>) -> Self {
        Self { artifact,
               input_ref: None }
    }

    pub fn with_ref(artifact: Arc<Artifact>, input_ref: ProducedRef) -> Self {
        Self { artifact,
               input_ref: Some(input_ref) }
    }

    /// Ref de entrada obligatorio para steps encadenados.
    pub fn require_ref(&self) -> Result<&ProducedRef, StepError> {
        self.input_ref
            .as_ref()
            .ok_or_else(|| StepError::internal("step requires the preceding step's produced ref"))
    }
}
