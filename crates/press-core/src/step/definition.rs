use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::outcome::StepOutcome;
use crate::model::StepContext;

/// Dependencia declarada de un step sobre su entrada.
///
/// El grafo es estrictamente lineal: un step consume o bien el artifact
/// inicial de la corrida, o bien el ref del step inmediatamente anterior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputBinding {
    /// Consume el `Artifact` de la corrida. Independiente de otros steps.
    SeedArtifact,
    /// Consume el `ProducedRef` del step inmediatamente anterior. Si ese
    /// step no terminó en `Succeeded`, este step pasa a `Skipped` sin ser
    /// invocado.
    PrecedingRef,
}

/// Trait que define un publish step. El engine es agnóstico al sink concreto.
///
/// Reglas del contrato:
/// - Ejecutar dos veces con la misma entrada no debe corromper estado remoto
///   (create-or-reuse donde el backend lo permita; errores de creación
///   duplicada tratados como no fatales cuando sean detectables).
/// - El step nunca muta el `Artifact`.
/// - En éxito se reporta siempre el ref/URL del recurso creado.
#[async_trait]
pub trait PublishStep: Send + Sync {
    /// Identificador estable y único dentro del pipeline.
    fn id(&self) -> &str;

    /// Nombre amigable.
    fn name(&self) -> &str {
        self.id()
    }

    /// Dependencia declarada sobre la entrada.
    fn binding(&self) -> InputBinding;

    /// Acción externa del step. Todo fallo debe quedar dentro del
    /// `StepOutcome`; el engine añade por fuera el presupuesto de timeout.
    async fn execute(&self, ctx: &StepContext) -> StepOutcome;
}
