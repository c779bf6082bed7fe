//! Tipos de evento de la corrida y estructura `RunEvent`.
//!
//! Rol en el flujo:
//! - El engine emite eventos a un `EventStore` append-only mientras ejecuta.
//! - El log permite reconstruir los resultados por step (ver `run::replay`)
//!   y es la traza que un operador inspecciona tras una corrida parcial.
//! - `RunEventKind` es el contrato observable del motor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::StepError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEventKind {
    /// Emisión inicial de la corrida. Invariante: debe ser el primer evento
    /// de un `run_id`.
    RunInitialized { definition_hash: String, step_count: usize },
    /// El productor entregó el artifact. Ningún sink corre antes de esto.
    ArtifactProduced {
        title: String,
        topic: String,
        content_hash: String,
    },
    /// Un step comenzó su ejecución. No implica éxito.
    StepStarted { step_index: usize, step_id: String },
    /// Un step terminó correctamente; `reused` marca create-or-reuse.
    StepSucceeded {
        step_index: usize,
        step_id: String,
        produced_ref: String,
        reused: bool,
    },
    /// Un step falló. La corrida continúa con los steps independientes.
    StepFailed {
        step_index: usize,
        step_id: String,
        error: StepError,
    },
    /// Un step se saltó sin invocarse porque `blocked_on` no terminó en
    /// `Succeeded`.
    StepSkipped {
        step_index: usize,
        step_id: String,
        blocked_on: String,
    },
    /// La corrida abortó antes del primer sink (fallo de generación).
    RunAborted { reason: String },
    /// Evento de cierre: todos los steps alcanzaron un estado terminal.
    RunCompleted {
        succeeded: usize,
        failed: usize,
        skipped: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    pub seq: u64, // asignado por el EventStore (orden de append)
    pub run_id: Uuid,
    pub kind: RunEventKind,
    pub ts: DateTime<Utc>,
}
