//! Resultado por step, corrida completa y replay desde el log de eventos.
//!
//! `PipelineRun` es el valor que el engine devuelve al caller: un resultado
//! terminal por cada step configurado, en orden. `replay` reconstruye esa
//! misma lista desde el log de eventos; ambas vistas deben coincidir (hay un
//! test de paridad en el engine).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::StepError;
use crate::event::{RunEvent, RunEventKind};
use crate::model::{Artifact, ProducedRef};
use crate::step::StepStatus;

/// Resultado de un step: el registro que se reporta al operador.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub step_id: String,
    pub status: StepStatus,
    /// Presente sólo en `Succeeded`.
    pub produced_ref: Option<ProducedRef>,
    /// `true` si el step reutilizó un recurso ya existente.
    pub reused: bool,
    /// Presente sólo en `Failed`.
    pub error: Option<StepError>,
    /// En `Skipped`, el id del step cuya falta de éxito lo bloqueó.
    pub blocked_on: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl StepResult {
    pub fn pending(step_id: impl Into<String>) -> Self {
        Self { step_id: step_id.into(),
               status: StepStatus::Pending,
               produced_ref: None,
               reused: false,
               error: None,
               blocked_on: None,
               started_at: None,
               finished_at: None }
    }
}

/// La ejecución ordenada de los steps contra un artifact. Se crea por
/// invocación y se descarta tras reportarse; no guarda estado entre corridas.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub run_id: Uuid,
    pub topic: String,
    pub artifact: Arc<Artifact>,
    /// Un resultado terminal por step configurado, en orden.
    pub results: Vec<StepResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PipelineRun {
    pub fn fully_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.status == StepStatus::Succeeded)
    }

    pub fn failed_steps(&self) -> Vec<&StepResult> {
        self.results.iter().filter(|r| r.status == StepStatus::Failed).collect()
    }

    pub fn result(&self, step_id: &str) -> Option<&StepResult> {
        self.results.iter().find(|r| r.step_id == step_id)
    }
}

/// Reconstruye la lista de resultados aplicando los eventos en orden sobre
/// los slots declarados en `step_ids`.
pub fn replay(step_ids: &[String], events: &[RunEvent]) -> Vec<StepResult> {
    let mut results: Vec<StepResult> = step_ids.iter().map(|id| StepResult::pending(id.clone())).collect();
    for ev in events {
        match &ev.kind {
            RunEventKind::StepStarted { step_index, .. } => {
                if let Some(slot) = results.get_mut(*step_index) {
                    slot.status = StepStatus::Running;
                    slot.started_at = Some(ev.ts);
                }
            }
            RunEventKind::StepSucceeded { step_index,
                                          produced_ref,
                                          reused,
                                          .. } => {
                if let Some(slot) = results.get_mut(*step_index) {
                    slot.status = StepStatus::Succeeded;
                    slot.produced_ref = Some(ProducedRef::new(produced_ref.clone()));
                    slot.reused = *reused;
                    slot.finished_at = Some(ev.ts);
                }
            }
            RunEventKind::StepFailed { step_index, error, .. } => {
                if let Some(slot) = results.get_mut(*step_index) {
                    slot.status = StepStatus::Failed;
                    slot.error = Some(error.clone());
                    slot.finished_at = Some(ev.ts);
                }
            }
            RunEventKind::StepSkipped { step_index, blocked_on, .. } => {
                if let Some(slot) = results.get_mut(*step_index) {
                    slot.status = StepStatus::Skipped;
                    slot.blocked_on = Some(blocked_on.clone());
                    slot.finished_at = Some(ev.ts);
                }
            }
            RunEventKind::RunInitialized { .. }
            | RunEventKind::ArtifactProduced { .. }
            | RunEventKind::RunAborted { .. }
            | RunEventKind::RunCompleted { .. } => {}
        }
    }
    results
}

/// Etiquetas compactas por evento, útiles en asserts de tests.
pub fn event_variants(events: &[RunEvent]) -> Vec<&'static str> {
    events.iter()
          .map(|e| match e.kind {
              RunEventKind::RunInitialized { .. } => "I",
              RunEventKind::ArtifactProduced { .. } => "A",
              RunEventKind::StepStarted { .. } => "S",
              RunEventKind::StepSucceeded { .. } => "F",
              RunEventKind::StepFailed { .. } => "X",
              RunEventKind::StepSkipped { .. } => "K",
              RunEventKind::RunAborted { .. } => "B",
              RunEventKind::RunCompleted { .. } => "C",
          })
          .collect()
}
