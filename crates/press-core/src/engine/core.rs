//! Motor de ejecución de corridas de publicación.
//!
//! Camina la lista ordenada de steps en secuencia: resuelve la entrada de
//! cada step según su `InputBinding`, salta (sin invocar) a los que dependen
//! de un step que no terminó en `Succeeded`, acota cada ejecución con un
//! timeout y captura todo fallo dentro del resultado del step. Un fallo
//! nunca aborta la corrida: se intenta todo step restante cuya dependencia
//! esté satisfecha, para maximizar el éxito parcial.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, warn};
use tokio::time::timeout;
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::definition::PipelineDefinition;
use crate::errors::{PipelineError, StepError};
use crate::event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
use crate::model::StepContext;
use crate::producer::ContentProducer;
use crate::run::{PipelineRun, StepResult};
use crate::step::{InputBinding, StepOutcome, StepStatus};

pub struct PipelineEngine<E: EventStore> {
    event_store: E,
    config: PipelineConfig,
    producer: Box<dyn ContentProducer>,
    definition: PipelineDefinition,
}

impl PipelineEngine<InMemoryEventStore> {
    /// Builder con store de eventos en memoria.
    pub fn builder() -> crate::engine::PipelineBuilder<InMemoryEventStore> {
        crate::engine::PipelineBuilder::new(InMemoryEventStore::default())
    }
}

impl<E: EventStore> PipelineEngine<E> {
    pub(crate) fn from_parts(event_store: E,
                             config: PipelineConfig,
                             producer: Box<dyn ContentProducer>,
                             definition: PipelineDefinition)
                             -> Self {
        Self { event_store,
               config,
               producer,
               definition }
    }

    pub fn definition(&self) -> &PipelineDefinition {
        &self.definition
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Lista los eventos registrados para una corrida.
    pub fn events(&self, run_id: Uuid) -> Vec<RunEvent> {
        self.event_store.list(run_id)
    }

    /// Ejecuta una corrida completa contra el topic dado.
    ///
    /// Garantías:
    /// - `Configuration` aborta antes de ejecutar step alguno.
    /// - Un fallo de generación aborta antes del primer sink (`RunAborted`).
    /// - La corrida devuelta tiene exactamente un resultado terminal por
    ///   step configurado.
    pub async fn run(&mut self, topic: &str) -> Result<PipelineRun, PipelineError> {
        self.config.validate()?;
        self.definition.validate()?;

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let per_step = self.config.timeouts.per_step();

        self.event_store.append_kind(run_id,
                                     RunEventKind::RunInitialized { definition_hash:
                                                                        self.definition.definition_hash.clone(),
                                                                    step_count: self.definition.len() });

        // El productor observa el mismo presupuesto que un step; si se
        // excede, cuenta como servicio de generación inalcanzable.
        let produced = match timeout(per_step, self.producer.produce(topic, &self.config.generation)).await {
            Ok(result) => result,
            Err(_) => Err(crate::errors::GenerationError::Unreachable(format!(
                "generation exceeded the {}ms budget",
                self.config.timeouts.per_step_ms
            ))),
        };
        let artifact = match produced {
            Ok(a) => Arc::new(a),
            Err(e) => {
                warn!("run {run_id} aborted before any sink step: {e}");
                self.event_store
                    .append_kind(run_id, RunEventKind::RunAborted { reason: e.to_string() });
                return Err(e.into());
            }
        };

        self.event_store.append_kind(run_id,
                                     RunEventKind::ArtifactProduced { title: artifact.title().to_string(),
                                                                      topic: topic.to_string(),
                                                                      content_hash: artifact.content_hash() });

        let mut results: Vec<StepResult> = Vec::with_capacity(self.definition.len());
        for (idx, step) in self.definition.steps.iter().enumerate() {
            let step_id = step.id().to_string();

            let ctx = match step.binding() {
                InputBinding::SeedArtifact => StepContext::seeded(artifact.clone()),
                InputBinding::PrecedingRef => {
                    // ligado estrictamente al step inmediatamente anterior
                    let prev = idx.checked_sub(1).and_then(|p| results.get(p));
                    let prev_ref = prev.filter(|p| p.status == StepStatus::Succeeded)
                                       .and_then(|p| p.produced_ref.clone());
                    match prev_ref {
                        Some(input_ref) => StepContext::with_ref(artifact.clone(), input_ref),
                        None => {
                            let blocked_on = prev.map(|p| p.step_id.clone()).unwrap_or_default();
                            debug!("run {run_id}: skipping '{step_id}' (blocked on '{blocked_on}')");
                            self.event_store.append_kind(run_id,
                                                         RunEventKind::StepSkipped { step_index: idx,
                                                                                     step_id: step_id.clone(),
                                                                                     blocked_on: blocked_on.clone() });
                            let mut result = StepResult::pending(step_id);
                            result.status = StepStatus::Skipped;
                            result.blocked_on = Some(blocked_on);
                            result.finished_at = Some(Utc::now());
                            results.push(result);
                            continue;
                        }
                    }
                }
            };

            let step_started = Utc::now();
            debug!("run {run_id}: executing step {idx} '{step_id}'");
            self.event_store.append_kind(run_id,
                                         RunEventKind::StepStarted { step_index: idx,
                                                                     step_id: step_id.clone() });

            let outcome = match timeout(per_step, step.execute(&ctx)).await {
                Ok(outcome) => outcome,
                Err(_) => StepOutcome::failed(StepError::timeout(self.config.timeouts.per_step_ms)),
            };

            let mut result = StepResult::pending(step_id.clone());
            result.started_at = Some(step_started);
            result.finished_at = Some(Utc::now());
            match outcome {
                StepOutcome::Succeeded { produced_ref, reused } => {
                    self.event_store.append_kind(run_id,
                                                 RunEventKind::StepSucceeded { step_index: idx,
                                                                               step_id: step_id.clone(),
                                                                               produced_ref: produced_ref.to_string(),
                                                                               reused });
                    result.status = StepStatus::Succeeded;
                    result.produced_ref = Some(produced_ref);
                    result.reused = reused;
                }
                StepOutcome::Failed { error } => {
                    warn!("run {run_id}: step '{step_id}' failed: {error}");
                    self.event_store.append_kind(run_id,
                                                 RunEventKind::StepFailed { step_index: idx,
                                                                            step_id: step_id.clone(),
                                                                            error: error.clone() });
                    result.status = StepStatus::Failed;
                    result.error = Some(error);
                }
            }
            results.push(result);
        }

        let succeeded = results.iter().filter(|r| r.status == StepStatus::Succeeded).count();
        let failed = results.iter().filter(|r| r.status == StepStatus::Failed).count();
        let skipped = results.iter().filter(|r| r.status == StepStatus::Skipped).count();
        self.event_store
            .append_kind(run_id, RunEventKind::RunCompleted { succeeded, failed, skipped });

        debug_assert!(results.len() == self.definition.len());
        Ok(PipelineRun { run_id,
                         topic: topic.to_string(),
                         artifact,
                         results,
                         started_at,
                         finished_at: Utc::now() })
    }
}
