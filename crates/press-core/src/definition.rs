//! Definición inmutable del pipeline: lista ordenada de steps + hash.
//!
//! El `definition_hash` se calcula sobre los ids ordenados de los steps y la
//! versión del engine; identifica la forma del pipeline con independencia de
//! los sinks concretos detrás de cada step.

use serde_json::json;

use crate::constants::ENGINE_VERSION;
use crate::errors::PipelineError;
use crate::hashing::hash_value;
use crate::step::{InputBinding, PublishStep};

pub struct PipelineDefinition {
    pub steps: Vec<Box<dyn PublishStep>>,
    pub definition_hash: String,
}

impl PipelineDefinition {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_ids(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.id().to_string()).collect()
    }

    /// Validación estructural previa a cualquier ejecución.
    ///
    /// - ids únicos dentro del pipeline;
    /// - el primer step no puede depender de un ref anterior (no existe).
    pub fn validate(&self) -> Result<(), PipelineError> {
        let ids = self.step_ids();
        for (i, id) in ids.iter().enumerate() {
            if ids[..i].contains(id) {
                return Err(PipelineError::Configuration(format!("duplicate step id '{id}'")));
            }
        }
        if let Some(first) = self.steps.first() {
            if first.binding() == InputBinding::PrecedingRef {
                return Err(PipelineError::Configuration(format!(
                    "first step '{}' binds to a preceding ref but no step precedes it",
                    first.id()
                )));
            }
        }
        Ok(())
    }
}

/// Construye la definición extrayendo los ids en orden y hasheándolos.
pub fn build_definition(steps: Vec<Box<dyn PublishStep>>) -> PipelineDefinition {
    let ids: Vec<String> = steps.iter().map(|s| s.id().to_string()).collect();
    let definition_hash = hash_value(&json!({
                              "engine_version": ENGINE_VERSION,
                              "step_ids": ids,
                          }));
    PipelineDefinition { steps, definition_hash }
}
