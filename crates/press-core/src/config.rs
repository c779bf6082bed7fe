//! Configuración explícita de una corrida.
//!
//! Nada de estado global a nivel de módulo: el objeto se construye en el
//! caller (CLI, tests) y se pasa al engine en construcción, con ciclo de
//! vida acotado a la corrida. Esto mantiene corridas aisladas y permite
//! varias independientes en el mismo proceso.

use std::time::Duration;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_STEP_TIMEOUT_MS;
use crate::errors::PipelineError;

/// Parámetros del productor de contenido.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Endpoint del servicio de generación (vacío para productores locales).
    pub endpoint: String,
    /// Modelo solicitado al servicio.
    pub model: String,
    /// Cota máxima del cuerpo, en chars. El productor trunca antes de
    /// entregar el artifact para que ningún sink reciba un payload que
    /// exceda sus propios límites.
    pub max_length: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { endpoint: String::new(),
               model: String::new(),
               // límite de bloque del sink de páginas más restrictivo
               max_length: 2000 }
    }
}

/// Tipo de sink configurado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SinkKind {
    Page,
    Marketplace,
    Storage,
    MarketplaceUi,
}

/// Entrada de la lista ordenada de sinks.
///
/// `credentials_ref` es el nombre de la variable de entorno que guarda la
/// credencial; el secreto nunca viaja dentro de la configuración.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    pub kind: SinkKind,
    pub endpoint: String,
    pub credentials_ref: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub per_step_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { per_step_ms: DEFAULT_STEP_TIMEOUT_MS }
    }
}

impl TimeoutConfig {
    pub fn per_step(&self) -> Duration {
        Duration::from_millis(self.per_step_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub generation: GenerationConfig,
    pub sinks: Vec<SinkConfig>,
    pub timeouts: TimeoutConfig,
}

impl PipelineConfig {
    /// Falla rápido, antes de ejecutar step alguno.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.generation.max_length == 0 {
            return Err(PipelineError::Configuration("generation.max_length must be > 0".into()));
        }
        if self.timeouts.per_step_ms == 0 {
            return Err(PipelineError::Configuration("timeouts.per_step_ms must be > 0".into()));
        }
        for sink in &self.sinks {
            if sink.endpoint.is_empty() {
                return Err(PipelineError::Configuration(format!("sink {:?} has an empty endpoint", sink.kind)));
            }
            if sink.credentials_ref.is_empty() {
                return Err(PipelineError::Configuration(format!("sink {:?} has an empty credentials ref", sink.kind)));
            }
        }
        Ok(())
    }
}

/// Política de rotación de topics keyed por fecha: el topic del día es una
/// función pura del día del año.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicRotation {
    topics: Vec<String>,
}

impl TopicRotation {
    pub fn new(topics: Vec<String>) -> Result<Self, PipelineError> {
        if topics.is_empty() {
            return Err(PipelineError::Configuration("topic rotation needs at least one topic".into()));
        }
        Ok(Self { topics })
    }

    pub fn topic_for(&self, date: NaiveDate) -> &str {
        let idx = date.ordinal0() as usize % self.topics.len();
        &self.topics[idx]
    }

    pub fn today(&self) -> &str {
        self.topic_for(Utc::now().date_naive())
    }
}
