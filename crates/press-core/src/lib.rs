//! press-core: motor de pipeline de publicación.
//!
//! Una corrida produce un `Artifact` (contenido generado o plantillado) y lo
//! empuja por una lista ordenada de `PublishStep`s. Cada step es una acción
//! externa (crear página, crear producto, adjuntar fichero, subir a storage,
//! publicar vía UI) detrás de un mismo contrato; el engine aísla fallos por
//! step y salta a los dependientes de un step fallido sin abortar el resto.
pub mod config;
pub mod constants;
pub mod definition;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod model;
pub mod producer;
pub mod run;
pub mod step;

pub use config::{GenerationConfig, PipelineConfig, SinkConfig, SinkKind, TimeoutConfig, TopicRotation};
pub use definition::{build_definition, PipelineDefinition};
pub use engine::{PipelineBuilder, PipelineEngine};
pub use errors::{GenerationError, PipelineError, StepError, StepErrorKind};
pub use event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
pub use model::{Artifact, ArtifactBody, ProducedRef, StepContext};
pub use producer::{normalize_quotes, sanitize_title, truncate_chars, ContentProducer};
pub use run::{event_variants, replay, PipelineRun, StepResult};
pub use step::{InputBinding, PublishStep, StepOutcome, StepStatus};
