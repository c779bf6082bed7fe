//! Contrato de publish steps.
//!
//! Un step es una unidad de trabajo con efecto externo visible (crear un
//! recurso remoto, adjuntar un fichero, notificar un canal). Este módulo
//! define:
//! - `PublishStep`: la interfaz que implementan los sink adapters.
//! - `InputBinding`: la dependencia declarada de cada step sobre su entrada.
//! - `StepOutcome`: el resultado abstracto de una ejecución.
//! - `StepStatus`: estados en tiempo de corrida.

mod definition;
mod outcome;
mod status;

pub use definition::{InputBinding, PublishStep};
pub use outcome::StepOutcome;
pub use status::StepStatus;
