use crate::errors::StepError;
use crate::model::ProducedRef;

/// Resultado abstracto de ejecutar un step.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    Succeeded {
        produced_ref: ProducedRef,
        /// `true` si el recurso ya existía y el step lo reutilizó
        /// (create-or-reuse) en lugar de crearlo.
        reused: bool,
    },
    Failed { error: StepError },
}

impl StepOutcome {
    pub fn created(produced_ref: impl Into<ProducedRef>) -> Self {
        StepOutcome::Succeeded { produced_ref: produced_ref.into(),
                                 reused: false }
    }

    pub fn reused(produced_ref: impl Into<ProducedRef>) -> Self {
        StepOutcome::Succeeded { produced_ref: produced_ref.into(),
                                 reused: true }
    }

    pub fn failed(error: StepError) -> Self {
        StepOutcome::Failed { error }
    }
}
