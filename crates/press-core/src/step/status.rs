use serde::{Deserialize, Serialize};

/// Estado de un step en tiempo de corrida.
///
/// Transiciones válidas:
/// - `Pending` -> `Running`
/// - `Running` -> `Succeeded`
/// - `Running` -> `Failed`
/// - `Pending` -> `Skipped` (dependencia no satisfecha; sin invocación)
///
/// No hay reversiones ni saltos arbitrarios entre estados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    /// Pendiente de ejecución.
    Pending,
    /// En ejecución.
    Running,
    /// Terminó correctamente.
    Succeeded,
    /// Terminó con error (capturado en el resultado del step).
    Failed,
    /// No se invocó porque su dependencia no terminó en `Succeeded`.
    Skipped,
}

impl StepStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepStatus::Succeeded | StepStatus::Failed | StepStatus::Skipped)
    }
}
