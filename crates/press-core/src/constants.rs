//! Constantes del motor.
//!
//! `ENGINE_VERSION` participa en el hash de definición: un cambio de versión
//! del engine invalida comparaciones entre corridas aunque la lista de steps
//! no cambie. Mantener estable mientras no haya cambios incompatibles.

/// Versión lógica del motor de publicación.
pub const ENGINE_VERSION: &str = "P1.0";

/// Presupuesto por defecto de ejecución por step, en milisegundos.
pub const DEFAULT_STEP_TIMEOUT_MS: u64 = 15_000;
