//! Automatización de UI para sinks sin API utilizable.
//!
//! `UiDriver` abre sesiones interactivas; `UiSession` expone las primitivas
//! mínimas (navegar, esperar elemento, rellenar, click, adjuntar). Toda
//! espera es acotada: un elemento que no aparece dentro de su ventana produce
//! `ElementNotFound`, nunca un bloqueo indefinido. La sesión debe liberarse
//! con `quit` en todos los caminos, también en fallo.

mod scripted;

pub use scripted::{ElementScript, PageScript, ScriptedUiDriver, ScriptedUiSession};

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::{sleep, timeout};

use press_core::{StepError, StepErrorKind};

/// Intervalo de sondeo de las esperas por elemento.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UiError {
    #[error("element '{selector}' did not appear within its wait window")]
    ElementNotFound { selector: String },
    #[error("interaction with '{selector}' did not finish within its window")]
    ActionTimeout { selector: String },
    #[error("driver: {0}")]
    Driver(String),
}

impl From<UiError> for StepError {
    fn from(err: UiError) -> Self {
        let kind = match &err {
            UiError::ElementNotFound { .. } => StepErrorKind::UiElementNotFound,
            UiError::ActionTimeout { .. } => StepErrorKind::UiActionTimeout,
            UiError::Driver(_) => StepErrorKind::Transport,
        };
        StepError::new(kind, err.to_string())
    }
}

/// Sesión interactiva contra el cliente del sink.
#[async_trait]
pub trait UiSession: Send + Sync {
    async fn goto(&mut self, url: &str) -> Result<(), UiError>;
    /// `true` si el elemento está presente ahora mismo, sin esperar.
    async fn is_present(&mut self, selector: &str) -> Result<bool, UiError>;
    async fn fill(&mut self, selector: &str, value: &str) -> Result<(), UiError>;
    async fn click(&mut self, selector: &str) -> Result<(), UiError>;
    /// Adjunta un payload al input de subida identificado por `selector`.
    async fn attach_bytes(&mut self, selector: &str, file_name: &str, bytes: &[u8]) -> Result<(), UiError>;
    /// Libera la sesión y sus recursos. Obligatorio en todos los caminos.
    async fn quit(&mut self) -> Result<(), UiError>;
}

/// Fábrica de sesiones.
#[async_trait]
pub trait UiDriver: Send + Sync {
    async fn open(&self) -> Result<Box<dyn UiSession>, UiError>;
}

/// Guard de liberación de la sesión.
///
/// El future de un step puede cancelarse a mitad de secuencia (el engine lo
/// acota con un timeout externo); un `quit` escrito al final del camino feliz
/// no corre en ese caso y la sesión quedaría viva. El guard cierra ese hueco:
/// `release` espera el `quit` en el camino ordenado, y si el guard se dropea
/// todavía armado, el `quit` se lanza como tarea aparte sobre el runtime.
pub struct SessionGuard {
    session: Option<Box<dyn UiSession>>,
}

impl SessionGuard {
    pub fn new(session: Box<dyn UiSession>) -> Self {
        Self { session: Some(session) }
    }

    /// Sesión activa; `None` sólo tras `release`.
    pub fn session(&mut self) -> Option<&mut (dyn UiSession + 'static)> {
        self.session.as_deref_mut()
    }

    /// Liberación ordenada, esperando el `quit`.
    pub async fn release(mut self) -> Result<(), UiError> {
        match self.session.take() {
            Some(mut session) => session.quit().await,
            None => Ok(()),
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Some(mut session) = self.session.take() {
            // dropeado armado: el future del step fue cancelado antes de la
            // liberación ordenada
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(async move {
                    let _ = session.quit().await;
                });
            }
        }
    }
}

/// Espera acotada: sondea la presencia de `selector` hasta `wait`. Si la
/// ventana expira sin que aparezca, `ElementNotFound`.
pub async fn wait_for(session: &mut dyn UiSession, selector: &str, wait: Duration) -> Result<(), UiError> {
    let deadline = tokio::time::Instant::now() + wait;
    loop {
        if session.is_present(selector).await? {
            return Ok(());
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(UiError::ElementNotFound { selector: selector.to_string() });
        }
        sleep(POLL_INTERVAL).await;
    }
}

/// Acota una interacción individual: si no termina dentro de `wait`,
/// `ActionTimeout` con el selector implicado.
pub async fn with_action_timeout<F>(selector: &str, wait: Duration, action: F) -> Result<(), UiError>
    where F: std::future::Future<Output = Result<(), UiError>> + Send
{
    match timeout(wait, action).await {
        Ok(result) => result,
        Err(_) => Err(UiError::ActionTimeout { selector: selector.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_errors_map_to_their_step_error_kinds() {
        let nf: StepError = UiError::ElementNotFound { selector: "#publish".into() }.into();
        assert_eq!(nf.kind, StepErrorKind::UiElementNotFound);

        let at: StepError = UiError::ActionTimeout { selector: "#save".into() }.into();
        assert_eq!(at.kind, StepErrorKind::UiActionTimeout);

        let drv: StepError = UiError::Driver("session crashed".into()).into();
        assert_eq!(drv.kind, StepErrorKind::Transport);
    }

    #[tokio::test]
    async fn a_dropped_guard_still_releases_the_session() {
        let driver = ScriptedUiDriver::new(PageScript::new());
        let session = driver.open().await.expect("open");
        drop(SessionGuard::new(session));
        // el quit corre como tarea aparte; cederle el scheduler
        sleep(Duration::from_millis(20)).await;
        assert_eq!(driver.release_count(), 1);
    }

    #[tokio::test]
    async fn release_quits_exactly_once() {
        let driver = ScriptedUiDriver::new(PageScript::new());
        let guard = SessionGuard::new(driver.open().await.expect("open"));
        guard.release().await.expect("quit");
        sleep(Duration::from_millis(20)).await;
        assert_eq!(driver.release_count(), 1);
    }

    #[tokio::test]
    async fn an_action_that_never_finishes_times_out_with_its_selector() {
        let err = with_action_timeout("#save",
                                      Duration::from_millis(50),
                                      std::future::pending::<Result<(), UiError>>()).await
                                                                                    .unwrap_err();
        assert_eq!(err, UiError::ActionTimeout { selector: "#save".into() });
    }
}
