//! Sesión de UI guionizada: la referencia in-process del contrato `UiSession`.
//!
//! Cada selector se guioniza con un `ElementScript`; la sesión registra lo
//! que el step hizo (campos rellenados, clicks, subidas) y cuenta las
//! liberaciones, de modo que los tests puedan afirmar que `quit` corre en
//! todos los caminos.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{UiDriver, UiError, UiSession};

/// Comportamiento guionizado de un elemento.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementScript {
    /// Presente desde el primer sondeo.
    Present,
    /// Aparece tras N sondeos fallidos.
    AppearsAfter(u32),
    /// No aparece nunca: las esperas sobre él expiran.
    Never,
}

/// Guion de una página: el comportamiento de cada selector.
#[derive(Debug, Clone, Default)]
pub struct PageScript {
    elements: HashMap<String, ElementScript>,
}

impl PageScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(mut self, selector: impl Into<String>, script: ElementScript) -> Self {
        self.elements.insert(selector.into(), script);
        self
    }
}

#[derive(Debug, Default)]
struct SessionLog {
    visited: Vec<String>,
    filled: HashMap<String, String>,
    clicked: Vec<String>,
    uploads: Vec<(String, String)>, // (selector, file_name)
}

pub struct ScriptedUiSession {
    script: PageScript,
    polls: HashMap<String, u32>,
    log: Arc<Mutex<SessionLog>>,
    releases: Arc<AtomicUsize>,
}

impl ScriptedUiSession {
    fn check_present(&mut self, selector: &str) -> bool {
        match self.script.elements.get(selector) {
            Some(ElementScript::Present) => true,
            Some(ElementScript::AppearsAfter(n)) => {
                let seen = self.polls.entry(selector.to_string()).or_insert(0);
                *seen += 1;
                *seen > *n
            }
            Some(ElementScript::Never) | None => false,
        }
    }

    fn require_present(&mut self, selector: &str) -> Result<(), UiError> {
        if self.check_present(selector) {
            Ok(())
        } else {
            Err(UiError::ElementNotFound { selector: selector.to_string() })
        }
    }
}

#[async_trait]
impl UiSession for ScriptedUiSession {
    async fn goto(&mut self, url: &str) -> Result<(), UiError> {
        self.log.lock().expect("log lock").visited.push(url.to_string());
        Ok(())
    }

    async fn is_present(&mut self, selector: &str) -> Result<bool, UiError> {
        Ok(self.check_present(selector))
    }

    async fn fill(&mut self, selector: &str, value: &str) -> Result<(), UiError> {
        self.require_present(selector)?;
        self.log
            .lock()
            .expect("log lock")
            .filled
            .insert(selector.to_string(), value.to_string());
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> Result<(), UiError> {
        self.require_present(selector)?;
        self.log.lock().expect("log lock").clicked.push(selector.to_string());
        Ok(())
    }

    async fn attach_bytes(&mut self, selector: &str, file_name: &str, _bytes: &[u8]) -> Result<(), UiError> {
        self.require_present(selector)?;
        self.log
            .lock()
            .expect("log lock")
            .uploads
            .push((selector.to_string(), file_name.to_string()));
        Ok(())
    }

    async fn quit(&mut self) -> Result<(), UiError> {
        self.releases.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Driver guionizado: cada `open` entrega una sesión nueva sobre el mismo
/// guion, compartiendo el log y el contador de liberaciones para inspección.
pub struct ScriptedUiDriver {
    script: PageScript,
    fail_open: bool,
    log: Arc<Mutex<SessionLog>>,
    releases: Arc<AtomicUsize>,
}

impl ScriptedUiDriver {
    pub fn new(script: PageScript) -> Self {
        Self { script,
               fail_open: false,
               log: Arc::new(Mutex::new(SessionLog::default())),
               releases: Arc::new(AtomicUsize::new(0)) }
    }

    /// Driver cuyo `open` falla siempre, para simular un cliente caído.
    pub fn failing_open() -> Self {
        Self { fail_open: true,
               ..Self::new(PageScript::new()) }
    }

    /// Cuántas sesiones se liberaron vía `quit`.
    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub fn visited(&self) -> Vec<String> {
        self.log.lock().expect("log lock").visited.clone()
    }

    pub fn filled_value(&self, selector: &str) -> Option<String> {
        self.log.lock().expect("log lock").filled.get(selector).cloned()
    }

    pub fn clicked(&self) -> Vec<String> {
        self.log.lock().expect("log lock").clicked.clone()
    }

    pub fn uploads(&self) -> Vec<(String, String)> {
        self.log.lock().expect("log lock").uploads.clone()
    }
}

#[async_trait]
impl UiDriver for ScriptedUiDriver {
    async fn open(&self) -> Result<Box<dyn UiSession>, UiError> {
        if self.fail_open {
            return Err(UiError::Driver("could not start a client session".into()));
        }
        Ok(Box::new(ScriptedUiSession { script: self.script.clone(),
                                        polls: HashMap::new(),
                                        log: Arc::clone(&self.log),
                                        releases: Arc::clone(&self.releases) }))
    }
}
