//! Publicación en el marketplace guionizando su cliente web, para cuentas
//! sin acceso a la API.
//!
//! La secuencia replica lo que haría un operador: login, formulario de
//! producto nuevo, nombre y precio, adjuntar el fichero y publicar. Cada
//! interacción espera su elemento con una ventana acotada, y la sesión se
//! libera en todos los caminos: el ordenado vía `release` y el de
//! cancelación (timeout del engine a mitad de secuencia) vía el drop del
//! `SessionGuard`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{info, warn};

use press_core::{InputBinding, PublishStep, StepContext, StepError, StepOutcome};

use crate::steps::slugify;
use crate::ui::{wait_for, with_action_timeout, SessionGuard, UiDriver, UiError};

const SEL_LOGIN_EMAIL: &str = "input[name='user[email]']";
const SEL_LOGIN_PASSWORD: &str = "input[name='user[password]']";
const SEL_LOGIN_BUTTON: &str = "//button[contains(text(), 'Login')]";
const SEL_PRODUCT_NAME: &str = "input[placeholder='Name of product']";
const SEL_PRODUCT_PRICE: &str = "input[placeholder='Price your product']";
const SEL_FILE_INPUT: &str = "input[name='product[file_uploads][]']";
const SEL_PUBLISH_BUTTON: &str = "//button[contains(text(), 'Publish')]";

pub struct MarketplaceUiPublishStep {
    driver: Arc<dyn UiDriver>,
    base_url: String,
    email: String,
    password: String,
    /// Precio tal y como se teclea en el formulario, p. ej. "5".
    price: String,
    /// Ventana de espera por elemento.
    wait: Duration,
}

impl MarketplaceUiPublishStep {
    pub fn new(driver: Arc<dyn UiDriver>,
               base_url: impl Into<String>,
               email: impl Into<String>,
               password: impl Into<String>,
               price: impl Into<String>)
               -> Self {
        Self { driver,
               base_url: base_url.into(),
               email: email.into(),
               password: password.into(),
               price: price.into(),
               wait: Duration::from_secs(10) }
    }

    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// Secuencia completa contra una sesión ya abierta. Separada de
    /// `execute` para que la liberación de la sesión quede fuera, en un
    /// único punto que cubre éxito y fallo. Toda interacción espera antes su
    /// elemento: los formularios de este sink montan campos de forma
    /// diferida y un fill directo fallaría aunque el campo llegue a tiempo.
    async fn drive(&self, session: &mut dyn crate::ui::UiSession, ctx: &StepContext) -> Result<String, UiError> {
        session.goto(&format!("{}/login", self.base_url)).await?;
        wait_for(session, SEL_LOGIN_EMAIL, self.wait).await?;
        session.fill(SEL_LOGIN_EMAIL, &self.email).await?;
        wait_for(session, SEL_LOGIN_PASSWORD, self.wait).await?;
        session.fill(SEL_LOGIN_PASSWORD, &self.password).await?;
        wait_for(session, SEL_LOGIN_BUTTON, self.wait).await?;
        session.click(SEL_LOGIN_BUTTON).await?;

        session.goto(&format!("{}/products/new", self.base_url)).await?;
        wait_for(session, SEL_PRODUCT_NAME, self.wait).await?;
        session.fill(SEL_PRODUCT_NAME, ctx.artifact.title()).await?;
        wait_for(session, SEL_PRODUCT_PRICE, self.wait).await?;
        session.fill(SEL_PRODUCT_PRICE, &self.price).await?;

        let file_name = format!("{}.md", slugify(ctx.artifact.title()));
        wait_for(session, SEL_FILE_INPUT, self.wait).await?;
        session.attach_bytes(SEL_FILE_INPUT, &file_name, ctx.artifact.body().as_bytes()).await?;

        wait_for(session, SEL_PUBLISH_BUTTON, self.wait).await?;
        with_action_timeout(SEL_PUBLISH_BUTTON, self.wait, session.click(SEL_PUBLISH_BUTTON)).await?;

        Ok(format!("{}/l/{}", self.base_url, slugify(ctx.artifact.title())))
    }
}

#[async_trait]
impl PublishStep for MarketplaceUiPublishStep {
    fn id(&self) -> &str {
        "marketplace_ui_publish"
    }

    fn binding(&self) -> InputBinding {
        InputBinding::SeedArtifact
    }

    async fn execute(&self, ctx: &StepContext) -> StepOutcome {
        let session = match self.driver.open().await {
            Ok(s) => s,
            Err(e) => return StepOutcome::failed(StepError::from(e)),
        };

        let mut guard = SessionGuard::new(session);
        let outcome = match guard.session() {
            Some(session) => self.drive(session, ctx).await,
            None => Err(UiError::Driver("session unavailable".into())),
        };
        if let Err(e) = guard.release().await {
            warn!("ui session did not release cleanly: {e}");
        }

        match outcome {
            Ok(url) => {
                info!("published '{}' via ui", ctx.artifact.title());
                StepOutcome::created(url)
            }
            Err(e) => StepOutcome::failed(e.into()),
        }
    }
}
