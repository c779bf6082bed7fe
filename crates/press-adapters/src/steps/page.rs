//! Step de creación de página en el workspace remoto.

use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use press_core::{InputBinding, PublishStep, StepContext, StepError, StepOutcome};

use crate::clients::PageApi;

/// Crea una página con el título y cuerpo del artifact. Find-or-create: si
/// ya existe una página con ese título exacto, se reutiliza su URL en lugar
/// de duplicarla.
pub struct CreatePageStep {
    api: Arc<dyn PageApi>,
}

impl CreatePageStep {
    pub fn new(api: Arc<dyn PageApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PublishStep for CreatePageStep {
    fn id(&self) -> &str {
        "create_page"
    }

    fn binding(&self) -> InputBinding {
        InputBinding::SeedArtifact
    }

    async fn execute(&self, ctx: &StepContext) -> StepOutcome {
        let title = ctx.artifact.title();
        let body = match ctx.artifact.body().as_text() {
            Some(text) => text,
            None => {
                return StepOutcome::failed(StepError::internal("page sink only accepts text artifacts"))
            }
        };

        match self.api.find_page(title).await {
            Ok(Some(url)) => {
                info!("page '{title}' already exists, reusing");
                return StepOutcome::reused(url);
            }
            Ok(None) => {}
            Err(e) => return StepOutcome::failed(e.into()),
        }

        match self.api.create_page(title, body).await {
            Ok(url) => StepOutcome::created(url),
            Err(e) => StepOutcome::failed(e.into()),
        }
    }
}
