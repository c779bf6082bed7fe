//! Step de subida a storage de ficheros.

use std::sync::Arc;

use async_trait::async_trait;

use press_core::{ArtifactBody, InputBinding, PublishStep, StepContext, StepOutcome};

use crate::clients::StorageApi;
use crate::steps::slugify;

/// Sube el cuerpo del artifact bajo `base_path`. Sobrescribe: re-ejecutar la
/// misma corrida deja el mismo objeto, no duplicados.
pub struct StorageUploadStep {
    api: Arc<dyn StorageApi>,
    base_path: String,
}

impl StorageUploadStep {
    pub fn new(api: Arc<dyn StorageApi>, base_path: impl Into<String>) -> Self {
        Self { api,
               base_path: base_path.into() }
    }
}

#[async_trait]
impl PublishStep for StorageUploadStep {
    fn id(&self) -> &str {
        "storage_upload"
    }

    fn binding(&self) -> InputBinding {
        InputBinding::SeedArtifact
    }

    async fn execute(&self, ctx: &StepContext) -> StepOutcome {
        let ext = match ctx.artifact.body() {
            ArtifactBody::Text(_) => "md",
            ArtifactBody::Binary(_) => "pdf",
        };
        let path = format!("{}/{}.{ext}", self.base_path.trim_end_matches('/'), slugify(ctx.artifact.title()));
        match self.api.upload(&path, ctx.artifact.body().as_bytes(), true).await {
            Ok(url) => StepOutcome::created(url),
            Err(e) => StepOutcome::failed(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::InMemoryStorageApi;
    use press_core::Artifact;

    #[tokio::test]
    async fn uploads_under_the_base_path() {
        let api = Arc::new(InMemoryStorageApi::new());
        let step = StorageUploadStep::new(api.clone(), "planners/");
        let ctx = StepContext::seeded(Arc::new(Artifact::text("Daily Planner", "# body", "planner")));

        let StepOutcome::Succeeded { produced_ref, .. } = step.execute(&ctx).await else {
            panic!("expected success");
        };
        assert_eq!(produced_ref.as_str(), "mem://planners/daily-planner.md");

        // segunda corrida: mismo objeto, sin duplicados
        step.execute(&ctx).await;
        assert_eq!(api.object_count(), 1);
    }
}
