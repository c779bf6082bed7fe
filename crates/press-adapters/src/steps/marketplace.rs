//! Steps del marketplace: crear producto, adjuntar fichero, publicar.
//!
//! El ref que circula entre estos steps es el permalink del producto; cada
//! step encadenado lo recibe vía `ctx.input_ref` y lo re-expone en éxito
//! para el siguiente.

use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use press_core::{ArtifactBody, InputBinding, PublishStep, StepContext, StepOutcome};

use crate::clients::{MarketplaceApi, NewProduct, ProductRef};
use crate::steps::slugify;

/// Crea el producto en el marketplace (create-or-reuse por permalink) y
/// expone el permalink como ref para los steps siguientes.
pub struct CreateProductStep {
    api: Arc<dyn MarketplaceApi>,
    price_cents: u32,
    description: String,
}

impl CreateProductStep {
    pub fn new(api: Arc<dyn MarketplaceApi>, price_cents: u32, description: impl Into<String>) -> Self {
        Self { api,
               price_cents,
               description: description.into() }
    }

    async fn find_or_create(&self, permalink: &str, name: &str) -> Result<(ProductRef, bool), press_core::StepError> {
        if let Some(existing) = self.api.lookup_product(permalink).await? {
            return Ok((existing, true));
        }
        let product = NewProduct { name: name.to_string(),
                                   description: self.description.clone(),
                                   price_cents: self.price_cents,
                                   permalink: permalink.to_string() };
        match self.api.create_product(&product).await {
            Ok(created) => Ok((created, false)),
            // perdimos la carrera con otra corrida: el producto ya está ahí
            Err(e) if e.is_already_exists() => match self.api.lookup_product(permalink).await? {
                Some(existing) => Ok((existing, true)),
                None => Err(e.into()),
            },
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl PublishStep for CreateProductStep {
    fn id(&self) -> &str {
        "create_product"
    }

    fn binding(&self) -> InputBinding {
        InputBinding::SeedArtifact
    }

    async fn execute(&self, ctx: &StepContext) -> StepOutcome {
        let name = ctx.artifact.title();
        let permalink = slugify(name);
        match self.find_or_create(&permalink, name).await {
            Ok((product, reused)) => {
                if reused {
                    info!("product '{permalink}' already exists, reusing");
                    StepOutcome::reused(product.permalink)
                } else {
                    StepOutcome::created(product.permalink)
                }
            }
            Err(error) => StepOutcome::failed(error),
        }
    }
}

/// Adjunta el cuerpo del artifact como fichero del producto. Requiere el
/// permalink expuesto por `CreateProductStep` y lo re-expone para que el step
/// de publicación pueda encadenarse detrás.
pub struct AttachFileStep {
    api: Arc<dyn MarketplaceApi>,
}

impl AttachFileStep {
    pub fn new(api: Arc<dyn MarketplaceApi>) -> Self {
        Self { api }
    }

    fn file_name(ctx: &StepContext) -> String {
        let ext = match ctx.artifact.body() {
            ArtifactBody::Text(_) => "md",
            ArtifactBody::Binary(_) => "pdf",
        };
        format!("{}.{ext}", slugify(ctx.artifact.title()))
    }
}

#[async_trait]
impl PublishStep for AttachFileStep {
    fn id(&self) -> &str {
        "attach_file"
    }

    fn binding(&self) -> InputBinding {
        InputBinding::PrecedingRef
    }

    async fn execute(&self, ctx: &StepContext) -> StepOutcome {
        let permalink = match ctx.require_ref() {
            Ok(r) => r.as_str().to_string(),
            Err(e) => return StepOutcome::failed(e),
        };
        let product = match self.api.lookup_product(&permalink).await {
            Ok(Some(p)) => p,
            Ok(None) => {
                return StepOutcome::failed(press_core::StepError::internal(format!(
                    "product '{permalink}' disappeared between steps"
                )))
            }
            Err(e) => return StepOutcome::failed(e.into()),
        };
        let file_name = Self::file_name(ctx);
        match self.api.attach_file(&product.id, &file_name, ctx.artifact.body().as_bytes()).await {
            // re-expone el permalink para el siguiente step de la cadena
            Ok(()) => StepOutcome::created(permalink),
            Err(e) => StepOutcome::failed(e.into()),
        }
    }
}

/// Publica el producto y expone la URL pública del listing como ref final.
pub struct PublishProductStep {
    api: Arc<dyn MarketplaceApi>,
}

impl PublishProductStep {
    pub fn new(api: Arc<dyn MarketplaceApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PublishStep for PublishProductStep {
    fn id(&self) -> &str {
        "publish_product"
    }

    fn binding(&self) -> InputBinding {
        InputBinding::PrecedingRef
    }

    async fn execute(&self, ctx: &StepContext) -> StepOutcome {
        let permalink = match ctx.require_ref() {
            Ok(r) => r.as_str().to_string(),
            Err(e) => return StepOutcome::failed(e),
        };
        let product = match self.api.lookup_product(&permalink).await {
            Ok(Some(p)) => p,
            Ok(None) => {
                return StepOutcome::failed(press_core::StepError::internal(format!(
                    "product '{permalink}' disappeared between steps"
                )))
            }
            Err(e) => return StepOutcome::failed(e.into()),
        };
        match self.api.publish_product(&product.id).await {
            Ok(url) => StepOutcome::created(url),
            Err(e) => StepOutcome::failed(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::InMemoryMarketplaceApi;
    use press_core::{Artifact, ProducedRef, StepErrorKind, StepError};

    fn artifact() -> Artifact {
        Artifact::text("Daily Planner - Jun 01, 2025", "# body", "planner")
    }

    #[tokio::test]
    async fn create_product_reuses_an_existing_permalink() {
        let api = Arc::new(InMemoryMarketplaceApi::new("https://market.example"));
        let step = CreateProductStep::new(api.clone(), 500, "A printable planner");
        let ctx = StepContext::seeded(Arc::new(artifact()));

        let first = step.execute(&ctx).await;
        assert!(matches!(first, StepOutcome::Succeeded { reused: false, .. }));
        let second = step.execute(&ctx).await;
        let StepOutcome::Succeeded { produced_ref, reused } = second else {
            panic!("expected success");
        };
        assert!(reused);
        assert_eq!(produced_ref.as_str(), "daily-planner-jun-01-2025");
        assert_eq!(api.product_count(), 1);
    }

    #[tokio::test]
    async fn attach_requires_the_preceding_ref() {
        let api = Arc::new(InMemoryMarketplaceApi::new("https://market.example"));
        let step = AttachFileStep::new(api);
        let ctx = StepContext::seeded(Arc::new(artifact()));
        let StepOutcome::Failed { error } = step.execute(&ctx).await else {
            panic!("expected failure");
        };
        assert_eq!(error.kind, StepErrorKind::Internal);
    }

    #[tokio::test]
    async fn attach_names_the_file_after_the_title() {
        let api = Arc::new(InMemoryMarketplaceApi::new("https://market.example"));
        let create = CreateProductStep::new(api.clone(), 500, "d");
        let seed_ctx = StepContext::seeded(Arc::new(artifact()));
        let StepOutcome::Succeeded { produced_ref, .. } = create.execute(&seed_ctx).await else {
            panic!("create failed");
        };

        let attach = AttachFileStep::new(api.clone());
        let chained = StepContext::with_ref(Arc::new(artifact()), produced_ref.clone());
        let outcome = attach.execute(&chained).await;
        assert!(matches!(outcome, StepOutcome::Succeeded { .. }));
        assert_eq!(api.file_names(produced_ref.as_str()), vec!["daily-planner-jun-01-2025.md"]);
    }

    #[tokio::test]
    async fn publish_yields_the_public_listing_url() {
        let api = Arc::new(InMemoryMarketplaceApi::new("https://market.example"));
        let create = CreateProductStep::new(api.clone(), 500, "d");
        let seed_ctx = StepContext::seeded(Arc::new(artifact()));
        let StepOutcome::Succeeded { produced_ref, .. } = create.execute(&seed_ctx).await else {
            panic!("create failed");
        };

        let publish = PublishProductStep::new(api.clone());
        let chained = StepContext::with_ref(Arc::new(artifact()), produced_ref.clone());
        let StepOutcome::Succeeded { produced_ref: url, .. } = publish.execute(&chained).await else {
            panic!("publish failed");
        };
        assert_eq!(url.as_str(), "https://market.example/l/daily-planner-jun-01-2025");
        assert!(api.is_published("daily-planner-jun-01-2025"));
    }

    #[tokio::test]
    async fn publish_with_a_stale_ref_is_an_internal_error() {
        let api = Arc::new(InMemoryMarketplaceApi::new("https://market.example"));
        let publish = PublishProductStep::new(api);
        let ctx = StepContext::with_ref(Arc::new(artifact()), ProducedRef::new("gone"));
        let StepOutcome::Failed { error } = publish.execute(&ctx).await else {
            panic!("expected failure");
        };
        assert!(matches!(error, StepError { kind: StepErrorKind::Internal, .. }));
    }
}
