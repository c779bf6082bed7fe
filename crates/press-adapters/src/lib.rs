//! press-adapters: productores de contenido y sinks concretos sobre el
//! contrato de press-core.
//!
//! Dos familias de adapters detrás del mismo contrato `PublishStep`:
//! - adapters de API: una o más llamadas HTTP salientes, mapeando el
//!   envelope de éxito/fallo del servicio a un `StepOutcome` (transporte y
//!   rechazo remoto distinguidos en el `error.kind`);
//! - adapter de automatización de UI: guioniza un cliente interactivo cuando
//!   el sink no expone API utilizable, con esperas acotadas por elemento y
//!   liberación garantizada de la sesión.

pub mod clients;
pub mod producers;
pub mod steps;
pub mod ui;

pub use clients::{ClientError, GenerationApi, MarketplaceApi, NewProduct, PageApi, ProductRef, StorageApi};
pub use producers::{GeneratedTemplateProducer, PlannerTemplateProducer};
pub use steps::{AttachFileStep, CreatePageStep, CreateProductStep, MarketplaceUiPublishStep, PublishProductStep,
                StorageUploadStep};
pub use ui::{ElementScript, PageScript, ScriptedUiDriver, SessionGuard, UiDriver, UiError, UiSession};
