//! Publish steps concretos sobre los puertos de `clients`.
//!
//! Cada step traduce el resultado del cliente a un `StepOutcome`: los errores
//! se clasifican y quedan dentro del outcome, nunca se propagan como panic ni
//! como `Err` del trait.

mod marketplace;
mod page;
mod storage;
mod ui_publish;

pub use marketplace::{AttachFileStep, CreateProductStep, PublishProductStep};
pub use page::CreatePageStep;
pub use storage::StorageUploadStep;
pub use ui_publish::MarketplaceUiPublishStep;

/// Slug URL-safe derivado de un título: minúsculas, alfanuméricos y guiones.
pub(crate) fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
