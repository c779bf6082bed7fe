//! Productores de contenido concretos.
//!
//! - `PlannerTemplateProducer`: plantilla determinista construida en local,
//!   sin llamadas salientes.
//! - `GeneratedTemplateProducer`: delega el cuerpo en un servicio de
//!   generación de texto y sanea la salida antes de entregar el artifact.

mod generated;
mod planner;

pub use generated::GeneratedTemplateProducer;
pub use planner::PlannerTemplateProducer;
