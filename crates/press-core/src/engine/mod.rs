//! Orquestador del pipeline.

mod builder;
mod core;

pub use builder::PipelineBuilder;
pub use core::PipelineEngine;
