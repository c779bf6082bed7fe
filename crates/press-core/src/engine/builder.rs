//! Builder para `PipelineEngine`.
//!
//! Acumula productor, steps y configuración, y valida la definición al
//! construir: ids duplicados o un primer step encadenado a un ref
//! inexistente son `Configuration` antes de tocar sink alguno.

use crate::config::PipelineConfig;
use crate::definition::build_definition;
use crate::engine::PipelineEngine;
use crate::errors::PipelineError;
use crate::event::EventStore;
use crate::producer::ContentProducer;
use crate::step::PublishStep;

pub struct PipelineBuilder<E: EventStore> {
    event_store: E,
    config: PipelineConfig,
    producer: Option<Box<dyn ContentProducer>>,
    steps: Vec<Box<dyn PublishStep>>,
}

impl<E: EventStore> PipelineBuilder<E> {
    pub fn new(event_store: E) -> Self {
        Self { event_store,
               config: PipelineConfig::default(),
               producer: None,
               steps: Vec::new() }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn producer(mut self, producer: impl ContentProducer + 'static) -> Self {
        self.producer = Some(Box::new(producer));
        self
    }

    pub fn boxed_producer(mut self, producer: Box<dyn ContentProducer>) -> Self {
        self.producer = Some(producer);
        self
    }

    pub fn step(mut self, step: impl PublishStep + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Construye el engine, validando configuración y definición.
    pub fn build(self) -> Result<PipelineEngine<E>, PipelineError> {
        let producer = self.producer
                           .ok_or_else(|| PipelineError::Configuration("pipeline needs a content producer".into()))?;
        self.config.validate()?;
        let definition = build_definition(self.steps);
        definition.validate()?;
        Ok(PipelineEngine::from_parts(self.event_store, self.config, producer, definition))
    }
}
