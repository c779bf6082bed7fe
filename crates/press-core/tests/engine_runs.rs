//! Tests de integración del orquestador: escenarios A/B/C del diseño,
//! aislamiento de fallos, timeouts acotados y paridad del replay.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use press_core::{event_variants, replay, Artifact, ContentProducer, GenerationConfig, GenerationError, InputBinding,
                 PipelineConfig, PipelineEngine, PipelineError, PublishStep, StepContext, StepErrorKind, StepOutcome,
                 StepStatus, TimeoutConfig};

/// Productor de prueba: texto fijo o fallo de generación.
struct StubProducer {
    fail: bool,
    body: String,
}

impl StubProducer {
    fn ok(body: &str) -> Self {
        Self { fail: false,
               body: body.to_string() }
    }

    fn failing() -> Self {
        Self { fail: true,
               body: String::new() }
    }
}

#[async_trait]
impl ContentProducer for StubProducer {
    async fn produce(&self, topic: &str, _config: &GenerationConfig) -> Result<Artifact, GenerationError> {
        if self.fail {
            return Err(GenerationError::Unreachable("stub generation down".into()));
        }
        Ok(Artifact::text(topic, self.body.clone(), topic))
    }
}

/// Comportamiento de un step de prueba.
enum Behavior {
    Ok(&'static str),
    Fail(StepErrorKind),
    Hang(Duration),
}

struct StubStep {
    id: &'static str,
    binding: InputBinding,
    behavior: Behavior,
}

impl StubStep {
    fn seeded(id: &'static str, behavior: Behavior) -> Self {
        Self { id,
               binding: InputBinding::SeedArtifact,
               behavior }
    }

    fn chained(id: &'static str, behavior: Behavior) -> Self {
        Self { id,
               binding: InputBinding::PrecedingRef,
               behavior }
    }
}

#[async_trait]
impl PublishStep for StubStep {
    fn id(&self) -> &str {
        self.id
    }

    fn binding(&self) -> InputBinding {
        self.binding
    }

    async fn execute(&self, ctx: &StepContext) -> StepOutcome {
        match &self.behavior {
            Behavior::Ok(suffix) => {
                // los steps encadenados deben recibir el ref anterior
                if self.binding == InputBinding::PrecedingRef {
                    match ctx.require_ref() {
                        Ok(input) => StepOutcome::created(format!("{input}/{suffix}")),
                        Err(e) => StepOutcome::failed(e),
                    }
                } else {
                    StepOutcome::created(format!("https://sink.example/{suffix}"))
                }
            }
            Behavior::Fail(kind) => StepOutcome::failed(press_core::StepError::new(*kind, "stub failure")),
            Behavior::Hang(d) => {
                tokio::time::sleep(*d).await;
                StepOutcome::created("https://sink.example/late")
            }
        }
    }
}

fn short_timeout_config(ms: u64) -> PipelineConfig {
    PipelineConfig { timeouts: TimeoutConfig { per_step_ms: ms },
                     ..Default::default() }
}

#[tokio::test]
async fn scenario_a_all_steps_succeed() {
    let mut engine = PipelineEngine::builder().producer(StubProducer::ok(&"x".repeat(50)))
                                              .step(StubStep::seeded("create_page", Behavior::Ok("page")))
                                              .step(StubStep::seeded("create_product", Behavior::Ok("product")))
                                              .step(StubStep::chained("attach_file", Behavior::Ok("file")))
                                              .build()
                                              .expect("build");

    let run = engine.run("Daily Planner").await.expect("run");
    assert_eq!(run.results.len(), 3);
    assert!(run.fully_succeeded());
    let attach = run.result("attach_file").expect("attach result");
    let attach_ref = attach.produced_ref.as_ref().expect("attach ref");
    assert!(!attach_ref.as_str().is_empty());
    // el ref encadenado parte del ref del step anterior
    assert!(attach_ref.as_str().starts_with("https://sink.example/product"));
    assert_eq!(run.topic, "Daily Planner");
}

#[tokio::test]
async fn scenario_b_timeout_skips_dependent_but_not_independent() {
    let mut engine =
        PipelineEngine::builder().with_config(short_timeout_config(100))
                                 .producer(StubProducer::ok("body"))
                                 .step(StubStep::seeded("create_page", Behavior::Ok("page")))
                                 .step(StubStep::seeded("create_product", Behavior::Hang(Duration::from_secs(30))))
                                 .step(StubStep::chained("attach_file", Behavior::Ok("file")))
                                 .build()
                                 .expect("build");

    let run = engine.run("Daily Planner").await.expect("run");
    assert_eq!(run.results.len(), 3);

    let page = run.result("create_page").expect("page");
    assert_eq!(page.status, StepStatus::Succeeded);

    let product = run.result("create_product").expect("product");
    assert_eq!(product.status, StepStatus::Failed);
    assert_eq!(product.error.as_ref().expect("error").kind, StepErrorKind::Timeout);

    let attach = run.result("attach_file").expect("attach");
    assert_eq!(attach.status, StepStatus::Skipped);
    assert_eq!(attach.blocked_on.as_deref(), Some("create_product"));
    assert!(attach.produced_ref.is_none());
}

#[tokio::test]
async fn scenario_c_generation_failure_aborts_before_any_sink() {
    let mut engine = PipelineEngine::builder().producer(StubProducer::failing())
                                              .step(StubStep::seeded("create_page", Behavior::Ok("page")))
                                              .step(StubStep::seeded("create_product", Behavior::Ok("product")))
                                              .build()
                                              .expect("build");

    let err = engine.run("Daily Planner").await.expect_err("must abort");
    assert!(matches!(err, PipelineError::Generation(GenerationError::Unreachable(_))));
}

#[tokio::test]
async fn failed_step_does_not_stop_later_independent_steps() {
    let mut engine = PipelineEngine::builder().producer(StubProducer::ok("body"))
                                              .step(StubStep::seeded("create_page", Behavior::Fail(StepErrorKind::Transport)))
                                              .step(StubStep::seeded("storage_upload", Behavior::Ok("obj")))
                                              .step(StubStep::seeded("ui_publish", Behavior::Ok("listing")))
                                              .build()
                                              .expect("build");

    let run = engine.run("Habit Tracker").await.expect("run");
    assert_eq!(run.failed_steps().len(), 1);
    assert_eq!(run.result("storage_upload").expect("storage").status, StepStatus::Succeeded);
    assert_eq!(run.result("ui_publish").expect("ui").status, StepStatus::Succeeded);
}

#[tokio::test]
async fn skip_cascades_down_a_chain() {
    let mut engine = PipelineEngine::builder().producer(StubProducer::ok("body"))
                                              .step(StubStep::seeded("create_product", Behavior::Fail(StepErrorKind::RemoteRejection)))
                                              .step(StubStep::chained("attach_file", Behavior::Ok("file")))
                                              .step(StubStep::chained("publish_product", Behavior::Ok("live")))
                                              .build()
                                              .expect("build");

    let run = engine.run("Budget Tracker").await.expect("run");
    assert_eq!(run.result("attach_file").expect("attach").status, StepStatus::Skipped);
    let publish = run.result("publish_product").expect("publish");
    assert_eq!(publish.status, StepStatus::Skipped);
    assert_eq!(publish.blocked_on.as_deref(), Some("attach_file"));
}

#[tokio::test]
async fn every_step_reaches_a_terminal_state() {
    let mut engine = PipelineEngine::builder().with_config(short_timeout_config(100))
                                              .producer(StubProducer::ok("body"))
                                              .step(StubStep::seeded("a", Behavior::Ok("a")))
                                              .step(StubStep::seeded("b", Behavior::Fail(StepErrorKind::Transport)))
                                              .step(StubStep::chained("c", Behavior::Ok("c")))
                                              .step(StubStep::seeded("d", Behavior::Hang(Duration::from_secs(5))))
                                              .step(StubStep::seeded("e", Behavior::Ok("e")))
                                              .build()
                                              .expect("build");

    let run = engine.run("t").await.expect("run");
    assert_eq!(run.results.len(), 5);
    assert!(run.results.iter().all(|r| r.status.is_terminal()));
}

#[tokio::test]
async fn timeout_is_bounded_and_never_hangs() {
    let mut engine = PipelineEngine::builder().with_config(short_timeout_config(100))
                                              .producer(StubProducer::ok("body"))
                                              .step(StubStep::seeded("slow", Behavior::Hang(Duration::from_secs(60))))
                                              .build()
                                              .expect("build");

    let started = Instant::now();
    let run = engine.run("t").await.expect("run");
    // ventana de timeout más un margen acotado, nunca los 60s del step
    assert!(started.elapsed() < Duration::from_secs(5));
    let slow = run.result("slow").expect("slow");
    assert_eq!(slow.status, StepStatus::Failed);
    assert_eq!(slow.error.as_ref().expect("error").kind, StepErrorKind::Timeout);
}

#[tokio::test]
async fn replay_matches_direct_results() {
    let mut engine = PipelineEngine::builder().producer(StubProducer::ok("body"))
                                              .step(StubStep::seeded("create_page", Behavior::Ok("page")))
                                              .step(StubStep::seeded("create_product", Behavior::Fail(StepErrorKind::Transport)))
                                              .step(StubStep::chained("attach_file", Behavior::Ok("file")))
                                              .build()
                                              .expect("build");

    let run = engine.run("t").await.expect("run");
    let replayed = replay(&engine.definition().step_ids(), &engine.events(run.run_id));
    assert_eq!(replayed.len(), run.results.len());
    for (a, b) in replayed.iter().zip(run.results.iter()) {
        assert_eq!(a.step_id, b.step_id);
        assert_eq!(a.status, b.status);
        assert_eq!(a.produced_ref, b.produced_ref);
        assert_eq!(a.blocked_on, b.blocked_on);
        assert_eq!(a.error.as_ref().map(|e| e.kind), b.error.as_ref().map(|e| e.kind));
    }
}

#[tokio::test]
async fn event_log_has_the_expected_shape() {
    let mut engine = PipelineEngine::builder().producer(StubProducer::ok("body"))
                                              .step(StubStep::seeded("create_page", Behavior::Ok("page")))
                                              .step(StubStep::seeded("create_product", Behavior::Fail(StepErrorKind::Transport)))
                                              .step(StubStep::chained("attach_file", Behavior::Ok("file")))
                                              .build()
                                              .expect("build");

    let run = engine.run("t").await.expect("run");
    let variants = event_variants(&engine.events(run.run_id));
    assert_eq!(variants, vec!["I", "A", "S", "F", "S", "X", "K", "C"]);
}

#[tokio::test]
async fn generation_abort_never_invokes_a_sink_step() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingStep {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PublishStep for CountingStep {
        fn id(&self) -> &str {
            "create_page"
        }

        fn binding(&self) -> InputBinding {
            InputBinding::SeedArtifact
        }

        async fn execute(&self, _ctx: &StepContext) -> StepOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            StepOutcome::created("https://sink.example/page")
        }
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let mut engine = PipelineEngine::builder().producer(StubProducer::failing())
                                              .step(CountingStep { calls: calls.clone() })
                                              .build()
                                              .expect("build");

    let err = engine.run("t").await.expect_err("abort");
    assert!(matches!(err, PipelineError::Generation(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn first_step_with_preceding_ref_is_rejected() {
    let err = PipelineEngine::builder().producer(StubProducer::ok("body"))
                                       .step(StubStep::chained("attach_file", Behavior::Ok("file")))
                                       .build()
                                       .err()
                                       .expect("must be rejected");
    assert!(matches!(err, PipelineError::Configuration(_)));
}

#[test]
fn duplicate_step_ids_are_rejected() {
    let err = PipelineEngine::builder().producer(StubProducer::ok("body"))
                                       .step(StubStep::seeded("create_page", Behavior::Ok("a")))
                                       .step(StubStep::seeded("create_page", Behavior::Ok("b")))
                                       .build()
                                       .err()
                                       .expect("must be rejected");
    assert!(matches!(err, PipelineError::Configuration(_)));
}

#[test]
fn missing_producer_is_a_configuration_error() {
    let err = PipelineEngine::builder().step(StubStep::seeded("create_page", Behavior::Ok("a")))
                                       .build()
                                       .err()
                                       .expect("must be rejected");
    assert!(matches!(err, PipelineError::Configuration(_)));
}
