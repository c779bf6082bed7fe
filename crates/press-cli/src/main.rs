use std::sync::Arc;

use press_adapters::clients::{CannedGenerationApi, HttpGenerationClient, HttpPageClient, InMemoryMarketplaceApi,
                              InMemoryPageApi, PageApi};
use press_adapters::producers::{GeneratedTemplateProducer, PlannerTemplateProducer};
use press_adapters::steps::{AttachFileStep, CreatePageStep, CreateProductStep, PublishProductStep};
use press_core::{ContentProducer, GenerationConfig, PipelineConfig, PipelineEngine, PipelineError, PipelineRun,
                 SinkConfig, SinkKind, StepStatus, TimeoutConfig, TopicRotation};

const DEFAULT_TOPICS: [&str; 5] = ["Daily Planner",
                                   "Weekly Meal Planner",
                                   "Habit Tracker",
                                   "Budget Planner",
                                   "Fitness Log"];

const DEMO_TEMPLATE: &str = "# Demo Template\n\n## Notes\n__________________________\n";

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn config_from_env() -> Result<PipelineConfig, PipelineError> {
    let max_length = env_or("PRESS_MAX_BODY_CHARS", "2000").parse::<usize>()
        .map_err(|_| PipelineError::Configuration("PRESS_MAX_BODY_CHARS must be a number".into()))?;
    let per_step_ms = env_or("PRESS_STEP_TIMEOUT_MS", "15000").parse::<u64>()
        .map_err(|_| PipelineError::Configuration("PRESS_STEP_TIMEOUT_MS must be a number".into()))?;
    let mut sinks = Vec::new();
    if let Ok(endpoint) = std::env::var("PRESS_PAGE_ENDPOINT") {
        sinks.push(SinkConfig { kind: SinkKind::Page,
                                endpoint,
                                credentials_ref: "PRESS_PAGE_TOKEN".into() });
    }
    Ok(PipelineConfig { generation: GenerationConfig { endpoint: env_or("PRESS_GENERATION_ENDPOINT", ""),
                                                       model: env_or("PRESS_GENERATION_MODEL", ""),
                                                       max_length },
                        sinks,
                        timeouts: TimeoutConfig { per_step_ms } })
}

/// Productor según entorno: servicio de generación si hay endpoint, plantilla
/// local si no. En modo demo el servicio se sustituye por uno enlatado.
fn pick_producer(config: &PipelineConfig, demo: bool) -> Result<Box<dyn ContentProducer>, PipelineError> {
    if demo {
        return Ok(Box::new(GeneratedTemplateProducer::new(Arc::new(CannedGenerationApi::new(DEMO_TEMPLATE)))));
    }
    if config.generation.endpoint.is_empty() {
        return Ok(Box::new(PlannerTemplateProducer::new()));
    }
    let client = HttpGenerationClient::from_config(&config.generation)?;
    Ok(Box::new(GeneratedTemplateProducer::new(Arc::new(client))))
}

fn pick_page_api(config: &PipelineConfig, demo: bool) -> Result<Arc<dyn PageApi>, PipelineError> {
    if !demo {
        if let Some(sink) = config.sinks.iter().find(|s| s.kind == SinkKind::Page) {
            return Ok(Arc::new(HttpPageClient::from_sink_config(sink)?));
        }
    }
    Ok(Arc::new(InMemoryPageApi::new("https://pages.local")))
}

fn report(run: &PipelineRun) {
    println!("run {} topic='{}' artifact='{}'", run.run_id, run.topic, run.artifact.title());
    for result in &run.results {
        match result.status {
            StepStatus::Succeeded => {
                let marker = if result.reused { "reused" } else { "ok" };
                println!("  [{marker}] {} -> {}",
                         result.step_id,
                         result.produced_ref.as_ref().map(|r| r.as_str()).unwrap_or("-"));
            }
            StepStatus::Failed => {
                println!("  [failed] {}: {}",
                         result.step_id,
                         result.error.as_ref().map(|e| e.to_string()).unwrap_or_default());
            }
            StepStatus::Skipped => {
                println!("  [skipped] {} (blocked on '{}')",
                         result.step_id,
                         result.blocked_on.as_deref().unwrap_or("-"));
            }
            StepStatus::Pending | StepStatus::Running => {
                println!("  [{:?}] {}", result.status, result.step_id);
            }
        }
    }
}

async fn run_pipeline(topic: &str, demo: bool, timeout_ms: Option<u64>) -> Result<bool, PipelineError> {
    let mut config = config_from_env()?;
    if let Some(ms) = timeout_ms {
        config.timeouts.per_step_ms = ms;
    }

    let producer = pick_producer(&config, demo)?;
    let page_api = pick_page_api(&config, demo)?;
    let market = Arc::new(InMemoryMarketplaceApi::new("https://market.local"));

    let price_cents = env_or("PRESS_PRODUCT_PRICE_CENTS", "500").parse::<u32>()
        .map_err(|_| PipelineError::Configuration("PRESS_PRODUCT_PRICE_CENTS must be a number".into()))?;

    let mut engine = PipelineEngine::builder().with_config(config)
                                              .boxed_producer(producer)
                                              .step(CreatePageStep::new(page_api))
                                              .step(CreateProductStep::new(market.clone(),
                                                                           price_cents,
                                                                           "A printable planner template"))
                                              .step(AttachFileStep::new(market.clone()))
                                              .step(PublishProductStep::new(market))
                                              .build()?;

    let run = engine.run(topic).await?;
    report(&run);
    Ok(run.fully_succeeded())
}

#[tokio::main]
async fn main() {
    // Cargar .env si existe para obtener PRESS_*
    let _ = dotenvy::dotenv();
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args[1] != "run" {
        eprintln!("Uso: press-cli run [--topic <TXT>] [--demo] [--timeout-ms <N>]");
        std::process::exit(2);
    }

    let mut topic: Option<String> = None;
    let mut demo = false;
    let mut timeout_ms: Option<u64> = None;
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--topic" => {
                i += 1;
                if i < args.len() { topic = Some(args[i].clone()); }
            }
            "--demo" => demo = true,
            "--timeout-ms" => {
                i += 1;
                if i < args.len() { timeout_ms = args[i].parse::<u64>().ok(); }
            }
            other => {
                eprintln!("[press run] argumento desconocido: {other}");
                std::process::exit(2);
            }
        }
        i += 1;
    }

    // Sin --topic, rota por el calendario: el topic del día es función pura
    // de la fecha.
    let topic = match topic {
        Some(t) => t,
        None => {
            let rotation = match TopicRotation::new(DEFAULT_TOPICS.iter().map(|s| s.to_string()).collect()) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("[press run] {e}");
                    std::process::exit(3);
                }
            };
            rotation.today().to_string()
        }
    };

    match run_pipeline(&topic, demo, timeout_ms).await {
        Ok(true) => std::process::exit(0),
        Ok(false) => {
            eprintln!("[press run] la corrida terminó con steps fallidos o saltados");
            std::process::exit(4);
        }
        Err(e @ PipelineError::Configuration(_)) => {
            eprintln!("[press run] {e}");
            std::process::exit(3);
        }
        Err(e) => {
            eprintln!("[press run] {e}");
            std::process::exit(4);
        }
    }
}
