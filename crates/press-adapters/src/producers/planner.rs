//! Plantilla de planner diaria construida en local.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use press_core::{truncate_chars, Artifact, ContentProducer, GenerationConfig, GenerationError};

const SECTIONS: [&str; 7] = ["Morning Routine",
                             "To-Do List",
                             "Appointments",
                             "Meals",
                             "Water Intake",
                             "Self-Care",
                             "Evening Reflection"];

const RULED_LINE: &str = "__________________________";
const LINES_PER_SECTION: usize = 5;

/// Productor determinista: mismo topic y misma fecha producen el mismo
/// artifact. No hace llamadas salientes, así que nunca devuelve
/// `Unreachable`.
#[derive(Debug, Clone, Default)]
pub struct PlannerTemplateProducer {
    /// Fecha fija para el título; `None` usa la fecha del día.
    date: Option<NaiveDate>,
}

impl PlannerTemplateProducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date(date: NaiveDate) -> Self {
        Self { date: Some(date) }
    }

    fn render(&self, topic: &str) -> (String, String) {
        let date = self.date.unwrap_or_else(|| Utc::now().date_naive());
        let title = format!("{topic} - {}", date.format("%b %d, %Y"));
        let mut body = format!("# {title}\n");
        for section in SECTIONS {
            body.push_str(&format!("\n## {section}\n"));
            for _ in 0..LINES_PER_SECTION {
                body.push_str(RULED_LINE);
                body.push('\n');
            }
        }
        (title, body)
    }
}

#[async_trait]
impl ContentProducer for PlannerTemplateProducer {
    async fn produce(&self, topic: &str, config: &GenerationConfig) -> Result<Artifact, GenerationError> {
        let (title, body) = self.render(topic);
        Ok(Artifact::text(title, truncate_chars(&body, config.max_length), topic))
    }
}
