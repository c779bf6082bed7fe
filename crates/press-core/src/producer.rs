//! Abstracción del productor de contenido + saneamiento determinista.
//!
//! El productor corre una única vez por corrida, antes de cualquier sink. Su
//! salida debe llegar ya saneada: comillas normalizadas y cuerpo truncado a
//! la cota configurada, de modo que ningún sink reciba un payload que viole
//! sus límites conocidos.

use async_trait::async_trait;

use crate::config::GenerationConfig;
use crate::errors::GenerationError;
use crate::model::Artifact;

/// Produce el `Artifact` de la corrida a partir de un topic.
///
/// Sin efectos locales: a lo sumo una llamada saliente al servicio de
/// generación. Un fallo aquí aborta la corrida antes del primer sink.
#[async_trait]
pub trait ContentProducer: Send + Sync {
    async fn produce(&self, topic: &str, config: &GenerationConfig) -> Result<Artifact, GenerationError>;
}

/// Normaliza comillas tipográficas a sus equivalentes ASCII.
pub fn normalize_quotes(input: &str) -> String {
    input.chars()
         .map(|c| match c {
             '\u{201C}' | '\u{201D}' => '"',
             '\u{2018}' | '\u{2019}' => '\'',
             other => other,
         })
         .collect()
}

/// Trunca a lo sumo `max` chars, respetando fronteras de char.
pub fn truncate_chars(input: &str, max: usize) -> String {
    match input.char_indices().nth(max) {
        Some((idx, _)) => input[..idx].to_string(),
        None => input.to_string(),
    }
}

/// Título saneado: comillas normalizadas, dobles comillas fuera, sin
/// espacios colgantes. Los servicios de generación suelen devolver topics
/// entre comillas.
pub fn sanitize_title(raw: &str) -> String {
    normalize_quotes(raw).replace('"', "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_quotes_straightens_curly_quotes() {
        assert_eq!(normalize_quotes("\u{201C}Daily\u{201D} \u{2018}Planner\u{2019}"), "\"Daily\" 'Planner'");
    }

    #[test]
    fn sanitize_title_strips_double_quotes_and_whitespace() {
        assert_eq!(sanitize_title("  \u{201C}Habit Tracker\u{201D} "), "Habit Tracker");
        assert_eq!(sanitize_title("\"Budget Planner\""), "Budget Planner");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("holá mundo", 4), "holá");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
        // determinista: misma entrada, misma salida
        assert_eq!(truncate_chars("xyz", 2), truncate_chars("xyz", 2));
    }
}
