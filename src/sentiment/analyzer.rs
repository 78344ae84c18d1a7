use std::collections::HashMap;

use lazy_static::lazy_static;
use thiserror::Error;

use super::models::PolarityScores;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Lexicon unavailable: {0}")]
    Lexicon(String),

    #[error("Analyzer failed: {0}")]
    Failed(String),
}

/// Contract for the pluggable scoring step: pure, stateless, deterministic
/// for a given text and lexicon version. Implementations must accept empty
/// and non-ASCII input without failing; by convention such input scores
/// neutral. Ingestion tolerates errors anyway and stores the message with a
/// neutral result.
pub trait SentimentAnalyzer: Send + Sync {
    fn polarity_scores(&self, text: &str) -> Result<PolarityScores, AnalyzerError>;
}

// Valence normalization constant; keeps single strong words from pinning
// the compound score at the extremes.
const NORMALIZATION_ALPHA: f64 = 15.0;

lazy_static! {
    static ref LEXICON: HashMap<&'static str, f64> = {
        let entries: [(&'static str, f64); 48] = [
            ("amazing", 2.8),
            ("awesome", 3.1),
            ("best", 3.2),
            ("cool", 1.3),
            ("epic", 2.5),
            ("excellent", 2.7),
            ("fun", 2.3),
            ("good", 1.9),
            ("great", 3.1),
            ("happy", 2.7),
            ("hype", 2.4),
            ("incredible", 2.8),
            ("insane", 1.7),
            ("legend", 2.2),
            ("lit", 2.4),
            ("love", 3.2),
            ("nice", 1.8),
            ("perfect", 2.7),
            ("pog", 2.6),
            ("poggers", 2.6),
            ("sick", 1.5),
            ("win", 2.8),
            ("wonderful", 2.7),
            ("wow", 2.8),
            ("clutch", 2.0),
            ("goat", 2.5),
            ("annoying", -1.7),
            ("awful", -2.0),
            ("bad", -2.5),
            ("boring", -1.3),
            ("broken", -1.6),
            ("cringe", -1.8),
            ("fail", -2.3),
            ("garbage", -2.2),
            ("hate", -2.7),
            ("lag", -1.4),
            ("lame", -1.8),
            ("lose", -2.1),
            ("mad", -1.9),
            ("meh", -0.8),
            ("sad", -2.1),
            ("scam", -2.4),
            ("stupid", -2.4),
            ("terrible", -2.1),
            ("toxic", -2.2),
            ("trash", -2.3),
            ("ugly", -2.3),
            ("worst", -3.1),
        ];
        entries.iter().copied().collect()
    };
}

/// Built-in valence-lexicon analyzer, the default scoring implementation.
/// Token valences are summed and the total is normalized into `[-1, 1]`.
/// Anything more sophisticated plugs in behind [`SentimentAnalyzer`].
pub struct LexiconAnalyzer;

impl LexiconAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LexiconAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer for LexiconAnalyzer {
    fn polarity_scores(&self, text: &str) -> Result<PolarityScores, AnalyzerError> {
        let tokens: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
            .collect();

        if tokens.is_empty() {
            return Ok(PolarityScores::neutral());
        }

        let mut valence_sum = 0.0;
        let mut positive_hits = 0usize;
        let mut negative_hits = 0usize;
        for token in &tokens {
            if let Some(valence) = LEXICON.get(token.as_str()) {
                valence_sum += valence;
                if *valence > 0.0 {
                    positive_hits += 1;
                } else {
                    negative_hits += 1;
                }
            }
        }

        let compound = valence_sum / (valence_sum * valence_sum + NORMALIZATION_ALPHA).sqrt();
        let total = tokens.len() as f64;
        let positive = positive_hits as f64 / total;
        let negative = negative_hits as f64 / total;

        Ok(PolarityScores {
            compound: compound.clamp(-1.0, 1.0),
            positive,
            negative,
            neutral: (1.0 - positive - negative).max(0.0),
        })
    }
}
