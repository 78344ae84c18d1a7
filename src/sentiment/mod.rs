mod analyzer;
mod models;

pub use analyzer::{AnalyzerError, LexiconAnalyzer, SentimentAnalyzer};
pub use models::{PolarityScores, SentimentLabel, SentimentResult};
