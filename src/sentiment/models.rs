use serde::{Deserialize, Serialize};

/// Raw polarity scores for a piece of text, as produced by a
/// [`SentimentAnalyzer`](super::SentimentAnalyzer).
///
/// `compound` is the single normalized polarity value in `[-1, 1]`;
/// `positive`/`negative`/`neutral` are proportions in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarityScores {
    pub compound: f64,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl PolarityScores {
    pub fn neutral() -> Self {
        Self {
            compound: 0.0,
            positive: 0.0,
            negative: 0.0,
            neutral: 1.0,
        }
    }
}

/// Classification of a message's overall sentiment.
///
/// Serialized lowercase (`positive`/`negative`/`neutral`) to match the
/// export record contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Derives the label from a compound score. The thresholds are fixed so
    /// every analyzer implementation classifies identically: `>= 0.05` is
    /// positive, `<= -0.05` is negative, everything between is neutral.
    pub fn from_compound(compound: f64) -> Self {
        if compound >= 0.05 {
            SentimentLabel::Positive
        } else if compound <= -0.05 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

/// Polarity scores plus the derived label. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentResult {
    pub scores: PolarityScores,
    pub label: SentimentLabel,
}

impl SentimentResult {
    pub fn from_scores(scores: PolarityScores) -> Self {
        Self {
            label: SentimentLabel::from_compound(scores.compound),
            scores,
        }
    }

    /// The fallback result used when an analyzer fails on a message; the
    /// message is stored with this rather than dropped.
    pub fn neutral() -> Self {
        Self::from_scores(PolarityScores::neutral())
    }
}
