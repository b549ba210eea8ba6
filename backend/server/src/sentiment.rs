//! # Sentiment
//!
//! Thin seam over the VADER scorer so handlers never touch the library directly.
use vader_sentiment::SentimentIntensityAnalyzer;

use crate::feedback::Sentiment;

pub trait SentimentScorer: Send + Sync {
    fn polarity_scores(&self, text: &str) -> Sentiment;
}

/// VADER lexicon scorer. The lexicons are process-wide statics, so an analyzer is just a pair of references
/// and costs nothing to build per call.
#[derive(Default, Clone, Copy)]
pub struct VaderScorer;

impl VaderScorer {
    pub fn new() -> Self {
        Self
    }
}

impl SentimentScorer for VaderScorer {
    fn polarity_scores(&self, text: &str) -> Sentiment {
        let analyzer = SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);
        let score = |key: &str| scores.get(key).copied().unwrap_or(0.0);

        Sentiment {
            neg: score("neg"),
            neu: score("neu"),
            pos: score("pos"),
            compound: score("compound"),
        }
    }
}
