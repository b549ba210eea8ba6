//! # Feedback
//!
//! The only domain entity. A record is built once by the submission handler and is read-only afterwards.
//!
//! ## Category
//!
//! Derived from `sentiment.compound` with the usual VADER thresholds:
//!
//! - `compound >= 0.05` is **positive**
//! - `compound <= -0.05` is **negative**
//! - anything in between is **neutral**
//!
//! ## Emoji
//!
//! Three-valued rating. The pictographs are the canonical wire form since the dashboard keys its charts on them,
//! the plain names are accepted on input.
use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const POSITIVE_THRESHOLD: f64 = 0.05;
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Positive,
    Neutral,
    Negative,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Positive, Category::Neutral, Category::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Positive => "positive",
            Category::Neutral => "neutral",
            Category::Negative => "negative",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a compound score onto a category. Both thresholds are inclusive.
pub fn classify(compound: f64) -> Category {
    if compound >= POSITIVE_THRESHOLD {
        Category::Positive
    } else if compound <= NEGATIVE_THRESHOLD {
        Category::Negative
    } else {
        Category::Neutral
    }
}

/// Deserializes through [`FromStr`], so stored records and request bodies accept the same spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Emoji {
    #[serde(rename = "😊")]
    Happy,
    #[serde(rename = "😐")]
    Neutral,
    #[serde(rename = "😢")]
    Sad,
}

impl Emoji {
    pub const ALL: [Emoji; 3] = [Emoji::Happy, Emoji::Neutral, Emoji::Sad];

    pub fn symbol(&self) -> &'static str {
        match self {
            Emoji::Happy => "😊",
            Emoji::Neutral => "😐",
            Emoji::Sad => "😢",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Emoji::Happy => "happy",
            Emoji::Neutral => "neutral",
            Emoji::Sad => "sad",
        }
    }
}

impl fmt::Display for Emoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEmoji(pub String);

impl fmt::Display for UnknownEmoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown emoji {:?}", self.0)
    }
}

impl FromStr for Emoji {
    type Err = UnknownEmoji;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emoji::ALL
            .into_iter()
            .find(|e| s == e.symbol() || s.eq_ignore_ascii_case(e.name()))
            .ok_or_else(|| UnknownEmoji(s.to_string()))
    }
}

impl TryFrom<String> for Emoji {
    type Error = UnknownEmoji;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Polarity scores as reported by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sentiment {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub feedback: String,
    pub event: String,
    pub emoji: Emoji,
    pub sentiment: Sentiment,
    pub category: Category,
    pub timestamp: DateTime<Utc>,
}

impl FeedbackRecord {
    /// Builds a record stamped with the current UTC instant.
    pub fn new(feedback: String, event: String, emoji: Emoji, sentiment: Sentiment) -> Self {
        Self::at(feedback, event, emoji, sentiment, Utc::now())
    }

    pub fn at(
        feedback: String,
        event: String,
        emoji: Emoji,
        sentiment: Sentiment,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            category: classify(sentiment.compound),
            feedback,
            event,
            emoji,
            sentiment,
            timestamp,
        }
    }
}
