//! # Stats
//!
//! Rollup served by `/api/admin/stats`.
//!
//! Each figure is its own store query. Nothing ties them to one snapshot, so a submission landing mid-rollup can
//! show up in one count and not another.
use serde::Serialize;

use crate::{
    database::FeedbackStore,
    error::StoreError,
    feedback::{Category, Emoji, FeedbackRecord},
};

#[derive(Serialize, Debug, Default, PartialEq, Eq)]
pub struct SentimentStats {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

impl SentimentStats {
    pub fn total(&self) -> u64 {
        self.positive + self.neutral + self.negative
    }
}

#[derive(Serialize, Debug, Default, PartialEq, Eq)]
pub struct EmojiStats {
    #[serde(rename = "😊")]
    pub happy: u64,
    #[serde(rename = "😐")]
    pub neutral: u64,
    #[serde(rename = "😢")]
    pub sad: u64,
}

impl EmojiStats {
    pub fn total(&self) -> u64 {
        self.happy + self.neutral + self.sad
    }
}

#[derive(Serialize, Debug)]
pub struct FeedbackStats {
    pub total_feedbacks: u64,
    pub sentiment_stats: SentimentStats,
    pub emoji_stats: EmojiStats,
    pub feedbacks: Vec<FeedbackRecord>,
}

pub async fn collect_stats(store: &dyn FeedbackStore) -> Result<FeedbackStats, StoreError> {
    let total_feedbacks = store.count_all().await?;

    let mut sentiment_stats = SentimentStats::default();
    for category in Category::ALL {
        let count = store.count_by_category(category).await?;

        match category {
            Category::Positive => sentiment_stats.positive = count,
            Category::Neutral => sentiment_stats.neutral = count,
            Category::Negative => sentiment_stats.negative = count,
        }
    }

    let mut emoji_stats = EmojiStats::default();
    for emoji in Emoji::ALL {
        let count = store.count_by_emoji(emoji).await?;

        match emoji {
            Emoji::Happy => emoji_stats.happy = count,
            Emoji::Neutral => emoji_stats.neutral = count,
            Emoji::Sad => emoji_stats.sad = count,
        }
    }

    let feedbacks = store.list_recent().await?;

    Ok(FeedbackStats {
        total_feedbacks,
        sentiment_stats,
        emoji_stats,
        feedbacks,
    })
}
