//! # Redis
//!
//! Document store for feedback records.
//!
//! Records are written once and never touched again, so the layout only has to serve one insert path and a
//! handful of counts.
//!
//! ## Layout
//!
//! - `feedback:records`: hash of id to the JSON record (without the id)
//! - `feedback:timeline`: sorted set of ids scored by timestamp in milliseconds
//! - `feedback:category:<category>`: set of ids per category
//! - `feedback:emoji:<name>`: set of ids per emoji
//!
//! ## Implementation
//!
//! - Ids are UUID v4 strings generated before the write
//! - Insert is one `MULTI` pipeline, so a record and its index entries land together
//! - Counts are `ZCARD`/`SCARD`, each an independent round trip
//! - Listing is `ZREVRANGE` then `HMGET`, most recent first. Ids left without a record are logged and skipped
//!
//! [`MemoryStore`] mirrors the same contract in-process for tests and local runs.
use async_trait::async_trait;
use redis::{
    AsyncCommands, Client, Pipeline,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use crate::{
    error::StoreError,
    feedback::{Category, Emoji, FeedbackRecord},
};

pub const RECORDS_KEY: &str = "feedback:records";
pub const TIMELINE_KEY: &str = "feedback:timeline";

fn category_key(category: Category) -> String {
    format!("feedback:category:{category}")
}

fn emoji_key(emoji: Emoji) -> String {
    format!("feedback:emoji:{}", emoji.name())
}

#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Persists a record and returns its newly assigned id.
    async fn insert(&self, record: &FeedbackRecord) -> Result<String, StoreError>;

    async fn count_all(&self) -> Result<u64, StoreError>;

    async fn count_by_category(&self, category: Category) -> Result<u64, StoreError>;

    async fn count_by_emoji(&self, emoji: Emoji) -> Result<u64, StoreError>;

    /// Every record, most recent first.
    async fn list_recent(&self) -> Result<Vec<FeedbackRecord>, StoreError>;
}

pub struct RedisStore {
    connection: ConnectionManager,
}

pub async fn init_redis(redis_url: &str) -> Result<RedisStore, StoreError> {
    let config = ConnectionManagerConfig::new().set_number_of_retries(1);

    let client = Client::open(redis_url)?;
    let connection = client.get_connection_manager_with_config(config).await?;

    Ok(RedisStore { connection })
}

fn insert_pipeline(id: &str, document: &str, record: &FeedbackRecord) -> Pipeline {
    let mut pipeline = redis::pipe();

    pipeline
        .atomic()
        .hset(RECORDS_KEY, id, document)
        .ignore()
        .zadd(TIMELINE_KEY, id, record.timestamp.timestamp_millis())
        .ignore()
        .sadd(category_key(record.category), id)
        .ignore()
        .sadd(emoji_key(record.emoji), id)
        .ignore();

    pipeline
}

/// Pairs `ZREVRANGE` ids with their `HMGET` documents. An id without a document is skipped and logged.
fn decode_documents(
    ids: Vec<String>,
    documents: Vec<Option<String>>,
) -> Result<Vec<FeedbackRecord>, StoreError> {
    let mut records = Vec::with_capacity(ids.len());

    for (id, document) in ids.into_iter().zip(documents) {
        let Some(document) = document else {
            warn!("Feedback {id} is on the timeline but has no record, skipping");
            continue;
        };

        let record: FeedbackRecord = serde_json::from_str(&document)
            .map_err(|source| StoreError::Corrupt { id, source })?;
        records.push(record);
    }

    Ok(records)
}

#[async_trait]
impl FeedbackStore for RedisStore {
    async fn insert(&self, record: &FeedbackRecord) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let document = serde_json::to_string(record)?;
        let mut connection = self.connection.clone();

        let _: () = insert_pipeline(&id, &document, record)
            .query_async(&mut connection)
            .await?;

        Ok(id)
    }

    async fn count_all(&self) -> Result<u64, StoreError> {
        let mut connection = self.connection.clone();
        let count: u64 = connection.zcard(TIMELINE_KEY).await?;

        Ok(count)
    }

    async fn count_by_category(&self, category: Category) -> Result<u64, StoreError> {
        let mut connection = self.connection.clone();
        let count: u64 = connection.scard(category_key(category)).await?;

        Ok(count)
    }

    async fn count_by_emoji(&self, emoji: Emoji) -> Result<u64, StoreError> {
        let mut connection = self.connection.clone();
        let count: u64 = connection.scard(emoji_key(emoji)).await?;

        Ok(count)
    }

    async fn list_recent(&self) -> Result<Vec<FeedbackRecord>, StoreError> {
        let mut connection = self.connection.clone();

        let ids: Vec<String> = connection.zrevrange(TIMELINE_KEY, 0, -1).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let documents: Vec<Option<String>> = redis::cmd("HMGET")
            .arg(RECORDS_KEY)
            .arg(&ids)
            .query_async(&mut connection)
            .await?;

        decode_documents(ids, documents)
    }
}

/// In-process store keeping records in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<(String, FeedbackRecord)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedbackStore for MemoryStore {
    async fn insert(&self, record: &FeedbackRecord) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();

        let mut records = self.records.write().await;
        records.push((id.clone(), record.clone()));

        Ok(id)
    }

    async fn count_all(&self) -> Result<u64, StoreError> {
        Ok(self.records.read().await.len() as u64)
    }

    async fn count_by_category(&self, category: Category) -> Result<u64, StoreError> {
        let records = self.records.read().await;
        let count = records
            .iter()
            .filter(|(_, record)| record.category == category)
            .count();

        Ok(count as u64)
    }

    async fn count_by_emoji(&self, emoji: Emoji) -> Result<u64, StoreError> {
        let records = self.records.read().await;
        let count = records
            .iter()
            .filter(|(_, record)| record.emoji == emoji)
            .count();

        Ok(count as u64)
    }

    async fn list_recent(&self) -> Result<Vec<FeedbackRecord>, StoreError> {
        let mut records: Vec<FeedbackRecord> = self
            .records
            .read()
            .await
            .iter()
            .map(|(_, record)| record.clone())
            .collect();

        // equal timestamps keep the latest insert first
        records.reverse();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::feedback::Sentiment;

    fn record(feedback: &str, emoji: Emoji, compound: f64, minutes: i64) -> FeedbackRecord {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        FeedbackRecord::at(
            feedback.into(),
            "Launch".into(),
            emoji,
            Sentiment {
                compound,
                ..Default::default()
            },
            base + Duration::minutes(minutes),
        )
    }

    async fn seed(store: &dyn FeedbackStore, records: &[FeedbackRecord]) -> Vec<String> {
        let mut ids = Vec::new();

        for record in records {
            ids.push(store.insert(record).await.unwrap());
        }

        ids
    }

    #[test]
    fn test_keys() {
        assert_eq!(
            category_key(Category::Negative),
            "feedback:category:negative"
        );
        assert_eq!(emoji_key(Emoji::Happy), "feedback:emoji:happy");
    }

    #[test]
    fn test_insert_pipeline_is_one_transaction() {
        let record = record("great", Emoji::Happy, 0.6, 0);
        let document = serde_json::to_string(&record).unwrap();

        let pipeline = insert_pipeline("abc-123", &document, &record);
        let packed = pipeline.get_packed_pipeline();
        let packed = String::from_utf8_lossy(&packed);

        assert!(packed.contains("MULTI"));
        assert!(packed.contains("EXEC"));
        for expected in [
            "HSET",
            "ZADD",
            "SADD",
            RECORDS_KEY,
            TIMELINE_KEY,
            "feedback:category:positive",
            "feedback:emoji:happy",
            "abc-123",
        ] {
            assert!(packed.contains(expected), "{expected} missing from {packed}");
        }

        let millis = record.timestamp.timestamp_millis().to_string();
        assert!(packed.contains(&millis));
    }

    #[test]
    fn test_decode_skips_ids_without_document() {
        let kept = record("kept", Emoji::Sad, -0.4, 0);
        let ids = vec!["gone".to_string(), "kept".to_string()];
        let documents = vec![None, Some(serde_json::to_string(&kept).unwrap())];

        let decoded = decode_documents(ids, documents).unwrap();

        assert_eq!(decoded, vec![kept]);
    }

    #[test]
    fn test_decode_reports_corrupt_document() {
        let ids = vec!["broken".to_string()];
        let documents = vec![Some("{ not a record".to_string())];

        let err = decode_documents(ids, documents).unwrap_err();

        assert!(matches!(err, StoreError::Corrupt { id, .. } if id == "broken"));
    }

    #[tokio::test]
    async fn test_memory_insert_assigns_unique_ids() {
        let store = MemoryStore::new();
        let entry = record("a", Emoji::Happy, 0.5, 0);

        let ids = seed(&store, &[entry.clone(), entry]).await;

        assert_ne!(ids[0], ids[1]);
        assert!(Uuid::parse_str(&ids[0]).is_ok());
        assert_eq!(store.count_all().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_memory_counts() {
        let store = MemoryStore::new();
        let entries = [
            record("a", Emoji::Happy, 0.6, 0),
            record("b", Emoji::Sad, -0.6, 1),
            record("c", Emoji::Sad, 0.0, 2),
        ];
        seed(&store, &entries).await;

        let positive = store.count_by_category(Category::Positive).await.unwrap();
        let negative = store.count_by_category(Category::Negative).await.unwrap();
        let neutral = store.count_by_category(Category::Neutral).await.unwrap();

        assert_eq!((positive, negative, neutral), (1, 1, 1));
        assert_eq!(store.count_by_emoji(Emoji::Sad).await.unwrap(), 2);
        assert_eq!(store.count_by_emoji(Emoji::Neutral).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_memory_list_most_recent_first() {
        let store = MemoryStore::new();
        let entries = [
            record("middle", Emoji::Happy, 0.6, 5),
            record("oldest", Emoji::Happy, 0.6, 0),
            record("newest", Emoji::Happy, 0.6, 10),
        ];
        seed(&store, &entries).await;

        let listed: Vec<String> = store
            .list_recent()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.feedback)
            .collect();

        assert_eq!(listed, vec!["newest", "middle", "oldest"]);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis at REDIS_URL"]
    async fn test_redis_roundtrip() {
        let url = std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379/".to_string());
        let store = init_redis(&url).await.unwrap();

        let before = store.count_all().await.unwrap();
        let happy_before = store.count_by_emoji(Emoji::Happy).await.unwrap();

        let entry = record("redis check", Emoji::Happy, 0.7, 60 * 24 * 365 * 50);
        let id = store.insert(&entry).await.unwrap();

        assert!(!id.is_empty());
        assert_eq!(store.count_all().await.unwrap(), before + 1);

        let happy_after = store.count_by_emoji(Emoji::Happy).await.unwrap();
        assert_eq!(happy_after, happy_before + 1);

        let listed = store.list_recent().await.unwrap();
        assert_eq!(listed[0].feedback, "redis check");
    }
}
