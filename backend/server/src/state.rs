use std::sync::Arc;

use crate::{
    config::Config,
    database::{FeedbackStore, init_redis},
    error::StoreError,
    sentiment::{SentimentScorer, VaderScorer},
};

pub struct State {
    pub config: Config,
    pub store: Arc<dyn FeedbackStore>,
    pub scorer: Arc<dyn SentimentScorer>,
}

impl State {
    pub async fn new(config: Config) -> Result<Arc<Self>, StoreError> {
        let store = init_redis(&config.redis_url).await?;

        Ok(Self::with_parts(
            config,
            Arc::new(store),
            Arc::new(VaderScorer::new()),
        ))
    }

    pub fn with_parts(
        config: Config,
        store: Arc<dyn FeedbackStore>,
        scorer: Arc<dyn SentimentScorer>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            store,
            scorer,
        })
    }
}
