use serde::Deserialize;

use crate::{
    error::ValidationError::{self, InvalidEmoji, MissingFields},
    feedback::Emoji,
};

pub const FEEDBACK: &str = "feedback";
pub const EVENT: &str = "event";
pub const EMOJI: &str = "emoji";

/// Inbound body of `/api/submit-feedback`. Fields stay optional so absence is reported as a validation error
/// rather than a deserialization failure.
#[derive(Deserialize, Debug, Default)]
pub struct FeedbackSubmission {
    pub feedback: Option<String>,
    pub event: Option<String>,
    pub emoji: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ValidFeedback {
    pub feedback: String,
    pub event: String,
    pub emoji: Emoji,
}

#[derive(Deserialize, Debug, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

fn missing_keys(
    feedback: Option<&str>,
    event: Option<&str>,
    emoji: Option<&str>,
) -> Vec<&'static str> {
    let mut missing = Vec::new();

    // whitespace-only feedback has nothing to score
    if feedback.is_none_or(|s| s.trim().is_empty()) {
        missing.push(FEEDBACK);
    }
    if event.is_none() {
        missing.push(EVENT);
    }
    if emoji.is_none() {
        missing.push(EMOJI);
    }

    missing
}

impl FeedbackSubmission {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        missing_keys(
            self.feedback.as_deref(),
            self.event.as_deref(),
            self.emoji.as_deref(),
        )
    }

    /// Presence first, then the emoji domain. The emoji is only parsed once all three keys are present.
    pub fn validate(self) -> Result<ValidFeedback, ValidationError> {
        let (feedback, event, raw_emoji) = match (self.feedback, self.event, self.emoji) {
            (Some(feedback), Some(event), Some(emoji)) if !feedback.trim().is_empty() => {
                (feedback, event, emoji)
            }
            (feedback, event, emoji) => {
                let keys = missing_keys(feedback.as_deref(), event.as_deref(), emoji.as_deref());

                return Err(MissingFields(keys));
            }
        };

        let emoji = raw_emoji
            .trim()
            .parse::<Emoji>()
            .map_err(|e| InvalidEmoji(e.0))?;

        Ok(ValidFeedback {
            feedback,
            event,
            emoji,
        })
    }
}
