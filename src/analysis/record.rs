use super::Classification;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One persisted classification outcome tied to one input text and one owner.
///
/// `id`, `owner`, `num`, and `timestamp` are fixed at creation; the
/// remaining fields are editable through [`UpdatePatch`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: String,
    pub owner: String,
    pub num: u64,
    pub text: String,
    pub sentiment: String,
    pub priority: String,
    pub confidence: f64,
    pub tags: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl AnalysisRecord {
    /// Assembles a record from an extracted classification, a generated id,
    /// and the current instant.
    ///
    /// The oracle is asked for a confidence in [0.0, 1.0] and exactly 3
    /// tags, but does not reliably comply; both are normalized here so
    /// out-of-range data never reaches the store. NaN confidence collapses
    /// to 0.0.
    pub fn from_classification(
        owner: &str,
        num: u64,
        text: &str,
        classification: Classification,
    ) -> Self {
        let Classification {
            sentiment,
            priority,
            confidence,
            mut tags,
        } = classification;

        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        tags.truncate(3);

        Self {
            id: Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            num,
            text: text.to_string(),
            sentiment,
            priority,
            confidence,
            tags,
            timestamp: Utc::now(),
        }
    }
}

/// The editable subset of a record. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePatch {
    pub text: Option<String>,
    pub sentiment: Option<String>,
    pub priority: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdatePatch {
    /// True when the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.sentiment.is_none()
            && self.priority.is_none()
            && self.tags.is_none()
    }

    /// Applies the provided fields to `record`, leaving the rest alone.
    pub fn apply_to(&self, record: &mut AnalysisRecord) {
        if let Some(text) = &self.text {
            record.text = text.clone();
        }
        if let Some(sentiment) = &self.sentiment {
            record.sentiment = sentiment.clone();
        }
        if let Some(priority) = &self.priority {
            record.priority = priority.clone();
        }
        if let Some(tags) = &self.tags {
            record.tags = tags.clone();
        }
    }
}
