use crate::ingestion::IngestionError;
use serde_json::Value;

/// The classification fields recovered from one oracle reply, after
/// defaulting.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub sentiment: String,
    pub priority: String,
    pub confidence: f64,
    pub tags: Vec<String>,
}

/// One canonical default set, used on both the single-item and batch paths.
impl Default for Classification {
    fn default() -> Self {
        Self {
            sentiment: "Neutral".to_string(),
            priority: "Medium".to_string(),
            confidence: 0.0,
            tags: Vec::new(),
        }
    }
}

/// Parses the oracle's raw text reply into a [`Classification`].
///
/// The model is asked for strict JSON but frequently wraps it in Markdown
/// code fences; every literal occurrence of the fence markers is removed
/// before parsing. A reply that is not a JSON object after stripping fails
/// the whole attempt - there is no heuristic fallback. Missing keys fall
/// back to the defaults; keys that are present but unusable (non-numeric
/// confidence, tags that are not an array of strings) are a schema
/// violation rather than silently accepted.
pub fn extract_classification(raw: &str) -> Result<Classification, IngestionError> {
    let cleaned = raw.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();

    let value: Value = serde_json::from_str(cleaned)
        .map_err(|e| IngestionError::ResponseParse(e.to_string()))?;
    let obj = value.as_object().ok_or_else(|| {
        IngestionError::ResponseParse("classification reply is not a JSON object".to_string())
    })?;

    let defaults = Classification::default();

    let sentiment = obj
        .get("sentiment")
        .and_then(Value::as_str)
        .unwrap_or(&defaults.sentiment)
        .to_string();
    let priority = obj
        .get("priority")
        .and_then(Value::as_str)
        .unwrap_or(&defaults.priority)
        .to_string();

    let confidence = match obj.get("confidence") {
        None | Some(Value::Null) => defaults.confidence,
        Some(v) => v.as_f64().ok_or_else(|| {
            IngestionError::SchemaViolation(format!("confidence is not numeric: {}", v))
        })?,
    };

    let tags = match obj.get("tags") {
        None | Some(Value::Null) => defaults.tags,
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    IngestionError::SchemaViolation(format!("tag is not a string: {}", item))
                })
            })
            .collect::<Result<Vec<String>, IngestionError>>()?,
        Some(other) => {
            return Err(IngestionError::SchemaViolation(format!(
                "tags is not an array: {}",
                other
            )))
        }
    };

    Ok(Classification {
        sentiment,
        priority,
        confidence,
        tags,
    })
}
