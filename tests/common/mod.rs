//! Shared fixtures for integration tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use textfold::ingestion::{IngestionError, IngestionResult, Oracle, OracleConfig};

/// The canned reply used wherever a test doesn't care about the content.
pub const GOOD_REPLY: &str =
    r#"{"sentiment":"Positive","priority":"High","confidence":0.9,"tags":["a","b","c"]}"#;

/// An oracle that plays back a scripted sequence of replies, falling back to
/// [`GOOD_REPLY`] once the script runs out.
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<Result<String, String>>>,
}

impl ScriptedOracle {
    pub fn new(replies: Vec<Result<String, String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
        })
    }

    /// An oracle that always answers with [`GOOD_REPLY`].
    pub fn always_good() -> Arc<Self> {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn complete(&self, _prompt: &str) -> IngestionResult<String> {
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(msg)) => Err(IngestionError::Oracle(msg)),
            None => Ok(GOOD_REPLY.to_string()),
        }
    }
}

/// Oracle configuration suitable for tests: configured, and with batch
/// pacing disabled so batches run instantly.
pub fn test_oracle_config() -> OracleConfig {
    OracleConfig {
        api_key: "test-key".to_string(),
        batch_delay_ms: 0,
        ..Default::default()
    }
}
