use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use super::{IngestionError, IngestionResult, Oracle, OracleConfig};
use crate::analysis::{extract_classification, AnalysisRecord};
use crate::store::DbOperations;

/// Builds the fixed classification prompt for one input text.
///
/// The template is deterministic: the same input always produces the same
/// prompt.
pub fn build_prompt(text: &str) -> String {
    format!(
        "Analyze the following text: '{}'. \
         Provide analysis in strict JSON format with these keys: \
         sentiment (Positive/Neutral/Negative), priority (Low/Medium/High), \
         confidence (0.0-1.0), and tags: exactly 3 lowercase tags \
         1) text type 2) main issue 3) specific context",
        text
    )
}

/// Orchestrates the classification-ingestion pipeline: prompt, oracle call,
/// extraction, sequence assignment, record assembly, persistence.
pub struct IngestionPipeline {
    db: Arc<DbOperations>,
    oracle: Arc<dyn Oracle>,
    config: OracleConfig,
}

impl IngestionPipeline {
    /// Create a new pipeline over the given store and oracle
    pub fn new(db: Arc<DbOperations>, oracle: Arc<dyn Oracle>, config: OracleConfig) -> Self {
        Self { db, oracle, config }
    }

    /// Classifies and persists one input text for the given owner.
    ///
    /// Every step can fail independently and any failure aborts the whole
    /// item: no partial record is ever written. The sequence number is
    /// assigned only after a successful classification, so oracle and parse
    /// failures never consume a number.
    pub async fn analyze(&self, owner: &str, text: &str) -> IngestionResult<AnalysisRecord> {
        if !self.config.is_ready() {
            return Err(IngestionError::configuration_error(
                "Oracle API key is not configured",
            ));
        }

        let prompt = build_prompt(text);
        let raw = self.oracle.complete(&prompt).await?;
        let classification = extract_classification(&raw)?;

        let num = self.db.next_num(owner)?;
        let record = AnalysisRecord::from_classification(owner, num, text, classification);
        self.db.insert_record(&record)?;

        info!(
            "Stored analysis #{} for owner '{}' (sentiment: {}, priority: {})",
            record.num, owner, record.sentiment, record.priority
        );
        Ok(record)
    }

    /// Processes a batch of input rows sequentially for the given owner.
    ///
    /// Blank rows are skipped without error. A row whose classification or
    /// persistence fails is logged and skipped; the batch carries on. A
    /// fixed delay is awaited between oracle calls to respect the remote
    /// service's rate ceiling - pacing, not a correctness mechanism.
    pub async fn analyze_batch(&self, owner: &str, rows: &[String]) -> Vec<AnalysisRecord> {
        let mut results = Vec::new();
        let mut first_call = true;

        for row in rows {
            let text = row.trim();
            if text.is_empty() {
                continue;
            }

            if !first_call {
                sleep(Duration::from_millis(self.config.batch_delay_ms)).await;
            }
            first_call = false;

            match self.analyze(owner, text).await {
                Ok(record) => results.push(record),
                Err(e) => {
                    error!("Skipping batch row due to error: {}", e);
                    continue;
                }
            }
        }

        info!(
            "Batch ingestion for owner '{}' created {} of {} rows",
            owner,
            results.len(),
            rows.len()
        );
        results
    }
}
