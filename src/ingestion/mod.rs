//! The classification-ingestion pipeline.
//!
//! Orchestrates prompt building, the oracle call, response extraction,
//! sequence assignment, record assembly, and persistence, for both the
//! single-item and the batch flow.

mod config;
mod error;
mod oracle;
mod pipeline;
pub mod routes;

pub use config::OracleConfig;
pub use error::{IngestionError, IngestionResult};
pub use oracle::{OpenRouterClient, Oracle};
pub use pipeline::{build_prompt, IngestionPipeline};
