//! textfold - text analysis platform with AI-powered classification.
//!
//! Free text goes in, a typed classification record comes out: the
//! ingestion pipeline prompts an external text-completion oracle, parses
//! its semi-structured reply, assigns a per-owner sequence number, and
//! persists the result. The HTTP surface adds authentication, history
//! queries and mutations, batch ingestion from CSV, and spreadsheet export.

pub mod analysis;
pub mod auth;
pub mod config;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod logging;
pub mod server;
pub mod store;

pub use analysis::{AnalysisRecord, Classification, UpdatePatch};
pub use config::{load_app_config, AppConfig};
pub use error::{TextfoldError, TextfoldResult};
pub use server::TextfoldHttpServer;
