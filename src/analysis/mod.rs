//! The analysis domain model: extracted classifications, persisted records,
//! and the partial-update shape of the mutation surface.

mod extractor;
mod record;

pub use extractor::{extract_classification, Classification};
pub use record::{AnalysisRecord, UpdatePatch};
