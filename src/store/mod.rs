//! Persistence layer over sled.
//!
//! All state lives in one sled database with dedicated trees for analysis
//! records, users, and per-owner sequence counters. `DbOperations` is the
//! single handle; it is opened at startup and injected into every component
//! that needs storage, never referenced as ambient state.

mod core;
mod record_store;
mod user_store;

pub use core::DbOperations;
pub use user_store::StoredUser;
