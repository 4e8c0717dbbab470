//! Logging initialization for the `log` facade.
//!
//! Binaries call [`init`] once at startup; library code logs through the
//! `log` macros and never installs a logger itself.

/// Initialize the process-wide logger.
///
/// Respects `RUST_LOG`, defaulting to `info` when unset. Safe to call with
/// `.ok()` from binaries that may be re-entered in tests.
pub fn init() -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init()
}
