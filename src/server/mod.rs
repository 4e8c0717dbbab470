//! HTTP surface of the platform.

mod http_server;

pub use http_server::{configure_routes, health_check, AppState, TextfoldHttpServer};
