//! PillScan Gateway HTTP API Server
//!
//! Serves the label scan endpoint, liveness text and health report.

pub mod extract;
pub mod health_api;
pub mod response;
pub mod server;

pub use server::{build_router, start_server, GatewayState, RouterOptions};
