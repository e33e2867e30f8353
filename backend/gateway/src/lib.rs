//! TruthLens Gateway HTTP API Server
//!
//! Exposes the coordinator to contexts outside the process: the single-shot
//! `/analyze` endpoint, JSON analysis endpoints, the latest result, capture
//! rules for page contexts, and the message protocol over WebSocket.

pub mod analyze;
pub mod capture_api;
pub mod health_api;
pub mod server;
pub mod ws_protocol;
pub mod ws_server;

pub use server::{build_router, start_server, GatewayState};
