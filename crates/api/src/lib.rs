//! # SmartCon API
//!
//! HTTP application layer - commands and main entry point.
//!
//! This crate contains:
//! - JSON commands (client → backend bridge)
//! - Application context (dependency injection)
//! - Logging bootstrap and health reporting
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Serves the commands over axum

pub mod commands;
pub mod context;
pub mod utils;

pub use commands::{router, ApiError, ApiResult};
pub use context::AppContext;
