//! Model Export Store
//!
//! An MCP server that stores serialized player models ("model exports")
//! for later import, backed by `SQLite`.
//!
//! # Features
//!
//! - Per-player quota on stored exports
//! - 12-digit export ids, caller-supplied or generated
//! - 24-hour lifetime with lazy eviction on first observation
//! - Uniform `{success, result | errors}` envelope on every tool
//!
//! # Quick Start
//!
//! ```bash
//! DATABASE_PATH=./data/exports.db ./model-export-store
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     stdin      ┌─────────────────┐
//! │ MCP client  │───────────────▶│   MCP Server    │
//! │             │◀───────────────│     (Rust)      │
//! └─────────────┘     stdout     └────────┬────────┘
//!                                         │
//!                                         ▼
//!                                      SQLite
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod exports;
pub mod server;
pub mod storage;
pub mod traits;

#[cfg(test)]
mod test_utils;
