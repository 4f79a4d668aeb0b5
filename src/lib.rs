//! marketview library
//!
//! This module exposes the cache, remote data access, fallback payloads and
//! CLI parsing for the binary and for integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod fallback;
pub mod format;
