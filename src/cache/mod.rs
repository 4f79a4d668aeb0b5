//! Cache module for storing API responses
//!
//! This module provides an expiring key-value cache over a pluggable durable
//! storage backend. Entries carry their write time and are treated as absent
//! (and deleted) once older than the TTL. Keys are built from an operation and
//! its parameters so distinct requests never share a slot.

mod clock;
mod key;
mod manager;
mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use key::{CacheKey, FailurePolicy, Operation};
pub use manager::CacheManager;
pub use storage::{FileStorage, MemoryStorage, Storage};
