//! Offline fallback payloads
//!
//! Synthetic data returned in place of a failed remote call for the operations
//! behind the main browsing screens. Each generator is a pure function of the
//! request parameters plus an explicit time (and, for the price series, an
//! explicit random source), so the same request always produces the same
//! payload.

pub mod movers;
pub mod news;
pub mod overview;
pub mod search;
pub mod time_series;

pub use movers::top_gainers_losers;
pub use news::news_sentiment;
pub use overview::company_overview;
pub use search::symbol_search;
pub use time_series::{daily_series, daily_series_with_rng};

/// Derives a stable RNG seed from request parameters (64-bit FNV-1a)
pub fn seed_for(parts: &[&str]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    let mut hash = OFFSET;
    for part in parts {
        for byte in part.bytes().chain(std::iter::once(0xff)) {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(PRIME);
        }
    }
    hash
}
