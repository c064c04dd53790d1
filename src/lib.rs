//! Brightlens News - a multi-source news aggregation engine
//!
//! Fans each category request out to every configured provider under a
//! shared deadline, normalizes and deduplicates what comes back, orders it
//! newest first, and keeps short-lived snapshots. When no provider delivers,
//! built-in fallback articles take their place.

pub mod adapters;
pub mod aggregator;
pub mod article;
pub mod cache;
pub mod config;
pub mod dedup;
pub mod error;
pub mod fallback;
pub mod fetcher;
pub mod normalize;
pub mod routes;
