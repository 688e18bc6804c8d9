//! # motifs-search
//!
//! Cached search over the motif catalog.
//!
//! This crate provides:
//! - `MotifSearchEngine`: request validation, caching and delegation to a
//!   `MotifStore`
//! - An in-process LRU cache with per-entry expiry
//! - Canonical cache keys for search requests
//! - Engine configuration from the environment

pub mod cache;
pub mod config;
pub mod engine;

pub use cache::{CacheKey, CacheStats, TtlCache};
pub use config::SearchConfig;
pub use engine::MotifSearchEngine;
