//! # motifs-core
//!
//! Core types, traits, and abstractions for the motif search service.
//!
//! This crate provides the domain model (datasets, motifs, paging, search
//! results), the boolean query language, the reverse-complement transform, and
//! the MEME reader used by the importer. Storage and caching live in the
//! `motifs-db` and `motifs-search` crates.

pub mod defaults;
pub mod error;
pub mod genes;
pub mod logging;
pub mod meme;
pub mod models;
pub mod query;
pub mod traits;
pub mod weights;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use genes::GeneRule;
pub use meme::{parse_meme, MemeMotif};
pub use models::*;
pub use query::{parse_bool_query, sanitize_query, BoolExpr};
pub use traits::*;
pub use weights::reverse_complement;
