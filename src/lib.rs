//! # Mayday
//!
//! Multi-label triage of short disaster-response messages.
//!
//! The crate implements the full batch pipeline: raw message/category tables
//! are merged and cleaned, message text is normalized through a token filter
//! chain, a TF-IDF vectorizer is fitted on the training split, one bagged
//! ensemble of randomized decision trees is trained per category under a
//! cross-validated grid search, and the whole bundle is persisted as a
//! versioned artifact that the inference service reloads to answer queries.
//!
//! ## Features
//!
//! - Pure Rust implementation
//! - Deterministic training under an explicit seed
//! - Frozen vocabulary at inference (train/inference feature parity)
//! - Per-category precision/recall/F1 diagnostics
//! - Versioned, checksummed model artifacts

pub mod analysis;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod features;
pub mod inference;
pub mod model;
pub mod stats;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
