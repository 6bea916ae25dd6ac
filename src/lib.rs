//! # Entropia: Bloom Lineage and Entropy Analytics
//!
//! Tracks how blooms derive from one another and how their entropy moves
//! over time.
//!
//! ## Architecture
//!
//! - `lineage`: derivation forest with depth, drift, and genealogy queries
//! - `entropy`: per-bloom entropy history, volatility, anomaly, and chaos-risk analysis
//! - `engine`: one tracker plus one analyzer with joined views and snapshots
//! - `storage`: keyed JSON snapshot stores
//! - `config`: YAML configuration and CLI arguments
//!
//! ## Example
//!
//! ```
//! use entropia::BloomEngine;
//!
//! let engine = BloomEngine::default();
//! assert!(engine.log_rebloom("root", "child", 0.1, None));
//! engine.add_entropy_sample("child", 0.42);
//!
//! let genealogy = engine.genealogy("child").unwrap();
//! assert_eq!(genealogy.depth, 1);
//! assert_eq!(genealogy.ancestry_chain, vec!["root", "child"]);
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod entropy;
pub mod error;
pub mod lineage;
pub mod storage;

pub use engine::{BloomEngine, EngineSnapshot, Genealogy};
pub use entropy::{EntropyAnalyzer, EntropyProfile, InsufficientData};
pub use error::{Error, Result};
pub use lineage::{LineageTracker, RebloomRejection};
