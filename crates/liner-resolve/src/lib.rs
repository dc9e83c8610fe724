//! The liner credit resolution engine.
//!
//! Turns raw credit mentions from several sources into a canonical,
//! deduplicated, confidence-scored credit list for one track:
//!
//! text normalization → segmentation → role classification and name
//! segmentation → assembly → collaboration analysis → intra-source
//! deduplication → cross-source resolution.
//!
//! [`CreditEngine`] is the entry point.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod adapter;
pub mod assemble;
pub mod cache;
pub mod classify;
pub mod collaboration;
pub mod confidence;
pub mod config;
pub mod cross_source;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod names;
pub mod segment;
pub mod similarity;

pub use liner_core::normalize;

pub use adapter::{CreditSource, StaticSource};
pub use cache::{MemoryCache, ResolutionCache};
pub use classify::{MemoizedClassifier, RoleClassifier, RoleMatch};
pub use collaboration::CollaborationReport;
pub use config::Config;
pub use cross_source::{CrossSourceResolver, ResolutionSummary};
pub use dedup::{DedupedCredit, IntraSourceDeduplicator};
pub use engine::{CreditEngine, ParseReport};
pub use error::{ResolveError, ResolveResult};
pub use names::NameSegmenter;
pub use segment::RawCreditSegmenter;
pub use similarity::Equivalence;
