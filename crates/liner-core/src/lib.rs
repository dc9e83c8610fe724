//! Core domain model for liner.
//!
//! This crate defines the credit records that flow through resolution
//! (raw blobs, parsed credits, canonical credits), the closed role
//! taxonomy, and source provenance with reliability ranking.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod normalize;
pub mod provenance;
pub mod taxonomy;

pub use error::{Error, Result};
