//! Common infrastructure for the Bramble engine.
//!
//! This crate provides shared plumbing used by every pipeline stage:
//! - **Warning channel** - deduplicated, colored stderr output for
//!   unsupported CSS features and recoverable value errors.

pub mod warning;
