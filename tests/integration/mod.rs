//! Integration test suite for mcrender
//!
//! End-to-end tests that build template repositories in temporary directories and
//! render them through the library or the `mcrender` binary.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **merging**: tier precedence, tombstones and conditional-empty fragments
//! - **generation**: role and name walking, common templates, post-processing
//! - **classification**: platform identifiers and tier lists
//! - **functions**: template functions inside real fragments
//! - **cli**: the `render` and `tiers` commands

#[path = "../common/mod.rs"]
mod common;

mod classification;
mod cli;
mod functions;
mod generation;
mod merging;
