//! Core types for mcrender
//!
//! This module holds the pieces every other module depends on:
//!
//! - [`RenderError`] and [`ErrorContext`]: typed failures and their CLI presentation
//! - [`user_friendly_error`]: turns any `anyhow` chain into an [`ErrorContext`]
//! - [`Role`]: the node class a template subtree belongs to
//!
//! # Error Strategy
//!
//! Failures are raised as [`RenderError`] (or [`crate::templating::TemplateError`] for
//! fragment rendering) and propagated with [`anyhow::Context`] so each layer adds the
//! role, name or path it was working on. Nothing inside the engine retries; the caller
//! owns retry policy.

pub mod error;
mod role;

pub use error::{ErrorContext, RenderError, user_friendly_error};
pub use role::{MASTER, Role, WORKER};
