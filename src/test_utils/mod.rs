//! Test utilities for mcrender
//!
//! Helpers for building template repositories on disk and controller configs in memory,
//! plus once-only logging setup.
//!
//! # Example
//!
//! ```rust,no_run
//! use mcrender::test_utils::{ControllerConfigFixture, TemplateTree};
//!
//! let tree = TemplateTree::new().unwrap();
//! tree.file("worker/00-worker/_base/files/hostname.yaml", "path: /etc/hostname\n").unwrap();
//! let ctx = ControllerConfigFixture::platform("AWS").render_context();
//! ```

pub mod fixtures;

pub use fixtures::{ControllerConfigFixture, TemplateTree};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, logging stays off.
/// Safe to call from every test.
///
/// ```bash
/// RUST_LOG=mcrender=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
