//! Supporting utilities
//!
//! # Modules
//!
//! - [`fs`] - Directory probing, sorted listings, atomic writes and path display

pub mod fs;

pub use fs::{atomic_write, ensure_dir, exists_dir, read_dir_sorted, relative_display};
