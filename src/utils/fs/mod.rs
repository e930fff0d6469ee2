//! File system utilities
//!
//! - [`dirs`]: directory probing (`exists_dir`) and name-sorted listings
//! - [`atomic`]: temp-and-rename writes for generated output
//! - [`paths`]: stable, forward-slash path display

pub mod atomic;
pub mod dirs;
pub mod paths;

pub use atomic::{atomic_write, atomic_write_multiple};
pub use dirs::{DirEntry, ensure_dir, exists_dir, read_dir_sorted};
pub use paths::relative_display;
