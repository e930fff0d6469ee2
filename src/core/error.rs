//! Error handling for mcrender
//!
//! This module provides the typed error enum used throughout the engine and the
//! user-facing error reporting used by the command-line interface. The design follows
//! two rules:
//! 1. **Strongly-typed errors** at the point of failure, so callers can match on them
//! 2. **Path-annotated propagation** with [`anyhow::Context`], so a failure deep inside a
//!    tier walk still tells the operator which role, name and fragment were involved
//!
//! # Error Categories
//!
//! - **Configuration**: [`RenderError::NoPlatformConfigured`], [`RenderError::ReservedPlatform`]
//! - **Platform accessors**: [`RenderError::InvalidPlatform`], [`RenderError::NoPlatformStatus`],
//!   [`RenderError::MissingPlatformData`]
//! - **File system**: [`RenderError::FileSystemError`], [`RenderError::NotADirectory`]
//! - **Function library**: [`RenderError::InvalidSkipKey`], [`RenderError::InvalidUrl`],
//!   [`RenderError::UnknownUrlScheme`]
//! - **Output**: [`RenderError::TranspileError`]
//!
//! Template parse and execution failures have their own structured type,
//! [`crate::templating::TemplateError`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use mcrender::core::{RenderError, user_friendly_error};
//!
//! let err = anyhow::Error::from(RenderError::NoPlatformConfigured);
//! let ctx = user_friendly_error(err);
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::templating::TemplateError;

/// The main error type for mcrender operations
///
/// Every variant carries enough context (paths, platform names, offending values) to be
/// reported without the surrounding call stack. Most engine functions return
/// [`anyhow::Result`] and attach the enclosing role, name or fragment path as context;
/// the original `RenderError` remains reachable through
/// [`anyhow::Error::downcast_ref`].
#[derive(Error, Debug)]
pub enum RenderError {
    /// The controller config carries no platform type
    ///
    /// Without a platform type the tier list cannot be computed, so nothing is
    /// generated at all.
    #[error("cannot generate MachineConfigs when no platformStatus.type is set")]
    NoPlatformConfigured,

    /// The platform type is one of the internal tier sentinels
    #[error("platform {platform} unsupported")]
    ReservedPlatform {
        /// The reserved value found in the platform type
        platform: String,
    },

    /// An on-prem accessor was called for a platform that has no on-prem data
    #[error("invalid platform for {accessor}")]
    InvalidPlatform {
        /// Human-readable accessor subject, e.g. "Ingress IP"
        accessor: String,
        /// The platform the accessor was evaluated against
        platform: String,
    },

    /// An accessor that requires platform status was called without one
    #[error("no platform status available for {accessor}")]
    NoPlatformStatus {
        /// Human-readable accessor subject, e.g. "Ingress IP"
        accessor: String,
    },

    /// A populated platform block has an empty list where one element is required
    ///
    /// vSphere is exempt: some install modes never populate its VIP lists.
    #[error("platform {platform} has no entries in {field}")]
    MissingPlatformData {
        /// The platform whose status block was inspected
        platform: String,
        /// The list field that was empty
        field: String,
    },

    /// File system error
    #[error("failed to {operation} {path}")]
    FileSystemError {
        /// The file system operation that failed
        operation: String,
        /// Path where the file system error occurred
        path: String,
    },

    /// A template path exists but is not a directory
    #[error("expected template directory, {path} is not a directory")]
    NotADirectory {
        /// The offending path
        path: String,
    },

    /// `skip` was called with a key that cannot be substituted later
    #[error("invalid key for skipKey: {key:?}")]
    InvalidSkipKey {
        /// The rejected key
        key: String,
    },

    /// A URL template function received an unparseable URL
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl {
        /// The input URL
        url: String,
        /// Parser message
        reason: String,
    },

    /// `urlPort` found no explicit port and no known default for the scheme
    #[error("unknown scheme in {url}")]
    UnknownUrlScheme {
        /// The input URL
        url: String,
    },

    /// The sorted fragments could not be turned into a configuration object
    #[error("error transpiling fragments for {name}: {reason}")]
    TranspileError {
        /// Name of the configuration unit being built
        name: String,
        /// Why the fragments were rejected
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for RenderError {
    fn clone(&self) -> Self {
        match self {
            Self::NoPlatformConfigured => Self::NoPlatformConfigured,
            Self::ReservedPlatform {
                platform,
            } => Self::ReservedPlatform {
                platform: platform.clone(),
            },
            Self::InvalidPlatform {
                accessor,
                platform,
            } => Self::InvalidPlatform {
                accessor: accessor.clone(),
                platform: platform.clone(),
            },
            Self::NoPlatformStatus {
                accessor,
            } => Self::NoPlatformStatus {
                accessor: accessor.clone(),
            },
            Self::MissingPlatformData {
                platform,
                field,
            } => Self::MissingPlatformData {
                platform: platform.clone(),
                field: field.clone(),
            },
            Self::FileSystemError {
                operation,
                path,
            } => Self::FileSystemError {
                operation: operation.clone(),
                path: path.clone(),
            },
            Self::NotADirectory {
                path,
            } => Self::NotADirectory {
                path: path.clone(),
            },
            Self::InvalidSkipKey {
                key,
            } => Self::InvalidSkipKey {
                key: key.clone(),
            },
            Self::InvalidUrl {
                url,
                reason,
            } => Self::InvalidUrl {
                url: url.clone(),
                reason: reason.clone(),
            },
            Self::UnknownUrlScheme {
                url,
            } => Self::UnknownUrlScheme {
                url: url.clone(),
            },
            Self::TranspileError {
                name,
                reason,
            } => Self::TranspileError {
                name: name.clone(),
                reason: reason.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            // io::Error is not Clone; keep the kind and message
            Self::IoError(e) => Self::IoError(std::io::Error::new(e.kind(), e.to_string())),
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that pairs a [`RenderError`] with operator guidance
///
/// Used by the CLI to print a colored error line followed by optional details and a
/// suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: RenderError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without suggestions or details
    #[must_use]
    pub const fn new(error: RenderError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Attach a suggestion for resolving the error
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach additional details explaining the error
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Render the full `anyhow` chain below the top-level message
fn chain_message(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }
    message
}

/// Convert any error into an [`ErrorContext`] with suggestions
///
/// Known error types are recognized through the `anyhow` chain:
/// - [`RenderError`] gets a tailored suggestion per variant
/// - [`TemplateError`] keeps the fragment path and points at template syntax
/// - [`std::io::Error`] is mapped by kind
///
/// Anything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(template_error) = error.downcast_ref::<TemplateError>() {
        return ErrorContext::new(RenderError::Other {
            message: chain_message(&error),
        })
        .with_details(template_error.format_with_context())
        .with_suggestion(
            "Check the fragment's Tera syntax: variables use {{ var }}, control flow uses {% %}. \
             Registered functions take named arguments, e.g. {{ skip(key=\"name\") }}",
        );
    }

    if let Some(render_error) = error.downcast_ref::<RenderError>() {
        let mut ctx = create_error_context(render_error.clone());
        // Keep the role/name/path annotations that were attached on the way up
        let outer = chain_message(&error);
        if outer != render_error.to_string() {
            ctx.error = RenderError::Other {
                message: outer,
            };
        }
        return ctx;
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(RenderError::Other {
                    message: chain_message(&error),
                })
                .with_suggestion("Check read permissions on the template repository");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(RenderError::Other {
                    message: chain_message(&error),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    ErrorContext::new(RenderError::Other {
        message: chain_message(&error),
    })
}

/// Map each [`RenderError`] variant to an [`ErrorContext`] with guidance
fn create_error_context(error: RenderError) -> ErrorContext {
    match &error {
        RenderError::NoPlatformConfigured => ErrorContext::new(error)
            .with_suggestion("Set infra.status.platformStatus.type in the controller config")
            .with_details("The platform type selects which template tiers apply"),
        RenderError::ReservedPlatform {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Use a real platform type such as AWS, BareMetal or None"),
        RenderError::InvalidPlatform {
            ..
        }
        | RenderError::NoPlatformStatus {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Guard on-prem accessors in templates, or move the fragment to the on-prem tier",
        ),
        RenderError::MissingPlatformData {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Populate the platform's VIP lists in the infrastructure status"),
        RenderError::NotADirectory {
            ..
        } => ErrorContext::new(error).with_details(
            "Role, name, tier, files and units entries must be directories in the template tree",
        ),
        RenderError::InvalidSkipKey {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "skip keys must start with a lowercase letter or underscore and contain only [A-Za-z0-9_]",
        ),
        RenderError::UnknownUrlScheme {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Give the URL an explicit port or use an http/https scheme"),
        _ => ErrorContext::new(error),
    }
}
