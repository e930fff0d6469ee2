//! Node roles
//!
//! A role is the logical node class a template subtree is written for. The two built-in
//! roles have their own subtrees in the template repository; every other role is a
//! custom pool that inherits from `worker` and therefore reuses the `worker` subtree.
//!
//! # Examples
//!
//! ```rust
//! use mcrender::core::Role;
//!
//! let role: Role = "infra".parse().unwrap();
//! assert_eq!(role.template_dir(), "worker");
//! assert_eq!(role.to_string(), "infra");
//! ```

use serde::{Deserialize, Serialize};
use std::convert::Infallible;

/// Role name of the control-plane pool
pub const MASTER: &str = "master";
/// Role name of the default compute pool
pub const WORKER: &str = "worker";

/// A node role as found in the template repository root
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Master,

    Worker,

    /// A custom pool; its templates come from the `worker` subtree
    Custom(String),
}

impl Role {
    /// The subtree under the template root that holds this role's templates
    #[must_use]
    pub fn template_dir(&self) -> &str {
        match self {
            Role::Master => MASTER,
            Role::Worker | Role::Custom(_) => WORKER,
        }
    }

    /// Whether this role borrows another role's templates
    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Role::Custom(_))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Role::Master => MASTER,
            Role::Worker => WORKER,
            Role::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Role::from(s.to_string()))
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            MASTER => Role::Master,
            WORKER => Role::Worker,
            _ => Role::Custom(s),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}
