//! # Operation Kind
//!
//! Selects which field rules apply to a request body.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of write a request performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Resource creation (POST, PUT). Required and create-immutable rules apply.
    Create,
    /// Partial update (PATCH). Only update-immutable rules apply.
    Update,
    /// Anything else. The body is decoded but no field rules run.
    None,
}

impl Operation {
    /// Map an HTTP method name to an operation. Method names are
    /// case-sensitive.
    pub fn from_method(method: &str) -> Self {
        match method {
            "POST" | "PUT" => Self::Create,
            "PATCH" => Self::Update,
            _ => Self::None,
        }
    }

    /// Returns the lowercase operation name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::None => "none",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_and_put_create() {
        assert_eq!(Operation::from_method("POST"), Operation::Create);
        assert_eq!(Operation::from_method("PUT"), Operation::Create);
    }

    #[test]
    fn patch_updates() {
        assert_eq!(Operation::from_method("PATCH"), Operation::Update);
    }

    #[test]
    fn other_methods_map_to_none() {
        for method in ["GET", "DELETE", "HEAD", "OPTIONS", "patch"] {
            assert_eq!(Operation::from_method(method), Operation::None, "{method}");
        }
    }
}
