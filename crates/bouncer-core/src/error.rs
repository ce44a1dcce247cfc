//! # Error Types
//!
//! Errors raised by the generic document merge. A reference document that
//! fails to parse or is not an object is the client's fault and is
//! reported back as a deserialization violation by the caller. A candidate
//! that is not an object means the resource shape and its encoding
//! disagree, and is fatal.

use std::fmt;

use thiserror::Error;

/// Which side of a merge a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentRole {
    /// The client's original request body.
    Reference,
    /// The re-encoded, validated instance.
    Candidate,
}

impl fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => f.write_str("reference"),
            Self::Candidate => f.write_str("candidate"),
        }
    }
}

/// Error during a whitelist merge.
#[derive(Error, Debug)]
pub enum MergeError {
    /// One of the inputs was not valid JSON.
    #[error("{role} document is not valid JSON: {source}")]
    Parse {
        /// The document that failed to parse.
        role: DocumentRole,
        /// Underlying parser error.
        source: serde_json::Error,
    },

    /// The top-level values were not both objects.
    #[error("cannot merge a {candidate} candidate onto a {reference} reference; both must be objects")]
    ShapeMismatch {
        /// JSON type of the reference document.
        reference: &'static str,
        /// JSON type of the candidate document.
        candidate: &'static str,
    },

    /// The merged document could not be encoded.
    #[error("failed to encode merged document: {0}")]
    Encode(#[source] serde_json::Error),
}

impl MergeError {
    /// Whether this error reflects a server-side shape problem rather
    /// than bad client input.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Parse { role, .. } => *role == DocumentRole::Candidate,
            Self::ShapeMismatch { reference, .. } => *reference == "object",
            Self::Encode(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{").unwrap_err()
    }

    #[test]
    fn reference_parse_failure_is_not_fatal() {
        let err = MergeError::Parse {
            role: DocumentRole::Reference,
            source: parse_error(),
        };
        assert!(!err.is_fatal());
        assert!(err.to_string().starts_with("reference document"));
    }

    #[test]
    fn candidate_parse_failure_is_fatal() {
        let err = MergeError::Parse {
            role: DocumentRole::Candidate,
            source: parse_error(),
        };
        assert!(err.is_fatal());
    }

    #[test]
    fn non_object_candidate_is_fatal() {
        let err = MergeError::ShapeMismatch {
            reference: "object",
            candidate: "string",
        };
        assert!(err.is_fatal());
        assert!(err.to_string().contains("string candidate"));
    }

    #[test]
    fn non_object_reference_is_not_fatal() {
        let err = MergeError::ShapeMismatch {
            reference: "array",
            candidate: "object",
        };
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("array reference"));
    }
}
