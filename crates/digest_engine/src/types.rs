use std::fmt;

use digest_core::Difficulty;

/// One row of the remote problem listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemSummary {
    pub title: String,
    pub slug: String,
    pub difficulty: Difficulty,
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    InvalidSettings,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
    Decode,
    Graphql,
    NotFound { slug: String },
    InvalidIdentifier { raw: String },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidSettings => write!(f, "invalid fetch settings"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Graphql => write!(f, "graphql error"),
            FailureKind::NotFound { slug } => write!(f, "no problem found for slug {slug}"),
            FailureKind::InvalidIdentifier { raw } => {
                write!(f, "problem identifier {raw:?} is not numeric")
            }
        }
    }
}
