//! Error types shared by every chain mode.

use crate::link::LinkId;

/// Result type alias for chain operations
pub type ChainResult<T> = Result<T, ChainError>;

/// Errors raised while assembling or configuring a chain.
///
/// Dispatch itself never fails: an unanswered request in a filter chain is
/// reported as `None`, not as an error.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// The chain would be structurally unsound (wrapper without an inner link,
    /// empty builder, successor on a base link, ...)
    #[error("Invalid chain configuration: {0}")]
    InvalidConfiguration(String),

    /// The id was not minted by this chain
    #[error("Link not found: {0}")]
    UnknownLink(LinkId),

    /// Successors are set once and never re-pointed
    #[error("Link {link} already forwards to {existing}")]
    SuccessorAlreadySet { link: LinkId, existing: LinkId },

    /// Linking would close a loop; the path lists link names along it
    #[error("Cycle detected in chain: {}", .0.join(" -> "))]
    CycleDetected(Vec<String>),

    /// The chain already holds `max_links` links
    #[error("Chain capacity exceeded: at most {0} links")]
    CapacityExceeded(usize),

    /// Error while parsing a configuration document
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// Error while reading a configuration file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChainError {
    /// Create a new invalid configuration error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}
