use std::fmt;

use thiserror::Error;

/// Why a single upstream fetch did not produce a usable document.
///
/// Callers normally only see [`ResolveError::UpstreamUnavailable`]; the
/// sub-kind is kept for logging and for callers that want to look closer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamFailure {
    /// The upstream answered with a non-success status code.
    Status(u16),
    /// The request did not complete within the configured timeout.
    Timeout,
    /// DNS, connect, or other transport-level failure.
    Transport(String),
    /// The response body could not be read or was not JSON.
    Body(String),
}

impl fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamFailure::Status(code) => write!(f, "status {code}"),
            UpstreamFailure::Timeout => write!(f, "timed out"),
            UpstreamFailure::Transport(reason) => write!(f, "transport error: {reason}"),
            UpstreamFailure::Body(reason) => write!(f, "unreadable body: {reason}"),
        }
    }
}

/// Errors surfaced by the weather resolver
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Upstream unavailable ({url}): {failure}")]
    UpstreamUnavailable { url: String, failure: UpstreamFailure },

    #[error("Upstream response is missing `{field}`")]
    UpstreamShapeMismatch { field: &'static str },
}

impl ResolveError {
    /// Stable machine-readable name of the error category
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::InvalidArgument(_) => "invalid_argument",
            ResolveError::UpstreamUnavailable { .. } => "upstream_unavailable",
            ResolveError::UpstreamShapeMismatch { .. } => "upstream_shape_mismatch",
        }
    }

    pub(crate) fn unavailable(url: &str, failure: UpstreamFailure) -> Self {
        ResolveError::UpstreamUnavailable {
            url: url.to_string(),
            failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        assert_eq!(ResolveError::InvalidArgument("x".into()).kind(), "invalid_argument");
        assert_eq!(
            ResolveError::unavailable("http://u", UpstreamFailure::Timeout).kind(),
            "upstream_unavailable"
        );
        assert_eq!(
            ResolveError::UpstreamShapeMismatch { field: "properties.forecast" }.kind(),
            "upstream_shape_mismatch"
        );
    }

    #[test]
    fn unavailable_message_carries_url_and_reason() {
        let err = ResolveError::unavailable("http://u/points/1,2", UpstreamFailure::Status(503));
        let msg = err.to_string();
        assert!(msg.contains("http://u/points/1,2"));
        assert!(msg.contains("status 503"));
    }
}
