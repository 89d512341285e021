// ABOUTME: Container Directory error types with SNAFU context selectors.
// ABOUTME: Every transport failure names the request path it belongs to.

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DirectoryError {
    #[snafu(display("invalid directory url '{url}': {reason}"))]
    InvalidUrl { url: String, reason: String },

    #[snafu(display("failed to connect to directory at {address}: {source}"))]
    Connect {
        address: String,
        source: std::io::Error,
    },

    #[snafu(display("failed to build directory request for {path}: {source}"))]
    Request {
        path: String,
        source: hyper::http::Error,
    },

    #[snafu(display("directory request to {path} failed: {source}"))]
    Transport { path: String, source: hyper::Error },

    #[snafu(display("directory request to {path} timed out after {seconds}s"))]
    Timeout { path: String, seconds: u64 },

    #[snafu(display("directory returned HTTP {status} for {path}"))]
    Status { path: String, status: u16 },

    #[snafu(display("malformed directory response from {path}: {source}"))]
    Decode {
        path: String,
        source: serde_json::Error,
    },

    #[snafu(display("failed to read fixture {path}: {message}"))]
    Fixture { path: String, message: String },
}

/// Coarse classification for callers that only need to branch on the cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryErrorKind {
    Configuration,
    Unreachable,
    Protocol,
}

impl DirectoryError {
    pub fn kind(&self) -> DirectoryErrorKind {
        match self {
            DirectoryError::InvalidUrl { .. } | DirectoryError::Fixture { .. } => {
                DirectoryErrorKind::Configuration
            }
            DirectoryError::Connect { .. }
            | DirectoryError::Transport { .. }
            | DirectoryError::Timeout { .. } => DirectoryErrorKind::Unreachable,
            DirectoryError::Request { .. }
            | DirectoryError::Status { .. }
            | DirectoryError::Decode { .. } => DirectoryErrorKind::Protocol,
        }
    }
}
