//! NNTP error types

use thiserror::Error;

/// NNTP protocol and connection errors
#[derive(Error, Debug)]
pub enum NntpError {
    /// IO error during network operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS error during secure connection
    #[error("TLS error: {0}")]
    Tls(String),

    /// Connection closed unexpectedly
    #[error("Connection closed")]
    ConnectionClosed,

    /// Malformed or truncated stream relative to the expected framing mode
    #[error("Framing error: {0}")]
    Framing(String),

    /// Status code outside the accepted set for a command
    ///
    /// Carries the actual code and message so callers can distinguish
    /// "not found" replies (423/430) from genuine failures.
    #[error("NNTP error {code}: {message} ({bytes} payload bytes)")]
    Protocol {
        /// NNTP response code (e.g., 411, 430, 502)
        code: u16,
        /// Status message from the server
        message: String,
        /// Payload byte length observed with the response
        bytes: usize,
    },

    /// Unsupported or unimplemented compression scheme selected
    #[error("Compression negotiation failed: {0}")]
    Negotiation(String),

    /// yEnc or compression decode failure
    #[error("Decode error: {0}")]
    Decode(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// No such newsgroup
    #[error("No such newsgroup: {0}")]
    NoSuchGroup(String),

    /// Configuration document could not be parsed
    #[error("Config error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration is structurally invalid (bad reader index, disabled server)
    #[error("Config error: {0}")]
    Config(String),

    /// NZB parse error
    #[error("NZB error: {0}")]
    Nzb(String),
}

/// Result type alias using NntpError
pub type Result<T> = std::result::Result<T, NntpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NntpError::Protocol {
            code: 430,
            message: "no such article".to_string(),
            bytes: 0,
        };
        assert_eq!(err.to_string(), "NNTP error 430: no such article (0 payload bytes)");

        let err = NntpError::Framing("leftover bytes after status line".to_string());
        assert_eq!(
            err.to_string(),
            "Framing error: leftover bytes after status line"
        );

        let err = NntpError::Negotiation("XZVER is not implemented".to_string());
        assert_eq!(
            err.to_string(),
            "Compression negotiation failed: XZVER is not implemented"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        let err: NntpError = io.into();
        assert!(matches!(err, NntpError::Io(_)));
    }
}
