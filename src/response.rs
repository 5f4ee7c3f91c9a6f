//! NNTP response envelope and status codes

use crate::error::{NntpError, Result};

/// One framed NNTP response
///
/// `payload` is `Some` only when the response was read in a multi-line mode
/// and the status code permitted a body. The payload carries the raw bytes
/// between the status line and the `CRLF "." CRLF` terminator, with the
/// terminator already stripped.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    /// 3-digit NNTP response code
    pub code: u16,
    /// Status message from server
    pub message: String,
    /// Multi-line response body (None for single-line responses)
    pub payload: Option<Vec<u8>>,
}

impl ResponseEnvelope {
    /// Length of the payload in bytes, zero when there is none
    pub fn payload_len(&self) -> usize {
        self.payload.as_ref().map_or(0, Vec::len)
    }

    /// Payload interpreted as lossy UTF-8 text
    pub fn payload_text(&self) -> String {
        match &self.payload {
            Some(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            None => String::new(),
        }
    }

    /// Check if response indicates success (2xx)
    pub fn is_success(&self) -> bool {
        self.code >= 200 && self.code < 300
    }

    /// Check if response indicates continuation (3xx)
    pub fn is_continuation(&self) -> bool {
        self.code >= 300 && self.code < 400
    }

    /// Check if response indicates error (4xx or 5xx)
    pub fn is_error(&self) -> bool {
        self.code >= 400
    }

    /// Validate the status code against a command's accepted set
    ///
    /// A code outside the set yields [`NntpError::Protocol`] carrying the
    /// code, the server message, and the observed payload byte length.
    pub fn expect(self, accept: &[u16]) -> Result<Self> {
        if accept.contains(&self.code) {
            Ok(self)
        } else {
            Err(NntpError::Protocol {
                code: self.code,
                message: self.message,
                bytes: self.payload.map_or(0, |p| p.len()),
            })
        }
    }
}

/// NNTP response codes (RFC 3977 / RFC 4643 / RFC 8054)
#[allow(dead_code)]
pub mod codes {
    // 1xx - Informational
    /// Capability list follows (RFC 3977 Section 5.2)
    pub const CAPABILITY_LIST: u16 = 101;
    /// Server date/time (RFC 3977 Section 7.1)
    pub const SERVER_DATE: u16 = 111;

    // 2xx - Success
    /// Server ready, posting allowed
    pub const READY_POSTING_ALLOWED: u16 = 200;
    /// Server ready, no posting
    pub const READY_NO_POSTING: u16 = 201;
    /// Closing connection
    pub const CLOSING_CONNECTION: u16 = 205;
    /// Compression active (RFC 8054)
    pub const COMPRESSION_ACTIVE: u16 = 206;
    /// Group selected
    pub const GROUP_SELECTED: u16 = 211;
    /// Article follows
    pub const ARTICLE_FOLLOWS: u16 = 220;
    /// Head follows
    pub const HEAD_FOLLOWS: u16 = 221;
    /// Body follows
    pub const BODY_FOLLOWS: u16 = 222;
    /// Article exists (STAT)
    pub const ARTICLE_STAT: u16 = 223;
    /// Overview information follows
    pub const OVERVIEW_INFO_FOLLOWS: u16 = 224;
    /// Authentication accepted
    pub const AUTH_ACCEPTED: u16 = 281;
    /// XFEATURE compression enabled
    pub const XFEATURE_ENABLED: u16 = 290;

    // 3xx - Continuation
    /// Continue with authentication
    pub const AUTH_CONTINUE: u16 = 381;

    // 4xx - Temporary errors
    /// Service temporarily unavailable
    pub const SERVICE_UNAVAILABLE: u16 = 400;
    /// Unable to activate compression (RFC 8054)
    pub const COMPRESSION_NOT_ACTIVE: u16 = 403;
    /// No such newsgroup
    pub const NO_SUCH_GROUP: u16 = 411;
    /// No newsgroup selected
    pub const NO_GROUP_SELECTED: u16 = 412;
    /// No current article
    pub const NO_CURRENT_ARTICLE: u16 = 420;
    /// No article with that number
    pub const NO_SUCH_ARTICLE_NUMBER: u16 = 423;
    /// No article with that message-id
    pub const NO_SUCH_ARTICLE_ID: u16 = 430;
    /// Authentication rejected
    pub const AUTH_REJECTED: u16 = 481;
    /// Authentication out of sequence
    pub const AUTH_OUT_OF_SEQUENCE: u16 = 482;

    // 5xx - Permanent errors
    /// Access denied / command unavailable
    pub const ACCESS_DENIED: u16 = 502;
}
