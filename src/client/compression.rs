//! Compression scheme detection and activation

use super::NntpClient;
use crate::commands;
use crate::error::{NntpError, Result};
use crate::response::codes;
use tracing::debug;

/// Compression schemes this client understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionScheme {
    /// No compression
    #[default]
    None,
    /// RFC 8054 COMPRESS DEFLATE: the whole session is deflate-compressed
    /// in both directions once activated
    Deflate,
    /// XFEATURE COMPRESS GZIP TERMINATOR: multi-line payloads are
    /// compressed, framing stays uncompressed
    GzipTerminator,
    /// XZVER compressed overview. Detected but not implemented; selecting
    /// it fails fast at activation.
    Xzver,
}

impl CompressionScheme {
    /// Detect the best supported scheme from raw capability text
    ///
    /// Scans for identifying substrings in priority order; the first match
    /// wins.
    pub fn detect(capabilities: &str) -> Self {
        if capabilities.contains("COMPRESS DEFLATE") {
            CompressionScheme::Deflate
        } else if capabilities.contains("GZIP") {
            CompressionScheme::GzipTerminator
        } else if capabilities.contains("XZVER") {
            CompressionScheme::Xzver
        } else {
            CompressionScheme::None
        }
    }
}

impl NntpClient {
    /// Activate the compression scheme the server advertised
    ///
    /// A no-op when capabilities were never queried, when the server
    /// supports nothing, or when the supported scheme is already active:
    /// calling this twice writes nothing on the second call.
    ///
    /// A server may decline COMPRESS DEFLATE with 403 or 502; that leaves
    /// the connection uncompressed without error. XZVER support yields
    /// [`NntpError::Negotiation`].
    pub async fn activate_compression(&mut self) -> Result<()> {
        let Some(scheme) = self.supported_compression else {
            return Ok(());
        };
        if scheme == self.active_compression {
            return Ok(());
        }

        match scheme {
            CompressionScheme::None => {}
            CompressionScheme::Deflate => {
                self.send_command(commands::compress_deflate()).await?;
                let resp = self.read_reply(false).await?.expect(&[
                    codes::COMPRESSION_ACTIVE,
                    codes::COMPRESSION_NOT_ACTIVE,
                    codes::ACCESS_DENIED,
                ])?;
                if resp.code == codes::COMPRESSION_ACTIVE {
                    self.active_compression = CompressionScheme::Deflate;
                    debug!("deflate session compression active");
                } else {
                    debug!(code = resp.code, "server declined deflate compression");
                }
            }
            CompressionScheme::GzipTerminator => {
                self.send_command(commands::xfeature_compress_gzip_terminator())
                    .await?;
                self.read_reply(false)
                    .await?
                    .expect(&[codes::XFEATURE_ENABLED])?;
                self.active_compression = CompressionScheme::GzipTerminator;
                debug!("gzip terminator compression active");
            }
            CompressionScheme::Xzver => {
                return Err(NntpError::Negotiation(
                    "XZVER compression is not implemented".to_string(),
                ));
            }
        }
        Ok(())
    }
}
