//! Send and read paths shared by all commands
//!
//! The read path dispatches on the active compression scheme: deflate
//! sessions decode everything, gzip-terminator only transforms multi-line
//! payloads, and everything else reads the wire as-is. The send path
//! compresses outgoing command lines while a deflate session is active.

use super::{CompressionScheme, NntpClient};
use crate::error::Result;
use crate::framing;
use crate::response::ResponseEnvelope;
use tokio::io::AsyncWriteExt;
use tracing::trace;

impl NntpClient {
    /// Send one command line to the server
    pub(super) async fn send_command(&mut self, line: &str) -> Result<()> {
        if line.starts_with("AUTHINFO PASS") {
            trace!("sending: AUTHINFO PASS ***");
        } else {
            trace!("sending: {}", line.trim_end());
        }

        if self.active_compression == CompressionScheme::Deflate {
            let wire = framing::deflate_command(line.as_bytes())?;
            self.stream.write_all(&wire).await?;
        } else {
            self.stream.write_all(line.as_bytes()).await?;
        }
        self.stream.flush().await?;
        Ok(())
    }

    /// Read one response frame in the mode the active compression dictates
    pub(super) async fn read_reply(&mut self, multiline: bool) -> Result<ResponseEnvelope> {
        match self.active_compression {
            CompressionScheme::Deflate => {
                framing::read_deflate_response(&mut self.stream, multiline).await
            }
            CompressionScheme::GzipTerminator if multiline => {
                framing::read_gzip_terminator_response(&mut self.stream).await
            }
            _ => framing::read_response(&mut self.stream, multiline).await,
        }
    }
}
