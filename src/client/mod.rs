//! NNTP client with TLS and compression support

mod articles;
mod auth;
mod compression;
mod connection;
mod group_ops;
mod io;
mod metadata;

pub use compression::CompressionScheme;
pub use metadata::Delivery;

use crate::config::ServerEntry;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tracing::debug;

/// Default payload size above which XOVER results are spooled to disk
const DEFAULT_INLINE_LIMIT: usize = 16 * 1024;

/// Default root directory for spooled overview data
const DEFAULT_SPOOL_ROOT: &str = ".nntp-probe";

/// Plain-TCP or TLS transport, selected by the server port
pub(crate) enum NntpStream {
    Plain(TcpStream),
    Tls(Box<TlsStream<TcpStream>>),
}

impl AsyncRead for NntpStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            NntpStream::Plain(s) => Pin::new(s).poll_read(cx, buf),
            NntpStream::Tls(s) => Pin::new(s).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for NntpStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        match self.get_mut() {
            NntpStream::Plain(s) => Pin::new(s).poll_write(cx, buf),
            NntpStream::Tls(s) => Pin::new(s).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            NntpStream::Plain(s) => Pin::new(s).poll_flush(cx),
            NntpStream::Tls(s) => Pin::new(s).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            NntpStream::Plain(s) => Pin::new(s).poll_shutdown(cx),
            NntpStream::Tls(s) => Pin::new(s).poll_shutdown(cx),
        }
    }
}

/// Async NNTP client
///
/// # Example
///
/// ```no_run
/// use nntp_probe::{NntpClient, ServerEntry};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let entry = ServerEntry::with_credentials("news.example.com", 563, "user", "pass");
/// let mut client = NntpClient::connect(Arc::new(entry)).await?;
/// client.authenticate().await?;
///
/// client.capabilities().await?;
/// let info = client.select_group("comp.lang.forth").await?;
/// println!("group has {} articles", info.count);
///
/// client.quit().await?;
/// # Ok(())
/// # }
/// ```
#[must_use]
pub struct NntpClient {
    /// Transport stream
    stream: NntpStream,
    /// Server this connection belongs to
    entry: Arc<ServerEntry>,
    /// Whether the transport is TLS
    secure: bool,
    /// Currently selected newsgroup
    current_group: Option<String>,
    /// Compression support detected by the first CAPABILITIES call.
    /// `None` until capabilities have been queried; never overwritten after.
    supported_compression: Option<CompressionScheme>,
    /// Compression currently active on the wire
    active_compression: CompressionScheme,
    /// Payload size above which XOVER results are spooled to disk
    inline_limit: usize,
    /// Root directory for spooled overview data
    spool_root: PathBuf,
}

impl NntpClient {
    /// The server entry this connection was made for
    pub fn server(&self) -> &ServerEntry {
        &self.entry
    }

    /// Whether the transport is TLS
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Get the currently selected newsgroup, if any
    pub fn current_group(&self) -> Option<&str> {
        self.current_group.as_deref()
    }

    /// Compression scheme the server supports, once capabilities were queried
    pub fn supported_compression(&self) -> Option<CompressionScheme> {
        self.supported_compression
    }

    /// Compression scheme currently active on the wire
    pub fn active_compression(&self) -> CompressionScheme {
        self.active_compression
    }

    /// Set the payload size above which XOVER results are spooled to disk
    pub fn set_inline_limit(&mut self, bytes: usize) {
        self.inline_limit = bytes;
    }

    /// Set the root directory for spooled overview data
    pub fn set_spool_root(&mut self, root: impl Into<PathBuf>) {
        self.spool_root = root.into();
    }
}

impl std::fmt::Debug for NntpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NntpClient")
            .field("server", &self.entry.url)
            .field("port", &self.entry.port)
            .field("secure", &self.secure)
            .field("current_group", &self.current_group)
            .field("supported_compression", &self.supported_compression)
            .field("active_compression", &self.active_compression)
            .finish_non_exhaustive()
    }
}

impl Drop for NntpClient {
    fn drop(&mut self) {
        debug!(server = %self.entry.url, "NntpClient dropped");
    }
}
