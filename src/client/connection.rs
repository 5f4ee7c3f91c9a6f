//! Connection establishment and teardown
//!
//! Handles TCP connect with socket tuning, implicit TLS selection by port,
//! and server greeting validation.

use crate::commands;
use crate::error::{NntpError, Result};
use crate::framing;
use crate::response::codes;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tracing::{debug, warn};

use super::{DEFAULT_INLINE_LIMIT, DEFAULT_SPOOL_ROOT, NntpClient, NntpStream};
use crate::config::ServerEntry;

/// TCP receive buffer size (4MB), sized for high-bandwidth overview pulls
const RECV_BUFFER_SIZE: usize = 4 * 1024 * 1024;

/// TCP send buffer size (1MB)
const SEND_BUFFER_SIZE: usize = 1024 * 1024;

/// Codes a server may greet with
const GREETING_CODES: &[u16] = &[
    codes::READY_POSTING_ALLOWED,
    codes::READY_NO_POSTING,
    codes::SERVICE_UNAVAILABLE,
    codes::ACCESS_DENIED,
];

impl NntpClient {
    /// Connect to the server described by `entry`
    ///
    /// Ports 443 and 563 get an implicit-TLS connection with certificates
    /// validated against the webpki root store; any other port connects in
    /// plain TCP. The greeting must carry one of the codes in
    /// [`GREETING_CODES`]; anything else fails the connect.
    ///
    /// Does not authenticate. Call [`authenticate`](Self::authenticate)
    /// after connecting.
    pub async fn connect(entry: Arc<ServerEntry>) -> Result<Self> {
        debug!("connecting to {}:{}", entry.url, entry.port);

        let tcp_stream = tuned_tcp_connect(&entry.url, entry.port).await?;
        let secure = entry.is_secure_port();

        let stream = if secure {
            // Install the ring provider once; later calls are no-ops
            use tokio_rustls::rustls::crypto::{CryptoProvider, ring};
            let _ = CryptoProvider::install_default(ring::default_provider());

            let mut root_store = RootCertStore::empty();
            root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
            let tls_config = ClientConfig::builder()
                .with_root_certificates(root_store)
                .with_no_client_auth();

            let connector = TlsConnector::from(Arc::new(tls_config));
            let server_name = ServerName::try_from(entry.url.clone())
                .map_err(|e| NntpError::Tls(format!("invalid server name: {e}")))?;

            let tls_stream = connector
                .connect(server_name, tcp_stream)
                .await
                .map_err(|e| NntpError::Tls(format!("TLS handshake failed: {e}")))?;
            NntpStream::Tls(Box::new(tls_stream))
        } else {
            NntpStream::Plain(tcp_stream)
        };

        let mut client = Self {
            stream,
            entry,
            secure,
            current_group: None,
            supported_compression: None,
            active_compression: super::CompressionScheme::None,
            inline_limit: DEFAULT_INLINE_LIMIT,
            spool_root: DEFAULT_SPOOL_ROOT.into(),
        };

        let greeting = framing::read_response(&mut client.stream, false)
            .await?
            .expect(GREETING_CODES)?;
        debug!(code = greeting.code, message = %greeting.message, "server greeting");

        Ok(client)
    }

    /// Send QUIT and shut the connection down
    ///
    /// Consumes the client; the connection cannot be reused afterwards.
    pub async fn quit(mut self) -> Result<()> {
        self.send_command(commands::quit()).await?;
        self.read_reply(false)
            .await?
            .expect(&[codes::CLOSING_CONNECTION])?;
        self.stream.shutdown().await?;
        debug!(server = %self.entry.url, "connection closed");
        Ok(())
    }
}

/// Connect a socket2-tuned TCP stream
async fn tuned_tcp_connect(host: &str, port: u16) -> Result<TcpStream> {
    use socket2::{Domain, Protocol, Socket, Type};
    use std::net::ToSocketAddrs;

    let addr = format!("{host}:{port}");
    let socket_addr = tokio::task::spawn_blocking(move || {
        addr.to_socket_addrs()
            .map_err(|e| {
                NntpError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("failed to resolve address: {e}"),
                ))
            })?
            .next()
            .ok_or_else(|| {
                NntpError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "no address resolved",
                ))
            })
    })
    .await
    .map_err(|e| NntpError::Io(std::io::Error::other(format!("task join error: {e}"))))??;

    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    socket.set_nodelay(true)?;
    if let Err(e) = socket.set_recv_buffer_size(RECV_BUFFER_SIZE) {
        warn!("failed to set receive buffer size: {e}");
    }
    if let Err(e) = socket.set_send_buffer_size(SEND_BUFFER_SIZE) {
        warn!("failed to set send buffer size: {e}");
    }

    // socket2's connect is blocking; switch to non-blocking only afterwards
    let std_stream = tokio::task::spawn_blocking(move || -> std::io::Result<std::net::TcpStream> {
        socket.connect(&socket_addr.into())?;
        socket.set_nonblocking(true)?;
        Ok(socket.into())
    })
    .await
    .map_err(|e| NntpError::Io(std::io::Error::other(format!("task join error: {e}"))))??;

    Ok(TcpStream::from_std(std_stream)?)
}
