//! Response framing over the raw socket byte stream
//!
//! All four read modes accumulate bytes from the transport and probe for the
//! frame terminator at the end of the accumulation: `CR LF` for single-line
//! responses, `CR LF "." CR LF` for multi-line responses. The deflate session
//! mode runs the socket bytes through an incremental raw-deflate decoder and
//! probes on the decompressed stream; the gzip-terminator mode frames like an
//! uncompressed multi-line response and post-processes the payload.
//!
//! The functions are generic over `AsyncRead` so they can be driven from
//! in-memory readers in tests.

use crate::commands;
use crate::error::{NntpError, Result};
use crate::response::ResponseEnvelope;
use crate::yenc;
use flate2::{Decompress, FlushDecompress, Status};
use std::io::{Read, Write};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{trace, warn};

const SCRATCH_SIZE: usize = 8 * 1024;
const INFLATE_CHUNK: usize = 16 * 1024;
const MULTILINE_TERMINATOR: &[u8] = b"\r\n.\r\n";

/// Read one response frame in uncompressed mode
///
/// `multiline` declares how the command's response is framed. A status code
/// of 400 or above finalizes the frame at the status line even in multi-line
/// mode; servers do not send a body with error replies, and waiting for a
/// terminator that never comes would hang the connection.
pub async fn read_response<R>(reader: &mut R, multiline: bool) -> Result<ResponseEnvelope>
where
    R: AsyncRead + Unpin,
{
    let mut acc: Vec<u8> = Vec::with_capacity(256);
    let mut scratch = vec![0u8; SCRATCH_SIZE];

    loop {
        if let Some(envelope) = try_finalize(&acc, multiline)? {
            return Ok(envelope);
        }
        let n = reader.read(&mut scratch).await?;
        if n == 0 {
            return Err(NntpError::ConnectionClosed);
        }
        acc.extend_from_slice(&scratch[..n]);
    }
}

/// Read one response frame while RFC 8054 deflate session compression is active
///
/// Socket bytes are fed through an incremental raw-deflate decoder and all
/// terminator and status probing happens on the decompressed stream. If the
/// deflate stream ends before the terminator has been seen, the remaining
/// socket bytes are appended uncompressed until the terminator matches. Some
/// servers append a short uncompressed tail after the compressed block; this
/// tolerance covers them but may mask genuine framing damage, so the
/// transition is logged.
pub async fn read_deflate_response<R>(reader: &mut R, multiline: bool) -> Result<ResponseEnvelope>
where
    R: AsyncRead + Unpin,
{
    let mut decoder = Decompress::new(false);
    let mut acc: Vec<u8> = Vec::with_capacity(256);
    let mut scratch = vec![0u8; SCRATCH_SIZE];
    let mut raw_tail = false;

    loop {
        if let Some(envelope) = try_finalize(&acc, multiline)? {
            return Ok(envelope);
        }
        let n = reader.read(&mut scratch).await?;
        if n == 0 {
            return Err(NntpError::ConnectionClosed);
        }
        if raw_tail {
            acc.extend_from_slice(&scratch[..n]);
        } else if let Some(consumed) = feed_inflate(&mut decoder, &scratch[..n], &mut acc)? {
            raw_tail = true;
            acc.extend_from_slice(&scratch[consumed..n]);
            if multiline && !acc.ends_with(MULTILINE_TERMINATOR) {
                warn!(
                    decompressed = acc.len(),
                    "deflate stream ended before terminator, reading remainder uncompressed"
                );
            } else {
                trace!(decompressed = acc.len(), "deflate stream ended at frame boundary");
            }
        }
    }
}

/// Read one multi-line frame in XFEATURE GZIP TERMINATOR mode
///
/// The framing itself is uncompressed; only the payload between the status
/// line and the terminator is transformed. Payloads carrying the yEnc marker
/// are yEnc-decoded first, then inflated (zlib when the 0x78 header is
/// present, raw deflate otherwise). A decode failure on this path keeps the
/// best-effort bytes instead of failing the command.
pub async fn read_gzip_terminator_response<R>(reader: &mut R) -> Result<ResponseEnvelope>
where
    R: AsyncRead + Unpin,
{
    let mut envelope = read_response(reader, true).await?;
    if let Some(payload) = envelope.payload.take() {
        envelope.payload = Some(decode_terminator_payload(payload));
    }
    Ok(envelope)
}

/// Compress one outgoing command line for an active deflate session
pub fn deflate_command(line: &[u8]) -> Result<Vec<u8>> {
    let mut encoder =
        flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(line)?;
    Ok(encoder.finish()?)
}

/// Inflate a compressed payload, picking zlib or raw deflate by header byte
pub fn inflate_auto(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() * 4);
    if data.first() == Some(&0x78) {
        flate2::read::ZlibDecoder::new(data)
            .read_to_end(&mut out)
            .map_err(|e| NntpError::Decode(format!("zlib inflate failed: {e}")))?;
    } else {
        flate2::read::DeflateDecoder::new(data)
            .read_to_end(&mut out)
            .map_err(|e| NntpError::Decode(format!("raw inflate failed: {e}")))?;
    }
    Ok(out)
}

/// Post-process a gzip-terminator payload, degrading to raw bytes on failure
fn decode_terminator_payload(payload: Vec<u8>) -> Vec<u8> {
    let staged = if yenc::looks_like_yenc(&payload) {
        match yenc::decode(&payload) {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!(%err, bytes = payload.len(), "yEnc decode failed, keeping raw payload");
                return payload;
            }
        }
    } else {
        payload
    };
    match inflate_auto(&staged) {
        Ok(decoded) => decoded,
        Err(err) => {
            warn!(%err, bytes = staged.len(), "payload inflate failed, keeping undecoded bytes");
            staged
        }
    }
}

/// Probe the accumulation for a complete frame
///
/// Returns `Ok(None)` while more bytes are needed. Bytes beyond a completed
/// single-line frame (or a downgraded error frame) are a framing error; an
/// empty payload region in multi-line mode is too.
fn try_finalize(acc: &[u8], multiline: bool) -> Result<Option<ResponseEnvelope>> {
    let Some(status_end) = find_crlf(acc) else {
        return Ok(None);
    };
    let status_line = String::from_utf8_lossy(&acc[..status_end]);
    let (code, message) = commands::parse_status_line(&status_line)?;
    trace!(code, %message, "status line");

    if !multiline || code >= 400 {
        let extra = acc.len() - (status_end + 2);
        if extra > 0 {
            return Err(NntpError::Framing(format!(
                "{extra} leftover bytes after status line {code}"
            )));
        }
        return Ok(Some(ResponseEnvelope {
            code,
            message,
            payload: None,
        }));
    }

    if !acc.ends_with(MULTILINE_TERMINATOR) {
        return Ok(None);
    }
    // The status line's CRLF may overlap the terminator when no payload
    // lines were sent, so bound-check before slicing
    if status_end + 2 + MULTILINE_TERMINATOR.len() >= acc.len() {
        return Err(NntpError::Framing(format!(
            "empty multi-line payload for status {code}"
        )));
    }
    let payload = &acc[status_end + 2..acc.len() - MULTILINE_TERMINATOR.len()];
    Ok(Some(ResponseEnvelope {
        code,
        message,
        payload: Some(payload.to_vec()),
    }))
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

/// Drive the incremental decoder over one chunk of socket bytes
///
/// Returns `Some(consumed)` when the deflate stream ended, leaving
/// `input[consumed..]` undecoded, or `None` when the whole chunk was
/// consumed and the stream continues.
fn feed_inflate(decoder: &mut Decompress, input: &[u8], out: &mut Vec<u8>) -> Result<Option<usize>> {
    let mut offset = 0;
    let mut buf = [0u8; INFLATE_CHUNK];
    loop {
        let before_in = decoder.total_in();
        let before_out = decoder.total_out();
        let status = decoder
            .decompress(&input[offset..], &mut buf, FlushDecompress::None)
            .map_err(|e| NntpError::Decode(format!("deflate session stream error: {e}")))?;
        let consumed = (decoder.total_in() - before_in) as usize;
        let produced = (decoder.total_out() - before_out) as usize;
        out.extend_from_slice(&buf[..produced]);
        offset += consumed;

        match status {
            Status::StreamEnd => return Ok(Some(offset)),
            Status::Ok | Status::BufError => {
                if produced == buf.len() {
                    // output chunk filled, drain pending output first
                    continue;
                }
                if offset >= input.len() {
                    return Ok(None);
                }
                if consumed == 0 && produced == 0 {
                    return Err(NntpError::Decode(
                        "deflate session stream stalled".to_string(),
                    ));
                }
            }
        }
    }
}
