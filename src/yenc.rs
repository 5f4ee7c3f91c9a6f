//! yEnc payload codec
//!
//! Decodes the yEnc wire form used for binary Usenet payloads. The payload
//! region is located structurally rather than by parsing `=ybegin` keywords:
//! it starts two bytes after the first CR (the end of the header line) and
//! ends three bytes before the last `y` byte (the `y` of the `=yend`
//! trailer, preceded by `CR LF =`). Checksum fields in the trailer are
//! ignored.

use crate::error::{NntpError, Result};

/// yEnc offset applied to every plain byte
const PLAIN_OFFSET: u8 = 42;
/// Additional offset applied to escaped bytes
const ESCAPE_OFFSET: u8 = 64;

/// Decode a complete yEnc message (header line, data lines, trailer line)
///
/// # Errors
///
/// Returns [`NntpError::Decode`] when the header/trailer markers cannot be
/// located or delimit an empty or inverted payload region.
pub fn decode(input: &[u8]) -> Result<Vec<u8>> {
    let header_end = input
        .iter()
        .position(|&b| b == b'\r')
        .ok_or_else(|| NntpError::Decode("yEnc input has no header line".to_string()))?;
    let trailer_y = input
        .iter()
        .rposition(|&b| b == b'y')
        .ok_or_else(|| NntpError::Decode("yEnc input has no trailer".to_string()))?;

    let start = header_end + 2;
    let end = trailer_y.saturating_sub(3);
    if start >= end || end > input.len() {
        return Err(NntpError::Decode(format!(
            "yEnc payload region is empty or inverted ({start}..{end})"
        )));
    }

    let mut output = Vec::with_capacity(end - start);
    let mut escaped = false;
    for &byte in &input[start..end] {
        if escaped {
            output.push(byte.wrapping_sub(ESCAPE_OFFSET).wrapping_sub(PLAIN_OFFSET));
            escaped = false;
        } else if byte == b'=' {
            escaped = true;
        } else if byte == b'\r' || byte == b'\n' {
            // Line breaks carry no data
        } else {
            output.push(byte.wrapping_sub(PLAIN_OFFSET));
        }
    }

    Ok(output)
}

/// Encode binary data as a single-part yEnc message
///
/// Bytes whose encoded form would collide with the wire (NUL, CR, LF, `=`)
/// are escaped. No checksum is emitted. Lines wrap at 128 encoded bytes.
pub fn encode(input: &[u8]) -> Vec<u8> {
    const LINE_WIDTH: usize = 128;

    let mut output = Vec::with_capacity(input.len() + input.len() / 64 + 64);
    output.extend_from_slice(
        format!("=ybegin line={} size={} name=data\r\n", LINE_WIDTH, input.len()).as_bytes(),
    );

    let mut column = 0;
    for &byte in input {
        let encoded = byte.wrapping_add(PLAIN_OFFSET);
        if matches!(encoded, 0x00 | b'\r' | b'\n' | b'=') {
            output.push(b'=');
            output.push(encoded.wrapping_add(ESCAPE_OFFSET));
            column += 2;
        } else {
            output.push(encoded);
            column += 1;
        }
        if column >= LINE_WIDTH {
            output.extend_from_slice(b"\r\n");
            column = 0;
        }
    }
    if column > 0 {
        output.extend_from_slice(b"\r\n");
    }

    output.extend_from_slice(format!("=yend size={}\r\n", input.len()).as_bytes());
    output
}

/// Whether a multi-line payload looks like a yEnc message
pub fn looks_like_yenc(payload: &[u8]) -> bool {
    payload.starts_with(b"=y")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_simple() {
        // "Test": T(84)+42=126 '~', e(101)+42=143, s(115)+42=157, t(116)+42=158
        let mut input = Vec::new();
        input.extend_from_slice(b"=ybegin line=128 size=4 name=t\r\n");
        input.extend_from_slice(&[126, 143, 157, 158]);
        input.extend_from_slice(b"\r\n=yend size=4\r\n");

        let decoded = decode(&input).unwrap();
        assert_eq!(decoded, b"Test");
    }

    #[test]
    fn test_decode_escaped_bytes() {
        // Inputs whose encoded form hits the critical set {0, CR, LF, '='}:
        //   214 -> 0, 227 -> 13, 224 -> 10, 19 -> 61
        let original: &[u8] = &[214, 227, 224, 19];
        let encoded = encode(original);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_round_trip_all_byte_values() {
        let original: Vec<u8> = (0..=255).collect();
        let decoded = decode(&encode(&original)).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_round_trip_long_payload_wraps_lines() {
        let original: Vec<u8> = (0..2048).map(|i| (i % 251) as u8).collect();
        let encoded = encode(&original);

        // Encoded data lines never carry a bare CR or LF mid-line
        let body_start = encoded.iter().position(|&b| b == b'\n').unwrap() + 1;
        let body_end = encoded.len() - b"=yend size=2048\r\n".len();
        for window in encoded[body_start..body_end].windows(2) {
            if window[0] == b'\r' {
                assert_eq!(window[1], b'\n');
            }
        }

        assert_eq!(decode(&encoded).unwrap(), original);
    }

    #[test]
    fn test_decode_rejects_markerless_input() {
        assert!(decode(b"no markers here").is_err());
        assert!(decode(b"").is_err());
    }

    #[test]
    fn test_decode_rejects_empty_payload_region() {
        assert!(decode(b"=ybegin size=0 name=x\r\n=yend size=0\r\n").is_err());
    }

    #[test]
    fn test_looks_like_yenc() {
        assert!(looks_like_yenc(b"=ybegin line=128 size=4 name=t\r\n"));
        assert!(!looks_like_yenc(b"plain text"));
        assert!(!looks_like_yenc(b""));
    }
}
