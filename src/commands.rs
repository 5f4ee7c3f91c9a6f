//! NNTP command builders and response-line parsing

use crate::error::{NntpError, Result};

/// Build AUTHINFO USER command
pub fn authinfo_user(username: &str) -> String {
    format!("AUTHINFO USER {}\r\n", username)
}

/// Build AUTHINFO PASS command
pub fn authinfo_pass(password: &str) -> String {
    format!("AUTHINFO PASS {}\r\n", password)
}

/// Build GROUP command (RFC 3977 §6.1.1)
pub fn group(name: &str) -> String {
    format!("GROUP {}\r\n", name)
}

/// Build STAT command
///
/// `id` is either a bracketed message-id or an article number within the
/// currently selected group.
pub fn stat(id: &str) -> String {
    format!("STAT {}\r\n", id)
}

/// Build HEAD command
pub fn head(id: &str) -> String {
    format!("HEAD {}\r\n", id)
}

/// Build BODY command
pub fn body(id: &str) -> String {
    format!("BODY {}\r\n", id)
}

/// Build ARTICLE command
pub fn article(id: &str) -> String {
    format!("ARTICLE {}\r\n", id)
}

/// Build XOVER command with a range such as "1-100"
pub fn xover(range: &str) -> String {
    format!("XOVER {}\r\n", range)
}

/// Build COMPRESS DEFLATE command (RFC 8054)
///
/// All traffic after a 206 response is deflate-compressed in both directions.
pub fn compress_deflate() -> &'static str {
    "COMPRESS DEFLATE\r\n"
}

/// Build XFEATURE COMPRESS GZIP TERMINATOR command
///
/// After a 290 response the server compresses multi-line payloads while the
/// framing (status line and terminator) stays uncompressed.
pub fn xfeature_compress_gzip_terminator() -> &'static str {
    "XFEATURE COMPRESS GZIP TERMINATOR\r\n"
}

/// Build CAPABILITIES command (RFC 3977 §5.2)
pub fn capabilities() -> &'static str {
    "CAPABILITIES\r\n"
}

/// Build DATE command (RFC 3977 §7.1)
pub fn date() -> &'static str {
    "DATE\r\n"
}

/// Build QUIT command
pub fn quit() -> &'static str {
    "QUIT\r\n"
}

/// Whether an article identifier is a bracketed message-id (as opposed to an
/// article number in the current group)
pub fn is_message_id(id: &str) -> bool {
    id.starts_with('<') && id.ends_with('>')
}

/// Parse an NNTP status line into code and message
pub fn parse_status_line(line: &str) -> Result<(u16, String)> {
    let line = line.trim_end_matches(['\r', '\n']);
    let bytes = line.as_bytes();
    if bytes.len() < 3
        || !bytes[0].is_ascii_digit()
        || !bytes[1].is_ascii_digit()
        || !bytes[2].is_ascii_digit()
    {
        return Err(NntpError::Framing(format!(
            "malformed status line: {:?}",
            line.chars().take(100).collect::<String>()
        )));
    }
    // "99999" must not parse as code 999 with a message of "99"
    if bytes.len() > 3 && bytes[3].is_ascii_digit() {
        return Err(NntpError::Framing(format!(
            "malformed status code: {:?}",
            line.chars().take(100).collect::<String>()
        )));
    }

    let code = line[0..3]
        .parse::<u16>()
        .map_err(|_| NntpError::Framing(format!("unparseable status code in {:?}", line)))?;

    let message = if line.len() > 3 {
        line[3..].trim_start().to_string()
    } else {
        String::new()
    };

    Ok((code, message))
}

/// Newsgroup summary returned by GROUP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInfo {
    /// Group name as echoed by the server
    pub name: String,
    /// Estimated article count
    pub count: u64,
    /// Lowest article number
    pub low: u64,
    /// Highest article number
    pub high: u64,
}

/// Parse the message fields of a 211 GROUP response
///
/// The fields appear in the order count, low, high, name.
pub fn parse_group_info(message: &str) -> Result<GroupInfo> {
    let mut fields = message.split_whitespace();
    let parse = |field: Option<&str>, what: &str| -> Result<u64> {
        field
            .ok_or_else(|| NntpError::Framing(format!("GROUP response missing {what}: {message:?}")))?
            .parse::<u64>()
            .map_err(|_| NntpError::Framing(format!("GROUP response bad {what}: {message:?}")))
    };
    let count = parse(fields.next(), "count")?;
    let low = parse(fields.next(), "low water mark")?;
    let high = parse(fields.next(), "high water mark")?;
    let name = fields
        .next()
        .ok_or_else(|| NntpError::Framing(format!("GROUP response missing name: {message:?}")))?
        .to_string();

    Ok(GroupInfo {
        name,
        count,
        low,
        high,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builders() {
        assert_eq!(authinfo_user("testuser"), "AUTHINFO USER testuser\r\n");
        assert_eq!(authinfo_pass("testpass"), "AUTHINFO PASS testpass\r\n");
        assert_eq!(group("free.pt"), "GROUP free.pt\r\n");
        assert_eq!(stat("<123@example>"), "STAT <123@example>\r\n");
        assert_eq!(article("<123@example>"), "ARTICLE <123@example>\r\n");
        assert_eq!(head("42"), "HEAD 42\r\n");
        assert_eq!(body("42"), "BODY 42\r\n");
        assert_eq!(xover("1-100"), "XOVER 1-100\r\n");
        assert_eq!(compress_deflate(), "COMPRESS DEFLATE\r\n");
        assert_eq!(
            xfeature_compress_gzip_terminator(),
            "XFEATURE COMPRESS GZIP TERMINATOR\r\n"
        );
        assert_eq!(capabilities(), "CAPABILITIES\r\n");
        assert_eq!(date(), "DATE\r\n");
        assert_eq!(quit(), "QUIT\r\n");
    }

    #[test]
    fn test_is_message_id() {
        assert!(is_message_id("<abc@example>"));
        assert!(!is_message_id("12345"));
        assert!(!is_message_id("<unterminated"));
    }

    #[test]
    fn test_parse_status_line() {
        let (code, msg) = parse_status_line("200 server ready\r\n").unwrap();
        assert_eq!(code, 200);
        assert_eq!(msg, "server ready");

        let (code, msg) = parse_status_line("223").unwrap();
        assert_eq!(code, 223);
        assert_eq!(msg, "");
    }

    #[test]
    fn test_parse_status_line_invalid() {
        assert!(parse_status_line("abc").is_err());
        assert!(parse_status_line("").is_err());
        assert!(parse_status_line("12").is_err());
        assert!(parse_status_line("99999 message").is_err());
    }

    #[test]
    fn test_parse_group_info() {
        let info = parse_group_info("1234 100 1333 comp.lang.forth").unwrap();
        assert_eq!(
            info,
            GroupInfo {
                name: "comp.lang.forth".to_string(),
                count: 1234,
                low: 100,
                high: 1333,
            }
        );
    }

    #[test]
    fn test_parse_group_info_invalid() {
        assert!(parse_group_info("1234 100").is_err());
        assert!(parse_group_info("x y z group").is_err());
        assert!(parse_group_info("").is_err());
    }
}
