//! NZB segment extraction
//!
//! NZB is the XML index format used to describe binary Usenet posts. This
//! module only extracts the segment message-ids, in document order, wrapped
//! in angle brackets so they can be passed straight to STAT and friends.
//!
//! Reference: https://sabnzbd.org/wiki/extra/nzb-spec

use crate::error::{NntpError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::path::Path;

/// Extract all `<segment>` message-ids from an NZB document
pub fn segment_ids(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut ids = Vec::new();
    let mut in_segment = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"segment" => in_segment = true,
            Ok(Event::End(e)) if e.local_name().as_ref() == b"segment" => in_segment = false,
            Ok(Event::Text(t)) if in_segment => {
                let id = t
                    .unescape()
                    .map_err(|e| NntpError::Nzb(format!("bad segment text: {e}")))?;
                ids.push(format!("<{}>", id));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(NntpError::Nzb(format!("XML parse error: {e}"))),
        }
    }

    Ok(ids)
}

/// Read an NZB file and extract its segment message-ids
pub fn segment_ids_from_file(path: &Path) -> Result<Vec<String>> {
    let xml = std::fs::read_to_string(path)?;
    segment_ids(&xml)
}
