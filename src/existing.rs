/* src/existing.rs */

use crate::errors::SyncError;
use crate::serial::Serial;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

static SERIAL_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\t+([0-9]{8})([0-9]{2})\t+; Serial\n").expect("serial line pattern")
});

/// A zone file previously written by this tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingZone {
    pub serial: Serial,
    /// File contents with the serial line removed.
    pub body: String,
}

/// Reads the zone file at `path`. A missing file is `Ok(None)`; a file without a
/// recognisable serial line is an error so it never gets overwritten blindly.
pub fn read_existing_zone(path: &Path) -> Result<Option<ExistingZone>, SyncError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SyncError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    parse_existing_zone(&text)
        .map(Some)
        .ok_or_else(|| SyncError::MissingSerial {
            path: path.to_path_buf(),
        })
}

/// Extracts the serial and the serial-less body from zone file text.
pub fn parse_existing_zone(text: &str) -> Option<ExistingZone> {
    let captures = SERIAL_LINE.captures(text)?;
    let line = captures.get(0)?;
    let version = captures[2].parse().ok()?;

    let mut body = String::with_capacity(text.len());
    body.push_str(&text[..line.start()]);
    body.push('\n');
    body.push_str(&text[line.end()..]);

    Some(ExistingZone {
        serial: Serial::new(&captures[1], version),
        body,
    })
}
