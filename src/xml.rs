/* src/xml.rs */

//! XML front end for the domain configuration.
//!
//! ```xml
//! <domains>
//!   <domain name="example.com" admin="hostmaster@example.com"
//!           ttl="1d" refresh="3h" retry="15m" expire="1w" negttl="1h">
//!     <record type="NS" value="ns1.example.com" />
//!     <record type="A" value="203.0.113.5" />
//!     <record type="MX" priority="10" value="mail.example.com" />
//!   </domain>
//! </domains>
//! ```

use crate::builder::{Attributes, ConfigBuilder, ConfigEvent};
use crate::errors::ConfigError;
use crate::records::ZoneSet;
use fancy_log::{LogLevel, log};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fs;
use std::path::Path;

/// Reads and builds the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<ZoneSet, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let zones = parse_config(&text)?;
    log(
        LogLevel::Info,
        &format!("Loaded {} domain(s) from {:?}", zones.len(), path),
    );
    Ok(zones)
}

/// Builds zones from configuration text, stopping at the first error.
pub fn parse_config(text: &str) -> Result<ZoneSet, ConfigError> {
    let mut builder = ConfigBuilder::new();
    read_events(text, |event| builder.handle(event))?;
    builder.finish()
}

/// Tokenizes `text` and hands every element boundary to `sink`.
///
/// Tag names and attribute keys are folded to upper case. Self-closing elements
/// produce a start followed by an end. Lines are 1-based and point at the end of
/// the element's markup.
pub fn read_events<F>(text: &str, mut sink: F) -> Result<(), ConfigError>
where
    F: FnMut(ConfigEvent) -> Result<(), ConfigError>,
{
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);
    let mut lines = LineCounter::new(text);

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(ConfigError::Markup {
                    message: e.to_string(),
                    line: lines.line_at(reader.error_position() as usize),
                });
            }
        };
        let line = lines.line_at(reader.buffer_position() as usize);

        match event {
            Event::Start(start) => {
                let (tag, attributes) = read_start(&start, line)?;
                sink(ConfigEvent::Start {
                    tag,
                    attributes,
                    line,
                })?;
            }
            Event::Empty(start) => {
                let (tag, attributes) = read_start(&start, line)?;
                sink(ConfigEvent::Start {
                    tag: tag.clone(),
                    attributes,
                    line,
                })?;
                sink(ConfigEvent::End { tag, line })?;
            }
            Event::End(end) => {
                sink(ConfigEvent::End {
                    tag: fold_name(end.name().as_ref()),
                    line,
                })?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(())
}

fn read_start(start: &BytesStart<'_>, line: usize) -> Result<(String, Attributes), ConfigError> {
    let tag = fold_name(start.name().as_ref());
    let mut attributes = Attributes::new();

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| ConfigError::Markup {
            message: e.to_string(),
            line,
        })?;
        let value = attribute.unescape_value().map_err(|e| ConfigError::Markup {
            message: e.to_string(),
            line,
        })?;
        let key = fold_name(attribute.key.as_ref());
        if attributes.contains_key(&key) {
            log(
                LogLevel::Debug,
                &format!("Attribute '{}' repeated on <{}> at line #{}, keeping last", key, tag, line),
            );
        }
        attributes.insert(key, value.into_owned());
    }

    Ok((tag, attributes))
}

fn fold_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).to_uppercase()
}

/// Maps byte offsets to line numbers; offsets are expected in ascending order.
struct LineCounter<'a> {
    bytes: &'a [u8],
    offset: usize,
    line: usize,
}

impl<'a> LineCounter<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            offset: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, position: usize) -> usize {
        let position = position.min(self.bytes.len());
        if position < self.offset {
            self.offset = 0;
            self.line = 1;
        }
        self.line += self.bytes[self.offset..position]
            .iter()
            .filter(|b| **b == b'\n')
            .count();
        self.offset = position;
        self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RecordData;

    const CONFIG: &str = r#"<?xml version="1.0"?>
<domains>
	<domain name="example.com" admin="hostmaster@example.com"
		ttl="1d" refresh="3h" retry="15m" expire="1w" negttl="1h">
		<record type="NS" value="ns1.example.com" />
		<record type="A" domain="www" value="203.0.113.5"></record>
		<record type="TXT" value="a &amp; b" />
	</domain>
</domains>
"#;

    fn collect(text: &str) -> Result<Vec<ConfigEvent>, ConfigError> {
        let mut events = Vec::new();
        read_events(text, |event| {
            events.push(event);
            Ok(())
        })?;
        Ok(events)
    }

    #[test]
    fn events_are_upper_cased_with_lines() {
        let events = collect(CONFIG).unwrap();
        assert_eq!(events.len(), 10);

        match &events[1] {
            ConfigEvent::Start {
                tag,
                attributes,
                line,
            } => {
                assert_eq!(tag, "DOMAIN");
                assert_eq!(attributes["NAME"], "example.com");
                assert_eq!(attributes["NEGTTL"], "1h");
                assert_eq!(*line, 4);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(
            events[3],
            ConfigEvent::End {
                tag: "RECORD".into(),
                line: 5
            }
        );
        assert_eq!(
            events[9],
            ConfigEvent::End {
                tag: "DOMAINS".into(),
                line: 9
            }
        );
    }

    #[test]
    fn builds_zones_from_text() {
        let zones = parse_config(CONFIG).unwrap();
        let zone = zones.get("example.com").unwrap();
        assert_eq!(zone.records.len(), 3);
        assert_eq!(zone.records[1].owner.as_deref(), Some("www"));
        assert_eq!(zone.records[2].data, RecordData::Txt("a & b".into()));
    }

    #[test]
    fn markup_errors_carry_line() {
        let text = "<domains>\n<domain name=\"a\"></record>\n</domains>\n";
        let err = collect(text).unwrap_err();
        assert!(matches!(err, ConfigError::Markup { line: 2, .. }), "{err:?}");
    }

    #[test]
    fn builder_errors_stop_the_stream() {
        let text = "<domains>\n<record type=\"NS\" value=\"ns1\" />\n<domain />\n</domains>\n";
        let err = parse_config(text).unwrap_err();
        assert!(matches!(err, ConfigError::UnexpectedElement { line: 2, .. }));
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.xml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
