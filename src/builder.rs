/* src/builder.rs */

//! Turns element events from the domain configuration into a [`ZoneSet`].
//!
//! Two element kinds matter: `DOMAIN` opens a zone and carries its SOA timings,
//! `RECORD` adds a resource record to the zone currently open. Anything else
//! (a wrapping root element, comments turned into tags by a tool) is ignored.
//! The first invalid element aborts the build.

use crate::errors::ConfigError;
use crate::records::{RecordData, RecordType, ZoneConfig, ZoneRecord, ZoneSet};
use crate::spf::build_spf_record;
use crate::validate::{is_valid_ipv4, is_valid_time_literal, parse_mx_priority};
use std::collections::HashMap;

pub const DOMAIN_TAG: &str = "DOMAIN";
pub const RECORD_TAG: &str = "RECORD";

pub type Attributes = HashMap<String, String>;

/// One element boundary from the configuration source. Tag names and
/// attribute keys are upper case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigEvent {
    Start {
        tag: String,
        attributes: Attributes,
        line: usize,
    },
    End {
        tag: String,
        line: usize,
    },
}

#[derive(Debug)]
enum DomainState {
    Closed,
    Open(ZoneConfig),
}

/// Builder for a single configuration run.
#[derive(Debug)]
pub struct ConfigBuilder {
    zones: ZoneSet,
    state: DomainState,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            zones: ZoneSet::default(),
            state: DomainState::Closed,
        }
    }

    pub fn handle(&mut self, event: ConfigEvent) -> Result<(), ConfigError> {
        match event {
            ConfigEvent::Start {
                tag,
                attributes,
                line,
            } => self.start_element(&tag, &attributes, line),
            ConfigEvent::End { tag, .. } => {
                self.end_element(&tag);
                Ok(())
            }
        }
    }

    pub fn start_element(
        &mut self,
        tag: &str,
        attributes: &Attributes,
        line: usize,
    ) -> Result<(), ConfigError> {
        match tag {
            DOMAIN_TAG => {
                if let DomainState::Open(_) = self.state {
                    return Err(ConfigError::UnexpectedElement {
                        tag: tag.to_string(),
                        context: "nested inside another domain",
                        line,
                    });
                }
                let zone = self.open_domain(attributes, line)?;
                self.state = DomainState::Open(zone);
                Ok(())
            }
            RECORD_TAG => match &mut self.state {
                DomainState::Open(zone) => {
                    let record = build_record(&zone.name, attributes, line)?;
                    zone.records.push(record);
                    Ok(())
                }
                DomainState::Closed => Err(ConfigError::UnexpectedElement {
                    tag: tag.to_string(),
                    context: "outside of any domain",
                    line,
                }),
            },
            _ => Ok(()),
        }
    }

    pub fn end_element(&mut self, tag: &str) {
        if tag != DOMAIN_TAG {
            return;
        }
        if let DomainState::Open(zone) = std::mem::replace(&mut self.state, DomainState::Closed) {
            self.zones.push(zone);
        }
    }

    /// Consumes the builder; fails if a domain was left open.
    pub fn finish(self) -> Result<ZoneSet, ConfigError> {
        match self.state {
            DomainState::Closed => Ok(self.zones),
            DomainState::Open(zone) => Err(ConfigError::UnclosedDomain { domain: zone.name }),
        }
    }

    fn open_domain(&self, attributes: &Attributes, line: usize) -> Result<ZoneConfig, ConfigError> {
        let name = attributes
            .get("NAME")
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .ok_or(ConfigError::MissingDomainName { line })?;

        if self.zones.contains(name) {
            return Err(ConfigError::DuplicateDomain {
                domain: name.to_string(),
                line,
            });
        }

        // Fields are checked in declaration order; the first missing or bad one wins.
        let required = |key: &str,
                        attribute: &'static str,
                        timed: bool|
         -> Result<String, ConfigError> {
            let value = attributes
                .get(key)
                .ok_or_else(|| ConfigError::MissingDomainAttribute {
                    attribute,
                    domain: name.to_string(),
                    line,
                })?;

            if timed && !is_valid_time_literal(value) {
                return Err(ConfigError::InvalidDomainTime {
                    attribute,
                    value: value.clone(),
                    domain: name.to_string(),
                    line,
                });
            }
            Ok(value.clone())
        };

        Ok(ZoneConfig {
            name: name.to_string(),
            admin: required("ADMIN", "admin", false)?,
            ttl: required("TTL", "ttl", true)?,
            refresh: required("REFRESH", "refresh", true)?,
            retry: required("RETRY", "retry", true)?,
            expire: required("EXPIRE", "expire", true)?,
            negative_ttl: required("NEGTTL", "negttl", true)?,
            records: Vec::new(),
        })
    }
}

fn build_record(domain: &str, attributes: &Attributes, line: usize) -> Result<ZoneRecord, ConfigError> {
    let type_name = attributes
        .get("TYPE")
        .ok_or_else(|| ConfigError::MissingRecordType {
            domain: domain.to_string(),
            line,
        })?;

    let record_type: RecordType =
        type_name
            .parse()
            .map_err(|_| ConfigError::InvalidRecordType {
                record_type: type_name.clone(),
                domain: domain.to_string(),
                line,
            })?;

    let value = attributes
        .get("VALUE")
        .map(|value| value.trim().to_string())
        .ok_or_else(|| ConfigError::MissingRecordValue {
            record_type: type_name.clone(),
            domain: domain.to_string(),
            line,
        })?;

    let ttl = match attributes.get("TTL") {
        Some(ttl) if !is_valid_time_literal(ttl) => {
            return Err(ConfigError::InvalidRecordTime {
                value: ttl.clone(),
                record_type: type_name.clone(),
                domain: domain.to_string(),
                line,
            });
        }
        ttl => ttl.cloned(),
    };

    let data = match record_type {
        RecordType::Ns => RecordData::Ns(value),
        RecordType::A => {
            if !is_valid_ipv4(&value) {
                return Err(ConfigError::InvalidAddress {
                    value,
                    domain: domain.to_string(),
                    line,
                });
            }
            RecordData::A(value)
        }
        RecordType::Cname => RecordData::Cname(value),
        RecordType::Mx => {
            let priority = attributes
                .get("PRIORITY")
                .ok_or_else(|| ConfigError::MissingMxPriority {
                    domain: domain.to_string(),
                    line,
                })?;
            let priority =
                parse_mx_priority(priority).ok_or_else(|| ConfigError::InvalidMxPriority {
                    priority: priority.clone(),
                    domain: domain.to_string(),
                    line,
                })?;
            RecordData::Mx {
                priority,
                exchange: value,
            }
        }
        RecordType::Spf => {
            let policy = build_spf_record(&value).map_err(|source| ConfigError::InvalidSpf {
                source,
                domain: domain.to_string(),
                line,
            })?;
            RecordData::Spf(policy)
        }
        RecordType::Txt => RecordData::Txt(value),
    };

    Ok(ZoneRecord {
        owner: attributes.get("DOMAIN").map(|owner| owner.trim().to_string()),
        ttl,
        data,
    })
}
