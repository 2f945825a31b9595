/* src/records.rs */

use std::fmt;
use std::str::FromStr;

/// Record types accepted in a domain configuration, declared in zone-file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    Ns,
    A,
    Cname,
    Mx,
    Spf,
    Txt,
}

impl RecordType {
    /// Every type, in the order its group is rendered.
    pub const ALL: [RecordType; 6] = [
        RecordType::Ns,
        RecordType::A,
        RecordType::Cname,
        RecordType::Mx,
        RecordType::Spf,
        RecordType::Txt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Ns => "NS",
            RecordType::A => "A",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Spf => "SPF",
            RecordType::Txt => "TXT",
        }
    }

    /// Type token written to the zone file. SPF policies are published as TXT.
    pub fn zone_token(&self) -> &'static str {
        match self {
            RecordType::Spf => "TXT",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    Ns(String),
    A(String),
    Cname(String),
    Mx { priority: u16, exchange: String },
    /// Unquoted SPF policy, e.g. `v=spf1 ip4:10.0.0.1 ?all`.
    Spf(String),
    /// Unquoted TXT value.
    Txt(String),
}

impl RecordData {
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordData::Ns(_) => RecordType::Ns,
            RecordData::A(_) => RecordType::A,
            RecordData::Cname(_) => RecordType::Cname,
            RecordData::Mx { .. } => RecordType::Mx,
            RecordData::Spf(_) => RecordType::Spf,
            RecordData::Txt(_) => RecordType::Txt,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRecord {
    /// Owner name; `None` is the zone apex (`@`).
    pub owner: Option<String>,
    /// Per-record TTL override, a validated time literal.
    pub ttl: Option<String>,
    pub data: RecordData,
}

impl ZoneRecord {
    pub fn record_type(&self) -> RecordType {
        self.data.record_type()
    }
}

/// SOA timings and records for one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneConfig {
    pub name: String,
    /// Contact mailbox as configured (`hostmaster@example.com`).
    pub admin: String,
    pub ttl: String,
    pub refresh: String,
    pub retry: String,
    pub expire: String,
    pub negative_ttl: String,
    /// Insertion order is kept and used within each type group.
    pub records: Vec<ZoneRecord>,
}

impl ZoneConfig {
    /// The first NS record in insertion order, used as the SOA primary.
    pub fn primary_nameserver(&self) -> Option<&str> {
        self.records.iter().find_map(|record| match &record.data {
            RecordData::Ns(host) => Some(host.as_str()),
            _ => None,
        })
    }

    pub fn records_of(&self, record_type: RecordType) -> impl Iterator<Item = &ZoneRecord> {
        self.records
            .iter()
            .filter(move |record| record.record_type() == record_type)
    }
}

/// All zones of one configuration, in the order they were defined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneSet {
    zones: Vec<ZoneConfig>,
}

impl ZoneSet {
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&ZoneConfig> {
        self.zones.iter().find(|zone| zone.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZoneConfig> {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Callers check [`ZoneSet::contains`] first; names stay unique.
    pub(crate) fn push(&mut self, zone: ZoneConfig) {
        debug_assert!(!self.contains(&zone.name));
        self.zones.push(zone);
    }
}
