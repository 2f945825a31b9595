/* src/serial.rs */

use chrono::NaiveDate;
use std::fmt;

pub const MAX_VERSION: u8 = 99;

/// Zone serial number in `YYYYMMDDVV` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Serial {
    base: String,
    version: u8,
}

impl Serial {
    /// `base` must be an 8-digit date string and `version` at most 99.
    pub fn new(base: impl Into<String>, version: u8) -> Self {
        let base = base.into();
        debug_assert!(base.len() == 8 && base.bytes().all(|b| b.is_ascii_digit()));
        debug_assert!(version <= MAX_VERSION);
        Self { base, version }
    }

    /// First serial of the given day.
    pub fn first_of(date: NaiveDate) -> Self {
        Self::new(date_base(date), 0)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Serial to publish on `date` after this one. A different day starts again at
    /// version 00; `None` once today's versions are used up.
    pub fn successor(&self, date: NaiveDate) -> Option<Serial> {
        let base = date_base(date);
        if base != self.base {
            return Some(Self::new(base, 0));
        }
        if self.version >= MAX_VERSION {
            return None;
        }
        Some(Self::new(base, self.version + 1))
    }
}

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}", self.base, self.version)
    }
}

fn date_base(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}
