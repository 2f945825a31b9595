/* src/sync.rs */

//! Keeps `<target>/db.<domain>` files in step with the configured zones.
//!
//! Every zone is rendered without a serial and compared with the existing file
//! minus its serial line. Only zones that differ (or have no file yet) are staged,
//! each with the next serial. Nothing is written until every zone has been
//! planned, so a bad zone or an unrecognised file leaves the directory untouched.

use crate::errors::SyncError;
use crate::existing::read_existing_zone;
use crate::records::{ZoneConfig, ZoneSet};
use crate::render::render_zone;
use crate::serial::Serial;
use chrono::{Local, NaiveDate};
use fancy_log::{LogLevel, log};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Created,
    Updated,
}

/// A zone file waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedZone {
    pub domain: String,
    pub path: PathBuf,
    pub serial: Serial,
    pub change: Change,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub staged: Vec<StagedZone>,
    /// Domains whose file already matches the configuration.
    pub unchanged: Vec<String>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }
}

pub struct ZoneSync {
    target_dir: PathBuf,
    today: NaiveDate,
}

impl ZoneSync {
    /// Serials are based on the local date.
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self::for_date(target_dir, Local::now().date_naive())
    }

    pub fn for_date(target_dir: impl Into<PathBuf>, today: NaiveDate) -> Self {
        Self {
            target_dir: target_dir.into(),
            today,
        }
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn zone_path(&self, domain: &str) -> PathBuf {
        self.target_dir.join(format!("db.{}", domain))
    }

    pub fn plan(&self, zones: &ZoneSet) -> Result<SyncPlan, SyncError> {
        let mut plan = SyncPlan::default();

        for zone in zones.iter() {
            match self.plan_zone(zone)? {
                Some(staged) => plan.staged.push(staged),
                None => plan.unchanged.push(zone.name.clone()),
            }
        }

        Ok(plan)
    }

    fn plan_zone(&self, zone: &ZoneConfig) -> Result<Option<StagedZone>, SyncError> {
        let path = self.zone_path(&zone.name);
        let existing = read_existing_zone(&path)?;

        let (serial, change) = match &existing {
            None => (Serial::first_of(self.today), Change::Created),
            Some(existing) => {
                if render_zone(zone, None)? == existing.body {
                    log(
                        LogLevel::Debug,
                        &format!("Zone '{}' unchanged (serial {})", zone.name, existing.serial),
                    );
                    return Ok(None);
                }

                let serial = existing.serial.successor(self.today).ok_or_else(|| {
                    SyncError::SerialExhausted {
                        domain: zone.name.clone(),
                        serial: existing.serial.to_string(),
                    }
                })?;
                (serial, Change::Updated)
            }
        };

        log(
            LogLevel::Debug,
            &format!("Zone '{}' {:?}, new serial {}", zone.name, change, serial),
        );

        let content = render_zone(zone, Some(&serial))?;
        Ok(Some(StagedZone {
            domain: zone.name.clone(),
            path,
            serial,
            change,
            content,
        }))
    }

    /// Plans every zone, then writes the changed ones unless `dry_run` is set.
    pub fn sync(&self, zones: &ZoneSet, dry_run: bool) -> Result<SyncPlan, SyncError> {
        let plan = self.plan(zones)?;

        if dry_run {
            for staged in &plan.staged {
                log(
                    LogLevel::Info,
                    &format!(
                        "Dry run: would write zone file {:?} (serial {})",
                        staged.path, staged.serial
                    ),
                );
            }
        } else {
            self.apply(&plan)?;
        }

        log(
            LogLevel::Info,
            &format!(
                "{} zone file(s) {}, {} unchanged",
                plan.staged.len(),
                if dry_run { "pending" } else { "written" },
                plan.unchanged.len()
            ),
        );
        Ok(plan)
    }

    /// Writes staged files in order. A failure stops at that file; earlier files
    /// stay written.
    pub fn apply(&self, plan: &SyncPlan) -> Result<(), SyncError> {
        for staged in &plan.staged {
            fs::write(&staged.path, &staged.content).map_err(|source| SyncError::Write {
                path: staged.path.clone(),
                source,
            })?;
            log(
                LogLevel::Info,
                &format!("Written zone file {:?} (serial {})", staged.path, staged.serial),
            );
        }
        Ok(())
    }
}
