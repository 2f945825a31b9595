/* src/lib.rs */

//! Compiles an XML domain configuration into BIND master files and keeps a
//! directory of `db.<domain>` files in step with it, rewriting a zone (with a
//! new serial) only when its records changed.

pub mod builder;
pub mod config;
pub mod errors;
pub mod existing;
pub mod records;
pub mod render;
pub mod serial;
pub mod spf;
pub mod sync;
pub mod validate;
pub mod xml;

pub use builder::{ConfigBuilder, ConfigEvent};
pub use errors::{ConfigError, SettingsError, SpfError, SyncError, ZoneError};
pub use records::{RecordData, RecordType, ZoneConfig, ZoneRecord, ZoneSet};
pub use render::render_zone;
pub use serial::Serial;
pub use sync::{SyncPlan, ZoneSync};
