/* src/errors.rs */

//! Error types, one enum per stage of a run.

use std::path::PathBuf;
use thiserror::Error;

/// SPF criteria errors, wrapped into [`ConfigError::InvalidSpf`] by the builder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpfError {
    #[error("Invalid SPF record qualifier '{0}'")]
    InvalidQualifier(char),

    #[error("Invalid IPv4 address '{0}' in SPF criteria")]
    InvalidIpv4(String),
}

/// Errors raised while turning the domain configuration into zone models.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read configuration file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML parser reports '{message}' at line #{line}")]
    Markup { message: String, line: usize },

    #[error("Missing 'name' attribute on domain node at line #{line}")]
    MissingDomainName { line: usize },

    #[error("The domain '{domain}' has already been defined at line #{line}")]
    DuplicateDomain { domain: String, line: usize },

    #[error("Domain attribute '{attribute}' undefined for '{domain}' at line #{line}")]
    MissingDomainAttribute {
        attribute: &'static str,
        domain: String,
        line: usize,
    },

    #[error(
        "Invalid time value '{value}' for attribute '{attribute}' on domain '{domain}' at line #{line}"
    )]
    InvalidDomainTime {
        attribute: &'static str,
        value: String,
        domain: String,
        line: usize,
    },

    #[error("No type defined for record in the '{domain}' domain at line #{line}")]
    MissingRecordType { domain: String, line: usize },

    #[error("Invalid record type '{record_type}' in the '{domain}' domain at line #{line}")]
    InvalidRecordType {
        record_type: String,
        domain: String,
        line: usize,
    },

    #[error("No value for record type '{record_type}' in the '{domain}' domain at line #{line}")]
    MissingRecordValue {
        record_type: String,
        domain: String,
        line: usize,
    },

    #[error(
        "Invalid time value '{value}' for record type '{record_type}' in the '{domain}' domain at line #{line}"
    )]
    InvalidRecordTime {
        value: String,
        record_type: String,
        domain: String,
        line: usize,
    },

    #[error("Invalid IPv4 address '{value}' for A record in the '{domain}' domain at line #{line}")]
    InvalidAddress {
        value: String,
        domain: String,
        line: usize,
    },

    #[error("No priority set for MX record in the '{domain}' domain at line #{line}")]
    MissingMxPriority { domain: String, line: usize },

    #[error(
        "Invalid priority of '{priority}' set for MX record in the '{domain}' domain at line #{line}"
    )]
    InvalidMxPriority {
        priority: String,
        domain: String,
        line: usize,
    },

    #[error("{source} for SPF record in the '{domain}' domain at line #{line}")]
    InvalidSpf {
        #[source]
        source: SpfError,
        domain: String,
        line: usize,
    },

    #[error("Unexpected <{tag}> element {context} at line #{line}")]
    UnexpectedElement {
        tag: String,
        context: &'static str,
        line: usize,
    },

    #[error("Domain '{domain}' is never closed")]
    UnclosedDomain { domain: String },
}

/// Errors raised while rendering a zone model to master-file text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZoneError {
    #[error("No primary nameserver defined for '{domain}'")]
    NoNameserver { domain: String },
}

/// Errors raised while comparing against and writing the target directory.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Unable to read existing zone file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to extract domain serial number from {path:?}")]
    MissingSerial { path: PathBuf },

    #[error("Serial number {serial} for '{domain}' cannot be incremented again today")]
    SerialExhausted { domain: String, serial: String },

    #[error(transparent)]
    Render(#[from] ZoneError),

    #[error("Unable to write zone file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while resolving the tool's own settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("{0}")]
    Usage(String),

    #[error("No {what} given (use {flag} or {env})")]
    MissingOption {
        what: &'static str,
        flag: &'static str,
        env: &'static str,
    },

    #[error("Unable to read settings file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to parse settings file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unable to open configuration file - {0:?}")]
    ConfigFileMissing(PathBuf),

    #[error("Target directory does not exist or is invalid - {0:?}")]
    TargetDirMissing(PathBuf),
}
