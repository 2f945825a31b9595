/* src/config.rs */

use crate::errors::SettingsError;
use fancy_log::{LogLevel, log};
use getopts::Options;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG: &str = "ZONE_CONFIG";
pub const ENV_TARGET_DIR: &str = "ZONE_TARGET_DIR";
pub const ENV_SETTINGS: &str = "ZONE_SETTINGS";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

const DEFAULT_LOG_LEVEL: &str = "info";

/// Optional TOML file holding defaults for the command line.
///
/// ```toml
/// config_file = "/etc/bind/domains.xml"
/// target_dir = "/etc/bind/zones"
/// log_level = "info"
/// dry_run = false
/// ```
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub config_file: Option<PathBuf>,
    pub target_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub dry_run: Option<bool>,
}

impl SettingsFile {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `~/.bind-zone-builder/config.toml`, if the home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".bind-zone-builder").join("config.toml"))
    }
}

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub config_file: PathBuf,
    pub target_dir: PathBuf,
    pub log_level: String,
    pub dry_run: bool,
}

#[derive(Debug)]
pub enum Command {
    /// Print the usage text and stop.
    Help(String),
    Run(Settings),
}

pub fn options() -> Options {
    let mut opts = Options::new();
    opts.optopt("c", "config", "XML domain configuration file", "FILE");
    opts.optopt(
        "t",
        "target",
        "Target directory for generated zone files (must exist)",
        "DIR",
    );
    opts.optopt("s", "settings", "TOML settings file", "FILE");
    opts.optflag("n", "dry-run", "Report changed zones without writing them");
    opts.optflag("h", "help", "Print this help menu");
    opts
}

pub fn usage(program: &str) -> String {
    let brief = format!("Usage: {} -c FILE -t DIR [options]", program);
    options().usage(&brief)
}

impl Command {
    /// Resolves settings from the command line, then `env`, then the settings file.
    /// `args` includes the program name.
    pub fn from_args<F>(args: &[String], env: F) -> Result<Command, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let program = args
            .first()
            .map(|p| {
                Path::new(p)
                    .file_name()
                    .map_or_else(|| p.clone(), |name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

        let matches = options()
            .parse(args.iter().skip(1))
            .map_err(|e| SettingsError::Usage(format!("{}\n\n{}", e, usage(&program))))?;

        if matches.opt_present("h") {
            return Ok(Command::Help(usage(&program)));
        }

        let file = match matches.opt_str("s").or_else(|| env(ENV_SETTINGS)) {
            Some(path) => SettingsFile::load(Path::new(&path))?,
            None => match SettingsFile::default_path().filter(|path| path.is_file()) {
                Some(path) => {
                    log(
                        LogLevel::Debug,
                        &format!("Using settings from {:?}", path),
                    );
                    SettingsFile::load(&path)?
                }
                None => SettingsFile::default(),
            },
        };

        let config_file = matches
            .opt_str("c")
            .or_else(|| env(ENV_CONFIG))
            .map(PathBuf::from)
            .or(file.config_file)
            .ok_or(SettingsError::MissingOption {
                what: "configuration file",
                flag: "-c",
                env: ENV_CONFIG,
            })?;

        let target_dir = matches
            .opt_str("t")
            .or_else(|| env(ENV_TARGET_DIR))
            .map(PathBuf::from)
            .or(file.target_dir)
            .ok_or(SettingsError::MissingOption {
                what: "target directory",
                flag: "-t",
                env: ENV_TARGET_DIR,
            })?;

        let settings = Settings {
            config_file,
            target_dir,
            log_level: env(ENV_LOG_LEVEL)
                .or(file.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
                .to_lowercase(),
            dry_run: matches.opt_present("n") || file.dry_run.unwrap_or(false),
        };
        settings.check_paths()?;

        Ok(Command::Run(settings))
    }
}

impl Settings {
    pub fn check_paths(&self) -> Result<(), SettingsError> {
        if !self.config_file.is_file() {
            return Err(SettingsError::ConfigFileMissing(self.config_file.clone()));
        }
        if !self.target_dir.is_dir() {
            return Err(SettingsError::TargetDirMissing(self.target_dir.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        config: PathBuf,
        zones: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("domains.xml");
        let zones = dir.path().join("zones");
        fs::write(&config, "<domains />").unwrap();
        fs::create_dir(&zones).unwrap();
        Fixture { dir, config, zones }
    }

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("bind-zone-builder")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn run_settings(command: Command) -> Settings {
        match command {
            Command::Run(settings) => settings,
            Command::Help(_) => panic!("expected run command"),
        }
    }

    #[test]
    fn command_line_options() {
        let f = fixture();
        let settings = run_settings(
            Command::from_args(
                &args(&[
                    "-c",
                    f.config.to_str().unwrap(),
                    "--target",
                    f.zones.to_str().unwrap(),
                    "-n",
                ]),
                no_env,
            )
            .unwrap(),
        );
        assert_eq!(settings.config_file, f.config);
        assert_eq!(settings.target_dir, f.zones);
        assert_eq!(settings.log_level, "info");
        assert!(settings.dry_run);
    }

    #[test]
    fn environment_fills_gaps() {
        let f = fixture();
        let env: HashMap<&str, String> = HashMap::from([
            (ENV_CONFIG, f.config.to_string_lossy().into_owned()),
            (ENV_TARGET_DIR, f.zones.to_string_lossy().into_owned()),
            (ENV_LOG_LEVEL, "DEBUG".to_string()),
        ]);
        let settings = run_settings(
            Command::from_args(&args(&[]), |key| env.get(key).cloned()).unwrap(),
        );
        assert_eq!(settings.config_file, f.config);
        assert_eq!(settings.log_level, "debug");
        assert!(!settings.dry_run);
    }

    #[test]
    fn settings_file_is_lowest_priority() {
        let f = fixture();
        let other = f.dir.path().join("other");
        fs::create_dir(&other).unwrap();
        let settings_path = f.dir.path().join("settings.toml");
        fs::write(
            &settings_path,
            format!(
                "config_file = {:?}\ntarget_dir = {:?}\nlog_level = \"warn\"\ndry_run = true\n",
                f.config, other
            ),
        )
        .unwrap();

        let settings = run_settings(
            Command::from_args(
                &args(&[
                    "-s",
                    settings_path.to_str().unwrap(),
                    "-t",
                    f.zones.to_str().unwrap(),
                ]),
                no_env,
            )
            .unwrap(),
        );
        assert_eq!(settings.config_file, f.config);
        assert_eq!(settings.target_dir, f.zones);
        assert_eq!(settings.log_level, "warn");
        assert!(settings.dry_run);
    }

    #[test]
    fn bad_settings_file() {
        let f = fixture();
        let settings_path = f.dir.path().join("settings.toml");
        fs::write(&settings_path, "unknown_key = 1\n").unwrap();
        let err = Command::from_args(&args(&["-s", settings_path.to_str().unwrap()]), no_env)
            .unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));

        let err = Command::from_args(
            &args(&["-s", f.dir.path().join("absent.toml").to_str().unwrap()]),
            no_env,
        )
        .unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[test]
    fn help_and_usage_errors() {
        match Command::from_args(&args(&["--help"]), no_env).unwrap() {
            Command::Help(text) => {
                assert!(text.starts_with("Usage: bind-zone-builder -c FILE -t DIR"));
                assert!(text.contains("--dry-run"));
            }
            Command::Run(_) => panic!("expected help"),
        }

        assert!(matches!(
            Command::from_args(&args(&["--bogus"]), no_env),
            Err(SettingsError::Usage(_))
        ));
    }

    #[test]
    fn required_paths() {
        let f = fixture();
        let zones = f.zones.to_str().unwrap();
        let config = f.config.to_str().unwrap();

        assert!(matches!(
            Command::from_args(&args(&["-t", zones]), no_env),
            Err(SettingsError::MissingOption { flag: "-c", .. })
        ));
        assert!(matches!(
            Command::from_args(&args(&["-c", zones, "-t", zones]), no_env),
            Err(SettingsError::ConfigFileMissing(_))
        ));
        assert!(matches!(
            Command::from_args(&args(&["-c", config, "-t", config]), no_env),
            Err(SettingsError::TargetDirMissing(_))
        ));
    }
}
