//! Configuration for the netscribe binary.
//!
//! TOML file + `NETSCRIBE_*` environment overlay, resolved into
//! [`netscribe_core::ControllerProfile`]s plus the global output
//! settings. A config file is optional: a single controller can be
//! described entirely through environment variables (`NETSCRIBE_URL`,
//! `NETSCRIBE_USERNAME`, `NETSCRIBE_PASSWORD` or `NETSCRIBE_API_KEY`,
//! ...).

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use netscribe_core::render::OutputFormat;
use netscribe_core::{ApiDialect, ControllerProfile, Credential, DialectSelection, TlsVerification};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password or API key configured for controller '{controller}'")]
    NoCredentials { controller: String },

    #[error("no controllers configured (config file or NETSCRIBE_URL)")]
    NoControllers,

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Directory generated documents are written into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// "markdown", "json", or "both".
    #[serde(default = "default_format")]
    pub format: String,

    /// Daily generation time, "HH:MM" (24h, local time).
    #[serde(default = "default_schedule")]
    pub schedule: String,

    /// Request timeout in seconds, overridable per controller.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Controllers to document.
    #[serde(default)]
    pub controllers: Vec<ControllerEntry>,

    /// Single-controller fallback, filled from `NETSCRIBE_URL` etc.
    /// when no `[[controllers]]` entries exist.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub dialect: Option<String>,
    #[serde(default)]
    pub insecure: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            format: default_format(),
            schedule: default_schedule(),
            timeout: default_timeout(),
            controllers: Vec::new(),
            url: None,
            username: None,
            password: None,
            api_key: None,
            site: None,
            dialect: None,
            insecure: None,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("network-docs")
}
fn default_format() -> String {
    "markdown".into()
}
fn default_schedule() -> String {
    "02:00".into()
}
fn default_timeout() -> u64 {
    30
}

/// One `[[controllers]]` entry.
#[derive(Debug, Deserialize, Serialize)]
pub struct ControllerEntry {
    /// Display name; defaults to the URL host. Also the filename stem.
    pub name: Option<String>,

    /// Controller base URL (e.g., "https://192.168.1.1:8443").
    pub url: String,

    #[serde(default = "default_username")]
    pub username: String,

    /// Password in plaintext (prefer `password_env`).
    pub password: Option<String>,

    /// Environment variable holding the password.
    pub password_env: Option<String>,

    /// API key in plaintext (prefer `api_key_env`). Takes precedence
    /// over the password pair when both are set.
    pub api_key: Option<String>,

    /// Environment variable holding the API key.
    pub api_key_env: Option<String>,

    #[serde(default = "default_site")]
    pub site: String,

    /// Pin an API dialect ("legacy-v4", "v5", "unified-os", "v6");
    /// omit for auto-detection.
    pub dialect: Option<String>,

    /// Skip TLS verification. Defaults to true: local controllers
    /// almost always run self-signed certificates.
    pub insecure: Option<bool>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override the global timeout.
    pub timeout: Option<u64>,
}

fn default_username() -> String {
    "admin".into()
}
fn default_site() -> String {
    "default".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "netscribe", "netscribe").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("netscribe");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load configuration from a TOML file plus the environment.
///
/// `path` overrides the platform default location (CLI `--config`).
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("NETSCRIBE_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Resolution to runtime profiles ──────────────────────────────────

/// Global run settings extracted from a [`Config`].
#[derive(Debug, Clone)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub formats: Vec<OutputFormat>,
    /// Daily generation time (hour, minute).
    pub schedule: (u8, u8),
}

/// Validate and resolve a [`Config`] into runtime profiles + settings.
pub fn resolve(config: &Config) -> Result<(Vec<ControllerProfile>, Settings), ConfigError> {
    let settings = Settings {
        output_dir: config.output_dir.clone(),
        formats: parse_formats(&config.format)?,
        schedule: parse_schedule(&config.schedule)?,
    };

    let mut profiles = Vec::new();
    if config.controllers.is_empty() {
        profiles.push(env_fallback_profile(config)?);
    } else {
        for entry in &config.controllers {
            profiles.push(entry_to_profile(entry, config.timeout)?);
        }
    }

    let mut names: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    if names.len() != profiles.len() {
        return Err(ConfigError::Validation {
            field: "controllers".into(),
            reason: "controller names must be unique (they key output files)".into(),
        });
    }

    Ok((profiles, settings))
}

fn entry_to_profile(
    entry: &ControllerEntry,
    default_timeout: u64,
) -> Result<ControllerProfile, ConfigError> {
    let url: url::Url = entry.url.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {}", entry.url),
    })?;

    let name = entry
        .name
        .clone()
        .or_else(|| url.host_str().map(str::to_string))
        .ok_or_else(|| ConfigError::Validation {
            field: "name".into(),
            reason: "controller has no name and URL has no host".into(),
        })?;

    let credential = resolve_credential(entry, &name)?;
    let dialect = parse_dialect(entry.dialect.as_deref())?;

    let tls = if entry.insecure.unwrap_or(true) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ca) = &entry.ca_cert {
        TlsVerification::CustomCa(ca.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(ControllerProfile {
        name,
        url,
        credential,
        site: entry.site.clone(),
        tls,
        timeout: Duration::from_secs(entry.timeout.unwrap_or(default_timeout)),
        dialect,
    })
}

fn env_fallback_profile(config: &Config) -> Result<ControllerProfile, ConfigError> {
    let url = config.url.clone().ok_or(ConfigError::NoControllers)?;
    let entry = ControllerEntry {
        name: None,
        url,
        username: config.username.clone().unwrap_or_else(default_username),
        password: config.password.clone(),
        password_env: None,
        api_key: config.api_key.clone(),
        api_key_env: None,
        site: config.site.clone().unwrap_or_else(default_site),
        dialect: config.dialect.clone(),
        insecure: config.insecure,
        ca_cert: None,
        timeout: None,
    };
    entry_to_profile(&entry, config.timeout)
}

/// Credential chain: `api_key_env` variable, plaintext `api_key`,
/// `password_env` variable, then plaintext `password`.
fn resolve_credential(entry: &ControllerEntry, name: &str) -> Result<Credential, ConfigError> {
    if let Some(env_name) = &entry.api_key_env {
        if let Ok(value) = std::env::var(env_name) {
            return Ok(Credential::ApiKey(SecretString::from(value)));
        }
    }
    if let Some(key) = &entry.api_key {
        return Ok(Credential::ApiKey(SecretString::from(key.clone())));
    }
    if let Some(env_name) = &entry.password_env {
        if let Ok(value) = std::env::var(env_name) {
            return Ok(Credential::Password {
                username: entry.username.clone(),
                password: SecretString::from(value),
            });
        }
    }
    if let Some(password) = &entry.password {
        return Ok(Credential::Password {
            username: entry.username.clone(),
            password: SecretString::from(password.clone()),
        });
    }
    Err(ConfigError::NoCredentials { controller: name.to_string() })
}

fn parse_dialect(name: Option<&str>) -> Result<DialectSelection, ConfigError> {
    match name {
        None | Some("auto") => Ok(DialectSelection::Auto),
        Some(name) => ApiDialect::from_name(name).map(DialectSelection::Pinned).ok_or_else(
            || ConfigError::Validation {
                field: "dialect".into(),
                reason: format!(
                    "expected 'auto', 'legacy-v4', 'v5', 'unified-os', or 'v6', got '{name}'"
                ),
            },
        ),
    }
}

/// Parse the `format` field into the formats to emit.
pub fn parse_formats(format: &str) -> Result<Vec<OutputFormat>, ConfigError> {
    match format {
        "markdown" => Ok(vec![OutputFormat::Markdown]),
        "json" => Ok(vec![OutputFormat::Json]),
        "both" => Ok(vec![OutputFormat::Markdown, OutputFormat::Json]),
        other => Err(ConfigError::Validation {
            field: "format".into(),
            reason: format!("expected 'markdown', 'json', or 'both', got '{other}'"),
        }),
    }
}

/// Parse a "HH:MM" schedule string.
pub fn parse_schedule(schedule: &str) -> Result<(u8, u8), ConfigError> {
    let invalid = || ConfigError::Validation {
        field: "schedule".into(),
        reason: format!("expected 'HH:MM' (24h), got '{schedule}'"),
    };
    let (hour, minute) = schedule.split_once(':').ok_or_else(invalid)?;
    let hour: u8 = hour.parse().map_err(|_| invalid())?;
    let minute: u8 = minute.parse().map_err(|_| invalid())?;
    if hour > 23 || minute > 59 {
        return Err(invalid());
    }
    Ok((hour, minute))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn schedule_parses_and_validates() {
        assert_eq!(parse_schedule("02:00").unwrap(), (2, 0));
        assert_eq!(parse_schedule("23:59").unwrap(), (23, 59));
        assert!(parse_schedule("24:00").is_err());
        assert!(parse_schedule("2am").is_err());
        assert!(parse_schedule("02:60").is_err());
    }

    #[test]
    fn format_parses_to_output_list() {
        assert_eq!(parse_formats("markdown").unwrap(), vec![OutputFormat::Markdown]);
        assert_eq!(parse_formats("both").unwrap(), vec![
            OutputFormat::Markdown,
            OutputFormat::Json
        ]);
        assert!(parse_formats("pdf").is_err());
    }

    fn entry(name: Option<&str>, url: &str) -> ControllerEntry {
        ControllerEntry {
            name: name.map(str::to_string),
            url: url.to_string(),
            username: default_username(),
            password: Some("secret".into()),
            password_env: None,
            api_key: None,
            api_key_env: None,
            site: default_site(),
            dialect: None,
            insecure: None,
            ca_cert: None,
            timeout: None,
        }
    }

    #[test]
    fn name_defaults_to_url_host() {
        let profile = entry_to_profile(&entry(None, "https://10.0.0.1:8443"), 30).unwrap();
        assert_eq!(profile.name, "10.0.0.1");
        assert_eq!(profile.site, "default");
        assert_eq!(profile.dialect, DialectSelection::Auto);
    }

    #[test]
    fn pinned_dialect_round_trips_from_config() {
        let mut e = entry(Some("lab"), "https://unifi.example.net");
        e.dialect = Some("unified-os".into());
        let profile = entry_to_profile(&e, 30).unwrap();
        assert_eq!(profile.dialect, DialectSelection::Pinned(ApiDialect::UnifiedOs));

        e.dialect = Some("v9".into());
        assert!(entry_to_profile(&e, 30).is_err());
    }

    #[test]
    fn missing_credentials_is_an_error() {
        let mut e = entry(Some("lab"), "https://unifi.example.net");
        e.password = None;
        assert!(matches!(
            entry_to_profile(&e, 30),
            Err(ConfigError::NoCredentials { .. })
        ));
    }

    #[test]
    fn api_key_resolves_to_bearer_credential() {
        let mut e = entry(Some("lab"), "https://unifi.example.net");
        e.password = None;
        e.api_key = Some("k3y".into());
        let profile = entry_to_profile(&e, 30).unwrap();
        assert!(matches!(profile.credential, Credential::ApiKey(_)));
    }

    #[test]
    fn api_key_takes_precedence_over_password() {
        let mut e = entry(Some("lab"), "https://unifi.example.net");
        e.api_key = Some("k3y".into());
        let profile = entry_to_profile(&e, 30).unwrap();
        assert!(matches!(profile.credential, Credential::ApiKey(_)));
    }

    #[test]
    fn duplicate_names_rejected() {
        let config = Config {
            controllers: vec![
                entry(Some("lab"), "https://10.0.0.1"),
                entry(Some("lab"), "https://10.0.0.2"),
            ],
            ..Default::default()
        };
        assert!(resolve(&config).is_err());
    }

    #[test]
    fn env_only_single_controller() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("NETSCRIBE_URL", "https://192.168.1.1:8443");
            jail.set_env("NETSCRIBE_USERNAME", "docbot");
            jail.set_env("NETSCRIBE_PASSWORD", "hunter2");
            jail.set_env("NETSCRIBE_FORMAT", "both");

            let config = load_config(Some(Path::new("does-not-exist.toml"))).unwrap();
            let (profiles, settings) = resolve(&config).unwrap();
            assert_eq!(profiles.len(), 1);
            assert_eq!(profiles[0].name, "192.168.1.1");
            assert!(matches!(
                &profiles[0].credential,
                Credential::Password { username, .. } if username == "docbot"
            ));
            assert_eq!(settings.formats.len(), 2);
            Ok(())
        });
    }

    #[test]
    fn env_only_api_key_controller() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("NETSCRIBE_URL", "https://192.168.1.1:8443");
            jail.set_env("NETSCRIBE_API_KEY", "k3y");

            let config = load_config(Some(Path::new("does-not-exist.toml"))).unwrap();
            let (profiles, _) = resolve(&config).unwrap();
            assert_eq!(profiles.len(), 1);
            assert!(matches!(profiles[0].credential, Credential::ApiKey(_)));
            Ok(())
        });
    }

    #[test]
    fn toml_file_with_controllers() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("netscribe.toml", r#"
                output_dir = "/var/lib/netscribe"
                format = "json"
                schedule = "04:30"

                [[controllers]]
                name = "main"
                url = "https://unifi.example.net:8443"
                username = "admin"
                password = "secret"
                dialect = "v5"

                [[controllers]]
                url = "https://10.0.0.2"
                password = "secret2"
                site = "branch"
            "#)?;

            let config = load_config(Some(Path::new("netscribe.toml"))).unwrap();
            let (profiles, settings) = resolve(&config).unwrap();
            assert_eq!(settings.output_dir, PathBuf::from("/var/lib/netscribe"));
            assert_eq!(settings.schedule, (4, 30));
            assert_eq!(profiles.len(), 2);
            assert_eq!(profiles[0].name, "main");
            assert_eq!(profiles[0].dialect, DialectSelection::Pinned(ApiDialect::V5));
            assert_eq!(profiles[1].name, "10.0.0.2");
            assert_eq!(profiles[1].site, "branch");
            Ok(())
        });
    }
}
