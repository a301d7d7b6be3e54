use std::{
    env,
    fmt::Display,
    fs::read_to_string,
    io,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_GUESTS: [&str; 3] = ["Artur Mendes", "Julia Souza", "Carlos Silva"];

const DATABASE_FILE: &str = "database.db";
const SECRETS_DIR: &str = "/run/secrets";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value: {reason}")]
    Invalid { key: String, reason: String },

    #[error("Could not locate executable directory: {0}")]
    ExecutableDir(#[from] io::Error),
}

pub struct Config {
    pub port: u16,
    pub database_path: PathBuf,
    pub guests: Vec<String>,
    pub mail: MailConfig,
}

#[derive(Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub timeout: Duration,
    pub subject: String,
    pub sender: Option<MailSender>,
}

/// Relay credentials. Present only when both user and password are set.
#[derive(Clone)]
pub struct MailSender {
    pub username: String,
    pub password: String,
    pub recipient: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load("RUST_PORT", "5000")?,
            database_path: database_path()?,
            guests: guest_list(),
            mail: MailConfig::load()?,
        })
    }

    /// Built-in guest list and no mail credentials, storing into `database_path`.
    pub fn with_database(database_path: impl Into<PathBuf>) -> Self {
        Self {
            port: 0,
            database_path: database_path.into(),
            guests: DEFAULT_GUESTS.iter().map(|name| name.to_string()).collect(),
            mail: MailConfig::default(),
        }
    }
}

impl MailConfig {
    fn load() -> Result<Self, ConfigError> {
        let sender = match (optional_secret("EMAIL_USER"), optional_secret("EMAIL_PASS")) {
            (Some(username), Some(password)) => {
                let recipient = optional_var("EMAIL_TO").unwrap_or_else(|| username.clone());

                Some(MailSender {
                    username,
                    password,
                    recipient,
                })
            }
            _ => None,
        };

        Ok(Self {
            smtp_host: try_load("SMTP_HOST", "smtp.gmail.com")?,
            smtp_port: try_load("SMTP_PORT", "465")?,
            timeout: Duration::from_secs(try_load("SMTP_TIMEOUT_SECS", "10")?),
            subject: try_load("EMAIL_SUBJECT", "Nova confirmação - Festa 18")?,
            sender,
        })
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 465,
            timeout: Duration::from_secs(10),
            subject: "Nova confirmação - Festa 18".to_string(),
            sender: None,
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn optional_var(key: &str) -> Option<String> {
    non_empty(var(key))
}

/// Blank values count as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    parse_or_default(key, optional_var(key), default)
}

fn parse_or_default<T: FromStr>(
    key: &str,
    value: Option<String>,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    value
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");

            ConfigError::Invalid {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })
}

/// Env var first, then a Docker secret file of the same name.
fn optional_secret(secret_name: &str) -> Option<String> {
    optional_var(secret_name).or_else(|| {
        let path = Path::new(SECRETS_DIR).join(secret_name);

        read_to_string(&path)
            .map(|s| s.trim().to_string())
            .ok()
            .filter(|s| !s.is_empty())
    })
}

fn database_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = optional_var("DATABASE_PATH") {
        return Ok(PathBuf::from(path));
    }

    let executable = env::current_exe()?;
    let directory = executable.parent().unwrap_or_else(|| Path::new("."));

    Ok(directory.join(DATABASE_FILE))
}

fn guest_list() -> Vec<String> {
    match optional_var("GUEST_LIST") {
        Some(list) => parse_guest_list(&list),
        None => DEFAULT_GUESTS.iter().map(|name| name.to_string()).collect(),
    }
}

fn parse_guest_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
