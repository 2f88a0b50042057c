//! Dashboard configuration, read and validated from a [`ConfigPort`].
//!
//! Every key is optional; missing keys fall back to the defaults below.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::error::DashError;
use crate::domain::locale::Locale;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_TIMEOUT_SECS: i64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Yahoo { base_url: String, timeout: Duration },
    Csv { dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub listen: SocketAddr,
    pub static_dir: PathBuf,
    pub source: DataSource,
    pub locale: Locale,
}

impl DashboardConfig {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, DashError> {
        Ok(Self {
            listen: parse_listen(config)?,
            static_dir: PathBuf::from(config.get_string_or("web", "static_dir", "static")),
            source: parse_source(config)?,
            locale: Locale::from_str(&config.get_string_or("ui", "locale", "en"))?,
        })
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 3000)),
            static_dir: PathBuf::from("static"),
            source: DataSource::Yahoo {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS as u64),
            },
            locale: Locale::default(),
        }
    }
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> DashError {
    DashError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn parse_listen(config: &dyn ConfigPort) -> Result<SocketAddr, DashError> {
    let raw = config.get_string_or("web", "listen", DEFAULT_LISTEN);
    raw.parse()
        .map_err(|_| invalid("web", "listen", format!("'{raw}' is not a socket address")))
}

fn parse_source(config: &dyn ConfigPort) -> Result<DataSource, DashError> {
    let kind = config.get_string_or("data", "source", "yahoo").to_lowercase();
    match kind.as_str() {
        "yahoo" => {
            let timeout = config.get_int("data", "timeout_secs", DEFAULT_TIMEOUT_SECS);
            if timeout <= 0 {
                return Err(invalid("data", "timeout_secs", "timeout_secs must be positive"));
            }
            let base_url = config
                .get_string_or("data", "base_url", DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string();
            Ok(DataSource::Yahoo {
                base_url,
                timeout: Duration::from_secs(timeout as u64),
            })
        }
        "csv" => Ok(DataSource::Csv {
            dir: PathBuf::from(config.get_string_or("data", "csv_dir", "data")),
        }),
        other => Err(invalid(
            "data",
            "source",
            format!("unknown source '{other}', expected yahoo or csv"),
        )),
    }
}
