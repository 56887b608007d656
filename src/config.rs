use crate::error::{ConfigError, Result};
use crate::model::DateRange;
use chrono::{Duration, Local, NaiveDate};
use serde_derive::Deserialize;
use std::str::FromStr;

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl AppConfig {
    pub fn log_level(&self) -> tracing::Level {
        tracing::Level::from_str(self.log_level.as_str()).unwrap_or(tracing::Level::INFO)
    }
}

pub(crate) fn load_app_config() -> Result<AppConfig, ConfigError> {
    envy::from_env::<AppConfig>().map_err(ConfigError::env_parse)
}

fn default_base_url() -> String {
    "https://online.oomi.fi".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_download_max_attempts() -> u32 {
    5
}

fn default_download_backoff_secs() -> u64 {
    2
}

/// Connection settings for the Oomi customer portal.
///
/// The download poll bounds cover the portal's server-side report job:
/// up to `download_max_attempts` download requests are made, sleeping
/// `download_backoff_secs` between attempts while the report is not ready.
#[derive(Deserialize, Debug, Clone)]
pub struct OomiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_download_max_attempts")]
    pub download_max_attempts: u32,
    #[serde(default = "default_download_backoff_secs")]
    pub download_backoff_secs: u64,
}

pub(crate) fn load_oomi_config() -> Result<OomiConfig, ConfigError> {
    envy::prefixed("OOMI_")
        .from_env::<OomiConfig>()
        .map_err(ConfigError::env_parse)
}

/// Optional date range override for a single run.
///
/// When unset, the range defaults to the portal's publication lag:
/// consumption data appears with a two-day delay, so the range is
/// two days ago through yesterday.
#[derive(Deserialize, Debug, Default)]
pub struct FetchConfig {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl FetchConfig {
    pub fn date_range(&self, today: NaiveDate) -> Result<DateRange, ConfigError> {
        let start = match &self.start {
            Some(s) => parse_date("start", s)?,
            None => today - Duration::days(2),
        };
        let end = match &self.end {
            Some(s) => parse_date("end", s)?,
            None => today - Duration::days(1),
        };
        Ok(DateRange { start, end })
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| ConfigError::invalid(field, format!("'{}' is not YYYY-MM-DD: {}", value, e)))
}

pub(crate) fn load_fetch_config() -> Result<FetchConfig, ConfigError> {
    envy::prefixed("FETCH_")
        .from_env::<FetchConfig>()
        .map_err(ConfigError::env_parse)
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Deserialize, Debug)]
pub struct InfluxConfig {
    pub url: String,
    pub token: String,
    pub org: String,
    pub bucket: String,
}

pub fn load_influx_config() -> Result<InfluxConfig, ConfigError> {
    envy::prefixed("INFLUXDB_")
        .from_env::<InfluxConfig>()
        .map_err(ConfigError::env_parse)
}
