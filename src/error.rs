//! Error types for the Oomi to InfluxDB2 forwarder.
//!
//! This module defines typed errors for each component of the application,
//! so a failing step in the portal workflow stays diagnosable from the
//! error value alone.

use thiserror::Error;

/// Result type alias using our custom error types.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error type that encompasses all application errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("configuration error")]
    Config(#[from] ConfigError),

    /// Oomi portal communication and parsing errors
    #[error("Oomi portal error")]
    Portal(#[from] PortalError),

    /// InfluxDB storage errors
    #[error("storage error")]
    Storage(#[from] StorageError),

    /// Generic errors that don't fit other categories
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable parsing failed
    #[error("failed to parse environment variables: {0}")]
    EnvParse(String),

    /// Configuration value is invalid
    #[error("invalid configuration value for {field}: {message}")]
    Invalid { field: String, message: String },
}

/// Errors raised while driving the portal's login/report/download workflow.
///
/// Each variant corresponds to one step of the workflow, so callers can tell
/// a portal-side page change (`TokenNotFound`) apart from bad credentials
/// (`AuthFailed`) or a broken export (`Parse`).
#[derive(Error, Debug)]
pub enum PortalError {
    /// HTTP request failed (transport, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The landing page did not contain the hidden verification-token input
    #[error("verification token not found in landing page")]
    TokenNotFound,

    /// Post-login probe still served anonymous content
    #[error("authentication failed: portal still serving anonymous content after login")]
    AuthFailed,

    /// Report-generation response was not JSON or had no identifier field
    #[error("report generation failed: {message}")]
    ReportGeneration { message: String },

    /// Report download failed
    #[error("report download failed")]
    Download(#[from] DownloadError),

    /// Spreadsheet parsing failed
    #[error("report parsing error")]
    Parse(#[from] ParseError),
}

/// Report download errors.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Server returned a non-success status
    #[error("server error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// Download succeeded but the payload was empty
    #[error("downloaded report payload is empty")]
    EmptyPayload,

    /// Report never became ready within the polling bound
    #[error("report not ready after {attempts} attempts ({waited_secs}s)")]
    TimedOut { attempts: u32, waited_secs: u64 },
}

/// Spreadsheet parsing errors.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Spreadsheet does not match the expected banner/header/data shape
    #[error("unexpected spreadsheet shape: {0}")]
    UnexpectedShape(String),

    /// Failed to parse a timestamp cell
    #[error("failed to parse date/time from '{text}': {message}")]
    DateTimeParse { text: String, message: String },

    /// Failed to parse a consumption cell
    #[error("failed to parse number from '{text}': {message}")]
    NumberParse { text: String, message: String },

    /// The payload could not be read as delimited records
    #[error("failed to read spreadsheet records: {0}")]
    Records(#[from] csv::Error),
}

/// InfluxDB storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// InfluxDB client error
    #[error("InfluxDB error: {0}")]
    Client(#[from] influxdb2::RequestError),

    /// Write operation failed
    #[error("failed to write {count} data points: {message}")]
    WriteFailed { count: usize, message: String },

    /// A row could not be converted to a data point
    #[error("invalid data point: {0}")]
    InvalidDataPoint(String),
}

impl ConfigError {
    /// Creates a new environment parse error.
    pub fn env_parse(err: impl std::fmt::Display) -> Self {
        Self::EnvParse(err.to_string())
    }

    /// Creates a new invalid configuration error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl PortalError {
    /// Creates a report-generation error from the raw response body.
    pub fn report_generation(message: impl Into<String>) -> Self {
        Self::ReportGeneration {
            message: message.into(),
        }
    }
}

impl DownloadError {
    /// Creates a download error from HTTP status and response body.
    pub fn status(status: reqwest::StatusCode, body: impl Into<String>) -> Self {
        Self::Status {
            status: status.as_u16(),
            message: body.into(),
        }
    }
}

impl ParseError {
    /// Creates an unexpected shape error.
    pub fn unexpected_shape(message: impl Into<String>) -> Self {
        Self::UnexpectedShape(message.into())
    }

    /// Creates a datetime parse error.
    pub fn datetime_parse(text: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::DateTimeParse {
            text: text.into(),
            message: err.to_string(),
        }
    }

    /// Creates a number parse error.
    pub fn number_parse(text: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::NumberParse {
            text: text.into(),
            message: err.to_string(),
        }
    }
}

impl StorageError {
    /// Creates a write failed error.
    pub fn write_failed(count: usize, err: impl std::fmt::Display) -> Self {
        Self::WriteFailed {
            count,
            message: err.to_string(),
        }
    }
}
