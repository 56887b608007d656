//! Model definitions for consumption records and the storage seam.
//!
//! The fetcher produces a [`ConsumptionTable`]; anything that can persist
//! one (and load it back for verification) implements [`Sink`].

use crate::error::StorageError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

/// Portal login credentials. Opaque here; only the remote server rejects
/// bad values.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Inclusive calendar date range for a consumption report.
///
/// `start <= end` is expected by callers but not enforced locally; the
/// portal is authoritative and rejects bad ranges at report generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// One reported hour of consumption for one metering location.
///
/// `time` is naive, in the portal's local timezone, at hour resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionRow {
    pub time: NaiveDateTime,
    pub consumption: f64,
    pub location: String,
}

/// Ordered rows as emitted by the portal's export (chronological ascending).
pub type ConsumptionTable = Vec<ConsumptionRow>;

/// Storage backend for consumption tables.
///
/// `write` persists one record per row, keyed by time and location.
/// `load` is the symmetric read used for round-trip verification; the
/// trait makes no assumption about the storage technology behind it.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn write(&self, table: ConsumptionTable) -> Result<(), StorageError>;

    async fn load(&self) -> Result<ConsumptionTable, StorageError>;
}
