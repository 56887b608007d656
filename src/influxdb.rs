//! InfluxDB2 implementation of the [`Sink`] storage seam.
//!
//! Rows are written to the `hourly_consumption` measurement, one point per
//! hour, tagged by location. Timestamps are localized from the portal's
//! naive local time at write; `load` reads the last week back for
//! round-trip verification.

use crate::config::InfluxConfig;
use crate::error::StorageError;
use crate::model::{ConsumptionRow, ConsumptionTable, Sink};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};
use futures::prelude::stream;
use influxdb2::models::{DataPoint, Query};
use influxdb2::FromDataPoint;

const MEASUREMENT: &str = "hourly_consumption";

pub struct Client {
    client: influxdb2::Client,
    bucket: String,
}

impl Client {
    pub fn new(config: InfluxConfig) -> Self {
        let client = influxdb2::Client::new(config.url, config.org, config.token);
        Self {
            client,
            bucket: config.bucket,
        }
    }
}

#[derive(Debug, FromDataPoint)]
struct HourlyConsumptionRecord {
    location: String,
    value: f64,
    time: DateTime<FixedOffset>,
}

impl Default for HourlyConsumptionRecord {
    fn default() -> Self {
        Self {
            location: String::new(),
            value: 0.0,
            time: DateTime::<Utc>::MIN_UTC.fixed_offset(),
        }
    }
}

impl From<HourlyConsumptionRecord> for ConsumptionRow {
    fn from(record: HourlyConsumptionRecord) -> Self {
        ConsumptionRow {
            time: record.time.with_timezone(&Local).naive_local(),
            consumption: record.value,
            location: record.location,
        }
    }
}

/// Converts a row to a data point, localizing its naive timestamp.
///
/// Wall-clock times repeated by the daylight-saving fall-back resolve to
/// their first occurrence, so rows from the changeover night still persist.
/// Only times that never existed on the local clock are rejected.
fn to_point(row: &ConsumptionRow) -> Result<DataPoint, StorageError> {
    let timestamp = Local
        .from_local_datetime(&row.time)
        .earliest()
        .ok_or_else(|| {
            StorageError::InvalidDataPoint(format!("nonexistent local time {}", row.time))
        })?;
    let nanos = timestamp.timestamp_nanos_opt().ok_or_else(|| {
        StorageError::InvalidDataPoint(format!("timestamp out of range: {}", row.time))
    })?;
    DataPoint::builder(MEASUREMENT)
        .tag("location", row.location.as_str())
        .field("consumption", row.consumption)
        .timestamp(nanos)
        .build()
        .map_err(|e| StorageError::InvalidDataPoint(e.to_string()))
}

fn consumption_query(bucket: &str) -> String {
    format!(
        r#"from(bucket: "{}") |> range(start: -7d) |> filter(fn: (r) => r._measurement == "{}")"#,
        bucket, MEASUREMENT
    )
}

#[async_trait]
impl Sink for Client {
    async fn write(&self, table: ConsumptionTable) -> Result<(), StorageError> {
        let count = table.len();
        let points = table
            .iter()
            .map(to_point)
            .collect::<Result<Vec<_>, StorageError>>()?;
        self.client
            .write(self.bucket.as_str(), stream::iter(points))
            .await
            .map_err(|e| StorageError::write_failed(count, e))
    }

    async fn load(&self) -> Result<ConsumptionTable, StorageError> {
        let query = Query::new(consumption_query(&self.bucket));
        let records: Vec<HourlyConsumptionRecord> = self.client.query(Some(query)).await?;
        Ok(records.into_iter().map(ConsumptionRow::from).collect())
    }
}
