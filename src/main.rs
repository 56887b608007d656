//! Oomi to InfluxDB2 Forwarder
//!
//! Fetches a customer's hourly electricity consumption from the Oomi web
//! portal and forwards it to InfluxDB2.
//!
//! The portal has no public API: retrieval means logging in through the
//! cookie/session web flow, triggering a server-side report job, polling
//! the export download, and parsing the human-oriented spreadsheet into
//! clean rows. Each run does this once for one date range; scheduling
//! repeated runs is left to the environment (cron, systemd timer, etc.).

mod config;
mod error;
mod influxdb;
mod model;
mod oomi;

#[cfg(test)]
mod test_utils;

use crate::model::{Credentials, Sink};
use crate::oomi::ConsumptionFetcher;

#[tokio::main]
async fn main() {
    let app_config = config::load_app_config().expect("Failed to load AppConfig");
    tracing_subscriber::fmt()
        .with_max_level(app_config.log_level())
        .init();

    if let Err(e) = run().await {
        let err = anyhow::Error::from(e);
        tracing::error!("forwarding failed: {:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> error::Result<()> {
    let oomi_config = config::load_oomi_config()?;
    let fetch_config = config::load_fetch_config()?;
    let influx_config = config::load_influx_config()?;

    let range = fetch_config.date_range(config::today())?;
    let credentials = Credentials::new(
        oomi_config.username.clone(),
        oomi_config.password.clone(),
    );
    tracing::info!(start = %range.start, end = %range.end, "fetching consumption data");

    let fetcher = ConsumptionFetcher::new(oomi_config);
    let table = fetcher.fetch(&credentials, &range).await?;

    let rows = table.len();
    let sink = influxdb::Client::new(influx_config);
    sink.write(table).await?;
    tracing::info!(rows, "forwarding complete");
    Ok(())
}
