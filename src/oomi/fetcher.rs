use crate::config::OomiConfig;
use crate::error::{DownloadError, PortalError};
use crate::model::{ConsumptionTable, Credentials, DateRange};
use crate::oomi::authenticator::SessionAuthenticator;
use crate::oomi::client::{Session, DOWNLOAD_REPORT_PATH, GENERATE_REPORT_PATH};
use crate::oomi::report::parse_report;
use serde_derive::Serialize;
use tokio::time::{sleep, Duration};

#[derive(Serialize, Debug)]
struct GenerateReportRequest {
    start: String,
    end: String,
    #[serde(rename = "selectedTimeSpan")]
    selected_time_span: &'static str,
}

/// Retrieves and normalizes hourly consumption for a date range.
///
/// The portal's interface is a three-step human workflow mediated by
/// anti-forgery tokens and a server-side report job: load page, generate
/// report, download report. `fetch` reproduces that sequence faithfully;
/// steps cannot be skipped or reordered.
pub struct ConsumptionFetcher {
    config: OomiConfig,
    authenticator: SessionAuthenticator,
}

impl ConsumptionFetcher {
    pub fn new(config: OomiConfig) -> Self {
        let authenticator = SessionAuthenticator::new(config.clone());
        Self {
            config,
            authenticator,
        }
    }

    /// Fetches the consumption table for `range`.
    ///
    /// Acquires a session scoped to this call (dropped on every exit path,
    /// success or failure), generates a report, downloads it with a bounded
    /// poll, and parses it. Any step failure aborts the whole call; no
    /// partial results are returned.
    pub async fn fetch(
        &self,
        credentials: &Credentials,
        range: &DateRange,
    ) -> Result<ConsumptionTable, PortalError> {
        let session = self.authenticator.authenticate(credentials).await?;
        let identifier = self.generate_report(&session, range).await?;
        tracing::debug!(%identifier, "report generated");
        let payload = self.download_report(&session, &identifier).await?;
        let table = parse_report(&payload)?;
        tracing::info!(
            rows = table.len(),
            start = %range.start,
            end = %range.end,
            "parsed consumption report"
        );
        Ok(table)
    }

    async fn generate_report(
        &self,
        session: &Session,
        range: &DateRange,
    ) -> Result<String, PortalError> {
        let request = GenerateReportRequest {
            start: range.start.format("%Y-%m-%d").to_string(),
            end: range.end.format("%Y-%m-%d").to_string(),
            selected_time_span: "hour",
        };
        let body = session.post_json(GENERATE_REPORT_PATH, &request).await?;

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|_| PortalError::report_generation(truncate_body(&body)))?;
        value
            .get("identifier")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| PortalError::report_generation(truncate_body(&body)))
    }

    /// Downloads the generated report by identifier.
    ///
    /// The generation endpoint kicks off a server-side job, so the file may
    /// not be ready on the first request. A 202 status or an empty success
    /// body counts as not-ready and is retried with a fixed backoff, up to
    /// the configured bound. Exhausting the bound fails with an
    /// empty-payload error if the last answer was an empty success body,
    /// or a timeout if the job never finished. Any other non-success
    /// status fails immediately.
    async fn download_report(
        &self,
        session: &Session,
        identifier: &str,
    ) -> Result<Vec<u8>, PortalError> {
        let query = [("identifier", identifier)];
        let max_attempts = self.config.download_max_attempts.max(1);
        let backoff = Duration::from_secs(self.config.download_backoff_secs);
        let mut waited_secs = 0;

        for attempt in 1..=max_attempts {
            let response = session.get_with_query(DOWNLOAD_REPORT_PATH, &query).await?;
            let status = response.status();
            if status == reqwest::StatusCode::ACCEPTED {
                tracing::debug!(attempt, "report job still running");
            } else if status.is_success() {
                let payload = response.bytes().await?;
                if !payload.is_empty() {
                    return Ok(payload.to_vec());
                }
                if attempt == max_attempts {
                    return Err(DownloadError::EmptyPayload.into());
                }
                tracing::debug!(attempt, "report payload not ready yet");
            } else {
                let body = response.text().await.unwrap_or_default();
                return Err(DownloadError::status(status, body).into());
            }

            if attempt < max_attempts {
                sleep(backoff).await;
                waited_secs += backoff.as_secs();
            }
        }
        Err(DownloadError::TimedOut {
            attempts: max_attempts,
            waited_secs,
        }
        .into())
    }
}

/// Keeps raw response bodies in error values readable.
fn truncate_body(body: &str) -> String {
    const MAX_CHARS: usize = 200;
    if body.chars().count() <= MAX_CHARS {
        body.to_string()
    } else {
        body.chars().take(MAX_CHARS).collect()
    }
}
