use crate::config::OomiConfig;
use crate::error::PortalError;
use reqwest::{Client as HttpClient, Response};
use serde::Serialize;
use std::time::Duration;

/// Unauthenticated landing page carrying the anti-forgery token.
pub(crate) const LANDING_PATH: &str = "/eServices/Online/IndexNoAuth";
/// Login form submission endpoint.
pub(crate) const LOGIN_PATH: &str = "/eServices/Online/Login";
/// Authenticated landing page, used as the post-login probe target.
pub(crate) const HOME_PATH: &str = "/eServices/Online/Index";
/// Report-generation endpoint returning a report identifier.
pub(crate) const GENERATE_REPORT_PATH: &str = "/Reporting/CustomerConsumption/GenerateExcelFile";
/// Report download endpoint, takes the identifier as a query parameter.
pub(crate) const DOWNLOAD_REPORT_PATH: &str = "/Reporting/CustomerConsumption/DownloadExcelFile";

/// A cookie-backed HTTP context scoped to a single retrieval call.
///
/// The portal tracks authentication purely through session cookies, so the
/// cookie store *is* the authenticated state. A `Session` is created per
/// fetch, bound to at most one login, and dropped when the call returns,
/// which releases the underlying connections on every exit path.
pub struct Session {
    http: HttpClient,
    base_url: String,
}

impl Session {
    pub fn new(config: &OomiConfig) -> Result<Self, PortalError> {
        let http = HttpClient::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET a page body, failing on non-success status.
    pub async fn get_text(&self, path: &str) -> Result<String, PortalError> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }

    /// GET returning the raw response, leaving status handling to the caller.
    pub async fn get(&self, path: &str) -> Result<Response, PortalError> {
        Ok(self.http.get(self.url(path)).send().await?)
    }

    /// GET with percent-encoded query parameters, returning the raw response.
    pub async fn get_with_query<T: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &T,
    ) -> Result<Response, PortalError> {
        Ok(self.http.get(self.url(path)).query(query).send().await?)
    }

    /// POST a form-encoded body and return the response body.
    ///
    /// The status is deliberately not inspected: the login endpoint answers
    /// 200 for bad credentials as well, so only the post-login probe can
    /// tell whether the session is authenticated.
    pub async fn post_form<T: Serialize + ?Sized>(
        &self,
        path: &str,
        form: &T,
    ) -> Result<String, PortalError> {
        let response = self.http.post(self.url(path)).form(form).send().await?;
        Ok(response.text().await?)
    }

    /// POST a JSON body and return the response body.
    ///
    /// The status is left to the caller: the report-generation endpoint
    /// signals failure through its body, which must stay available for
    /// the error value.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<String, PortalError> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Ok(response.text().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
