use crate::config::OomiConfig;
use crate::error::PortalError;
use crate::model::Credentials;
use crate::oomi::client::{Session, HOME_PATH, LANDING_PATH, LOGIN_PATH};
use crate::oomi::token::{extract_verification_token, page_is_anonymous};

/// Establishes authenticated portal sessions.
///
/// The portal has no API login: authentication is the human web flow of
/// loading the landing page, lifting the anti-forgery token out of the
/// login form, and submitting the form within the same cookie context.
pub struct SessionAuthenticator {
    config: OomiConfig,
}

impl SessionAuthenticator {
    pub fn new(config: OomiConfig) -> Self {
        Self { config }
    }

    /// Logs in and returns a session whose cookies carry the authenticated
    /// state.
    ///
    /// Issues one GET (landing page), one POST (login form) and one probe
    /// GET. The returned session is bound to this single login attempt.
    ///
    /// # Errors
    ///
    /// - [`PortalError::TokenNotFound`] if the landing page lacks the
    ///   verification token; no login POST is issued in that case.
    /// - [`PortalError::AuthFailed`] if the post-login probe is still
    ///   served anonymous content, which is how bad credentials surface.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Session, PortalError> {
        let session = Session::new(&self.config)?;

        let landing = session.get_text(LANDING_PATH).await?;
        let token = extract_verification_token(&landing)?;
        tracing::debug!("extracted verification token from landing page");

        // The token is used exactly once and never persisted.
        let form = [
            ("UserName", credentials.username.as_str()),
            ("Password", credentials.password.as_str()),
            ("__RequestVerificationToken", token.as_str()),
        ];
        session.post_form(LOGIN_PATH, &form).await?;

        self.verify(&session).await?;
        tracing::debug!(username = %credentials.username, "authenticated session established");
        Ok(session)
    }

    /// Lightweight authenticated probe.
    ///
    /// The portal accepts bad credentials with a 200 and simply keeps the
    /// session anonymous, so the login response proves nothing. One GET to
    /// the authenticated landing page decides: a non-success status or a
    /// page that still shows the login form means the login did not take.
    async fn verify(&self, session: &Session) -> Result<(), PortalError> {
        let response = session.get(HOME_PATH).await?;
        if !response.status().is_success() {
            return Err(PortalError::AuthFailed);
        }
        let body = response.text().await?;
        if page_is_anonymous(&body) {
            return Err(PortalError::AuthFailed);
        }
        Ok(())
    }
}
