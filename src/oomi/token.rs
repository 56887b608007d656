//! Extraction of the portal's anti-forgery token from landing-page HTML.
//!
//! Kept as a narrow seam on purpose: this is the one place coupled to the
//! portal's markup, so a markup change only touches this module.

use crate::error::PortalError;
use scraper::{Html, Selector};

/// The hidden input the ASP.NET login form embeds on every anonymous page.
const TOKEN_SELECTOR: &str = r#"input[name="__RequestVerificationToken"][type="hidden"]"#;

/// Extracts the verification token from a portal HTML page.
///
/// Returns [`PortalError::TokenNotFound`] when the hidden input is absent
/// or its value is not a plausible token (word characters and hyphens).
pub(crate) fn extract_verification_token(html: &str) -> Result<String, PortalError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(TOKEN_SELECTOR).map_err(|_| PortalError::TokenNotFound)?;
    let value = document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("value"))
        .map(str::to_owned)
        .ok_or(PortalError::TokenNotFound)?;

    if value.is_empty() || !value.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(PortalError::TokenNotFound);
    }
    Ok(value)
}

/// Whether a page still carries the anonymous login form.
///
/// Authenticated pages do not embed the login form's verification token,
/// so its presence means the session is (still) anonymous.
pub(crate) fn page_is_anonymous(html: &str) -> bool {
    extract_verification_token(html).is_ok()
}
