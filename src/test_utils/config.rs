//! Test configuration builders.

use crate::config::OomiConfig;

/// Portal config pointed at a mock server, with polling bounds small
/// enough to keep download-timeout tests fast.
pub fn test_oomi_config(base_url: String) -> OomiConfig {
    OomiConfig {
        base_url,
        username: "test_user".to_string(),
        password: "test_password".to_string(),
        timeout_secs: 5,
        download_max_attempts: 2,
        download_backoff_secs: 0,
    }
}
