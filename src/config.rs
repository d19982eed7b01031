use std::time::Duration;

use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};

use crate::{
    constants::{GOOGLE_PLAY_DEFAULT_HTTP_TIMEOUT, GOOGLE_PLAY_PURCHASE_STATE_PURCHASED},
    domain::entities::service_account_credentials::ServiceAccountCredentials,
};

/// Configuration for the App Store receipt validators (both the async and
/// the blocking flavor).
///
/// Timeouts are given in whole seconds when deserialized.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct AppStoreValidatorConfig {
    pub bundle_id: String,
    /// Start out against the sandbox endpoint instead of production.
    #[serde(default)]
    pub sandbox: bool,
    /// On a 21007/21008 status, switch environment and retry once.
    #[serde(default)]
    pub auto_retry_wrong_env_request: bool,
    /// Applied to each request individually. No timeout if unset.
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    pub http_timeout: Option<Duration>,
}

impl AppStoreValidatorConfig {
    pub fn new(bundle_id: impl Into<String>) -> Self {
        Self {
            bundle_id: bundle_id.into(),
            sandbox: false,
            auto_retry_wrong_env_request: false,
            http_timeout: None,
        }
    }

    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn auto_retry_wrong_env_request(mut self, auto_retry: bool) -> Self {
        self.auto_retry_wrong_env_request = auto_retry;
        self
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }
}

/// Configuration for offline validation of Google Play receipts.
#[derive(Debug, Clone, Deserialize)]
pub struct GooglePlayValidatorConfig {
    pub bundle_id: String,
    /// Base64-encoded RSA public key from the Play Console
    /// (Monetization setup > Licensing).
    pub api_key: String,
    #[serde(default = "default_valid_purchase_state")]
    pub default_valid_purchase_state: i64,
}

impl GooglePlayValidatorConfig {
    pub fn new(bundle_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            bundle_id: bundle_id.into(),
            api_key: api_key.into(),
            default_valid_purchase_state: GOOGLE_PLAY_PURCHASE_STATE_PURCHASED,
        }
    }

    pub fn default_valid_purchase_state(mut self, state: i64) -> Self {
        self.default_valid_purchase_state = state;
        self
    }
}

fn default_valid_purchase_state() -> i64 {
    GOOGLE_PLAY_PURCHASE_STATE_PURCHASED
}

/// Configuration for verification against the Google Play Developer API.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct GooglePlayVerifierConfig {
    pub bundle_id: String,
    pub credentials: ServiceAccountCredentials,
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_google_http_timeout")]
    pub http_timeout: Duration,
}

impl GooglePlayVerifierConfig {
    pub fn new(
        bundle_id: impl Into<String>,
        credentials: impl Into<ServiceAccountCredentials>,
    ) -> Self {
        Self {
            bundle_id: bundle_id.into(),
            credentials: credentials.into(),
            http_timeout: GOOGLE_PLAY_DEFAULT_HTTP_TIMEOUT,
        }
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }
}

fn default_google_http_timeout() -> Duration {
    GOOGLE_PLAY_DEFAULT_HTTP_TIMEOUT
}
