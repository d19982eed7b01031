use std::time::Duration;

pub(crate) const APP_STORE_PRODUCTION_URL: &str = "https://buy.itunes.apple.com/verifyReceipt";
pub(crate) const APP_STORE_SANDBOX_URL: &str = "https://sandbox.itunes.apple.com/verifyReceipt";

pub(crate) const GOOGLE_PLAY_DEVELOPER_API_BASE_URL: &str =
    "https://androidpublisher.googleapis.com/androidpublisher/v3/applications";
pub(crate) const GOOGLE_PLAY_DEVELOPER_API_SCOPE: &str =
    "https://www.googleapis.com/auth/androidpublisher";

pub(crate) const GOOGLE_PLAY_DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// `purchaseState` of a Google Play receipt or product purchase that has
/// been paid for.
pub(crate) const GOOGLE_PLAY_PURCHASE_STATE_PURCHASED: i64 = 0;
