use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_with::serde_as;

use super::lenient_int_model::LenientInt;

/// Fields read from the response of purchases.subscriptions.get:
/// https://developers.google.com/android-publisher/api-ref/rest/v3/purchases.subscriptions#SubscriptionPurchase
///
/// int64 fields are serialized as strings by the API; any numeric form is
/// accepted.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubscriptionPurchaseModel {
    /// The reason why a subscription was canceled or is not auto-renewing.
    #[serde_as(as = "Option<LenientInt>")]
    pub(crate) cancel_reason: Option<i64>,
    /// Time at which the subscription will expire, in milliseconds since the
    /// Epoch.
    #[serde_as(as = "Option<LenientInt>")]
    pub(crate) expiry_time_millis: Option<i64>,
}

impl SubscriptionPurchaseModel {
    pub(crate) fn is_canceled(&self) -> bool {
        self.cancel_reason.unwrap_or(0) != 0
    }

    pub(crate) fn is_expired(&self, now: DateTime<Utc>) -> bool {
        is_ms_timestamp_expired(self.expiry_time_millis.unwrap_or(0), now)
    }
}

/// The timestamp is truncated to whole seconds before comparing, and counts
/// as expired only if strictly earlier than `now`. Zero means expired.
pub(crate) fn is_ms_timestamp_expired(ms_timestamp: i64, now: DateTime<Utc>) -> bool {
    let seconds = ms_timestamp / 1000;
    if seconds == 0 {
        return true;
    }
    match DateTime::from_timestamp(seconds, 0) {
        Some(expiry) => expiry < now,
        // Out of chrono's range.
        None => seconds < 0,
    }
}
