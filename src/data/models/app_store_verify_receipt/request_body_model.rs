use serde::Serialize;

/// JSON body posted to the App Store `verifyReceipt` endpoint.
///
/// https://developer.apple.com/documentation/appstorereceipts/requestbody
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBodyModel {
    /// The Base64-encoded receipt data.
    #[serde(rename = "receipt-data")]
    pub receipt_data: String,
    /// The app's shared secret. Required for receipts that contain
    /// auto-renewable subscriptions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Only used for receipts that contain auto-renewable subscriptions. When
    /// set, the response only includes the latest renewal transaction for
    /// each subscription.
    #[serde(
        rename = "exclude-old-transactions",
        skip_serializing_if = "Option::is_none"
    )]
    pub exclude_old_transactions: Option<bool>,
}

impl RequestBodyModel {
    pub(crate) fn new(
        receipt: &str,
        shared_secret: Option<&str>,
        exclude_old_transactions: bool,
    ) -> Self {
        Self {
            receipt_data: receipt.to_string(),
            password: shared_secret
                .filter(|secret| !secret.is_empty())
                .map(str::to_string),
            exclude_old_transactions: exclude_old_transactions.then_some(true),
        }
    }
}
