/// Value of the `status` field returned by the App Store `verifyReceipt`
/// endpoint.
///
/// https://developer.apple.com/documentation/appstorereceipts/status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    /// The receipt is valid.
    Ok,
    /// The request to the App Store was not made using the HTTP POST request
    /// method, or the body was not valid JSON.
    BadJson,
    /// The data in the receipt-data property was malformed or the service
    /// experienced a temporary issue.
    BadData,
    /// The receipt could not be authenticated.
    ReceiptAuthentication,
    /// The shared secret you provided does not match the shared secret on file
    /// for your account.
    SharedSecretMismatch,
    /// The receipt server was temporarily unable to provide the receipt.
    ServerUnavailable,
    /// The receipt is valid, but the subscription has expired.
    SubscriptionExpired,
    /// The receipt is from the test environment, but it was sent to the
    /// production environment for verification.
    SandboxReceiptInProduction,
    /// The receipt is from the production environment, but it was sent to the
    /// test environment for verification.
    ProductionReceiptInSandbox,
    /// Anything else, including a missing or non-integer status.
    Unknown(Option<i64>),
}

impl ReceiptStatus {
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(0) => ReceiptStatus::Ok,
            Some(21000) => ReceiptStatus::BadJson,
            Some(21002) => ReceiptStatus::BadData,
            Some(21003) => ReceiptStatus::ReceiptAuthentication,
            Some(21004) => ReceiptStatus::SharedSecretMismatch,
            Some(21005) => ReceiptStatus::ServerUnavailable,
            Some(21006) => ReceiptStatus::SubscriptionExpired,
            Some(21007) => ReceiptStatus::SandboxReceiptInProduction,
            Some(21008) => ReceiptStatus::ProductionReceiptInSandbox,
            other => ReceiptStatus::Unknown(other),
        }
    }

    /// Message reported to the caller when validation fails with this status.
    pub fn message(&self) -> &'static str {
        match self {
            ReceiptStatus::Ok => "OK",
            ReceiptStatus::BadJson => "Bad json",
            ReceiptStatus::BadData => "Bad data",
            ReceiptStatus::ReceiptAuthentication => "Receipt authentication",
            ReceiptStatus::SharedSecretMismatch => "Shared secret mismatch",
            ReceiptStatus::ServerUnavailable => "Server is unavailable",
            ReceiptStatus::SubscriptionExpired => "Subscription has expired",
            ReceiptStatus::SandboxReceiptInProduction => {
                "Sandbox receipt sent to production env"
            }
            ReceiptStatus::ProductionReceiptInSandbox => {
                "Production receipt sent to sandbox env"
            }
            ReceiptStatus::Unknown(_) => "Unknown API status",
        }
    }

    pub fn is_ok(&self) -> bool {
        *self == ReceiptStatus::Ok
    }

    /// The receipt belongs to the other environment, so retrying against it
    /// may succeed.
    pub fn is_wrong_environment(&self) -> bool {
        matches!(
            self,
            ReceiptStatus::SandboxReceiptInProduction | ReceiptStatus::ProductionReceiptInSandbox
        )
    }
}
