use super::raw_response::RawResponse;

/// Outcome of a Google Play verification that reports business failures as
/// flags instead of errors.
#[derive(Debug, Clone, PartialEq)]
pub struct GoogleVerificationResult {
    pub raw_response: RawResponse,
    /// Only ever set for subscriptions.
    pub is_expired: bool,
    /// Set for canceled subscriptions, and for products that are not in the
    /// purchased state.
    pub is_canceled: bool,
}

impl GoogleVerificationResult {
    pub(crate) fn new(raw_response: RawResponse) -> Self {
        Self {
            raw_response,
            is_expired: false,
            is_canceled: false,
        }
    }

    /// True if neither canceled nor expired.
    pub fn is_valid(&self) -> bool {
        !self.is_expired && !self.is_canceled
    }
}
