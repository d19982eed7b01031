use serde::Deserialize;

/// The `INAPP_PURCHASE_DATA` JSON handed to the app by Google Play Billing,
/// signed with the app's licensing key.
///
/// Only the fields the offline validator checks are declared; the complete
/// receipt is returned to the caller untouched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PurchaseDataModel {
    /// The application package from which the purchase originated.
    pub(crate) package_name: String,
    /// The purchase state of the order. 0 (purchased), 1 (canceled) or
    /// 2 (pending).
    pub(crate) purchase_state: i64,
}
