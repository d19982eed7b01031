use serde::Deserialize;
use serde_with::serde_as;

use super::lenient_int_model::LenientInt;

/// Fields read from the response of purchases.products.get:
/// https://developers.google.com/android-publisher/api-ref/rest/v3/purchases.products#ProductPurchase
///
/// Everything else stays in the raw response.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductPurchaseModel {
    /// The purchase state of the order. 0 (purchased), 1 (canceled) or
    /// 2 (pending).
    #[serde_as(as = "Option<LenientInt>")]
    pub(crate) purchase_state: Option<i64>,
}

impl ProductPurchaseModel {
    /// A purchase without a state is treated as not purchased.
    pub(crate) fn is_purchased(&self) -> bool {
        self.purchase_state.unwrap_or(1) == 0
    }
}
