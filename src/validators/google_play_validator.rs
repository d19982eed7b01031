use openssl::pkey::{PKey, Public};

use crate::{
    config::GooglePlayValidatorConfig,
    data::{
        models::google_play_billing::purchase_data_model::PurchaseDataModel,
        signature::{load_public_key, verify_signature, SignatureVerification},
    },
    domain::entities::raw_response::RawResponse,
    errors::IapError,
};

use super::app_store_validator::check_bundle_id;

/// Validates Google Play purchase receipts offline, by checking the signature
/// Google Play Billing attached to the purchase data on the device.
pub struct GooglePlayValidator {
    bundle_id: String,
    public_key: PKey<Public>,
    valid_purchase_state: i64,
}

impl GooglePlayValidator {
    pub fn new(config: GooglePlayValidatorConfig) -> Result<Self, IapError> {
        check_bundle_id(&config.bundle_id)?;
        if config.api_key.is_empty() {
            return Err(IapError::configuration("api_key cannot be empty"));
        }
        Ok(Self {
            public_key: load_public_key(&config.api_key)?,
            bundle_id: config.bundle_id,
            valid_purchase_state: config.default_valid_purchase_state,
        })
    }

    pub fn bundle_id(&self) -> &str {
        &self.bundle_id
    }

    /// Returns the parsed receipt if the signature matches, the receipt is for
    /// this app, and the item is in the valid purchase state.
    pub fn validate(&self, receipt: &str, signature: &str) -> Result<RawResponse, IapError> {
        if verify_signature(&self.public_key, receipt.as_bytes(), signature)
            == SignatureVerification::Invalid
        {
            tracing::debug!(bundle_id = %self.bundle_id, "receipt signature rejected");
            return Err(IapError::validation("Bad signature"));
        }

        let receipt_json: RawResponse =
            serde_json::from_str(receipt).map_err(|_| IapError::validation("Bad receipt"))?;
        let purchase_data: PurchaseDataModel =
            serde_json::from_value(serde_json::Value::Object(receipt_json.clone()))
                .map_err(|_| IapError::validation("Bad receipt"))?;

        if purchase_data.package_name != self.bundle_id {
            return Err(IapError::validation("Bundle ID mismatch"));
        }
        if purchase_data.purchase_state != self.valid_purchase_state {
            return Err(IapError::validation("Item is not purchased"));
        }

        Ok(receipt_json)
    }
}
