use crate::{
    config::GooglePlayVerifierConfig,
    data::datasources::google_play_developer_api_datasource::{
        BlockingGooglePlayDeveloperApiDatasource, BlockingGooglePlayDeveloperApiDatasourceImpl,
    },
    domain::entities::{
        google_verification_result::GoogleVerificationResult, raw_response::RawResponse,
    },
    errors::IapError,
};

use super::{
    app_store_validator::check_bundle_id,
    google_play_verifier::{into_active_purchase, product_result, subscription_result},
};

/// Blocking flavor of [`crate::GooglePlayVerifier`], for callers without an
/// async runtime. Behaves identically.
pub struct GooglePlayVerifier<
    D: BlockingGooglePlayDeveloperApiDatasource = BlockingGooglePlayDeveloperApiDatasourceImpl,
> {
    bundle_id: String,
    datasource: D,
}

impl GooglePlayVerifier {
    /// Authorizes eagerly. Must not be called from within an async runtime.
    pub fn new(config: GooglePlayVerifierConfig) -> Result<Self, IapError> {
        check_bundle_id(&config.bundle_id)?;
        let datasource =
            BlockingGooglePlayDeveloperApiDatasourceImpl::new(&config.credentials, config.http_timeout)?;
        tracing::info!(bundle_id = %config.bundle_id, "Google Play verifier authorized");
        Self::with_datasource(config.bundle_id, datasource)
    }
}

impl<D: BlockingGooglePlayDeveloperApiDatasource> GooglePlayVerifier<D> {
    pub fn with_datasource(bundle_id: impl Into<String>, datasource: D) -> Result<Self, IapError> {
        let bundle_id = bundle_id.into();
        check_bundle_id(&bundle_id)?;
        Ok(Self {
            bundle_id,
            datasource,
        })
    }

    pub fn bundle_id(&self) -> &str {
        &self.bundle_id
    }

    pub fn check_purchase_subscription(
        &self,
        purchase_token: &str,
        product_sku: &str,
    ) -> Result<RawResponse, IapError> {
        self.datasource
            .get_subscription_purchase(&self.bundle_id, product_sku, purchase_token)
    }

    pub fn check_purchase_product(
        &self,
        purchase_token: &str,
        product_sku: &str,
    ) -> Result<RawResponse, IapError> {
        self.datasource
            .get_product_purchase(&self.bundle_id, product_sku, purchase_token)
    }

    pub fn verify(
        &self,
        purchase_token: &str,
        product_sku: &str,
        is_subscription: bool,
    ) -> Result<RawResponse, IapError> {
        let result = self.verify_with_result(purchase_token, product_sku, is_subscription)?;
        into_active_purchase(result, product_sku, is_subscription)
    }

    pub fn verify_with_result(
        &self,
        purchase_token: &str,
        product_sku: &str,
        is_subscription: bool,
    ) -> Result<GoogleVerificationResult, IapError> {
        if is_subscription {
            subscription_result(self.check_purchase_subscription(purchase_token, product_sku)?)
        } else {
            product_result(self.check_purchase_product(purchase_token, product_sku)?)
        }
    }
}
