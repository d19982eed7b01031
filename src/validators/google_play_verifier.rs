use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::{
    config::GooglePlayVerifierConfig,
    data::{
        datasources::google_play_developer_api_datasource::{
            GooglePlayDeveloperApiDatasource, GooglePlayDeveloperApiDatasourceImpl,
        },
        models::google_play_developer_api::{
            product_purchase_model::ProductPurchaseModel,
            subscription_purchase_model::SubscriptionPurchaseModel,
        },
    },
    domain::entities::{
        google_verification_result::GoogleVerificationResult, raw_response::RawResponse,
    },
    errors::IapError,
};

use super::app_store_validator::check_bundle_id;

/// Verifies purchase tokens against the live Google Play Developer API.
pub struct GooglePlayVerifier<
    D: GooglePlayDeveloperApiDatasource = GooglePlayDeveloperApiDatasourceImpl,
> {
    bundle_id: String,
    datasource: D,
}

impl GooglePlayVerifier {
    /// Resolves the service account credentials and fetches an access token
    /// right away, so bad credentials are reported here rather than on the
    /// first verification.
    pub async fn new(config: GooglePlayVerifierConfig) -> Result<Self, IapError> {
        check_bundle_id(&config.bundle_id)?;
        let datasource =
            GooglePlayDeveloperApiDatasourceImpl::new(&config.credentials, config.http_timeout)
                .await?;
        tracing::info!(bundle_id = %config.bundle_id, "Google Play verifier authorized");
        Self::with_datasource(config.bundle_id, datasource)
    }
}

impl<D: GooglePlayDeveloperApiDatasource> GooglePlayVerifier<D> {
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

    pub async fn check_purchase_subscription(
        &self,
        purchase_token: &str,
        product_sku: &str,
    ) -> Result<RawResponse, IapError> {
        self.datasource
            .get_subscription_purchase(&self.bundle_id, product_sku, purchase_token)
            .await
    }

    pub async fn check_purchase_product(
        &self,
        purchase_token: &str,
        product_sku: &str,
    ) -> Result<RawResponse, IapError> {
        self.datasource
            .get_product_purchase(&self.bundle_id, product_sku, purchase_token)
            .await
    }

    /// Returns the raw purchase if it is active: a subscription that is
    /// neither canceled nor expired, or a product in the purchased state.
    /// Anything else is an `IapError::Google` carrying the raw purchase.
    pub async fn verify(
        &self,
        purchase_token: &str,
        product_sku: &str,
        is_subscription: bool,
    ) -> Result<RawResponse, IapError> {
        let result = self
            .verify_with_result(purchase_token, product_sku, is_subscription)
            .await?;
        into_active_purchase(result, product_sku, is_subscription)
    }

    /// Like [`Self::verify`], but reports cancellation and expiry as flags on
    /// the result. Only transport and authorization failures are errors.
    pub async fn verify_with_result(
        &self,
        purchase_token: &str,
        product_sku: &str,
        is_subscription: bool,
    ) -> Result<GoogleVerificationResult, IapError> {
        if is_subscription {
            let raw_response = self
                .check_purchase_subscription(purchase_token, product_sku)
                .await?;
            subscription_result(raw_response)
        } else {
            let raw_response = self
                .check_purchase_product(purchase_token, product_sku)
                .await?;
            product_result(raw_response)
        }
    }
}

pub(crate) fn subscription_result(
    raw_response: RawResponse,
) -> Result<GoogleVerificationResult, IapError> {
    let purchase: SubscriptionPurchaseModel =
        parse_fields(&raw_response, "purchases.subscriptions.get")?;
    let mut result = GoogleVerificationResult::new(raw_response);
    result.is_canceled = purchase.is_canceled();
    result.is_expired = purchase.is_expired(Utc::now());
    Ok(result)
}

pub(crate) fn product_result(
    raw_response: RawResponse,
) -> Result<GoogleVerificationResult, IapError> {
    let purchase: ProductPurchaseModel = parse_fields(&raw_response, "purchases.products.get")?;
    let mut result = GoogleVerificationResult::new(raw_response);
    result.is_canceled = !purchase.is_purchased();
    Ok(result)
}

pub(crate) fn into_active_purchase(
    result: GoogleVerificationResult,
    product_sku: &str,
    is_subscription: bool,
) -> Result<RawResponse, IapError> {
    let message = match (is_subscription, result.is_canceled, result.is_expired) {
        (true, true, _) => "Subscription is canceled",
        (true, false, true) => "Subscription expired",
        (false, true, _) => "Purchase cancelled",
        _ => return Ok(result.raw_response),
    };
    tracing::debug!(product_sku, message, "purchase is not active");
    Err(IapError::google(message, result.raw_response))
}

fn parse_fields<T: DeserializeOwned>(
    raw_response: &RawResponse,
    function_name: &str,
) -> Result<T, IapError> {
    serde_json::from_value(serde_json::Value::Object(raw_response.clone())).map_err(|e| {
        IapError::google_api(function_name, format!("failed to parse callout response: {e}"))
    })
}
