use crate::{
    config::AppStoreValidatorConfig,
    constants::{APP_STORE_PRODUCTION_URL, APP_STORE_SANDBOX_URL},
    data::{
        datasources::app_store_verify_receipt_datasource::{
            AppStoreVerifyReceiptDatasource, AppStoreVerifyReceiptDatasourceImpl,
        },
        models::app_store_verify_receipt::request_body_model::RequestBodyModel,
    },
    domain::entities::{raw_response::RawResponse, receipt_status::ReceiptStatus},
    errors::IapError,
};

/// Validates App Store receipts against Apple's `verifyReceipt` endpoint.
///
/// With `auto_retry_wrong_env_request` enabled, a receipt rejected for
/// belonging to the other environment (21007/21008) is sent once more to the
/// other endpoint, and the validator stays switched to that environment for
/// later calls. Because of this, `validate` takes `&mut self`; use one
/// validator per concurrent caller.
pub struct AppStoreValidator<D: AppStoreVerifyReceiptDatasource = AppStoreVerifyReceiptDatasourceImpl>
{
    bundle_id: String,
    sandbox: bool,
    auto_retry_wrong_env_request: bool,
    datasource: D,
}

impl AppStoreValidator {
    pub fn new(config: AppStoreValidatorConfig) -> Result<Self, IapError> {
        check_bundle_id(&config.bundle_id)?;
        let datasource = AppStoreVerifyReceiptDatasourceImpl::new(config.http_timeout)?;
        Self::with_datasource(config, datasource)
    }
}

impl<D: AppStoreVerifyReceiptDatasource> AppStoreValidator<D> {
    pub fn with_datasource(config: AppStoreValidatorConfig, datasource: D) -> Result<Self, IapError> {
        check_bundle_id(&config.bundle_id)?;
        Ok(Self {
            bundle_id: config.bundle_id,
            sandbox: config.sandbox,
            auto_retry_wrong_env_request: config.auto_retry_wrong_env_request,
            datasource,
        })
    }

    pub fn bundle_id(&self) -> &str {
        &self.bundle_id
    }

    /// Whether the next request goes to the sandbox endpoint.
    pub fn sandbox(&self) -> bool {
        self.sandbox
    }

    /// Endpoint the next request goes to.
    pub fn url(&self) -> &'static str {
        verify_receipt_url(self.sandbox)
    }

    /// Returns the full response body if Apple reports the receipt as valid
    /// (status 0).
    pub async fn validate(
        &mut self,
        receipt: &str,
        shared_secret: Option<&str>,
        exclude_old_transactions: bool,
    ) -> Result<RawResponse, IapError> {
        let body = RequestBodyModel::new(receipt, shared_secret, exclude_old_transactions);
        let mut response = self.datasource.post_receipt(self.url(), &body).await?;
        if self.auto_retry_wrong_env_request && receipt_status(&response).is_wrong_environment() {
            switch_environment(&mut self.sandbox, &self.bundle_id);
            response = self.datasource.post_receipt(self.url(), &body).await?;
        }
        into_validation_result(response)
    }
}

/// The only place either validator flavor changes its environment.
pub(crate) fn switch_environment(sandbox: &mut bool, bundle_id: &str) {
    *sandbox = !*sandbox;
    tracing::info!(
        bundle_id,
        sandbox = *sandbox,
        "receipt belongs to the other environment, retrying"
    );
}

pub(crate) fn check_bundle_id(bundle_id: &str) -> Result<(), IapError> {
    if bundle_id.is_empty() {
        return Err(IapError::configuration("bundle_id cannot be empty"));
    }
    Ok(())
}

pub(crate) fn verify_receipt_url(sandbox: bool) -> &'static str {
    if sandbox {
        APP_STORE_SANDBOX_URL
    } else {
        APP_STORE_PRODUCTION_URL
    }
}

pub(crate) fn receipt_status(response: &RawResponse) -> ReceiptStatus {
    ReceiptStatus::from_code(response.get("status").and_then(serde_json::Value::as_i64))
}

pub(crate) fn into_validation_result(response: RawResponse) -> Result<RawResponse, IapError> {
    let status = receipt_status(&response);
    if status.is_ok() {
        return Ok(response);
    }
    tracing::debug!(?status, "receipt rejected by the App Store");
    Err(IapError::validation_with_response(
        status.message(),
        response,
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_utils::{raw, MockVerifyReceiptDatasource};

    fn validator(
        config: AppStoreValidatorConfig,
        responses: Vec<serde_json::Value>,
    ) -> AppStoreValidator<MockVerifyReceiptDatasource> {
        AppStoreValidator::with_datasource(config, MockVerifyReceiptDatasource::returning(responses))
            .unwrap()
    }

    #[test]
    fn test_url_selection() {
        let v = validator(AppStoreValidatorConfig::new("x"), vec![json!({"status": 0})]);
        assert_eq!(v.url(), "https://buy.itunes.apple.com/verifyReceipt");
        assert!(!v.sandbox());

        let v = validator(
            AppStoreValidatorConfig::new("x").sandbox(true),
            vec![json!({"status": 0})],
        );
        assert_eq!(v.url(), "https://sandbox.itunes.apple.com/verifyReceipt");
        assert!(v.sandbox());
    }

    #[test]
    fn test_empty_bundle_id_fails_before_any_request() {
        let datasource = MockVerifyReceiptDatasource::returning(vec![json!({"status": 0})]);
        let result = AppStoreValidator::with_datasource(AppStoreValidatorConfig::new(""), datasource);
        assert!(matches!(result, Err(IapError::Configuration(_))));

        assert!(matches!(
            AppStoreValidator::new(AppStoreValidatorConfig::new("")),
            Err(IapError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_validate_returns_raw_response_on_success() {
        let mut v = validator(
            AppStoreValidatorConfig::new("x"),
            vec![json!({"status": 0, "receipt": {"bundle_id": "x"}})],
        );
        let response = v.validate("r", None, false).await.unwrap();
        assert_eq!(response, raw(json!({"status": 0, "receipt": {"bundle_id": "x"}})));
        assert_eq!(v.datasource.call_count(), 1);
        assert_eq!(v.datasource.last_body(), json!({"receipt-data": "r"}));
        assert_eq!(
            v.datasource.urls(),
            vec!["https://buy.itunes.apple.com/verifyReceipt"]
        );
    }

    #[tokio::test]
    async fn test_validate_sends_shared_secret_and_exclude_flag() {
        let mut v = validator(
            AppStoreValidatorConfig::new("x").sandbox(true),
            vec![json!({"status": 0})],
        );
        v.validate("test-receipt", Some("shared-secret"), true)
            .await
            .unwrap();
        assert_eq!(
            v.datasource.last_body(),
            json!({
                "receipt-data": "test-receipt",
                "password": "shared-secret",
                "exclude-old-transactions": true,
            })
        );
        assert_eq!(
            v.datasource.urls(),
            vec!["https://sandbox.itunes.apple.com/verifyReceipt"]
        );
    }

    #[tokio::test]
    async fn test_error_carries_full_raw_response() {
        let mut v = validator(
            AppStoreValidatorConfig::new("x"),
            vec![json!({"status": 21004})],
        );
        let err = v.validate("r", None, false).await.unwrap_err();
        assert!(!err.is_google());
        assert_eq!(err.message(), Some("Shared secret mismatch"));
        assert_eq!(err.raw_response(), Some(&raw(json!({"status": 21004}))));
    }

    #[tokio::test]
    async fn test_every_documented_status_maps_to_its_message() {
        let table = [
            (21000, "Bad json"),
            (21002, "Bad data"),
            (21003, "Receipt authentication"),
            (21004, "Shared secret mismatch"),
            (21005, "Server is unavailable"),
            (21006, "Subscription has expired"),
            (21007, "Sandbox receipt sent to production env"),
            (21008, "Production receipt sent to sandbox env"),
            (9999, "Unknown API status"),
        ];
        for (status, message) in table {
            let response = json!({"status": status, "foo": "bar"});
            let mut v = validator(AppStoreValidatorConfig::new("x"), vec![response.clone()]);
            let err = v.validate("r", None, false).await.unwrap_err();
            assert_eq!(err.message(), Some(message), "status {status}");
            assert_eq!(err.raw_response(), Some(&raw(response)));
            // No retry without auto_retry_wrong_env_request.
            assert_eq!(v.datasource.call_count(), 1);
            assert!(!v.sandbox());
        }
    }

    #[tokio::test]
    async fn test_non_integer_status_is_unknown() {
        let response = json!({"status": "x", "foo": "bar"});
        let mut v = validator(AppStoreValidatorConfig::new("x"), vec![response.clone()]);
        let err = v.validate("r", Some("shared-secret"), false).await.unwrap_err();
        assert_eq!(err.message(), Some("Unknown API status"));
        assert_eq!(err.raw_response(), Some(&raw(response)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_http_error_without_raw_response() {
        let mut v = AppStoreValidator::with_datasource(
            AppStoreValidatorConfig::new("x"),
            MockVerifyReceiptDatasource::failing(),
        )
        .unwrap();
        let err = v.validate("r", None, false).await.unwrap_err();
        assert_eq!(err.message(), Some("HTTP error"));
        assert!(err.raw_response().is_none());
    }

    #[tokio::test]
    async fn test_auto_retry_switches_environment_once() {
        let mut v = validator(
            AppStoreValidatorConfig::new("x").auto_retry_wrong_env_request(true),
            vec![json!({"status": 21007}), json!({"status": 0, "environment": "Sandbox"})],
        );
        assert!(!v.sandbox());
        let response = v.validate("r", Some("shared-secret"), false).await.unwrap();
        assert_eq!(response["environment"], json!("Sandbox"));
        assert!(v.sandbox());
        assert_eq!(
            v.datasource.urls(),
            vec![
                "https://buy.itunes.apple.com/verifyReceipt",
                "https://sandbox.itunes.apple.com/verifyReceipt",
            ]
        );
        assert_eq!(v.url(), "https://sandbox.itunes.apple.com/verifyReceipt");
    }

    #[tokio::test]
    async fn test_auto_retry_gives_up_after_one_retry() {
        let mut v = validator(
            AppStoreValidatorConfig::new("x").auto_retry_wrong_env_request(true),
            vec![json!({"status": 21007, "foo": "bar"})],
        );
        let err = v.validate("r", None, false).await.unwrap_err();
        assert_eq!(err.message(), Some("Sandbox receipt sent to production env"));
        assert_eq!(err.raw_response(), Some(&raw(json!({"status": 21007, "foo": "bar"}))));
        assert_eq!(v.datasource.call_count(), 2);
        assert!(v.sandbox());
    }

    #[tokio::test]
    async fn test_auto_retry_switches_back_from_sandbox() {
        let mut v = validator(
            AppStoreValidatorConfig::new("x")
                .sandbox(true)
                .auto_retry_wrong_env_request(true),
            vec![json!({"status": 21008}), json!({"status": 0})],
        );
        v.validate("r", None, false).await.unwrap();
        assert!(!v.sandbox());
        assert_eq!(v.url(), "https://buy.itunes.apple.com/verifyReceipt");
    }

    #[test]
    fn test_switch_environment_toggles_both_ways() {
        let mut sandbox = false;
        switch_environment(&mut sandbox, "x");
        assert!(sandbox);
        switch_environment(&mut sandbox, "x");
        assert!(!sandbox);
    }

    #[tokio::test]
    async fn test_no_retry_for_other_statuses() {
        let mut v = validator(
            AppStoreValidatorConfig::new("x").auto_retry_wrong_env_request(true),
            vec![json!({"status": 21002})],
        );
        let err = v.validate("r", None, false).await.unwrap_err();
        assert_eq!(err.message(), Some("Bad data"));
        assert_eq!(v.datasource.call_count(), 1);
        assert!(!v.sandbox());
    }
}
