use crate::{
    config::AppStoreValidatorConfig,
    data::{
        datasources::app_store_verify_receipt_datasource::{
            BlockingAppStoreVerifyReceiptDatasource, BlockingAppStoreVerifyReceiptDatasourceImpl,
        },
        models::app_store_verify_receipt::request_body_model::RequestBodyModel,
    },
    domain::entities::raw_response::RawResponse,
    errors::IapError,
};

use super::app_store_validator::{
    check_bundle_id, into_validation_result, receipt_status, switch_environment,
    verify_receipt_url,
};

/// Blocking flavor of [`crate::AppStoreValidator`], for callers without an
/// async runtime. Behaves identically, including the environment retry.
pub struct AppStoreValidator<
    D: BlockingAppStoreVerifyReceiptDatasource = BlockingAppStoreVerifyReceiptDatasourceImpl,
> {
    bundle_id: String,
    sandbox: bool,
    auto_retry_wrong_env_request: bool,
    datasource: D,
}

impl AppStoreValidator {
    /// Must not be called from within an async runtime.
    pub fn new(config: AppStoreValidatorConfig) -> Result<Self, IapError> {
        check_bundle_id(&config.bundle_id)?;
        let datasource = BlockingAppStoreVerifyReceiptDatasourceImpl::new(config.http_timeout)?;
        Self::with_datasource(config, datasource)
    }
}

impl<D: BlockingAppStoreVerifyReceiptDatasource> AppStoreValidator<D> {
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

    pub fn sandbox(&self) -> bool {
        self.sandbox
    }

    pub fn url(&self) -> &'static str {
        verify_receipt_url(self.sandbox)
    }

    pub fn validate(
        &mut self,
        receipt: &str,
        shared_secret: Option<&str>,
        exclude_old_transactions: bool,
    ) -> Result<RawResponse, IapError> {
        let body = RequestBodyModel::new(receipt, shared_secret, exclude_old_transactions);
        let mut response = self.datasource.post_receipt(self.url(), &body)?;
        if self.auto_retry_wrong_env_request && receipt_status(&response).is_wrong_environment() {
            switch_environment(&mut self.sandbox, &self.bundle_id);
            response = self.datasource.post_receipt(self.url(), &body)?;
        }
        into_validation_result(response)
    }
}
