use std::time::Duration;

use async_trait::async_trait;

use crate::{
    data::models::app_store_verify_receipt::request_body_model::RequestBodyModel,
    domain::entities::raw_response::RawResponse, errors::IapError,
};

/// verifyReceipt:
/// https://developer.apple.com/documentation/appstorereceipts/verifyreceipt
///
/// Implementations return the decoded response body whatever its `status`.
/// Failing to get a JSON object back at all is reported as an
/// `IapError::Validation` with the message "HTTP error" and no raw response.
#[async_trait]
pub trait AppStoreVerifyReceiptDatasource: Send + Sync {
    async fn post_receipt(
        &self,
        url: &str,
        body: &RequestBodyModel,
    ) -> Result<RawResponse, IapError>;
}

/// Blocking counterpart of [`AppStoreVerifyReceiptDatasource`].
pub trait BlockingAppStoreVerifyReceiptDatasource: Send + Sync {
    fn post_receipt(&self, url: &str, body: &RequestBodyModel) -> Result<RawResponse, IapError>;
}

pub struct AppStoreVerifyReceiptDatasourceImpl {
    client: reqwest::Client,
}

#[async_trait]
impl AppStoreVerifyReceiptDatasource for AppStoreVerifyReceiptDatasourceImpl {
    async fn post_receipt(
        &self,
        url: &str,
        body: &RequestBodyModel,
    ) -> Result<RawResponse, IapError> {
        tracing::debug!(url, "posting receipt");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| http_error("callout failed to send", &e))?;
        response
            .json::<RawResponse>()
            .await
            .map_err(|e| http_error("failed to parse callout response", &e))
    }
}

impl AppStoreVerifyReceiptDatasourceImpl {
    pub fn new(http_timeout: Option<Duration>) -> Result<Self, IapError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = http_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build().map_err(|e| {
                IapError::configuration(format!("HTTP client could not be built: {e}"))
            })?,
        })
    }
}

pub struct BlockingAppStoreVerifyReceiptDatasourceImpl {
    client: reqwest::blocking::Client,
}

impl BlockingAppStoreVerifyReceiptDatasource for BlockingAppStoreVerifyReceiptDatasourceImpl {
    fn post_receipt(&self, url: &str, body: &RequestBodyModel) -> Result<RawResponse, IapError> {
        tracing::debug!(url, "posting receipt");
        self.client
            .post(url)
            .json(body)
            .send()
            .map_err(|e| http_error("callout failed to send", &e))?
            .json::<RawResponse>()
            .map_err(|e| http_error("failed to parse callout response", &e))
    }
}

impl BlockingAppStoreVerifyReceiptDatasourceImpl {
    /// Must not be called from within an async runtime.
    pub fn new(http_timeout: Option<Duration>) -> Result<Self, IapError> {
        // The blocking client defaults to a 30 second timeout; `None` disables
        // it, matching the async client.
        let client = reqwest::blocking::Client::builder()
            .timeout(http_timeout)
            .build()
            .map_err(|e| IapError::configuration(format!("HTTP client could not be built: {e}")))?;
        Ok(Self { client })
    }
}

fn http_error(context: &str, e: &reqwest::Error) -> IapError {
    tracing::warn!(error = %e, "verifyReceipt {context}");
    IapError::validation("HTTP error")
}
