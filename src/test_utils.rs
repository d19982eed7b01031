use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    data::{
        datasources::{
            app_store_verify_receipt_datasource::{
                AppStoreVerifyReceiptDatasource, BlockingAppStoreVerifyReceiptDatasource,
            },
            google_play_developer_api_datasource::{
                BlockingGooglePlayDeveloperApiDatasource, GooglePlayDeveloperApiDatasource,
            },
        },
        models::app_store_verify_receipt::request_body_model::RequestBodyModel,
    },
    domain::entities::raw_response::RawResponse,
    errors::IapError,
};

pub(crate) fn raw(value: Value) -> RawResponse {
    value
        .as_object()
        .cloned()
        .expect("test responses must be JSON objects")
}

/// Replays canned responses in order and records every request. Once a
/// single response remains, it is repeated.
pub(crate) struct MockVerifyReceiptDatasource {
    responses: Mutex<VecDeque<Result<RawResponse, ()>>>,
    pub(crate) calls: Mutex<Vec<(String, Value)>>,
}

impl MockVerifyReceiptDatasource {
    pub(crate) fn returning(responses: Vec<Value>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(|r| Ok(raw(r))).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            responses: Mutex::new(VecDeque::from([Err(())])),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub(crate) fn last_body(&self) -> Value {
        self.calls.lock().unwrap().last().unwrap().1.clone()
    }

    fn respond(&self, url: &str, body: &RequestBodyModel) -> Result<RawResponse, IapError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), serde_json::to_value(body).unwrap()));
        let mut responses = self.responses.lock().unwrap();
        let next = if responses.len() > 1 {
            responses.pop_front().unwrap()
        } else {
            responses.front().cloned().unwrap()
        };
        next.map_err(|_| IapError::validation("HTTP error"))
    }
}

#[async_trait]
impl AppStoreVerifyReceiptDatasource for MockVerifyReceiptDatasource {
    async fn post_receipt(
        &self,
        url: &str,
        body: &RequestBodyModel,
    ) -> Result<RawResponse, IapError> {
        self.respond(url, body)
    }
}

impl BlockingAppStoreVerifyReceiptDatasource for MockVerifyReceiptDatasource {
    fn post_receipt(&self, url: &str, body: &RequestBodyModel) -> Result<RawResponse, IapError> {
        self.respond(url, body)
    }
}

pub(crate) enum MockGoogleResponse {
    Ok(Value),
    BadRequest(&'static str),
    ServerError,
}

/// Returns the same response for every call and records
/// `(function, package, sku, token)` for each.
pub(crate) struct MockGooglePlayDeveloperApiDatasource {
    response: MockGoogleResponse,
    pub(crate) calls: Mutex<Vec<(&'static str, String, String, String)>>,
}

impl MockGooglePlayDeveloperApiDatasource {
    pub(crate) fn new(response: MockGoogleResponse) -> Self {
        Self {
            response,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn returning(value: Value) -> Self {
        Self::new(MockGoogleResponse::Ok(value))
    }

    fn respond(
        &self,
        function_name: &'static str,
        package_name: &str,
        sku: &str,
        token: &str,
    ) -> Result<RawResponse, IapError> {
        self.calls.lock().unwrap().push((
            function_name,
            package_name.to_string(),
            sku.to_string(),
            token.to_string(),
        ));
        match &self.response {
            MockGoogleResponse::Ok(value) => Ok(raw(value.clone())),
            MockGoogleResponse::BadRequest(reason) => Err(IapError::Google {
                message: Some(reason.to_string()),
                raw_response: Some(raw(serde_json::json!({
                    "error": {"code": 400, "message": reason}
                }))),
            }),
            MockGoogleResponse::ServerError => Err(IapError::google_api(
                function_name,
                "callout returned with 503 Service Unavailable status code",
            )),
        }
    }
}

#[async_trait]
impl GooglePlayDeveloperApiDatasource for MockGooglePlayDeveloperApiDatasource {
    async fn get_subscription_purchase(
        &self,
        package_name: &str,
        subscription_id: &str,
        token: &str,
    ) -> Result<RawResponse, IapError> {
        self.respond(
            "purchases.subscriptions.get",
            package_name,
            subscription_id,
            token,
        )
    }

    async fn get_product_purchase(
        &self,
        package_name: &str,
        product_id: &str,
        token: &str,
    ) -> Result<RawResponse, IapError> {
        self.respond("purchases.products.get", package_name, product_id, token)
    }
}

impl BlockingGooglePlayDeveloperApiDatasource for MockGooglePlayDeveloperApiDatasource {
    fn get_subscription_purchase(
        &self,
        package_name: &str,
        subscription_id: &str,
        token: &str,
    ) -> Result<RawResponse, IapError> {
        self.respond(
            "purchases.subscriptions.get",
            package_name,
            subscription_id,
            token,
        )
    }

    fn get_product_purchase(
        &self,
        package_name: &str,
        product_id: &str,
        token: &str,
    ) -> Result<RawResponse, IapError> {
        self.respond("purchases.products.get", package_name, product_id, token)
    }
}
