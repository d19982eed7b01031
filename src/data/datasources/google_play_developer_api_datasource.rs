use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, StatusCode};
use yup_oauth2::{
    authenticator::DefaultAuthenticator, parse_service_account_key, read_service_account_key,
    ServiceAccountAuthenticator, ServiceAccountKey,
};

use crate::{
    constants::{GOOGLE_PLAY_DEVELOPER_API_BASE_URL, GOOGLE_PLAY_DEVELOPER_API_SCOPE},
    data::models::google_play_developer_api::error_response_model::ErrorResponseModel,
    domain::entities::{
        raw_response::RawResponse, service_account_credentials::ServiceAccountCredentials,
    },
    errors::IapError,
};

/// Calls to the Google Play Developer API.
///
/// Implementations translate an HTTP 400 response into `IapError::Google`,
/// carrying the vendor's reason. Every other failure is an
/// `IapError::GooglePlayDeveloperApi`.
#[async_trait]
pub trait GooglePlayDeveloperApiDatasource: Send + Sync {
    /// purchases.subscriptions.get:
    /// https://developers.google.com/android-publisher/api-ref/rest/v3/purchases.subscriptions/get
    ///
    /// packageName:
    ///   The package name of the application for which this subscription was
    ///   purchased (for example, 'com.some.thing').
    /// subscriptionId:
    ///   The purchased subscription ID (for example, 'monthly001').
    /// token:
    ///   The token provided to the user's device when the subscription was
    ///   purchased.
    async fn get_subscription_purchase(
        &self,
        package_name: &str,
        subscription_id: &str,
        token: &str,
    ) -> Result<RawResponse, IapError>;

    /// purchases.products.get:
    /// https://developers.google.com/android-publisher/api-ref/rest/v3/purchases.products/get
    ///
    /// packageName:
    ///   The package name of the application the inapp product was sold in (for
    ///   example, 'com.some.thing').
    /// productId:
    ///   The inapp product SKU (for example, 'com.some.thing.inapp1').
    /// token:
    ///   The token provided to the user's device when the inapp product was
    ///   purchased.
    async fn get_product_purchase(
        &self,
        package_name: &str,
        product_id: &str,
        token: &str,
    ) -> Result<RawResponse, IapError>;
}

/// Blocking counterpart of [`GooglePlayDeveloperApiDatasource`].
pub trait BlockingGooglePlayDeveloperApiDatasource: Send + Sync {
    fn get_subscription_purchase(
        &self,
        package_name: &str,
        subscription_id: &str,
        token: &str,
    ) -> Result<RawResponse, IapError>;

    fn get_product_purchase(
        &self,
        package_name: &str,
        product_id: &str,
        token: &str,
    ) -> Result<RawResponse, IapError>;
}

pub struct GooglePlayDeveloperApiDatasourceImpl {
    client: reqwest::Client,
    authenticator: DefaultAuthenticator,
}

#[async_trait]
impl GooglePlayDeveloperApiDatasource for GooglePlayDeveloperApiDatasourceImpl {
    async fn get_subscription_purchase(
        &self,
        package_name: &str,
        subscription_id: &str,
        token: &str,
    ) -> Result<RawResponse, IapError> {
        let url = subscription_purchase_url(package_name, subscription_id, token);
        self.callout(&url, "purchases.subscriptions.get").await
    }

    async fn get_product_purchase(
        &self,
        package_name: &str,
        product_id: &str,
        token: &str,
    ) -> Result<RawResponse, IapError> {
        let url = product_purchase_url(package_name, product_id, token);
        self.callout(&url, "purchases.products.get").await
    }
}

impl GooglePlayDeveloperApiDatasourceImpl {
    /// Authorizes eagerly: the first access token is fetched here, not on
    /// first use. Later calls reuse it until it expires, after which the
    /// authenticator fetches a new one.
    pub async fn new(
        credentials: &ServiceAccountCredentials,
        http_timeout: Duration,
    ) -> Result<Self, IapError> {
        let authenticator = authorize(credentials).await?;
        let client = reqwest::Client::builder()
            .timeout(http_timeout)
            .build()
            .map_err(|e| IapError::configuration(format!("HTTP client could not be built: {e}")))?;
        Ok(Self {
            client,
            authenticator,
        })
    }

    async fn callout(&self, url: &str, function_name: &str) -> Result<RawResponse, IapError> {
        let access_token = access_token(&self.authenticator).await?;
        tracing::debug!(function_name, "calling Google Play Developer API");
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {access_token}"))
            .send()
            .await
            .map_err(|e| IapError::google_api(function_name, format!("callout failed to send: {e}")))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            IapError::google_api(function_name, format!("failed to read callout response: {e}"))
        })?;
        interpret_response(function_name, status, &body)
    }
}

/// Blocking flavor of [`GooglePlayDeveloperApiDatasourceImpl`].
///
/// `yup-oauth2` is async only, so token fetches run on a private
/// current-thread runtime owned by the datasource. Must not be created,
/// used or dropped from within an async runtime.
pub struct BlockingGooglePlayDeveloperApiDatasourceImpl {
    client: reqwest::blocking::Client,
    authenticator: DefaultAuthenticator,
    runtime: tokio::runtime::Runtime,
}

impl BlockingGooglePlayDeveloperApiDatasource for BlockingGooglePlayDeveloperApiDatasourceImpl {
    fn get_subscription_purchase(
        &self,
        package_name: &str,
        subscription_id: &str,
        token: &str,
    ) -> Result<RawResponse, IapError> {
        let url = subscription_purchase_url(package_name, subscription_id, token);
        self.callout(&url, "purchases.subscriptions.get")
    }

    fn get_product_purchase(
        &self,
        package_name: &str,
        product_id: &str,
        token: &str,
    ) -> Result<RawResponse, IapError> {
        let url = product_purchase_url(package_name, product_id, token);
        self.callout(&url, "purchases.products.get")
    }
}

impl BlockingGooglePlayDeveloperApiDatasourceImpl {
    /// Authorizes eagerly, like the async flavor.
    pub fn new(
        credentials: &ServiceAccountCredentials,
        http_timeout: Duration,
    ) -> Result<Self, IapError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| IapError::configuration(format!("token runtime could not be built: {e}")))?;
        let authenticator = runtime.block_on(authorize(credentials))?;
        let client = reqwest::blocking::Client::builder()
            .timeout(http_timeout)
            .build()
            .map_err(|e| IapError::configuration(format!("HTTP client could not be built: {e}")))?;
        Ok(Self {
            client,
            authenticator,
            runtime,
        })
    }

    fn callout(&self, url: &str, function_name: &str) -> Result<RawResponse, IapError> {
        let access_token = self.runtime.block_on(access_token(&self.authenticator))?;
        tracing::debug!(function_name, "calling Google Play Developer API");
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {access_token}"))
            .send()
            .map_err(|e| IapError::google_api(function_name, format!("callout failed to send: {e}")))?;
        let status = response.status();
        let body = response.text().map_err(|e| {
            IapError::google_api(function_name, format!("failed to read callout response: {e}"))
        })?;
        interpret_response(function_name, status, &body)
    }
}

fn subscription_purchase_url(package_name: &str, subscription_id: &str, token: &str) -> String {
    format!("{GOOGLE_PLAY_DEVELOPER_API_BASE_URL}/{package_name}/purchases/subscriptions/{subscription_id}/tokens/{token}")
}

fn product_purchase_url(package_name: &str, product_id: &str, token: &str) -> String {
    format!("{GOOGLE_PLAY_DEVELOPER_API_BASE_URL}/{package_name}/purchases/products/{product_id}/tokens/{token}")
}

/// Resolves the credentials, builds the authenticator and fetches the first
/// token, so bad credentials fail at construction.
async fn authorize(credentials: &ServiceAccountCredentials) -> Result<DefaultAuthenticator, IapError> {
    let key = resolve_service_account_key(credentials).await?;
    let authenticator = ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .map_err(|e| {
            IapError::Authorization(format!(
                "service account authenticator could not be built: {e}"
            ))
        })?;
    access_token(&authenticator).await?;
    Ok(authenticator)
}

pub(crate) async fn resolve_service_account_key(
    credentials: &ServiceAccountCredentials,
) -> Result<ServiceAccountKey, IapError> {
    match credentials {
        ServiceAccountCredentials::Path(path) => {
            if !path.is_file() {
                return Err(IapError::configuration(format!(
                    "service account key file {} does not exist",
                    path.display()
                )));
            }
            read_service_account_key(path).await.map_err(|e| {
                IapError::configuration(format!(
                    "service account key file {} could not be parsed: {e}",
                    path.display()
                ))
            })
        }
        ServiceAccountCredentials::Json(value) if value.is_object() => {
            parse_service_account_key(value.to_string()).map_err(|e| {
                IapError::configuration(format!("service account key could not be parsed: {e}"))
            })
        }
        ServiceAccountCredentials::Json(_) => Err(IapError::configuration(
            "service account credentials must be a key file path or a JSON object",
        )),
    }
}

/// The authenticator caches the token and only goes back to Google once it
/// is about to expire.
async fn access_token(authenticator: &DefaultAuthenticator) -> Result<String, IapError> {
    let scopes = &[GOOGLE_PLAY_DEVELOPER_API_SCOPE];
    Ok(authenticator
        .token(scopes)
        .await
        .map_err(|e| {
            IapError::Authorization(format!("service account token could not be built: {e}"))
        })?
        .token()
        .ok_or(IapError::Authorization(
            "service account token is empty".to_string(),
        ))?
        .to_string())
}

/// Turns a Developer API response into the purchase resource, or into the
/// error the status calls for.
pub(crate) fn interpret_response(
    function_name: &str,
    status: StatusCode,
    body: &str,
) -> Result<RawResponse, IapError> {
    if status == StatusCode::BAD_REQUEST {
        tracing::info!(function_name, "Google Play rejected the request: {body}");
        return Err(bad_request_error(status, body));
    }
    if !status.is_success() {
        return Err(IapError::google_api(
            function_name,
            format!("callout returned with {status} status code: {body}"),
        ));
    }
    serde_json::from_str::<RawResponse>(body).map_err(|e| {
        IapError::google_api(function_name, format!("failed to parse callout response: {e}"))
    })
}

/// The vendor's reason becomes the message; the error body, when it is a JSON
/// object, becomes the raw response.
pub(crate) fn bad_request_error(status: StatusCode, body: &str) -> IapError {
    let raw_response = serde_json::from_str::<RawResponse>(body).ok();
    let reason = serde_json::from_str::<ErrorResponseModel>(body)
        .ok()
        .and_then(|m| m.reason())
        .or_else(|| status.canonical_reason().map(str::to_string));
    IapError::Google {
        message: reason,
        raw_response,
    }
}
