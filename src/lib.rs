pub mod data {
    pub mod datasources {
        pub mod app_store_verify_receipt_datasource;
        pub mod google_play_developer_api_datasource;
    }
    pub mod models {
        pub mod app_store_verify_receipt {
            pub mod request_body_model;
        }
        pub(crate) mod google_play_billing {
            pub(crate) mod purchase_data_model;
        }
        pub(crate) mod google_play_developer_api {
            pub(crate) mod error_response_model;
            pub(crate) mod lenient_int_model;
            pub(crate) mod product_purchase_model;
            pub(crate) mod subscription_purchase_model;
        }
    }
    pub(crate) mod signature;
}

pub mod domain {
    pub mod entities {
        pub mod google_verification_result;
        pub mod raw_response;
        pub mod receipt_status;
        pub mod service_account_credentials;
    }
}

pub(crate) mod validators {
    pub(crate) mod app_store_validator;
    pub(crate) mod blocking_app_store_validator;
    pub(crate) mod blocking_google_play_verifier;
    pub(crate) mod google_play_validator;
    pub(crate) mod google_play_verifier;
}

pub mod config;
pub(crate) mod constants;
pub mod errors;

#[cfg(test)]
pub(crate) mod test_utils;

/// Blocking flavors of the network validators.
pub mod blocking {
    pub use crate::validators::{
        blocking_app_store_validator::AppStoreValidator,
        blocking_google_play_verifier::GooglePlayVerifier,
    };
}

pub use config::{AppStoreValidatorConfig, GooglePlayValidatorConfig, GooglePlayVerifierConfig};
pub use domain::entities::{
    google_verification_result::GoogleVerificationResult, raw_response::RawResponse,
    receipt_status::ReceiptStatus, service_account_credentials::ServiceAccountCredentials,
};
pub use errors::IapError;
pub use validators::{
    app_store_validator::AppStoreValidator, google_play_validator::GooglePlayValidator,
    google_play_verifier::GooglePlayVerifier,
};
