use std::fmt;

use thiserror::Error;

use crate::domain::entities::raw_response::RawResponse;

/// Errors returned by every validator in this crate.
///
/// `Validation` and `Google` carry the (optional) human-readable reason and the
/// (optional) raw vendor response, so callers can inspect exactly what the
/// vendor returned. `Google` is only ever produced by the Google Play
/// verifier, which lets callers tell the vendor origin apart.
#[derive(Debug, Error)]
pub enum IapError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("ValidationError {} {}", OrNone(.message), OrNone(.raw_response))]
    Validation {
        message: Option<String>,
        raw_response: Option<RawResponse>,
    },

    #[error("GoogleError {} {}", OrNone(.message), OrNone(.raw_response))]
    Google {
        message: Option<String>,
        raw_response: Option<RawResponse>,
    },

    #[error("Google Play API authorization failed: {0}")]
    Authorization(String),

    #[error("Error calling out to Google Play Developer API ({function_name}): {details}")]
    GooglePlayDeveloperApi {
        function_name: String,
        details: String,
    },
}

impl IapError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        IapError::Validation {
            message: Some(message.into()),
            raw_response: None,
        }
    }

    pub(crate) fn validation_with_response(
        message: impl Into<String>,
        raw_response: RawResponse,
    ) -> Self {
        IapError::Validation {
            message: Some(message.into()),
            raw_response: Some(raw_response),
        }
    }

    pub(crate) fn google(message: impl Into<String>, raw_response: RawResponse) -> Self {
        IapError::Google {
            message: Some(message.into()),
            raw_response: Some(raw_response),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        IapError::Configuration(message.into())
    }

    pub(crate) fn google_api(function_name: &str, details: impl fmt::Display) -> Self {
        IapError::GooglePlayDeveloperApi {
            function_name: function_name.to_string(),
            details: details.to_string(),
        }
    }

    /// Reason attached to a validation failure, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            IapError::Validation { message, .. } | IapError::Google { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// The vendor response that caused the failure, if one was received.
    pub fn raw_response(&self) -> Option<&RawResponse> {
        match self {
            IapError::Validation { raw_response, .. } | IapError::Google { raw_response, .. } => {
                raw_response.as_ref()
            }
            _ => None,
        }
    }

    pub fn is_google(&self) -> bool {
        matches!(self, IapError::Google { .. })
    }
}

struct OrNone<'a, T>(&'a Option<T>);

impl fmt::Display for OrNone<'_, String> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(s) => f.write_str(s),
            None => f.write_str("None"),
        }
    }
}

impl fmt::Display for OrNone<'_, RawResponse> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(raw) => match serde_json::to_string(raw) {
                Ok(s) => f.write_str(&s),
                Err(_) => f.write_str("<unprintable>"),
            },
            None => f.write_str("None"),
        }
    }
}
