use serde::Deserialize;

/// Error body returned by Google APIs on a failed call.
///
/// https://cloud.google.com/apis/design/errors#http_mapping
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponseModel {
    pub(crate) error: ErrorStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorStatus {
    #[serde(default)]
    pub(crate) message: Option<String>,
    #[serde(default)]
    pub(crate) errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub(crate) reason: Option<String>,
}

impl ErrorResponseModel {
    /// Most specific human-readable reason available.
    pub(crate) fn reason(&self) -> Option<String> {
        self.error.message.clone().or_else(|| {
            self.error
                .errors
                .iter()
                .find_map(|detail| detail.reason.clone())
        })
    }
}
