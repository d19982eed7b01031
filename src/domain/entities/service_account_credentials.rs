use std::path::PathBuf;

use serde::Deserialize;

/// Source of the Google service account key used to authorize calls to the
/// Google Play Developer API.
///
/// When deserialized, a string is read as a path to the key file and an
/// object as the key itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ServiceAccountCredentials {
    /// Path to the JSON key file downloaded from the Google Cloud console.
    Path(PathBuf),
    /// Contents of the JSON key file, already parsed.
    Json(serde_json::Value),
}

impl From<PathBuf> for ServiceAccountCredentials {
    fn from(path: PathBuf) -> Self {
        ServiceAccountCredentials::Path(path)
    }
}

impl From<&str> for ServiceAccountCredentials {
    fn from(path: &str) -> Self {
        ServiceAccountCredentials::Path(PathBuf::from(path))
    }
}

impl From<serde_json::Value> for ServiceAccountCredentials {
    fn from(key: serde_json::Value) -> Self {
        ServiceAccountCredentials::Json(key)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_string_as_path() {
        let c: ServiceAccountCredentials = serde_json::from_value(json!("/etc/key.json")).unwrap();
        assert!(matches!(c, ServiceAccountCredentials::Path(p) if p == PathBuf::from("/etc/key.json")));
    }

    #[test]
    fn test_deserialize_object_as_inline_key() {
        let c: ServiceAccountCredentials =
            serde_json::from_value(json!({"type": "service_account"})).unwrap();
        assert!(matches!(c, ServiceAccountCredentials::Json(v) if v["type"] == "service_account"));
    }
}
