/// Vendor response exactly as it was received, kept around for callers that
/// need fields this crate does not interpret.
pub type RawResponse = serde_json::Map<String, serde_json::Value>;
