use serde::{de::Error, Deserialize, Deserializer};
use serde_with::DeserializeAs;

/// Reads an integer field of a Developer API response.
///
/// The API serializes int64 values as strings, but numbers (including
/// floats, which are floored) are accepted as well.
pub(crate) struct LenientInt;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInt {
    Int(i64),
    Float(f64),
    Str(String),
}

impl<'de> DeserializeAs<'de, i64> for LenientInt {
    fn deserialize_as<D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawInt::deserialize(deserializer)? {
            RawInt::Int(value) => Ok(value),
            RawInt::Float(value) => floor_to_i64(value).map_err(D::Error::custom),
            RawInt::Str(value) => match value.trim().parse::<i64>() {
                Ok(value) => Ok(value),
                Err(_) => value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| D::Error::custom(format!("invalid integer: {value:?}")))
                    .and_then(|value| floor_to_i64(value).map_err(D::Error::custom)),
            },
        }
    }
}

fn floor_to_i64(value: f64) -> Result<i64, String> {
    if !value.is_finite() {
        return Err(format!("invalid integer: {value}"));
    }
    // Saturates outside the i64 range.
    Ok(value.floor() as i64)
}
