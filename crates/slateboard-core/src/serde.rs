//! Lenient deserializers for query-string parameters.
//!
//! Browsers and HTTP clients routinely send `?page=` with an empty value;
//! this helper treats empty strings as absent instead of failing the
//! whole request.

use serde::{Deserialize, Deserializer};

pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "deserialize_optional_i64")]
        page: Option<i64>,
    }

    #[test]
    fn test_empty_string_becomes_none() {
        let p: Params = serde_json::from_str(r#"{"page":""}"#).unwrap();
        assert!(p.page.is_none());
    }

    #[test]
    fn test_value_parses() {
        let p: Params = serde_json::from_str(r#"{"page":"7"}"#).unwrap();
        assert_eq!(p.page, Some(7));
    }

    #[test]
    fn test_missing_field_is_none() {
        let p: Params = serde_json::from_str(r#"{}"#).unwrap();
        assert!(p.page.is_none());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(serde_json::from_str::<Params>(r#"{"page":"seven"}"#).is_err());
    }
}
