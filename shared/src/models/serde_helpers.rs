//! Serde helpers for payload fields with non-default null handling

use serde::{Deserialize, Deserializer};

/// Deserialize a field that must distinguish "absent" from explicit
/// `null`: pair with `#[serde(default)]` so a missing field stays `None`
/// while a present field (null or value) becomes `Some(..)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        parent_id: Option<Option<i64>>,
    }

    #[test]
    fn test_absent_field_is_none() {
        let patch: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch.parent_id, None);
    }

    #[test]
    fn test_explicit_null_is_some_none() {
        let patch: Patch = serde_json::from_str(r#"{"parent_id":null}"#).unwrap();
        assert_eq!(patch.parent_id, Some(None));
    }

    #[test]
    fn test_value_is_some_some() {
        let patch: Patch = serde_json::from_str(r#"{"parent_id":7}"#).unwrap();
        assert_eq!(patch.parent_id, Some(Some(7)));
    }
}
