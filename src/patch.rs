use serde::{Deserialize, Deserializer};

use crate::error::ApiError;

/// A field of a partial-update body.
///
/// Deserialize with `#[serde(default)]`: a missing key stays [`Patch::Absent`],
/// an explicit `null` becomes [`Patch::Null`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

impl<T> Patch<T> {
    /// For fields that can be changed but never cleared.
    pub fn required(self, field: &str) -> Result<Option<T>, ApiError> {
        match self {
            Patch::Absent => Ok(None),
            Patch::Null => Err(ApiError::validation(format!("{field} cannot be null"))),
            Patch::Value(v) => Ok(Some(v)),
        }
    }
}

impl Patch<String> {
    /// Like [`Patch::required`], also rejecting blank strings.
    pub fn required_text(self, field: &str) -> Result<Option<String>, ApiError> {
        match self.required(field)? {
            Some(v) if v.trim().is_empty() => {
                Err(ApiError::validation(format!("{field} cannot be empty")))
            }
            other => Ok(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default)]
        title: Patch<String>,
    }

    fn parse(json: &str) -> Patch<String> {
        serde_json::from_str::<Body>(json).unwrap().title
    }

    #[test]
    fn distinguishes_missing_null_and_value() {
        assert_eq!(parse("{}"), Patch::Absent);
        assert_eq!(parse(r#"{"title": null}"#), Patch::Null);
        assert_eq!(parse(r#"{"title": "a"}"#), Patch::Value("a".to_string()));
    }

    #[test]
    fn required_rejects_null_only() {
        assert_eq!(Patch::<String>::Absent.required("title").unwrap(), None);
        assert!(Patch::<String>::Null.required("title").is_err());
        assert_eq!(
            Patch::Value("x".to_string()).required("title").unwrap(),
            Some("x".to_string())
        );
    }

    #[test]
    fn required_text_rejects_blank() {
        let err = Patch::Value("   ".to_string())
            .required_text("title")
            .unwrap_err();
        assert_eq!(err.to_string(), "title cannot be empty");
    }
}
