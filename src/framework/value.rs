//! Tri-state attribute values.
//!
//! Every attribute held by the configuration engine is either a concrete
//! value, an explicit null, or a value that is not known until apply time.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{AttributePath, Diagnostic};

/// Marker the engine uses for values that are not yet known.
pub const UNKNOWN_SENTINEL: &str = "74D93920-ED26-11E3-AC10-0800200C9A66";

/// A configuration attribute in one of three states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<T> {
    /// A concrete value.
    Known(T),
    /// Explicitly absent.
    Null,
    /// Not known until the surrounding plan is applied.
    Unknown,
}

impl<T> Value<T> {
    /// Builds a value from an API field. Never yields `Unknown`.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Value::Known(v),
            None => Value::Null,
        }
    }

    /// Returns true if the value is `Known`.
    pub fn is_known(&self) -> bool {
        matches!(self, Value::Known(_))
    }

    /// Returns true if the value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if the value is `Unknown`.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    /// Returns the inner value if known.
    pub fn as_known(&self) -> Option<&T> {
        match self {
            Value::Known(v) => Some(v),
            _ => None,
        }
    }

    /// Consumes the value, returning the inner value if known.
    pub fn into_known(self) -> Option<T> {
        match self {
            Value::Known(v) => Some(v),
            _ => None,
        }
    }

    /// Narrows the value for an API call.
    ///
    /// `Unknown` cannot be sent to the API and is reported as an error
    /// attached to `path`.
    pub fn resolve(&self, path: &AttributePath) -> Result<Option<&T>, Diagnostic> {
        match self {
            Value::Known(v) => Ok(Some(v)),
            Value::Null => Ok(None),
            Value::Unknown => Err(Diagnostic::attribute_error(
                path.clone(),
                "Value not yet known",
                format!("{path} must be known before it can be sent to the API"),
            )),
        }
    }

    /// Like [`Value::resolve`], but a `Null` is also an error.
    pub fn require(&self, path: &AttributePath) -> Result<&T, Diagnostic> {
        self.resolve(path)?.ok_or_else(|| {
            Diagnostic::attribute_error(
                path.clone(),
                "Missing required attribute",
                format!("{path} is required"),
            )
        })
    }

    /// Maps the known value, preserving `Null` and `Unknown`.
    pub fn map<U, F>(self, f: F) -> Value<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Value::Known(v) => Value::Known(f(v)),
            Value::Null => Value::Null,
            Value::Unknown => Value::Unknown,
        }
    }
}

impl<T: Clone> Value<T> {
    /// Clones the resolved value out for an API record.
    pub fn resolve_cloned(&self, path: &AttributePath) -> Result<Option<T>, Diagnostic> {
        self.resolve(path).map(|v| v.cloned())
    }
}

impl<T> Value<Vec<T>> {
    /// Builds a list value from an API list, treating an empty list as `Null`.
    pub fn from_non_empty(list: Vec<T>) -> Self {
        if list.is_empty() {
            Value::Null
        } else {
            Value::Known(list)
        }
    }
}

impl<T> Default for Value<T> {
    fn default() -> Self {
        Value::Null
    }
}

impl<T> From<T> for Value<T> {
    fn from(value: T) -> Self {
        Value::Known(value)
    }
}

impl From<&str> for Value<String> {
    fn from(value: &str) -> Self {
        Value::Known(value.to_string())
    }
}

impl<T: Serialize> Serialize for Value<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Known(v) => v.serialize(serializer),
            Value::Null => serializer.serialize_none(),
            Value::Unknown => serializer.serialize_str(UNKNOWN_SENTINEL),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Value<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        match raw {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::String(ref s) if s == UNKNOWN_SENTINEL => Ok(Value::Unknown),
            other => T::deserialize(other)
                .map(Value::Known)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        #[serde(default)]
        name: Value<String>,
        #[serde(default)]
        count: Value<i64>,
    }

    #[test]
    fn test_missing_attribute_is_null() {
        let sample: Sample = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
        assert_eq!(sample.name, Value::Known("x".to_string()));
        assert_eq!(sample.count, Value::Null);
    }

    #[test]
    fn test_unknown_sentinel_decodes_for_any_type() {
        let json = format!(r#"{{"name": "{0}", "count": "{0}"}}"#, UNKNOWN_SENTINEL);
        let sample: Sample = serde_json::from_str(&json).unwrap();
        assert!(sample.name.is_unknown());
        assert!(sample.count.is_unknown());
    }

    #[test]
    fn test_serialize_states() {
        let sample = Sample {
            name: Value::Unknown,
            count: Value::Null,
        };
        let json = serde_json::to_value(&sample).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": UNKNOWN_SENTINEL, "count": null})
        );
    }

    #[test]
    fn test_resolve_unknown_is_error() {
        let path = AttributePath::root("title");
        let value: Value<String> = Value::Unknown;
        let diag = value.resolve(&path).unwrap_err();
        assert_eq!(diag.path, Some(path));
    }

    #[test]
    fn test_require_null_is_error() {
        let path = AttributePath::root("title");
        let value: Value<String> = Value::Null;
        assert!(value.require(&path).is_err());
        assert_eq!(
            Value::Known("t".to_string()).require(&path).unwrap(),
            "t"
        );
    }

    #[test]
    fn test_from_option_never_unknown() {
        assert_eq!(Value::from_option(Some(3)), Value::Known(3));
        assert_eq!(Value::<i64>::from_option(None), Value::Null);
    }
}
