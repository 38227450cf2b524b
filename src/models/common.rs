//! Common types shared across the helpdesk API models.
//!
//! This module defines the polymorphic condition/action value, the
//! condition and action records used by business rules, and the
//! [`ApiResource`] trait that ties each wire record to its endpoint.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, DeserializeOwned, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A wire record the API client knows how to address.
///
/// Each record lives under `/api/v2/{COLLECTION}` and travels wrapped in a
/// single-key JSON envelope (`{"trigger": {...}}`).
pub trait ApiResource: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Identity assigned by the API.
    type Id: FromStr + fmt::Display + Clone + Send + Sync;

    /// Collection path below `/api/v2/`.
    const COLLECTION: &'static str;

    /// Envelope key for a single record.
    const ENVELOPE: &'static str;
}

/// The value carried by a condition or action.
///
/// The API sends either a single string or a positional list of strings.
/// Nothing in the payload says which; the owning field name decides how
/// the slots are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedValue {
    /// A single unstructured value.
    Scalar(String),
    /// Positional sub-values.
    List(Vec<String>),
}

impl ParsedValue {
    /// Creates a scalar value.
    pub fn scalar(value: impl Into<String>) -> Self {
        ParsedValue::Scalar(value.into())
    }

    /// Creates a list value.
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParsedValue::List(values.into_iter().map(Into::into).collect())
    }

    /// Returns the scalar value, if this is one.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            ParsedValue::Scalar(s) => Some(s),
            ParsedValue::List(_) => None,
        }
    }

    /// Returns the list slots, if this is a list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ParsedValue::Scalar(_) => None,
            ParsedValue::List(items) => Some(items),
        }
    }

    /// Returns true for an empty scalar or an empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            ParsedValue::Scalar(s) => s.is_empty(),
            ParsedValue::List(items) => items.is_empty(),
        }
    }
}

impl Default for ParsedValue {
    fn default() -> Self {
        ParsedValue::Scalar(String::new())
    }
}

impl Serialize for ParsedValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ParsedValue::Scalar(s) => serializer.serialize_str(s),
            ParsedValue::List(items) => items.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ParsedValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ParsedValueVisitor;

        impl<'de> Visitor<'de> for ParsedValueVisitor {
            type Value = ParsedValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string, number, boolean, null, or a list of those")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(StringLike(item)) = seq.next_element::<StringLike>()? {
                    items.push(item);
                }
                Ok(ParsedValue::List(items))
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ParsedValue::default())
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ParsedValue::default())
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_any(self)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ParsedValue::Scalar(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ParsedValue::Scalar(value))
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ParsedValue::Scalar(value.to_string()))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ParsedValue::Scalar(value.to_string()))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ParsedValue::Scalar(value.to_string()))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ParsedValue::Scalar(value.to_string()))
            }
        }

        deserializer.deserialize_any(ParsedValueVisitor)
    }
}

/// A string that may arrive as a JSON string, number, boolean, or null.
///
/// Null becomes the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StringLike(pub String);

impl<'de> Deserialize<'de> for StringLike {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringLikeVisitor;

        impl<'de> Visitor<'de> for StringLikeVisitor {
            type Value = StringLike;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string, number, boolean, or null")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(StringLike::default())
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(StringLike::default())
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_any(self)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(StringLike(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(StringLike(value))
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(StringLike(value.to_string()))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(StringLike(value.to_string()))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(StringLike(value.to_string()))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(StringLike(value.to_string()))
            }
        }

        deserializer.deserialize_any(StringLikeVisitor)
    }
}

/// Deserializes a field that can be a string, number, or boolean into a `String`.
pub(crate) fn deserialize_string_like<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringLike::deserialize(deserializer).map(|s| s.0)
}

/// A single business-rule condition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Condition {
    /// Wire field name (`status`, `custom_fields_123`, ...).
    pub field: String,

    /// Comparison operator (`is`, `less_than`, ...).
    #[serde(default)]
    pub operator: String,

    /// The compared value.
    #[serde(default)]
    pub value: ParsedValue,
}

/// The `all`/`any` condition groups of a business rule.
///
/// `any` is always sent, even when empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Conditions {
    /// Conjunction: every condition must hold.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all: Vec<Condition>,

    /// Disjunction: at least one condition must hold.
    #[serde(default)]
    pub any: Vec<Condition>,
}

/// A single business-rule action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Action {
    /// Wire field name (`status`, `notification_user`, `custom_fields_123`, ...).
    pub field: String,

    /// The action value; its slot layout depends on `field`.
    #[serde(default)]
    pub value: ParsedValue,
}

/// An option of a dropdown or multiselect custom field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomFieldOption {
    /// Option id, assigned by the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Display name.
    pub name: String,

    /// Tag value.
    pub value: String,

    /// Whether this is the preselected option.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
}
