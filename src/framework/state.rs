//! Plan and state documents exchanged with the configuration engine.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Diagnostic;

/// An untyped plan or state document.
///
/// The engine owns persistence; this type only converts between the raw
/// document and the typed resource models.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DynamicValue(serde_json::Value);

impl DynamicValue {
    /// Wraps a raw document.
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// An empty (null) document.
    pub fn null() -> Self {
        Self(serde_json::Value::Null)
    }

    /// Returns true if no document has been written.
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// Typed read of the document into a resource model.
    pub fn get<M: DeserializeOwned>(&self) -> Result<M, Diagnostic> {
        serde_json::from_value(self.0.clone()).map_err(|e| {
            Diagnostic::error(
                "Unable to read resource data",
                format!("the document does not match the resource schema: {e}"),
            )
        })
    }

    /// Typed write of a resource model into the document.
    pub fn set<M: Serialize>(&mut self, model: &M) -> Result<(), Diagnostic> {
        self.0 = serde_json::to_value(model).map_err(|e| {
            Diagnostic::error(
                "Unable to write resource data",
                format!("the resource model could not be serialized: {e}"),
            )
        })?;
        Ok(())
    }

    /// Borrows the raw document.
    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }

    /// Consumes the wrapper, returning the raw document.
    pub fn into_json(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for DynamicValue {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::Value;
    use serde::Deserialize;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Model {
        #[serde(default)]
        id: Value<i64>,
        #[serde(default)]
        name: Value<String>,
    }

    #[test]
    fn test_get_and_set() {
        let mut doc = DynamicValue::new(serde_json::json!({"id": 7, "name": "Tier 1"}));
        let mut model: Model = doc.get().unwrap();
        assert_eq!(model.id, Value::Known(7));

        model.name = Value::Null;
        doc.set(&model).unwrap();
        assert_eq!(doc.as_json(), &serde_json::json!({"id": 7, "name": null}));
    }

    #[test]
    fn test_get_type_mismatch_is_diagnostic() {
        let doc = DynamicValue::new(serde_json::json!({"id": "not a number"}));
        let err = doc.get::<Model>().unwrap_err();
        assert!(err.is_error());
    }
}
