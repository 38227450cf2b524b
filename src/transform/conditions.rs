//! Condition conversion between configuration and the API.
//!
//! On the way out, the value shape follows the configuration: a known
//! `values` list becomes a list value, anything else the scalar `value`.
//! On the way back, the shape of the API value decides which of the two
//! attributes is populated.

use serde::{Deserialize, Serialize};

use super::field_ref::{FieldRef, RefScope};
use crate::framework::{AttributePath, Diagnostic, Diagnostics, Value};
use crate::models::{Condition, Conditions, ParsedValue};

/// Configuration form of a single condition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConditionModel {
    /// Logical field name (`status`, `custom_field`, `ticket_field`, ...).
    #[serde(default)]
    pub field: Value<String>,

    /// Id of the referenced custom field.
    #[serde(default)]
    pub custom_field_id: Value<i64>,

    /// Comparison operator.
    #[serde(default)]
    pub operator: Value<String>,

    /// Single compared value.
    #[serde(default)]
    pub value: Value<String>,

    /// Compared values, for list-valued conditions.
    #[serde(default)]
    pub values: Value<Vec<String>>,
}

/// Configuration form of the `all`/`any` condition groups.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConditionsModel {
    /// Conditions that must all hold.
    #[serde(default)]
    pub all: Value<Vec<ConditionModel>>,

    /// Conditions of which at least one must hold.
    #[serde(default)]
    pub any: Value<Vec<ConditionModel>>,
}

/// Converts one condition for the API.
///
/// An empty field name is reported against `batch_path`, the attribute
/// holding the whole condition list.
pub fn condition_to_api(
    model: &ConditionModel,
    path: &AttributePath,
    batch_path: &AttributePath,
) -> Result<Condition, Diagnostic> {
    let name = model
        .field
        .resolve(&path.attr("field"))?
        .map(String::as_str)
        .unwrap_or_default();
    if name.is_empty() {
        return Err(Diagnostic::attribute_error(
            batch_path.clone(),
            "Invalid condition",
            format!("{path}: field must not be empty"),
        ));
    }

    let custom_field_id = model
        .custom_field_id
        .resolve_cloned(&path.attr("custom_field_id"))?;
    let field = FieldRef::from_config(name, custom_field_id, RefScope::Condition).map_err(|e| {
        Diagnostic::attribute_error(
            path.attr("custom_field_id"),
            "Invalid condition",
            e.to_string(),
        )
    })?;

    let value = match model.values.resolve(&path.attr("values"))? {
        Some(values) => ParsedValue::List(values.clone()),
        None => ParsedValue::Scalar(
            model
                .value
                .resolve_cloned(&path.attr("value"))?
                .unwrap_or_default(),
        ),
    };

    let operator = model
        .operator
        .resolve_cloned(&path.attr("operator"))?
        .unwrap_or_default();

    Ok(Condition {
        field: field.to_wire(),
        operator,
        value,
    })
}

/// Converts an API condition back to its configuration form.
pub fn condition_from_api(
    condition: Condition,
    path: &AttributePath,
) -> Result<ConditionModel, Diagnostic> {
    let field = FieldRef::from_wire(&condition.field, RefScope::Condition).map_err(|e| {
        Diagnostic::attribute_error(path.attr("field"), "Unreadable condition", e.to_string())
    })?;

    let (value, values) = match condition.value {
        ParsedValue::Scalar(s) => (Value::Known(s), Value::Null),
        ParsedValue::List(items) => (Value::Null, Value::Known(items)),
    };

    Ok(ConditionModel {
        field: Value::Known(field.logical_name().to_string()),
        custom_field_id: Value::from_option(field.custom_field_id()),
        operator: Value::Known(condition.operator),
        value,
        values,
    })
}

/// Converts a condition list for the API. The first invalid entry aborts
/// the whole list.
pub fn condition_list_to_api(
    list: &Value<Vec<ConditionModel>>,
    path: &AttributePath,
    batch_path: &AttributePath,
) -> Result<Vec<Condition>, Diagnostic> {
    let Some(models) = list.resolve(path)? else {
        return Ok(Vec::new());
    };
    models
        .iter()
        .enumerate()
        .map(|(i, model)| condition_to_api(model, &path.index(i), batch_path))
        .collect()
}

/// Converts an API condition list, treating an empty list as absent.
pub fn condition_list_from_api(
    list: Vec<Condition>,
    path: &AttributePath,
) -> Result<Value<Vec<ConditionModel>>, Diagnostic> {
    let models = list
        .into_iter()
        .enumerate()
        .map(|(i, condition)| condition_from_api(condition, &path.index(i)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::from_non_empty(models))
}

/// Converts both condition groups for the API.
///
/// An absent `any` group is still sent as an empty list.
pub fn conditions_to_api(
    model: &ConditionsModel,
    path: &AttributePath,
    diags: &mut Diagnostics,
) -> Option<Conditions> {
    let all = diags.capture(condition_list_to_api(&model.all, &path.attr("all"), path))?;
    let any = diags.capture(condition_list_to_api(&model.any, &path.attr("any"), path))?;
    Some(Conditions { all, any })
}

/// Converts both condition groups back to configuration. Empty groups
/// become `Null`.
pub fn conditions_from_api(
    conditions: Conditions,
    path: &AttributePath,
    diags: &mut Diagnostics,
) -> Option<ConditionsModel> {
    let all = diags.capture(condition_list_from_api(conditions.all, &path.attr("all")))?;
    let any = diags.capture(condition_list_from_api(conditions.any, &path.attr("any")))?;
    Some(ConditionsModel { all, any })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn path() -> AttributePath {
        AttributePath::root("conditions")
    }

    fn status_is_open() -> ConditionModel {
        ConditionModel {
            field: "status".into(),
            operator: "is".into(),
            value: "open".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_scalar_condition_round_trip() {
        let model = status_is_open();
        let api = condition_to_api(&model, &path().index(0), &path()).unwrap();
        assert_eq!(
            api,
            Condition {
                field: "status".to_string(),
                operator: "is".to_string(),
                value: ParsedValue::scalar("open"),
            }
        );

        let decoded = condition_from_api(api.clone(), &path().index(0)).unwrap();
        assert_eq!(decoded, model);

        let reencoded = condition_to_api(&decoded, &path().index(0), &path()).unwrap();
        assert_eq!(reencoded, api);
    }

    #[test]
    fn test_list_condition_round_trip() {
        let model = ConditionModel {
            field: "current_tags".into(),
            operator: "includes".into(),
            values: Value::Known(vec!["vip".to_string(), "urgent".to_string()]),
            ..Default::default()
        };
        let api = condition_to_api(&model, &path().index(0), &path()).unwrap();
        assert_eq!(api.value, ParsedValue::list(["vip", "urgent"]));

        let decoded = condition_from_api(api, &path().index(0)).unwrap();
        assert_eq!(decoded.value, Value::Null);
        assert_eq!(decoded, model);
    }

    #[test]
    fn test_known_values_win_over_value() {
        let model = ConditionModel {
            value: "ignored".into(),
            values: Value::Known(vec!["a".to_string()]),
            ..status_is_open()
        };
        let api = condition_to_api(&model, &path().index(0), &path()).unwrap();
        assert_eq!(api.value, ParsedValue::list(["a"]));
    }

    #[test]
    fn test_custom_field_condition() {
        let model = ConditionModel {
            field: "ticket_field".into(),
            custom_field_id: Value::Known(77),
            operator: "is".into(),
            value: "yes".into(),
            ..Default::default()
        };
        let api = condition_to_api(&model, &path().index(0), &path()).unwrap();
        assert_eq!(api.field, "ticket_fields_77");

        let decoded = condition_from_api(api, &path().index(0)).unwrap();
        assert_eq!(decoded, model);
    }

    #[test]
    fn test_empty_field_aborts_batch() {
        let model = ConditionsModel {
            all: Value::Known(vec![
                status_is_open(),
                ConditionModel {
                    field: "".into(),
                    ..status_is_open()
                },
                status_is_open(),
            ]),
            any: Value::Null,
        };
        let mut diags = Diagnostics::new();
        let result = conditions_to_api(&model, &path(), &mut diags);
        assert!(result.is_none());
        assert_eq!(diags.len(), 1);
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.path, Some(path()));
    }

    #[test]
    fn test_unknown_value_fails_fast() {
        let model = ConditionModel {
            value: Value::Unknown,
            ..status_is_open()
        };
        let err = condition_to_api(&model, &path().index(0), &path()).unwrap_err();
        assert_eq!(err.path, Some(path().index(0).attr("value")));
    }

    #[test]
    fn test_empty_groups_normalization() {
        let mut diags = Diagnostics::new();
        let decoded = conditions_from_api(Conditions::default(), &path(), &mut diags).unwrap();
        assert_eq!(decoded.all, Value::Null);
        assert_eq!(decoded.any, Value::Null);

        let encoded = conditions_to_api(&ConditionsModel::default(), &path(), &mut diags).unwrap();
        assert_eq!(encoded.any, Vec::<Condition>::new());
        let json = serde_json::to_value(&encoded).unwrap();
        assert_eq!(json["any"], serde_json::json!([]));
        assert!(!diags.has_error());
    }

    #[test]
    fn test_malformed_custom_field_from_api_is_error() {
        let condition = Condition {
            field: "custom_fields_x1".to_string(),
            operator: "is".to_string(),
            value: ParsedValue::scalar("1"),
        };
        let err = condition_from_api(condition, &path().index(0)).unwrap_err();
        assert!(err.is_error());
    }

    fn field_strategy() -> impl Strategy<Value = (String, Option<i64>)> {
        prop_oneof![
            prop::sample::select(vec!["status", "priority", "current_tags", "group_id"])
                .prop_map(|name| (name.to_string(), None::<i64>)),
            (prop_oneof![Just("custom_field"), Just("ticket_field")], 0..=i64::MAX)
                .prop_map(|(name, id)| (name.to_string(), Some(id))),
        ]
    }

    fn condition_strategy() -> impl Strategy<Value = ConditionModel> {
        let scalar = "[a-z0-9 ]{0,12}".prop_map(|v| (Value::Known(v), Value::<Vec<String>>::Null));
        let list = prop::collection::vec("[a-z0-9]{1,8}", 0..4)
            .prop_map(|vs| (Value::<String>::Null, Value::Known(vs)));
        (field_strategy(), "[a-z_]{1,16}", prop_oneof![scalar, list]).prop_map(
            |((field, id), operator, (value, values))| ConditionModel {
                field: Value::Known(field),
                custom_field_id: Value::from_option(id),
                operator: Value::Known(operator),
                value,
                values,
            },
        )
    }

    proptest! {
        #[test]
        fn test_condition_round_trips(model in condition_strategy()) {
            let api = condition_to_api(&model, &path().index(0), &path()).unwrap();
            let decoded = condition_from_api(api.clone(), &path().index(0)).unwrap();
            prop_assert_eq!(&decoded, &model);

            let reencoded = condition_to_api(&decoded, &path().index(0), &path()).unwrap();
            prop_assert_eq!(reencoded, api);
        }
    }
}
