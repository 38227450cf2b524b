//! Conditional ticket-form field conversion.
//!
//! Configuration nests the rules as `parent field id -> parent value ->
//! child fields`. The API keeps one flat list entry per parent/value pair.
//! Decoding regroups that list; order inside a group is kept, order across
//! groups follows the sorted keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::framework::{AttributePath, Diagnostic, Diagnostics, Value};
use crate::models::{ChildField, ConditionalTicketField, RequiredOnStatuses, StatusRequirement};

/// Rules keyed by parent field id, then by parent value.
pub type FormConditionsModel = BTreeMap<String, BTreeMap<String, Vec<ChildFieldModel>>>;

/// Status rule of a child field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequiredOnStatusesModel {
    /// `NO_STATUSES`, `SOME_STATUSES`, or `ALL_STATUSES`.
    #[serde(rename = "type", default)]
    pub kind: Value<String>,

    /// Statuses the child is required on.
    #[serde(default)]
    pub statuses: Value<Vec<String>>,
}

/// A child field revealed by a parent value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChildFieldModel {
    /// Ticket field id of the child.
    #[serde(default)]
    pub id: Value<i64>,

    /// Whether the child must be filled in.
    #[serde(default)]
    pub is_required: Value<bool>,

    /// Status rule, if any.
    #[serde(default)]
    pub required_on_statuses: Value<RequiredOnStatusesModel>,
}

fn required_on_statuses_to_api(
    model: &RequiredOnStatusesModel,
    path: &AttributePath,
) -> Result<RequiredOnStatuses, Diagnostic> {
    let kind_path = path.attr("type");
    let kind = match model.kind.resolve(&kind_path)? {
        Some(kind) if !kind.is_empty() => Some(
            kind.parse::<StatusRequirement>()
                .map_err(|e| Diagnostic::attribute_error(kind_path, "Invalid status rule", e))?,
        ),
        _ => None,
    };
    let statuses = model
        .statuses
        .resolve_cloned(&path.attr("statuses"))?
        .unwrap_or_default();
    Ok(RequiredOnStatuses { kind, statuses })
}

fn child_to_api(model: &ChildFieldModel, path: &AttributePath) -> Result<ChildField, Diagnostic> {
    let id = *model.id.require(&path.attr("id"))?;
    let is_required = model
        .is_required
        .resolve_cloned(&path.attr("is_required"))?
        .unwrap_or_default();
    let rule_path = path.attr("required_on_statuses");
    let required_on_statuses = match model.required_on_statuses.resolve(&rule_path)? {
        Some(rule) => Some(required_on_statuses_to_api(rule, &rule_path)?),
        None => None,
    };
    Ok(ChildField {
        id,
        is_required,
        required_on_statuses,
    })
}

fn form_conditions_to_api_inner(
    model: &FormConditionsModel,
    path: &AttributePath,
) -> Result<Vec<ConditionalTicketField>, Diagnostic> {
    let mut flat = Vec::new();
    for (parent, by_value) in model {
        let parent_path = path.key(parent.as_str());
        let parent_field_id = parent.parse::<i64>().map_err(|e| {
            Diagnostic::attribute_error(
                parent_path.clone(),
                "Invalid parent field id",
                format!("{parent:?} is not a ticket field id: {e}"),
            )
        })?;

        for (value, children) in by_value {
            let value_path = parent_path.key(value.as_str());
            let child_fields = children
                .iter()
                .enumerate()
                .map(|(i, child)| child_to_api(child, &value_path.index(i)))
                .collect::<Result<Vec<_>, _>>()?;
            flat.push(ConditionalTicketField {
                parent_field_id,
                value: value.clone(),
                child_fields,
            });
        }
    }
    Ok(flat)
}

/// Flattens the nested rules for the API. Any invalid entry aborts the
/// whole conversion.
pub fn form_conditions_to_api(
    model: &Value<FormConditionsModel>,
    path: &AttributePath,
    diags: &mut Diagnostics,
) -> Option<Vec<ConditionalTicketField>> {
    match diags.capture(model.resolve(path))? {
        Some(model) => diags.capture(form_conditions_to_api_inner(model, path)),
        None => Some(Vec::new()),
    }
}

fn child_from_api(child: ChildField) -> ChildFieldModel {
    let required_on_statuses = match child.required_on_statuses {
        Some(RequiredOnStatuses {
            kind: Some(kind),
            statuses,
        }) => Value::Known(RequiredOnStatusesModel {
            kind: Value::Known(kind.to_string()),
            statuses: Value::from_non_empty(statuses),
        }),
        _ => Value::Null,
    };
    ChildFieldModel {
        id: Value::Known(child.id),
        is_required: Value::Known(child.is_required),
        required_on_statuses,
    }
}

/// Regroups the flat API list by parent field id and value. An empty list
/// becomes `Null`.
pub fn form_conditions_from_api(list: Vec<ConditionalTicketField>) -> Value<FormConditionsModel> {
    if list.is_empty() {
        return Value::Null;
    }

    let mut grouped = FormConditionsModel::new();
    for rule in list {
        grouped
            .entry(rule.parent_field_id.to_string())
            .or_default()
            .entry(rule.value)
            .or_default()
            .extend(rule.child_fields.into_iter().map(child_from_api));
    }
    Value::Known(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn path() -> AttributePath {
        AttributePath::root("agent_conditions")
    }

    fn child(id: i64) -> ChildFieldModel {
        ChildFieldModel {
            id: Value::Known(id),
            is_required: Value::Known(false),
            required_on_statuses: Value::Null,
        }
    }

    #[test]
    fn test_nested_model_flattens() {
        let mut by_value = BTreeMap::new();
        by_value.insert("vip".to_string(), vec![child(20), child(21)]);
        by_value.insert("standard".to_string(), vec![child(22)]);
        let mut model = FormConditionsModel::new();
        model.insert("10".to_string(), by_value);

        let mut diags = Diagnostics::new();
        let flat =
            form_conditions_to_api(&Value::Known(model.clone()), &path(), &mut diags).unwrap();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].parent_field_id, 10);
        assert_eq!(flat[0].value, "standard");
        assert_eq!(flat[1].value, "vip");
        assert_eq!(
            flat[1].child_fields.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![20, 21]
        );
        assert!(flat[1].child_fields[0].required_on_statuses.is_none());

        assert_eq!(form_conditions_from_api(flat), Value::Known(model));
    }

    #[test]
    fn test_required_on_statuses_round_trip() {
        let rule = ChildFieldModel {
            id: Value::Known(30),
            is_required: Value::Known(true),
            required_on_statuses: Value::Known(RequiredOnStatusesModel {
                kind: "SOME_STATUSES".into(),
                statuses: Value::Known(vec!["open".to_string(), "pending".to_string()]),
            }),
        };
        let mut model = FormConditionsModel::new();
        model.insert(
            "11".to_string(),
            BTreeMap::from([("true".to_string(), vec![rule])]),
        );

        let mut diags = Diagnostics::new();
        let flat =
            form_conditions_to_api(&Value::Known(model.clone()), &path(), &mut diags).unwrap();
        let api_rule = flat[0].child_fields[0].required_on_statuses.clone().unwrap();
        assert_eq!(api_rule.kind, Some(StatusRequirement::SomeStatuses));

        assert_eq!(form_conditions_from_api(flat), Value::Known(model));
    }

    #[test]
    fn test_empty_rule_type_decodes_as_null() {
        let flat = vec![ConditionalTicketField {
            parent_field_id: 5,
            value: "x".to_string(),
            child_fields: vec![ChildField {
                id: 6,
                is_required: false,
                required_on_statuses: Some(RequiredOnStatuses::default()),
            }],
        }];
        let Value::Known(model) = form_conditions_from_api(flat) else {
            panic!("expected known rules");
        };
        assert_eq!(model["5"]["x"][0].required_on_statuses, Value::Null);
    }

    #[test]
    fn test_groups_split_pairs_and_keep_inner_order() {
        let flat = vec![
            ConditionalTicketField {
                parent_field_id: 2,
                value: "a".to_string(),
                child_fields: vec![ChildField {
                    id: 100,
                    ..Default::default()
                }],
            },
            ConditionalTicketField {
                parent_field_id: 1,
                value: "b".to_string(),
                child_fields: vec![ChildField {
                    id: 200,
                    ..Default::default()
                }],
            },
            ConditionalTicketField {
                parent_field_id: 2,
                value: "a".to_string(),
                child_fields: vec![ChildField {
                    id: 101,
                    ..Default::default()
                }],
            },
        ];
        let Value::Known(model) = form_conditions_from_api(flat) else {
            panic!("expected known rules");
        };
        let ids: Vec<_> = model["2"]["a"].iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec![Value::Known(100), Value::Known(101)]);

        let mut diags = Diagnostics::new();
        let again = form_conditions_to_api(&Value::Known(model), &path(), &mut diags).unwrap();
        assert_eq!(again[0].parent_field_id, 1);
        assert_eq!(again.len(), 2);
    }

    #[test]
    fn test_non_numeric_parent_aborts() {
        let mut model = FormConditionsModel::new();
        model.insert("10".to_string(), BTreeMap::from([("a".to_string(), vec![child(1)])]));
        model.insert("ten".to_string(), BTreeMap::from([("a".to_string(), vec![child(2)])]));

        let mut diags = Diagnostics::new();
        assert!(form_conditions_to_api(&Value::Known(model), &path(), &mut diags).is_none());
        assert_eq!(
            diags.errors().next().unwrap().path,
            Some(path().key("ten"))
        );
    }

    #[test]
    fn test_empty_list_is_null() {
        assert_eq!(form_conditions_from_api(Vec::new()), Value::Null);
    }
}
