//! Ticket fields and user/organization fields.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use super::{filter_from_api, filter_to_api, optional, required};
use crate::crud::ResourceModel;
use crate::framework::{AttributePath, Diagnostic, Diagnostics, Value};
use crate::models::{
    AccountField, CustomFieldOption, FieldScope, OrganizationScope, TicketField, UserScope,
};
use crate::transform::ConditionsModel;

const LOOKUP: &str = "lookup";

/// Field types whose values come from `custom_field_options`.
const OPTION_TYPES: [&str; 2] = ["tagger", "multiselect"];

/// An option of a dropdown or multiselect field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomFieldOptionModel {
    /// Server-assigned id.
    #[serde(default)]
    pub id: Value<i64>,

    /// Label shown to users.
    #[serde(default)]
    pub name: Value<String>,

    /// Tag written when the option is chosen.
    #[serde(default)]
    pub value: Value<String>,

    /// Whether the option is preselected.
    #[serde(default)]
    pub default: Value<bool>,
}

fn options_to_api(
    options: &Value<Vec<CustomFieldOptionModel>>,
    kind: &str,
) -> Result<Vec<CustomFieldOption>, Diagnostic> {
    let path = AttributePath::root("custom_field_options");
    let options = match options.resolve(&path)? {
        Some(options) => options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let path = path.index(i);
                Ok(CustomFieldOption {
                    id: option.id.resolve_cloned(&path.attr("id"))?,
                    name: option.name.require(&path.attr("name"))?.clone(),
                    value: option.value.require(&path.attr("value"))?.clone(),
                    default: option.default.resolve_cloned(&path.attr("default"))?,
                })
            })
            .collect::<Result<Vec<_>, Diagnostic>>()?,
        None => Vec::new(),
    };
    if OPTION_TYPES.contains(&kind) && options.is_empty() {
        return Err(Diagnostic::attribute_error(
            path,
            "Missing field options",
            format!("a {kind} field needs at least one option"),
        ));
    }
    Ok(options)
}

fn options_from_api(options: Vec<CustomFieldOption>) -> Value<Vec<CustomFieldOptionModel>> {
    Value::from_non_empty(
        options
            .into_iter()
            .map(|o| CustomFieldOptionModel {
                id: Value::from_option(o.id),
                name: Value::Known(o.name),
                value: Value::Known(o.value),
                default: Value::from_option(o.default),
            })
            .collect(),
    )
}

/// Checks the lookup-relationship attributes against the field type.
fn check_relationship(
    kind: &str,
    target_type: &Option<String>,
    filter: &Value<ConditionsModel>,
) -> Result<(), Diagnostic> {
    if kind == LOOKUP && target_type.is_none() {
        return Err(Diagnostic::attribute_error(
            AttributePath::root("relationship_target_type"),
            "Missing relationship target",
            "lookup fields need relationship_target_type",
        ));
    }
    if kind != LOOKUP && (target_type.is_some() || filter.is_known()) {
        return Err(Diagnostic::attribute_error(
            AttributePath::root("relationship_filter"),
            "Unexpected relationship",
            format!("only lookup fields take a relationship, this field is {kind:?}"),
        ));
    }
    Ok(())
}

/// Configuration of a ticket field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TicketFieldModel {
    /// Server-assigned id.
    #[serde(default)]
    pub id: Value<i64>,

    /// Field type (`text`, `tagger`, `lookup`, ...).
    #[serde(rename = "type", default)]
    pub kind: Value<String>,

    /// Label shown to agents.
    #[serde(default)]
    pub title: Value<String>,

    /// Description shown to end users.
    #[serde(default)]
    pub description: Value<String>,

    /// Description shown to agents.
    #[serde(default)]
    pub agent_description: Value<String>,

    /// Order among ticket fields.
    #[serde(default)]
    pub position: Value<i64>,

    /// Whether the field is in use.
    #[serde(default)]
    pub active: Value<bool>,

    /// Whether agents must fill it in to solve a ticket.
    #[serde(default)]
    pub required: Value<bool>,

    /// Whether the field starts collapsed in the agent interface.
    #[serde(default)]
    pub collapsed_for_agents: Value<bool>,

    /// Validation pattern for `regexp` fields.
    #[serde(default)]
    pub regexp_for_validation: Value<String>,

    /// Label shown to end users.
    #[serde(default)]
    pub title_in_portal: Value<String>,

    /// Whether end users can see the field.
    #[serde(default)]
    pub visible_in_portal: Value<bool>,

    /// Whether end users can edit the field.
    #[serde(default)]
    pub editable_in_portal: Value<bool>,

    /// Whether end users must fill it in.
    #[serde(default)]
    pub required_in_portal: Value<bool>,

    /// Tag added when a `checkbox` field is set.
    #[serde(default)]
    pub tag: Value<String>,

    /// Options of `tagger` and `multiselect` fields.
    #[serde(default)]
    pub custom_field_options: Value<Vec<CustomFieldOptionModel>>,

    /// Subtype of system fields such as priority.
    #[serde(default)]
    pub sub_type_id: Value<i64>,

    /// Object type of `lookup` fields.
    #[serde(default)]
    pub relationship_target_type: Value<String>,

    /// Filter on the records a `lookup` field may reference.
    #[serde(default)]
    pub relationship_filter: Value<ConditionsModel>,
}

impl TicketFieldModel {
    fn build(&self) -> Result<TicketField, Diagnostic> {
        let kind = required(&self.kind, "type")?;
        let relationship_target_type =
            optional(&self.relationship_target_type, "relationship_target_type")?;
        check_relationship(&kind, &relationship_target_type, &self.relationship_filter)?;
        Ok(TicketField {
            custom_field_options: options_to_api(&self.custom_field_options, &kind)?,
            kind,
            title: required(&self.title, "title")?,
            description: optional(&self.description, "description")?,
            agent_description: optional(&self.agent_description, "agent_description")?,
            position: optional(&self.position, "position")?,
            active: optional(&self.active, "active")?,
            required: optional(&self.required, "required")?,
            collapsed_for_agents: optional(&self.collapsed_for_agents, "collapsed_for_agents")?,
            regexp_for_validation: optional(&self.regexp_for_validation, "regexp_for_validation")?,
            title_in_portal: optional(&self.title_in_portal, "title_in_portal")?,
            visible_in_portal: optional(&self.visible_in_portal, "visible_in_portal")?,
            editable_in_portal: optional(&self.editable_in_portal, "editable_in_portal")?,
            required_in_portal: optional(&self.required_in_portal, "required_in_portal")?,
            tag: optional(&self.tag, "tag")?,
            sub_type_id: optional(&self.sub_type_id, "sub_type_id")?,
            relationship_target_type,
            ..Default::default()
        })
    }
}

impl ResourceModel for TicketFieldModel {
    type Api = TicketField;
    const TYPE_NAME: &'static str = "ticket field";

    fn to_api_model(&self, diags: &mut Diagnostics) -> Option<TicketField> {
        let mut field = diags.capture(self.build())?;
        field.relationship_filter = filter_to_api(
            &self.relationship_filter,
            &AttributePath::root("relationship_filter"),
            diags,
        )?;
        Some(field)
    }

    fn from_api_model(&mut self, api: TicketField, diags: &mut Diagnostics) {
        self.id = Value::from_option(api.id);
        self.kind = Value::Known(api.kind);
        self.title = Value::Known(api.title);
        self.description = Value::from_option(api.description);
        self.agent_description = Value::from_option(api.agent_description);
        self.position = Value::from_option(api.position);
        self.active = Value::from_option(api.active);
        self.required = Value::from_option(api.required);
        self.collapsed_for_agents = Value::from_option(api.collapsed_for_agents);
        self.regexp_for_validation = Value::from_option(api.regexp_for_validation);
        self.title_in_portal = Value::from_option(api.title_in_portal);
        self.visible_in_portal = Value::from_option(api.visible_in_portal);
        self.editable_in_portal = Value::from_option(api.editable_in_portal);
        self.required_in_portal = Value::from_option(api.required_in_portal);
        self.tag = Value::from_option(api.tag);
        self.custom_field_options = options_from_api(api.custom_field_options);
        self.sub_type_id = Value::from_option(api.sub_type_id);
        self.relationship_target_type = Value::from_option(api.relationship_target_type);
        if let Some(filter) = filter_from_api(
            api.relationship_filter,
            &AttributePath::root("relationship_filter"),
            diags,
        ) {
            self.relationship_filter = filter;
        }
    }

    fn id(&self) -> Option<i64> {
        self.id.as_known().copied()
    }
}

/// Configuration of a user or organization field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountFieldModel<S> {
    /// Server-assigned id.
    #[serde(default)]
    pub id: Value<i64>,

    /// Key used in the user or organization record.
    #[serde(default)]
    pub key: Value<String>,

    /// Field type (`text`, `dropdown`, `lookup`, ...).
    #[serde(rename = "type", default)]
    pub kind: Value<String>,

    /// Label shown to agents.
    #[serde(default)]
    pub title: Value<String>,

    /// Free-text description.
    #[serde(default)]
    pub description: Value<String>,

    /// Order among fields of this scope.
    #[serde(default)]
    pub position: Value<i64>,

    /// Whether the field is in use.
    #[serde(default)]
    pub active: Value<bool>,

    /// Validation pattern for `regexp` fields.
    #[serde(default)]
    pub regexp_for_validation: Value<String>,

    /// Tag added when a `checkbox` field is set.
    #[serde(default)]
    pub tag: Value<String>,

    /// Options of `dropdown` fields.
    #[serde(default)]
    pub custom_field_options: Value<Vec<CustomFieldOptionModel>>,

    /// Object type of `lookup` fields.
    #[serde(default)]
    pub relationship_target_type: Value<String>,

    /// Filter on the records a `lookup` field may reference.
    #[serde(default)]
    pub relationship_filter: Value<ConditionsModel>,
    #[serde(skip)]
    scope: PhantomData<S>,
}

/// Configuration of a user field.
pub type UserFieldModel = AccountFieldModel<UserScope>;

/// Configuration of an organization field.
pub type OrganizationFieldModel = AccountFieldModel<OrganizationScope>;

impl<S: FieldScope> AccountFieldModel<S> {
    fn build(&self) -> Result<AccountField<S>, Diagnostic> {
        let kind = required(&self.kind, "type")?;
        let relationship_target_type =
            optional(&self.relationship_target_type, "relationship_target_type")?;
        check_relationship(&kind, &relationship_target_type, &self.relationship_filter)?;
        let custom_field_options = options_to_api(&self.custom_field_options, &kind)?;

        let mut field = AccountField::new(
            required(&self.key, "key")?,
            kind,
            required(&self.title, "title")?,
        );
        field.description = optional(&self.description, "description")?;
        field.position = optional(&self.position, "position")?;
        field.active = optional(&self.active, "active")?;
        field.regexp_for_validation =
            optional(&self.regexp_for_validation, "regexp_for_validation")?;
        field.tag = optional(&self.tag, "tag")?;
        field.custom_field_options = custom_field_options;
        field.relationship_target_type = relationship_target_type;
        Ok(field)
    }
}

impl<S: FieldScope> ResourceModel for AccountFieldModel<S> {
    type Api = AccountField<S>;
    const TYPE_NAME: &'static str = S::NAME;

    fn to_api_model(&self, diags: &mut Diagnostics) -> Option<AccountField<S>> {
        let mut field = diags.capture(self.build())?;
        field.relationship_filter = filter_to_api(
            &self.relationship_filter,
            &AttributePath::root("relationship_filter"),
            diags,
        )?;
        Some(field)
    }

    fn from_api_model(&mut self, api: AccountField<S>, diags: &mut Diagnostics) {
        self.id = Value::from_option(api.id);
        self.key = Value::Known(api.key);
        self.kind = Value::Known(api.kind);
        self.title = Value::Known(api.title);
        self.description = Value::from_option(api.description);
        self.position = Value::from_option(api.position);
        self.active = Value::from_option(api.active);
        self.regexp_for_validation = Value::from_option(api.regexp_for_validation);
        self.tag = Value::from_option(api.tag);
        self.custom_field_options = options_from_api(api.custom_field_options);
        self.relationship_target_type = Value::from_option(api.relationship_target_type);
        if let Some(filter) = filter_from_api(
            api.relationship_filter,
            &AttributePath::root("relationship_filter"),
            diags,
        ) {
            self.relationship_filter = filter;
        }
    }

    fn id(&self) -> Option<i64> {
        self.id.as_known().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::ConditionModel;
    use pretty_assertions::assert_eq;

    fn agent_filter() -> ConditionsModel {
        ConditionsModel {
            all: Value::Known(vec![ConditionModel {
                field: "role".into(),
                operator: "is".into(),
                value: "Agent".into(),
                ..Default::default()
            }]),
            any: Value::Null,
        }
    }

    #[test]
    fn test_lookup_field_round_trip() {
        let model = TicketFieldModel {
            kind: "lookup".into(),
            title: "Manager".into(),
            relationship_target_type: "zen:user".into(),
            relationship_filter: Value::Known(agent_filter()),
            ..Default::default()
        };
        let mut diags = Diagnostics::new();
        let mut api = model.to_api_model(&mut diags).unwrap();
        assert_eq!(api.relationship_filter.as_ref().unwrap().all.len(), 1);

        api.id = Some(42);
        let mut back = TicketFieldModel::default();
        back.from_api_model(api, &mut diags);
        assert!(diags.is_empty());
        assert_eq!(
            back,
            TicketFieldModel {
                id: Value::Known(42),
                ..model
            }
        );
    }

    #[test]
    fn test_filter_on_text_field_is_error() {
        let model = TicketFieldModel {
            kind: "text".into(),
            title: "Notes".into(),
            relationship_filter: Value::Known(agent_filter()),
            ..Default::default()
        };
        let mut diags = Diagnostics::new();
        assert!(model.to_api_model(&mut diags).is_none());
        assert_eq!(
            diags.errors().next().unwrap().path,
            Some(AttributePath::root("relationship_filter"))
        );
    }

    #[test]
    fn test_dropdown_needs_options() {
        let model = TicketFieldModel {
            kind: "tagger".into(),
            title: "Product".into(),
            ..Default::default()
        };
        let mut diags = Diagnostics::new();
        assert!(model.to_api_model(&mut diags).is_none());
    }

    #[test]
    fn test_user_field_to_api() {
        let model = UserFieldModel {
            key: "plan".into(),
            kind: "dropdown".into(),
            title: "Plan".into(),
            custom_field_options: Value::Known(vec![CustomFieldOptionModel {
                name: "Gold".into(),
                value: "gold".into(),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let mut diags = Diagnostics::new();
        let api = model.to_api_model(&mut diags).unwrap();
        assert_eq!(api.key, "plan");
        assert_eq!(api.custom_field_options[0].value, "gold");
        assert_eq!(<UserFieldModel as ResourceModel>::TYPE_NAME, "user field");

        let mut back = UserFieldModel::default();
        back.from_api_model(api, &mut diags);
        assert_eq!(back, model);
    }

    #[test]
    fn test_organization_field_name() {
        assert_eq!(
            <OrganizationFieldModel as ResourceModel>::TYPE_NAME,
            "organization field"
        );
    }
}
