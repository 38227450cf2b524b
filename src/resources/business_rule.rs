//! Triggers, automations, macros, and views.

use serde::{Deserialize, Serialize};

use super::{optional, required};
use crate::crud::ResourceModel;
use crate::framework::{AttributePath, Diagnostic, Diagnostics, Value};
use crate::models::{Automation, Macro, Restriction, Trigger, View, ViewOutput};
use crate::transform::{
    actions_from_api, actions_to_api, conditions_from_api, conditions_to_api, ActionModel,
    ConditionsModel,
};

/// Configuration of a trigger.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TriggerModel {
    /// Server-assigned id.
    #[serde(default)]
    pub id: Value<i64>,

    /// Trigger title.
    #[serde(default)]
    pub title: Value<String>,

    /// Whether the trigger runs. Defaults to `true`.
    #[serde(default)]
    pub active: Value<bool>,

    /// Run order among triggers.
    #[serde(default)]
    pub position: Value<i64>,

    /// Free-text description.
    #[serde(default)]
    pub description: Value<String>,

    /// Trigger category id.
    #[serde(default)]
    pub category_id: Value<String>,

    /// Conditions that fire the trigger.
    #[serde(default)]
    pub conditions: ConditionsModel,

    /// Actions applied when it fires.
    #[serde(default)]
    pub actions: Value<Vec<ActionModel>>,
}

impl TriggerModel {
    fn build(&self) -> Result<Trigger, Diagnostic> {
        Ok(Trigger {
            title: required(&self.title, "title")?,
            active: optional(&self.active, "active")?.unwrap_or(true),
            position: optional(&self.position, "position")?,
            description: optional(&self.description, "description")?,
            category_id: optional(&self.category_id, "category_id")?,
            ..Default::default()
        })
    }
}

impl ResourceModel for TriggerModel {
    type Api = Trigger;
    const TYPE_NAME: &'static str = "trigger";

    fn to_api_model(&self, diags: &mut Diagnostics) -> Option<Trigger> {
        let mut trigger = diags.capture(self.build())?;
        trigger.conditions =
            conditions_to_api(&self.conditions, &AttributePath::root("conditions"), diags)?;
        trigger.actions = actions_to_api(&self.actions, &AttributePath::root("actions"), diags)?;
        Some(trigger)
    }

    fn from_api_model(&mut self, api: Trigger, diags: &mut Diagnostics) {
        self.id = Value::from_option(api.id);
        self.title = Value::Known(api.title);
        self.active = Value::Known(api.active);
        self.position = Value::from_option(api.position);
        self.description = Value::from_option(api.description);
        self.category_id = Value::from_option(api.category_id);
        if let Some(conditions) =
            conditions_from_api(api.conditions, &AttributePath::root("conditions"), diags)
        {
            self.conditions = conditions;
        }
        if let Some(actions) = actions_from_api(api.actions, &AttributePath::root("actions"), diags)
        {
            self.actions = actions;
        }
    }

    fn id(&self) -> Option<i64> {
        self.id.as_known().copied()
    }
}

/// Configuration of an automation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AutomationModel {
    /// Server-assigned id.
    #[serde(default)]
    pub id: Value<i64>,

    /// Automation title.
    #[serde(default)]
    pub title: Value<String>,

    /// Whether the automation runs. Defaults to `true`.
    #[serde(default)]
    pub active: Value<bool>,

    /// Run order among automations.
    #[serde(default)]
    pub position: Value<i64>,

    /// Time-based conditions. Must include a time condition.
    #[serde(default)]
    pub conditions: ConditionsModel,

    /// Actions applied to matching tickets.
    #[serde(default)]
    pub actions: Value<Vec<ActionModel>>,
}

impl AutomationModel {
    fn build(&self) -> Result<Automation, Diagnostic> {
        Ok(Automation {
            title: required(&self.title, "title")?,
            active: optional(&self.active, "active")?.unwrap_or(true),
            position: optional(&self.position, "position")?,
            ..Default::default()
        })
    }
}

impl ResourceModel for AutomationModel {
    type Api = Automation;
    const TYPE_NAME: &'static str = "automation";

    fn to_api_model(&self, diags: &mut Diagnostics) -> Option<Automation> {
        let mut automation = diags.capture(self.build())?;
        automation.conditions =
            conditions_to_api(&self.conditions, &AttributePath::root("conditions"), diags)?;
        automation.actions =
            actions_to_api(&self.actions, &AttributePath::root("actions"), diags)?;
        Some(automation)
    }

    fn from_api_model(&mut self, api: Automation, diags: &mut Diagnostics) {
        self.id = Value::from_option(api.id);
        self.title = Value::Known(api.title);
        self.active = Value::Known(api.active);
        self.position = Value::from_option(api.position);
        if let Some(conditions) =
            conditions_from_api(api.conditions, &AttributePath::root("conditions"), diags)
        {
            self.conditions = conditions;
        }
        if let Some(actions) = actions_from_api(api.actions, &AttributePath::root("actions"), diags)
        {
            self.actions = actions;
        }
    }

    fn id(&self) -> Option<i64> {
        self.id.as_known().copied()
    }
}

/// Who may use a macro or view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RestrictionModel {
    /// `Group` or `User`.
    #[serde(rename = "type", default)]
    pub kind: Value<String>,

    /// Group or user id when `type` names a single owner.
    #[serde(default)]
    pub id: Value<i64>,

    /// Group ids when access is shared with several groups.
    #[serde(default)]
    pub ids: Value<Vec<i64>>,
}

fn restriction_to_api(
    value: &Value<RestrictionModel>,
    path: &AttributePath,
) -> Result<Option<Restriction>, Diagnostic> {
    let Some(model) = value.resolve(path)? else {
        return Ok(None);
    };
    let kind = model.kind.require(&path.attr("type"))?.clone();
    if kind != "Group" && kind != "User" {
        return Err(Diagnostic::attribute_error(
            path.attr("type"),
            "Invalid restriction",
            format!("type must be \"Group\" or \"User\", got {kind:?}"),
        ));
    }
    Ok(Some(Restriction {
        kind,
        id: model.id.resolve_cloned(&path.attr("id"))?,
        ids: model
            .ids
            .resolve_cloned(&path.attr("ids"))?
            .unwrap_or_default(),
    }))
}

fn restriction_from_api(restriction: Option<Restriction>) -> Value<RestrictionModel> {
    Value::from_option(restriction.map(|r| RestrictionModel {
        kind: Value::Known(r.kind),
        id: Value::from_option(r.id),
        ids: Value::from_non_empty(r.ids),
    }))
}

/// Configuration of a macro.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MacroModel {
    /// Server-assigned id.
    #[serde(default)]
    pub id: Value<i64>,

    /// Macro title.
    #[serde(default)]
    pub title: Value<String>,

    /// Whether agents can apply the macro. Defaults to `true`.
    #[serde(default)]
    pub active: Value<bool>,

    /// Free-text description.
    #[serde(default)]
    pub description: Value<String>,

    /// Actions applied by the macro.
    #[serde(default)]
    pub actions: Value<Vec<ActionModel>>,

    /// Who may use the macro. `Null` means everyone.
    #[serde(default)]
    pub restriction: Value<RestrictionModel>,
}

impl MacroModel {
    fn build(&self) -> Result<Macro, Diagnostic> {
        Ok(Macro {
            title: required(&self.title, "title")?,
            active: optional(&self.active, "active")?.unwrap_or(true),
            description: optional(&self.description, "description")?,
            restriction: restriction_to_api(
                &self.restriction,
                &AttributePath::root("restriction"),
            )?,
            ..Default::default()
        })
    }
}

impl ResourceModel for MacroModel {
    type Api = Macro;
    const TYPE_NAME: &'static str = "macro";

    fn to_api_model(&self, diags: &mut Diagnostics) -> Option<Macro> {
        let mut record = diags.capture(self.build())?;
        let path = AttributePath::root("actions");
        record.actions = actions_to_api(&self.actions, &path, diags)?;
        if record.actions.is_empty() {
            diags.add_attribute_error(path, "Missing actions", "a macro needs at least one action");
            return None;
        }
        Some(record)
    }

    fn from_api_model(&mut self, api: Macro, diags: &mut Diagnostics) {
        self.id = Value::from_option(api.id);
        self.title = Value::Known(api.title);
        self.active = Value::Known(api.active);
        self.description = Value::from_option(api.description);
        self.restriction = restriction_from_api(api.restriction);
        if let Some(actions) = actions_from_api(api.actions, &AttributePath::root("actions"), diags)
        {
            self.actions = actions;
        }
    }

    fn id(&self) -> Option<i64> {
        self.id.as_known().copied()
    }
}

/// Columns and ordering of a view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewOutputModel {
    /// Column field names, in display order.
    #[serde(default)]
    pub columns: Value<Vec<String>>,

    /// Field to group rows by.
    #[serde(default)]
    pub group_by: Value<String>,

    /// `asc` or `desc`.
    #[serde(default)]
    pub group_order: Value<String>,

    /// Field to sort rows by.
    #[serde(default)]
    pub sort_by: Value<String>,

    /// `asc` or `desc`.
    #[serde(default)]
    pub sort_order: Value<String>,
}

/// Configuration of a view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewModel {
    /// Server-assigned id.
    #[serde(default)]
    pub id: Value<i64>,

    /// View title.
    #[serde(default)]
    pub title: Value<String>,

    /// Whether the view is listed. Defaults to `true`.
    #[serde(default)]
    pub active: Value<bool>,

    /// Free-text description.
    #[serde(default)]
    pub description: Value<String>,

    /// Order among views.
    #[serde(default)]
    pub position: Value<i64>,

    /// Tickets shown by the view.
    #[serde(default)]
    pub conditions: ConditionsModel,

    /// Who may see the view. `Null` means everyone.
    #[serde(default)]
    pub restriction: Value<RestrictionModel>,

    /// Columns and ordering.
    #[serde(default)]
    pub output: Value<ViewOutputModel>,
}

fn output_to_api(
    value: &Value<ViewOutputModel>,
    path: &AttributePath,
) -> Result<Option<ViewOutput>, Diagnostic> {
    let Some(model) = value.resolve(path)? else {
        return Ok(None);
    };
    Ok(Some(ViewOutput {
        columns: model
            .columns
            .resolve_cloned(&path.attr("columns"))?
            .unwrap_or_default(),
        group_by: model.group_by.resolve_cloned(&path.attr("group_by"))?,
        group_order: model.group_order.resolve_cloned(&path.attr("group_order"))?,
        sort_by: model.sort_by.resolve_cloned(&path.attr("sort_by"))?,
        sort_order: model.sort_order.resolve_cloned(&path.attr("sort_order"))?,
    }))
}

impl ViewModel {
    fn build(&self) -> Result<View, Diagnostic> {
        Ok(View {
            title: required(&self.title, "title")?,
            active: optional(&self.active, "active")?.unwrap_or(true),
            description: optional(&self.description, "description")?,
            position: optional(&self.position, "position")?,
            restriction: restriction_to_api(
                &self.restriction,
                &AttributePath::root("restriction"),
            )?,
            output: output_to_api(&self.output, &AttributePath::root("output"))?,
            ..Default::default()
        })
    }
}

impl ResourceModel for ViewModel {
    type Api = View;
    const TYPE_NAME: &'static str = "view";

    fn to_api_model(&self, diags: &mut Diagnostics) -> Option<View> {
        let mut view = diags.capture(self.build())?;
        let path = AttributePath::root("conditions");
        view.conditions = conditions_to_api(&self.conditions, &path, diags)?;
        if view.conditions.all.is_empty() {
            diags.add_attribute_error(
                path.attr("all"),
                "Missing conditions",
                "a view needs at least one condition in all",
            );
            return None;
        }
        Some(view)
    }

    fn from_api_model(&mut self, api: View, diags: &mut Diagnostics) {
        self.id = Value::from_option(api.id);
        self.title = Value::Known(api.title);
        self.active = Value::Known(api.active);
        self.description = Value::from_option(api.description);
        self.position = Value::from_option(api.position);
        self.restriction = restriction_from_api(api.restriction);
        self.output = Value::from_option(api.output.map(|o| ViewOutputModel {
            columns: Value::from_non_empty(o.columns),
            group_by: Value::from_option(o.group_by),
            group_order: Value::from_option(o.group_order),
            sort_by: Value::from_option(o.sort_by),
            sort_order: Value::from_option(o.sort_order),
        }));
        if let Some(conditions) =
            conditions_from_api(api.conditions, &AttributePath::root("conditions"), diags)
        {
            self.conditions = conditions;
        }
    }

    fn id(&self) -> Option<i64> {
        self.id.as_known().copied()
    }
}
