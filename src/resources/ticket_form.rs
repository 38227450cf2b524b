//! Ticket forms.

use serde::{Deserialize, Serialize};

use super::{optional, required};
use crate::crud::ResourceModel;
use crate::framework::{AttributePath, Diagnostic, Diagnostics, Value};
use crate::models::TicketForm;
use crate::transform::{form_conditions_from_api, form_conditions_to_api, FormConditionsModel};

/// Configuration of a ticket form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TicketFormModel {
    /// Server-assigned id.
    #[serde(default)]
    pub id: Value<i64>,

    /// Name shown to agents.
    #[serde(default)]
    pub name: Value<String>,

    /// Name shown to end users.
    #[serde(default)]
    pub display_name: Value<String>,

    /// Order among forms.
    #[serde(default)]
    pub position: Value<i64>,

    /// Whether the form is in use.
    #[serde(default)]
    pub active: Value<bool>,

    /// Whether end users can pick the form.
    #[serde(default)]
    pub end_user_visible: Value<bool>,

    /// Whether this is the account's default form.
    #[serde(default)]
    pub default: Value<bool>,

    /// Whether the form is offered on every brand.
    #[serde(default)]
    pub in_all_brands: Value<bool>,

    /// Brands the form is limited to when not in all brands.
    #[serde(default)]
    pub restricted_brand_ids: Value<Vec<i64>>,

    /// Fields on the form, in display order.
    #[serde(default)]
    pub ticket_field_ids: Value<Vec<i64>>,

    /// Conditional fields shown to agents, keyed by parent field id then value.
    #[serde(default)]
    pub agent_conditions: Value<FormConditionsModel>,

    /// Conditional fields shown to end users.
    #[serde(default)]
    pub end_user_conditions: Value<FormConditionsModel>,
}

impl TicketFormModel {
    fn build(&self) -> Result<TicketForm, Diagnostic> {
        let in_all_brands = optional(&self.in_all_brands, "in_all_brands")?;
        let restricted_brand_ids =
            optional(&self.restricted_brand_ids, "restricted_brand_ids")?.unwrap_or_default();
        if in_all_brands == Some(true) && !restricted_brand_ids.is_empty() {
            return Err(Diagnostic::attribute_error(
                AttributePath::root("restricted_brand_ids"),
                "Conflicting brand settings",
                "restricted_brand_ids must be empty when in_all_brands is set",
            ));
        }
        Ok(TicketForm {
            name: required(&self.name, "name")?,
            display_name: optional(&self.display_name, "display_name")?,
            position: optional(&self.position, "position")?,
            active: optional(&self.active, "active")?,
            end_user_visible: optional(&self.end_user_visible, "end_user_visible")?,
            default: optional(&self.default, "default")?,
            in_all_brands,
            restricted_brand_ids,
            ticket_field_ids: optional(&self.ticket_field_ids, "ticket_field_ids")?
                .unwrap_or_default(),
            ..Default::default()
        })
    }
}

impl ResourceModel for TicketFormModel {
    type Api = TicketForm;
    const TYPE_NAME: &'static str = "ticket form";

    fn to_api_model(&self, diags: &mut Diagnostics) -> Option<TicketForm> {
        let mut form = diags.capture(self.build())?;
        form.agent_conditions = form_conditions_to_api(
            &self.agent_conditions,
            &AttributePath::root("agent_conditions"),
            diags,
        )?;
        form.end_user_conditions = form_conditions_to_api(
            &self.end_user_conditions,
            &AttributePath::root("end_user_conditions"),
            diags,
        )?;
        Some(form)
    }

    fn from_api_model(&mut self, api: TicketForm, _diags: &mut Diagnostics) {
        self.id = Value::from_option(api.id);
        self.name = Value::Known(api.name);
        self.display_name = Value::from_option(api.display_name);
        self.position = Value::from_option(api.position);
        self.active = Value::from_option(api.active);
        self.end_user_visible = Value::from_option(api.end_user_visible);
        self.default = Value::from_option(api.default);
        self.in_all_brands = Value::from_option(api.in_all_brands);
        self.restricted_brand_ids = Value::from_non_empty(api.restricted_brand_ids);
        self.ticket_field_ids = Value::from_non_empty(api.ticket_field_ids);
        self.agent_conditions = form_conditions_from_api(api.agent_conditions);
        self.end_user_conditions = form_conditions_from_api(api.end_user_conditions);
    }

    fn id(&self) -> Option<i64> {
        self.id.as_known().copied()
    }
}
