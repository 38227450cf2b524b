//! Configuration models of every managed object.
//!
//! Each model implements [`ResourceModel`](crate::crud::ResourceModel) and
//! so plugs into the generic lifecycle procedures in [`crate::crud`].
//! [`ResourceKind`] names them for callers that pick a resource at runtime.

use std::fmt;
use std::str::FromStr;

use crate::crud::{self, ImportResourceStateRequest, ImportResourceStateResponse, ResourceApi};
use crate::framework::{AttributePath, Diagnostic, Diagnostics, Value};
use crate::models::{
    Automation, Brand, Conditions, CustomRole, DynamicContentItem, Group, Macro,
    OrganizationField, Schedule, SlaPolicy, TicketField, TicketForm, Trigger, UserField, View,
    Webhook,
};
use crate::transform::{conditions_from_api, conditions_to_api, ConditionsModel};

mod account;
mod business_rule;
mod schedule;
mod sla;
mod ticket_field;
mod ticket_form;
mod webhook;

pub use account::*;
pub use business_rule::*;
pub use schedule::*;
pub use sla::*;
pub use ticket_field::*;
pub use ticket_form::*;
pub use webhook::*;

/// Reads a mandatory top-level attribute.
pub(crate) fn required<T: Clone>(value: &Value<T>, name: &str) -> Result<T, Diagnostic> {
    value.require(&AttributePath::root(name)).cloned()
}

/// Reads an optional top-level attribute.
pub(crate) fn optional<T: Clone>(value: &Value<T>, name: &str) -> Result<Option<T>, Diagnostic> {
    value.resolve_cloned(&AttributePath::root(name))
}

/// Converts an optional condition block; an absent block sends nothing.
pub(crate) fn filter_to_api(
    filter: &Value<ConditionsModel>,
    path: &AttributePath,
    diags: &mut Diagnostics,
) -> Option<Option<Conditions>> {
    match diags.capture(filter.resolve(path))? {
        Some(model) => conditions_to_api(model, path, diags).map(Some),
        None => Some(None),
    }
}

/// Converts an optional condition block back; empty groups read as absent.
pub(crate) fn filter_from_api(
    filter: Option<Conditions>,
    path: &AttributePath,
    diags: &mut Diagnostics,
) -> Option<Value<ConditionsModel>> {
    match filter {
        Some(conditions) if !(conditions.all.is_empty() && conditions.any.is_empty()) => {
            conditions_from_api(conditions, path, diags).map(Value::Known)
        }
        _ => Some(Value::Null),
    }
}

/// Every managed object kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Time-based business rule.
    Automation,
    /// Brand with its own help center.
    Brand,
    /// Agent role with a permission bag.
    CustomRole,
    /// Localized placeholder text.
    DynamicContentItem,
    /// Agent group.
    Group,
    /// Agent-applied action bundle.
    Macro,
    /// Custom organization field.
    OrganizationField,
    /// Business-hours schedule.
    Schedule,
    /// Service-level agreement policy.
    SlaPolicy,
    /// Custom ticket field.
    TicketField,
    /// Ticket form with conditional fields.
    TicketForm,
    /// Event-driven business rule.
    Trigger,
    /// Custom user field.
    UserField,
    /// Saved ticket list.
    View,
    /// Outbound webhook.
    Webhook,
}

impl ResourceKind {
    /// All kinds, in name order.
    pub const ALL: [ResourceKind; 15] = [
        ResourceKind::Automation,
        ResourceKind::Brand,
        ResourceKind::CustomRole,
        ResourceKind::DynamicContentItem,
        ResourceKind::Group,
        ResourceKind::Macro,
        ResourceKind::OrganizationField,
        ResourceKind::Schedule,
        ResourceKind::SlaPolicy,
        ResourceKind::TicketField,
        ResourceKind::TicketForm,
        ResourceKind::Trigger,
        ResourceKind::UserField,
        ResourceKind::View,
        ResourceKind::Webhook,
    ];

    /// Name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Automation => "automation",
            ResourceKind::Brand => "brand",
            ResourceKind::CustomRole => "custom_role",
            ResourceKind::DynamicContentItem => "dynamic_content_item",
            ResourceKind::Group => "group",
            ResourceKind::Macro => "macro",
            ResourceKind::OrganizationField => "organization_field",
            ResourceKind::Schedule => "schedule",
            ResourceKind::SlaPolicy => "sla_policy",
            ResourceKind::TicketField => "ticket_field",
            ResourceKind::TicketForm => "ticket_form",
            ResourceKind::Trigger => "trigger",
            ResourceKind::UserField => "user_field",
            ResourceKind::View => "view",
            ResourceKind::Webhook => "webhook",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = ResourceKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown resource kind {s:?}, expected one of {}", names.join(", "))
            })
    }
}

/// A client able to manage every kind of object.
pub trait HelpdeskApi:
    ResourceApi<Automation>
    + ResourceApi<Brand>
    + ResourceApi<CustomRole>
    + ResourceApi<DynamicContentItem>
    + ResourceApi<Group>
    + ResourceApi<Macro>
    + ResourceApi<OrganizationField>
    + ResourceApi<Schedule>
    + ResourceApi<SlaPolicy>
    + ResourceApi<TicketField>
    + ResourceApi<TicketForm>
    + ResourceApi<Trigger>
    + ResourceApi<UserField>
    + ResourceApi<View>
    + ResourceApi<Webhook>
{
}

impl<T> HelpdeskApi for T where
    T: ResourceApi<Automation>
        + ResourceApi<Brand>
        + ResourceApi<CustomRole>
        + ResourceApi<DynamicContentItem>
        + ResourceApi<Group>
        + ResourceApi<Macro>
        + ResourceApi<OrganizationField>
        + ResourceApi<Schedule>
        + ResourceApi<SlaPolicy>
        + ResourceApi<TicketField>
        + ResourceApi<TicketForm>
        + ResourceApi<Trigger>
        + ResourceApi<UserField>
        + ResourceApi<View>
        + ResourceApi<Webhook>
{
}

/// Imports an object of a kind chosen at runtime.
pub async fn import_kind<C>(client: &C, kind: ResourceKind, id: &str) -> ImportResourceStateResponse
where
    C: HelpdeskApi,
{
    let request = ImportResourceStateRequest { id: id.to_string() };
    match kind {
        ResourceKind::Automation => crud::import::<AutomationModel, C>(client, request).await,
        ResourceKind::Brand => crud::import::<BrandModel, C>(client, request).await,
        ResourceKind::CustomRole => crud::import::<CustomRoleModel, C>(client, request).await,
        ResourceKind::DynamicContentItem => {
            crud::import::<DynamicContentItemModel, C>(client, request).await
        }
        ResourceKind::Group => crud::import::<GroupModel, C>(client, request).await,
        ResourceKind::Macro => crud::import::<MacroModel, C>(client, request).await,
        ResourceKind::OrganizationField => {
            crud::import::<OrganizationFieldModel, C>(client, request).await
        }
        ResourceKind::Schedule => crud::import::<ScheduleModel, C>(client, request).await,
        ResourceKind::SlaPolicy => crud::import::<SlaPolicyModel, C>(client, request).await,
        ResourceKind::TicketField => crud::import::<TicketFieldModel, C>(client, request).await,
        ResourceKind::TicketForm => crud::import::<TicketFormModel, C>(client, request).await,
        ResourceKind::Trigger => crud::import::<TriggerModel, C>(client, request).await,
        ResourceKind::UserField => crud::import::<UserFieldModel, C>(client, request).await,
        ResourceKind::View => crud::import::<ViewModel, C>(client, request).await,
        ResourceKind::Webhook => crud::import::<WebhookModel, C>(client, request).await,
    }
}
