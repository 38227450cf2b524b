//! Custom field definitions for tickets, users, and organizations.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use super::{ApiResource, Conditions, CustomFieldOption};

/// A custom ticket field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TicketField {
    /// Unique field ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Field type (`text`, `tagger`, `lookup`, ...). Immutable after creation.
    #[serde(rename = "type")]
    pub kind: String,

    /// Title shown to agents.
    pub title: String,

    /// Description shown to agents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Agent-only description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_description: Option<String>,

    /// Ordering among ticket fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,

    /// Whether the field is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// Whether agents must fill the field to solve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Whether the field starts collapsed for agents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed_for_agents: Option<bool>,

    /// Validation pattern for `regexp` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regexp_for_validation: Option<String>,

    /// Title shown to end users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_in_portal: Option<String>,

    /// Whether end users see the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_in_portal: Option<bool>,

    /// Whether end users may edit the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable_in_portal: Option<bool>,

    /// Whether end users must fill the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_in_portal: Option<bool>,

    /// Tag added when a checkbox field is ticked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Options of dropdown/multiselect fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_field_options: Vec<CustomFieldOption>,

    /// Subtype of system fields (e.g. the priority variant).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type_id: Option<i64>,

    /// Object type a `lookup` field points at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_target_type: Option<String>,

    /// Restricts which records a `lookup` field may reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_filter: Option<Conditions>,

    /// Creation timestamp.
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,

    /// Last update timestamp.
    #[serde(default, skip_serializing)]
    pub updated_at: Option<String>,
}

impl ApiResource for TicketField {
    type Id = i64;
    const COLLECTION: &'static str = "ticket_fields";
    const ENVELOPE: &'static str = "ticket_field";
}

/// The owner type of an [`AccountField`].
pub trait FieldScope: Default + Send + Sync + 'static {
    /// Collection path below `/api/v2/`.
    const COLLECTION: &'static str;
    /// Envelope key for a single field.
    const ENVELOPE: &'static str;
    /// Human-readable name of the field kind.
    const NAME: &'static str;
}

/// Scope marker for user fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserScope;

impl FieldScope for UserScope {
    const COLLECTION: &'static str = "user_fields";
    const ENVELOPE: &'static str = "user_field";
    const NAME: &'static str = "user field";
}

/// Scope marker for organization fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrganizationScope;

impl FieldScope for OrganizationScope {
    const COLLECTION: &'static str = "organization_fields";
    const ENVELOPE: &'static str = "organization_field";
    const NAME: &'static str = "organization field";
}

/// A custom field on users or organizations.
///
/// Both share one wire shape and differ only in endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AccountField<S> {
    /// Unique field ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Unique key used in API payloads. Immutable after creation.
    pub key: String,

    /// Field type (`text`, `dropdown`, `lookup`, ...).
    #[serde(rename = "type")]
    pub kind: String,

    /// Display title.
    pub title: String,

    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Ordering among fields of the same scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,

    /// Whether the field is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// Validation pattern for `regexp` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regexp_for_validation: Option<String>,

    /// Tag added when a checkbox field is ticked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Options of dropdown fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_field_options: Vec<CustomFieldOption>,

    /// Object type a `lookup` field points at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_target_type: Option<String>,

    /// Restricts which records a `lookup` field may reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_filter: Option<Conditions>,

    #[serde(skip)]
    scope: PhantomData<S>,
}

impl<S: FieldScope> AccountField<S> {
    /// Creates a field with only its required attributes set.
    pub fn new(key: impl Into<String>, kind: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: kind.into(),
            title: title.into(),
            ..Default::default()
        }
    }
}

impl<S: FieldScope> ApiResource for AccountField<S> {
    type Id = i64;
    const COLLECTION: &'static str = S::COLLECTION;
    const ENVELOPE: &'static str = S::ENVELOPE;
}

/// A custom user field.
pub type UserField = AccountField<UserScope>;

/// A custom organization field.
pub type OrganizationField = AccountField<OrganizationScope>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParsedValue;

    #[test]
    fn test_lookup_field_relationship_filter() {
        let json = r#"{
            "id": 42,
            "type": "lookup",
            "title": "Manager",
            "relationship_target_type": "zen:user",
            "relationship_filter": {
                "all": [{"field": "role", "operator": "is", "value": "Agent"}],
                "any": []
            }
        }"#;
        let field: TicketField = serde_json::from_str(json).unwrap();
        let filter = field.relationship_filter.unwrap();
        assert_eq!(filter.all[0].value, ParsedValue::scalar("Agent"));
    }

    #[test]
    fn test_account_field_scopes() {
        assert_eq!(<UserField as ApiResource>::COLLECTION, "user_fields");
        assert_eq!(
            <OrganizationField as ApiResource>::ENVELOPE,
            "organization_field"
        );
    }

    #[test]
    fn test_account_field_type_rename() {
        let field: UserField =
            serde_json::from_str(r#"{"key": "shoe_size", "type": "integer", "title": "Shoe size"}"#)
                .unwrap();
        assert_eq!(field.kind, "integer");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "integer");
        assert!(json.get("scope").is_none());
    }
}
