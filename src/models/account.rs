//! Account-level models: brands, groups, custom roles, and dynamic content.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ApiResource;

/// A brand.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Brand {
    /// Unique brand ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Brand name.
    pub name: String,

    /// Subdomain of the brand's help center.
    pub subdomain: String,

    /// Whether the brand is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// Whether this is the default brand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,

    /// Public URL of the brand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_url: Option<String>,

    /// Custom host name mapped to the brand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_mapping: Option<String>,

    /// Whether the brand has a help center.
    #[serde(default, skip_serializing)]
    pub has_help_center: Option<bool>,

    /// Help center state (`enabled`, `disabled`, `restricted`).
    #[serde(default, skip_serializing)]
    pub help_center_state: Option<String>,

    /// Signature template for agent replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_template: Option<String>,

    /// Ticket forms available in this brand.
    #[serde(default)]
    pub ticket_form_ids: Vec<i64>,

    /// API URL of the brand.
    #[serde(default, skip_serializing)]
    pub url: Option<String>,

    /// Creation timestamp.
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,

    /// Last update timestamp.
    #[serde(default, skip_serializing)]
    pub updated_at: Option<String>,
}

impl ApiResource for Brand {
    type Id = i64;
    const COLLECTION: &'static str = "brands";
    const ENVELOPE: &'static str = "brand";
}

/// An agent group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Group {
    /// Unique group ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Group name.
    pub name: String,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether new tickets default to this group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,

    /// Whether end users can see the group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,

    /// Set by the API once the group is soft-deleted.
    #[serde(default, skip_serializing)]
    pub deleted: bool,

    /// Creation timestamp.
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,

    /// Last update timestamp.
    #[serde(default, skip_serializing)]
    pub updated_at: Option<String>,
}

impl ApiResource for Group {
    type Id = i64;
    const COLLECTION: &'static str = "groups";
    const ENVELOPE: &'static str = "group";
}

/// Permission bag of a custom role.
///
/// Only the commonly managed permissions are typed; every other key the
/// API returns is carried through `other` untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoleConfiguration {
    /// Chat access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_access: Option<bool>,

    /// End-user profile access (`readonly`, `edit`, `edit-within-org`, `full`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_user_profile_access: Option<String>,

    /// Explore access (`readonly`, `edit`, `full`, `none`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explore_access: Option<String>,

    /// Help center article access (`readonly`, `edit`, `full`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forum_access: Option<String>,

    /// Whether agents can manage groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_access: Option<bool>,

    /// Macro access (`readonly`, `full`, `manage-group`, `manage-personal`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macro_access: Option<String>,

    /// Whether agents can manage business rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manage_business_rules: Option<bool>,

    /// Whether agents can manage dynamic content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manage_dynamic_content: Option<bool>,

    /// Whether agents can manage apps and channels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manage_extensions_and_channels: Option<bool>,

    /// Whether agents can edit organizations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_editing: Option<bool>,

    /// Report access (`none`, `readonly`, `full`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_access: Option<String>,

    /// Ticket access (`all`, `within-groups`, `within-organization`, `assigned-only`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_access: Option<String>,

    /// Comment access (`none`, `private`, `public`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_comment_access: Option<String>,

    /// Whether agents can delete tickets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_deletion: Option<bool>,

    /// Whether agents can edit ticket properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_editing: Option<bool>,

    /// Whether agents can merge tickets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_merge: Option<bool>,

    /// Whether agents can edit tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_tag_editing: Option<bool>,

    /// User view access (`readonly`, `full`, `manage-group`, `manage-personal`, `none`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_view_access: Option<String>,

    /// View access (`readonly`, `full`, `manage-group`, `manage-personal`, `playonly`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_access: Option<String>,

    /// Whether agents can see deleted tickets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_deleted_tickets: Option<bool>,

    /// Whether agents can take voice calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_access: Option<bool>,

    /// Permissions not modelled above.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

/// A custom agent role.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CustomRole {
    /// Unique role ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Role name.
    pub name: String,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Role type; 0 for custom agent roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_type: Option<i64>,

    /// Permission bag.
    #[serde(default)]
    pub configuration: RoleConfiguration,

    /// Creation timestamp.
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,

    /// Last update timestamp.
    #[serde(default, skip_serializing)]
    pub updated_at: Option<String>,
}

impl ApiResource for CustomRole {
    type Id = i64;
    const COLLECTION: &'static str = "custom_roles";
    const ENVELOPE: &'static str = "custom_role";
}

/// A localized variant of a dynamic content item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DynamicContentVariant {
    /// Unique variant ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Localized text.
    pub content: String,

    /// Locale of the text.
    pub locale_id: i64,

    /// Whether this is the fallback variant.
    #[serde(default)]
    pub default: bool,

    /// Whether the variant is active.
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

/// A dynamic content item (`{{dc.name}}` placeholder).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DynamicContentItem {
    /// Unique item ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Item name; the placeholder is derived from it.
    pub name: String,

    /// Locale of the default variant.
    pub default_locale_id: i64,

    /// Placeholder to use in text (`{{dc.name}}`).
    #[serde(default, skip_serializing)]
    pub placeholder: Option<String>,

    /// Localized variants.
    #[serde(default)]
    pub variants: Vec<DynamicContentVariant>,

    /// Creation timestamp.
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,

    /// Last update timestamp.
    #[serde(default, skip_serializing)]
    pub updated_at: Option<String>,
}

impl ApiResource for DynamicContentItem {
    type Id = i64;
    const COLLECTION: &'static str = "dynamic_content/items";
    const ENVELOPE: &'static str = "item";
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_role_configuration_keeps_unmodelled_keys() {
        let json = r#"{
            "chat_access": true,
            "ticket_access": "within-groups",
            "light_agent": false,
            "assign_tickets_to_any_group": true
        }"#;
        let config: RoleConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(config.chat_access, Some(true));
        assert_eq!(config.other.len(), 2);

        let back = serde_json::to_value(&config).unwrap();
        assert_eq!(back["light_agent"], serde_json::json!(false));
        assert_eq!(back["ticket_access"], serde_json::json!("within-groups"));
    }

    #[test]
    fn test_group_deleted_is_not_sent() {
        let group = Group {
            name: "Tier 2".to_string(),
            deleted: true,
            ..Default::default()
        };
        let json = serde_json::to_value(&group).unwrap();
        assert!(json.get("deleted").is_none());
    }

    #[test]
    fn test_dynamic_content_variant_defaults_active() {
        let variant: DynamicContentVariant =
            serde_json::from_str(r#"{"content": "Hei", "locale_id": 1176}"#).unwrap();
        assert!(variant.active);
        assert!(!variant.default);
    }
}
