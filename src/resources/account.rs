//! Brands, groups, custom roles, and dynamic content.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{optional, required};
use crate::crud::ResourceModel;
use crate::framework::{AttributePath, Diagnostic, Diagnostics, Value};
use crate::models::{
    Brand, CustomRole, DynamicContentItem, DynamicContentVariant, Group, RoleConfiguration,
};

/// Configuration of a brand.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BrandModel {
    /// Server-assigned id.
    #[serde(default)]
    pub id: Value<i64>,

    /// Display name.
    #[serde(default)]
    pub name: Value<String>,

    /// Subdomain under the helpdesk host.
    #[serde(default)]
    pub subdomain: Value<String>,

    /// Whether the brand is active.
    #[serde(default)]
    pub active: Value<bool>,

    /// Whether this is the account's default brand.
    #[serde(default)]
    pub default: Value<bool>,

    /// Custom host name mapped to the brand.
    #[serde(default)]
    pub host_mapping: Value<String>,

    /// Agent signature template.
    #[serde(default)]
    pub signature_template: Value<String>,

    /// Ticket forms available on the brand.
    #[serde(default)]
    pub ticket_form_ids: Value<Vec<i64>>,

    /// Read-only.
    #[serde(default)]
    pub brand_url: Value<String>,

    /// Read-only.
    #[serde(default)]
    pub has_help_center: Value<bool>,

    /// Read-only.
    #[serde(default)]
    pub help_center_state: Value<String>,

    /// Read-only.
    #[serde(default)]
    pub url: Value<String>,
}

impl BrandModel {
    fn build(&self) -> Result<Brand, Diagnostic> {
        Ok(Brand {
            name: required(&self.name, "name")?,
            subdomain: required(&self.subdomain, "subdomain")?,
            active: optional(&self.active, "active")?,
            default: optional(&self.default, "default")?,
            host_mapping: optional(&self.host_mapping, "host_mapping")?,
            signature_template: optional(&self.signature_template, "signature_template")?,
            ticket_form_ids: optional(&self.ticket_form_ids, "ticket_form_ids")?
                .unwrap_or_default(),
            ..Default::default()
        })
    }
}

impl ResourceModel for BrandModel {
    type Api = Brand;
    const TYPE_NAME: &'static str = "brand";

    fn to_api_model(&self, diags: &mut Diagnostics) -> Option<Brand> {
        diags.capture(self.build())
    }

    fn from_api_model(&mut self, api: Brand, _diags: &mut Diagnostics) {
        self.id = Value::from_option(api.id);
        self.name = Value::Known(api.name);
        self.subdomain = Value::Known(api.subdomain);
        self.active = Value::from_option(api.active);
        self.default = Value::from_option(api.default);
        self.host_mapping = Value::from_option(api.host_mapping);
        self.signature_template = Value::from_option(api.signature_template);
        self.ticket_form_ids = Value::from_non_empty(api.ticket_form_ids);
        self.brand_url = Value::from_option(api.brand_url);
        self.has_help_center = Value::from_option(api.has_help_center);
        self.help_center_state = Value::from_option(api.help_center_state);
        self.url = Value::from_option(api.url);
    }

    fn id(&self) -> Option<i64> {
        self.id.as_known().copied()
    }
}

/// Configuration of an agent group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupModel {
    /// Server-assigned id.
    #[serde(default)]
    pub id: Value<i64>,

    /// Group name.
    #[serde(default)]
    pub name: Value<String>,

    /// Free-text description.
    #[serde(default)]
    pub description: Value<String>,

    /// Whether new agents join this group.
    #[serde(default)]
    pub default: Value<bool>,

    /// Whether the group is visible to all agents.
    #[serde(default)]
    pub is_public: Value<bool>,
}

impl GroupModel {
    fn build(&self) -> Result<Group, Diagnostic> {
        Ok(Group {
            name: required(&self.name, "name")?,
            description: optional(&self.description, "description")?,
            default: optional(&self.default, "default")?,
            is_public: optional(&self.is_public, "is_public")?,
            ..Default::default()
        })
    }
}

impl ResourceModel for GroupModel {
    type Api = Group;
    const TYPE_NAME: &'static str = "group";

    fn to_api_model(&self, diags: &mut Diagnostics) -> Option<Group> {
        diags.capture(self.build())
    }

    fn from_api_model(&mut self, api: Group, diags: &mut Diagnostics) {
        if api.deleted {
            diags.add_warning(
                "Group is deleted",
                format!("group {:?} is marked deleted in the helpdesk", api.name),
            );
        }
        self.id = Value::from_option(api.id);
        self.name = Value::Known(api.name);
        self.description = Value::from_option(api.description);
        self.default = Value::from_option(api.default);
        self.is_public = Value::from_option(api.is_public);
    }

    fn id(&self) -> Option<i64> {
        self.id.as_known().copied()
    }
}

/// Permission bag of a custom role.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoleConfigurationModel {
    /// Access to chat.
    #[serde(default)]
    pub chat_access: Value<bool>,

    /// End-user profile access: `readonly`, `edit` or `edit-within-org`.
    #[serde(default)]
    pub end_user_profile_access: Value<String>,

    /// Explore access level.
    #[serde(default)]
    pub explore_access: Value<String>,

    /// Help center access level.
    #[serde(default)]
    pub forum_access: Value<String>,

    /// Whether agents can manage groups.
    #[serde(default)]
    pub group_access: Value<bool>,

    /// Macro access level.
    #[serde(default)]
    pub macro_access: Value<String>,

    /// Whether agents can manage business rules.
    #[serde(default)]
    pub manage_business_rules: Value<bool>,

    /// Whether agents can manage dynamic content.
    #[serde(default)]
    pub manage_dynamic_content: Value<bool>,

    /// Whether agents can manage extensions and channels.
    #[serde(default)]
    pub manage_extensions_and_channels: Value<bool>,

    /// Whether agents can edit organizations.
    #[serde(default)]
    pub organization_editing: Value<bool>,

    /// Reporting access level.
    #[serde(default)]
    pub report_access: Value<String>,

    /// Ticket access: `all`, `within-groups` or `assigned-only`.
    #[serde(default)]
    pub ticket_access: Value<String>,

    /// Comment access: `public` or `none`.
    #[serde(default)]
    pub ticket_comment_access: Value<String>,

    /// Whether agents can delete tickets.
    #[serde(default)]
    pub ticket_deletion: Value<bool>,

    /// Whether agents can edit ticket properties.
    #[serde(default)]
    pub ticket_editing: Value<bool>,

    /// Whether agents can merge tickets.
    #[serde(default)]
    pub ticket_merge: Value<bool>,

    /// Whether agents can edit tags.
    #[serde(default)]
    pub ticket_tag_editing: Value<bool>,

    /// User view access level.
    #[serde(default)]
    pub user_view_access: Value<String>,

    /// View access level.
    #[serde(default)]
    pub view_access: Value<String>,

    /// Whether agents can see deleted tickets.
    #[serde(default)]
    pub view_deleted_tickets: Value<bool>,

    /// Access to voice.
    #[serde(default)]
    pub voice_access: Value<bool>,

    /// Permissions without a dedicated attribute, passed through as-is.
    #[serde(default)]
    pub additional: Value<BTreeMap<String, serde_json::Value>>,
}

impl RoleConfigurationModel {
    fn build(&self, path: &AttributePath) -> Result<RoleConfiguration, Diagnostic> {
        fn get<T: Clone>(
            v: &Value<T>,
            p: &AttributePath,
            n: &str,
        ) -> Result<Option<T>, Diagnostic> {
            v.resolve_cloned(&p.attr(n))
        }
        Ok(RoleConfiguration {
            chat_access: get(&self.chat_access, path, "chat_access")?,
            end_user_profile_access: get(
                &self.end_user_profile_access,
                path,
                "end_user_profile_access",
            )?,
            explore_access: get(&self.explore_access, path, "explore_access")?,
            forum_access: get(&self.forum_access, path, "forum_access")?,
            group_access: get(&self.group_access, path, "group_access")?,
            macro_access: get(&self.macro_access, path, "macro_access")?,
            manage_business_rules: get(&self.manage_business_rules, path, "manage_business_rules")?,
            manage_dynamic_content: get(
                &self.manage_dynamic_content,
                path,
                "manage_dynamic_content",
            )?,
            manage_extensions_and_channels: get(
                &self.manage_extensions_and_channels,
                path,
                "manage_extensions_and_channels",
            )?,
            organization_editing: get(&self.organization_editing, path, "organization_editing")?,
            report_access: get(&self.report_access, path, "report_access")?,
            ticket_access: get(&self.ticket_access, path, "ticket_access")?,
            ticket_comment_access: get(&self.ticket_comment_access, path, "ticket_comment_access")?,
            ticket_deletion: get(&self.ticket_deletion, path, "ticket_deletion")?,
            ticket_editing: get(&self.ticket_editing, path, "ticket_editing")?,
            ticket_merge: get(&self.ticket_merge, path, "ticket_merge")?,
            ticket_tag_editing: get(&self.ticket_tag_editing, path, "ticket_tag_editing")?,
            user_view_access: get(&self.user_view_access, path, "user_view_access")?,
            view_access: get(&self.view_access, path, "view_access")?,
            view_deleted_tickets: get(&self.view_deleted_tickets, path, "view_deleted_tickets")?,
            voice_access: get(&self.voice_access, path, "voice_access")?,
            other: get(&self.additional, path, "additional")?.unwrap_or_default(),
        })
    }

    fn from_api(api: RoleConfiguration) -> Self {
        Self {
            chat_access: Value::from_option(api.chat_access),
            end_user_profile_access: Value::from_option(api.end_user_profile_access),
            explore_access: Value::from_option(api.explore_access),
            forum_access: Value::from_option(api.forum_access),
            group_access: Value::from_option(api.group_access),
            macro_access: Value::from_option(api.macro_access),
            manage_business_rules: Value::from_option(api.manage_business_rules),
            manage_dynamic_content: Value::from_option(api.manage_dynamic_content),
            manage_extensions_and_channels: Value::from_option(api.manage_extensions_and_channels),
            organization_editing: Value::from_option(api.organization_editing),
            report_access: Value::from_option(api.report_access),
            ticket_access: Value::from_option(api.ticket_access),
            ticket_comment_access: Value::from_option(api.ticket_comment_access),
            ticket_deletion: Value::from_option(api.ticket_deletion),
            ticket_editing: Value::from_option(api.ticket_editing),
            ticket_merge: Value::from_option(api.ticket_merge),
            ticket_tag_editing: Value::from_option(api.ticket_tag_editing),
            user_view_access: Value::from_option(api.user_view_access),
            view_access: Value::from_option(api.view_access),
            view_deleted_tickets: Value::from_option(api.view_deleted_tickets),
            voice_access: Value::from_option(api.voice_access),
            additional: if api.other.is_empty() {
                Value::Null
            } else {
                Value::Known(api.other)
            },
        }
    }
}

/// Configuration of a custom agent role.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CustomRoleModel {
    /// Server-assigned id.
    #[serde(default)]
    pub id: Value<i64>,

    /// Role name.
    #[serde(default)]
    pub name: Value<String>,

    /// Free-text description.
    #[serde(default)]
    pub description: Value<String>,

    /// Role type. `0` is a custom agent role.
    #[serde(default)]
    pub role_type: Value<i64>,

    /// Permissions granted by the role.
    #[serde(default)]
    pub configuration: Value<RoleConfigurationModel>,
}

impl CustomRoleModel {
    fn build(&self) -> Result<CustomRole, Diagnostic> {
        let path = AttributePath::root("configuration");
        let configuration = match self.configuration.resolve(&path)? {
            Some(config) => config.build(&path)?,
            None => RoleConfiguration::default(),
        };
        Ok(CustomRole {
            name: required(&self.name, "name")?,
            description: optional(&self.description, "description")?,
            role_type: optional(&self.role_type, "role_type")?,
            configuration,
            ..Default::default()
        })
    }
}

impl ResourceModel for CustomRoleModel {
    type Api = CustomRole;
    const TYPE_NAME: &'static str = "custom role";

    fn to_api_model(&self, diags: &mut Diagnostics) -> Option<CustomRole> {
        diags.capture(self.build())
    }

    fn from_api_model(&mut self, api: CustomRole, _diags: &mut Diagnostics) {
        self.id = Value::from_option(api.id);
        self.name = Value::Known(api.name);
        self.description = Value::from_option(api.description);
        self.role_type = Value::from_option(api.role_type);
        self.configuration = Value::Known(RoleConfigurationModel::from_api(api.configuration));
    }

    fn id(&self) -> Option<i64> {
        self.id.as_known().copied()
    }
}

/// A localized variant of a dynamic content item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DynamicContentVariantModel {
    /// Server-assigned id.
    #[serde(default)]
    pub id: Value<i64>,

    /// Localized text.
    #[serde(default)]
    pub content: Value<String>,

    /// Locale of the text.
    #[serde(default)]
    pub locale_id: Value<i64>,

    /// Whether this is the fallback variant.
    #[serde(default)]
    pub default: Value<bool>,

    /// Whether the variant is in use.
    #[serde(default)]
    pub active: Value<bool>,
}

/// Configuration of a dynamic content item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DynamicContentItemModel {
    /// Server-assigned id.
    #[serde(default)]
    pub id: Value<i64>,

    /// Item name. The placeholder is derived from it.
    #[serde(default)]
    pub name: Value<String>,

    /// Locale used when no variant matches.
    #[serde(default)]
    pub default_locale_id: Value<i64>,

    /// Localized variants. One must use `default_locale_id`.
    #[serde(default)]
    pub variants: Value<Vec<DynamicContentVariantModel>>,

    /// Read-only `{{dc.name}}` placeholder.
    #[serde(default)]
    pub placeholder: Value<String>,
}

fn variant_to_api(
    model: &DynamicContentVariantModel,
    path: &AttributePath,
) -> Result<DynamicContentVariant, Diagnostic> {
    Ok(DynamicContentVariant {
        id: model.id.resolve_cloned(&path.attr("id"))?,
        content: model.content.require(&path.attr("content"))?.clone(),
        locale_id: *model.locale_id.require(&path.attr("locale_id"))?,
        default: model
            .default
            .resolve_cloned(&path.attr("default"))?
            .unwrap_or(false),
        active: model
            .active
            .resolve_cloned(&path.attr("active"))?
            .unwrap_or(true),
    })
}

impl DynamicContentItemModel {
    fn build(&self) -> Result<DynamicContentItem, Diagnostic> {
        let path = AttributePath::root("variants");
        let variants = match self.variants.resolve(&path)? {
            Some(variants) => variants
                .iter()
                .enumerate()
                .map(|(i, v)| variant_to_api(v, &path.index(i)))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        let default_locale_id = required(&self.default_locale_id, "default_locale_id")?;
        if !variants.is_empty() && !variants.iter().any(|v| v.locale_id == default_locale_id) {
            return Err(Diagnostic::attribute_error(
                path,
                "Missing default variant",
                format!("no variant uses the default locale {default_locale_id}"),
            ));
        }
        Ok(DynamicContentItem {
            name: required(&self.name, "name")?,
            default_locale_id,
            variants,
            ..Default::default()
        })
    }
}

impl ResourceModel for DynamicContentItemModel {
    type Api = DynamicContentItem;
    const TYPE_NAME: &'static str = "dynamic content item";

    fn to_api_model(&self, diags: &mut Diagnostics) -> Option<DynamicContentItem> {
        diags.capture(self.build())
    }

    fn from_api_model(&mut self, api: DynamicContentItem, _diags: &mut Diagnostics) {
        self.id = Value::from_option(api.id);
        self.name = Value::Known(api.name);
        self.default_locale_id = Value::Known(api.default_locale_id);
        self.placeholder = Value::from_option(api.placeholder);
        self.variants = Value::from_non_empty(
            api.variants
                .into_iter()
                .map(|v| DynamicContentVariantModel {
                    id: Value::from_option(v.id),
                    content: Value::Known(v.content),
                    locale_id: Value::Known(v.locale_id),
                    default: Value::Known(v.default),
                    active: Value::Known(v.active),
                })
                .collect(),
        );
    }

    fn id(&self) -> Option<i64> {
        self.id.as_known().copied()
    }
}
