//! Ticket form models, including conditional field logic.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use super::common::deserialize_string_like;
use super::ApiResource;

/// Which ticket statuses make a conditional child field required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRequirement {
    /// Never required.
    NoStatuses,
    /// Required on the listed statuses.
    SomeStatuses,
    /// Required on every status.
    AllStatuses,
}

impl StatusRequirement {
    /// Wire name of the requirement.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusRequirement::NoStatuses => "NO_STATUSES",
            StatusRequirement::SomeStatuses => "SOME_STATUSES",
            StatusRequirement::AllStatuses => "ALL_STATUSES",
        }
    }
}

impl fmt::Display for StatusRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusRequirement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NO_STATUSES" => Ok(StatusRequirement::NoStatuses),
            "SOME_STATUSES" => Ok(StatusRequirement::SomeStatuses),
            "ALL_STATUSES" => Ok(StatusRequirement::AllStatuses),
            other => Err(format!(
                "expected one of NO_STATUSES, SOME_STATUSES, ALL_STATUSES, got {other:?}"
            )),
        }
    }
}

impl Serialize for StatusRequirement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Reads the requirement type, treating an absent or empty string as `None`.
fn deserialize_requirement<'de, D>(deserializer: D) -> Result<Option<StatusRequirement>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Status rule attached to a conditional child field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequiredOnStatuses {
    /// Requirement type; `None` when the API sends an empty type.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "deserialize_requirement",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<StatusRequirement>,

    /// Statuses the field is required on (for `SOME_STATUSES`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<String>,
}

/// A field shown when its parent field has a given value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChildField {
    /// Ticket field id of the child.
    pub id: i64,

    /// Whether the child must be filled in.
    #[serde(default)]
    pub is_required: bool,

    /// Status rule; omitted when the configuration has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_on_statuses: Option<RequiredOnStatuses>,
}

/// One parent-field/value rule of a ticket form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConditionalTicketField {
    /// Ticket field id that controls visibility.
    pub parent_field_id: i64,

    /// Parent value that reveals the children.
    #[serde(deserialize_with = "deserialize_string_like")]
    pub value: String,

    /// Revealed child fields.
    #[serde(default)]
    pub child_fields: Vec<ChildField>,
}

/// A ticket form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TicketForm {
    /// Unique form ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Internal name.
    pub name: String,

    /// Name shown to end users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Ordering among forms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,

    /// Whether the form is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// Whether end users can pick the form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_user_visible: Option<bool>,

    /// Whether this is the account's default form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,

    /// Whether the form is available in every brand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_all_brands: Option<bool>,

    /// Brands the form is limited to.
    #[serde(default)]
    pub restricted_brand_ids: Vec<i64>,

    /// Ticket fields on the form, in display order.
    #[serde(default)]
    pub ticket_field_ids: Vec<i64>,

    /// Conditional logic for the agent interface.
    #[serde(default)]
    pub agent_conditions: Vec<ConditionalTicketField>,

    /// Conditional logic for the end-user interface.
    #[serde(default)]
    pub end_user_conditions: Vec<ConditionalTicketField>,

    /// Creation timestamp.
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,

    /// Last update timestamp.
    #[serde(default, skip_serializing)]
    pub updated_at: Option<String>,
}

impl ApiResource for TicketForm {
    type Id = i64;
    const COLLECTION: &'static str = "ticket_forms";
    const ENVELOPE: &'static str = "ticket_form";
}
