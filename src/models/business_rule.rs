//! Business-rule models: triggers, automations, macros, and views.
//!
//! All four carry condition and/or action lists in the shared
//! [`Conditions`]/[`Action`] wire format.

use serde::{Deserialize, Serialize};

use super::{Action, ApiResource, Conditions};

/// A trigger: a rule evaluated whenever a ticket is created or updated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trigger {
    /// Unique trigger ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Title of the trigger.
    pub title: String,

    /// Whether the trigger is active.
    #[serde(default)]
    pub active: bool,

    /// Evaluation position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Trigger category the rule is filed under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,

    /// Conditions that select tickets.
    #[serde(default)]
    pub conditions: Conditions,

    /// Actions applied to selected tickets.
    #[serde(default)]
    pub actions: Vec<Action>,

    /// Creation timestamp.
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,

    /// Last update timestamp.
    #[serde(default, skip_serializing)]
    pub updated_at: Option<String>,
}

impl ApiResource for Trigger {
    type Id = i64;
    const COLLECTION: &'static str = "triggers";
    const ENVELOPE: &'static str = "trigger";
}

/// An automation: a time-based rule evaluated hourly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Automation {
    /// Unique automation ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Title of the automation.
    pub title: String,

    /// Whether the automation is active.
    #[serde(default)]
    pub active: bool,

    /// Evaluation position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,

    /// Conditions that select tickets.
    #[serde(default)]
    pub conditions: Conditions,

    /// Actions applied to selected tickets.
    #[serde(default)]
    pub actions: Vec<Action>,

    /// Creation timestamp.
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,

    /// Last update timestamp.
    #[serde(default, skip_serializing)]
    pub updated_at: Option<String>,
}

impl ApiResource for Automation {
    type Id = i64;
    const COLLECTION: &'static str = "automations";
    const ENVELOPE: &'static str = "automation";
}

/// Who may see and use a macro or view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Restriction {
    /// `Group` or `User`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Single owner id (users).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Owner ids (groups).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<i64>,
}

/// A macro: a canned set of actions an agent applies by hand.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Macro {
    /// Unique macro ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Title of the macro.
    pub title: String,

    /// Whether the macro is active.
    #[serde(default)]
    pub active: bool,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Actions applied when the macro runs.
    #[serde(default)]
    pub actions: Vec<Action>,

    /// Access restriction; `None` means everyone.
    #[serde(default)]
    pub restriction: Option<Restriction>,

    /// Creation timestamp.
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,

    /// Last update timestamp.
    #[serde(default, skip_serializing)]
    pub updated_at: Option<String>,
}

impl ApiResource for Macro {
    type Id = i64;
    const COLLECTION: &'static str = "macros";
    const ENVELOPE: &'static str = "macro";
}

/// Column and grouping layout of a view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewOutput {
    /// Column ids, in display order.
    #[serde(default)]
    pub columns: Vec<String>,

    /// Grouping column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,

    /// `asc` or `desc`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_order: Option<String>,

    /// Sort column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,

    /// `asc` or `desc`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
}

/// A view: a saved ticket list defined by conditions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct View {
    /// Unique view ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Title of the view.
    pub title: String,

    /// Whether the view is active.
    #[serde(default)]
    pub active: bool,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sidebar position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,

    /// Conditions that select tickets.
    #[serde(default)]
    pub conditions: Conditions,

    /// Access restriction; `None` means everyone.
    #[serde(default)]
    pub restriction: Option<Restriction>,

    /// Layout of the ticket list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<ViewOutput>,

    /// Creation timestamp.
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,

    /// Last update timestamp.
    #[serde(default, skip_serializing)]
    pub updated_at: Option<String>,
}

impl ApiResource for View {
    type Id = i64;
    const COLLECTION: &'static str = "views";
    const ENVELOPE: &'static str = "view";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParsedValue;

    #[test]
    fn test_trigger_deserializes_api_payload() {
        let json = r#"{
            "id": 360001,
            "title": "Notify requester",
            "active": true,
            "position": 3,
            "category_id": "10026",
            "conditions": {
                "all": [{"field": "status", "operator": "is", "value": "open"}],
                "any": []
            },
            "actions": [
                {"field": "notification_user", "value": ["requester_id", "Hi", "Body"]}
            ],
            "created_at": "2024-02-01T10:00:00Z",
            "updated_at": "2024-02-02T10:00:00Z"
        }"#;

        let trigger: Trigger = serde_json::from_str(json).unwrap();
        assert_eq!(trigger.id, Some(360001));
        assert_eq!(trigger.conditions.all.len(), 1);
        assert_eq!(
            trigger.actions[0].value,
            ParsedValue::list(["requester_id", "Hi", "Body"])
        );
        assert_eq!(trigger.updated_at.as_deref(), Some("2024-02-02T10:00:00Z"));
    }

    #[test]
    fn test_trigger_serialization_omits_server_fields() {
        let trigger = Trigger {
            title: "t".to_string(),
            created_at: Some("2024-02-01T10:00:00Z".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&trigger).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("created_at").is_none());
        assert_eq!(json["conditions"]["any"], serde_json::json!([]));
    }

    #[test]
    fn test_restriction_type_rename() {
        let restriction: Restriction =
            serde_json::from_str(r#"{"type": "Group", "id": 5, "ids": [5, 6]}"#).unwrap();
        assert_eq!(restriction.kind, "Group");
        assert_eq!(restriction.ids, vec![5, 6]);
    }
}
