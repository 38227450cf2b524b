//! Action conversion between configuration and the API.
//!
//! An action value carries no type tag: the action's field name decides
//! how many positional slots the list form has and what each slot means.
//! [`ActionValue`] is the closed set of those layouts.

use serde::{Deserialize, Serialize};

use super::field_ref::{FieldRef, RefScope};
use crate::framework::{AttributePath, Diagnostic, Diagnostics, Value};
use crate::models::{Action, ParsedValue};

/// Target required by `notification_zis` actions.
pub const SLACK_TARGET: &str = "slack";

/// Marker in the first slot of relative-date actions.
pub const DAYS_FROM_NOW: &str = "days_from_now";

/// Configuration form of a single action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionModel {
    /// Logical field name (`status`, `notification_user`, `custom_field`, ...).
    #[serde(default)]
    pub field: Value<String>,

    /// Id of the referenced custom field.
    #[serde(default)]
    pub custom_field_id: Value<i64>,

    /// Main value (body, new field value, ...).
    #[serde(default)]
    pub value: Value<String>,

    /// Recipient: user, group, webhook id, side-conversation address.
    #[serde(default)]
    pub target: Value<String>,

    /// Subject line of notifications and side conversations.
    #[serde(default)]
    pub notification_subject: Value<String>,

    /// Content type of side conversations.
    #[serde(default)]
    pub content_type: Value<String>,

    /// Slack workspace of a `notification_zis` action.
    #[serde(default)]
    pub slack_workspace: Value<String>,

    /// Slack channel of a `notification_zis` action.
    #[serde(default)]
    pub slack_channel: Value<String>,

    /// Message title of a `notification_zis` action.
    #[serde(default)]
    pub slack_title: Value<String>,
}

/// Positional layouts selected by field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionShape {
    /// `[target, workspace, channel, title, value]`
    Zis,
    /// `[target, subject, value]`
    Notification,
    /// `[target, value]`
    Webhook,
    /// `[subject, value, target, content_type]`
    SideConversation,
    /// `[value, target]`
    SideConversationSlack,
}

impl ActionShape {
    /// Looks up the layout of a field name.
    pub fn for_field(field: &str) -> Option<Self> {
        match field {
            "notification_zis" => Some(Self::Zis),
            "notification_user" | "notification_group" => Some(Self::Notification),
            "notification_webhook" => Some(Self::Webhook),
            "side_conversation_ticket" | "side_conversation" => Some(Self::SideConversation),
            "side_conversation_slack" => Some(Self::SideConversationSlack),
            _ => None,
        }
    }

    /// Number of list slots.
    pub fn slots(self) -> usize {
        match self {
            Self::Zis => 5,
            Self::Notification => 3,
            Self::Webhook | Self::SideConversationSlack => 2,
            Self::SideConversation => 4,
        }
    }
}

/// A decoded action value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionValue {
    /// Slack message sent through an integration.
    Zis {
        /// Always [`SLACK_TARGET`].
        target: String,
        /// Slack workspace id.
        workspace: String,
        /// Slack channel id.
        channel: String,
        /// Message title.
        title: String,
        /// Message body.
        value: String,
    },
    /// Email to a user or group.
    Notification {
        /// Recipient id or placeholder.
        target: String,
        /// Email subject.
        subject: String,
        /// Email body.
        value: String,
    },
    /// Call to a webhook.
    Webhook {
        /// Webhook id.
        target: String,
        /// Request body.
        value: String,
    },
    /// Side conversation by email or child ticket.
    SideConversation {
        /// Message subject.
        subject: String,
        /// Message body.
        value: String,
        /// Recipient address.
        target: String,
        /// MIME type of the body.
        content_type: String,
    },
    /// Side conversation in Slack.
    SideConversationSlack {
        /// Message body.
        value: String,
        /// Slack channel.
        target: String,
    },
    /// Date field set relative to the time the rule runs.
    DaysFromNow {
        /// Number of days.
        value: String,
    },
    /// Any single-value action.
    Scalar(String),
}

impl ActionValue {
    /// Reads the slots of a list value laid out as `shape`.
    fn from_slots(shape: ActionShape, slots: Vec<String>) -> Option<Self> {
        if slots.len() != shape.slots() {
            return None;
        }
        let mut it = slots.into_iter();
        let mut next = || it.next().unwrap_or_default();
        Some(match shape {
            ActionShape::Zis => Self::Zis {
                target: next(),
                workspace: next(),
                channel: next(),
                title: next(),
                value: next(),
            },
            ActionShape::Notification => Self::Notification {
                target: next(),
                subject: next(),
                value: next(),
            },
            ActionShape::Webhook => Self::Webhook {
                target: next(),
                value: next(),
            },
            ActionShape::SideConversation => Self::SideConversation {
                subject: next(),
                value: next(),
                target: next(),
                content_type: next(),
            },
            ActionShape::SideConversationSlack => Self::SideConversationSlack {
                value: next(),
                target: next(),
            },
        })
    }

    /// Decodes the value of an action with wire field `field`.
    ///
    /// Empty payloads are handled by the caller; this only sees a scalar or
    /// a non-empty list.
    fn decode(field: &str, value: ParsedValue) -> Result<Self, String> {
        let slots = match value {
            ParsedValue::Scalar(s) => return Ok(Self::Scalar(s)),
            ParsedValue::List(slots) => slots,
        };

        if let Some(shape) = ActionShape::for_field(field) {
            let count = slots.len();
            return Self::from_slots(shape, slots).ok_or_else(|| {
                format!(
                    "{field} expects {} value slots, got {count}",
                    shape.slots()
                )
            });
        }

        match slots.as_slice() {
            [marker, value] if marker == DAYS_FROM_NOW => Ok(Self::DaysFromNow {
                value: value.clone(),
            }),
            _ => Err(format!(
                "{field} has an unsupported list value with {} slots",
                slots.len()
            )),
        }
    }

    /// Wire form of the value.
    pub fn into_parsed(self) -> ParsedValue {
        match self {
            Self::Zis {
                target,
                workspace,
                channel,
                title,
                value,
            } => ParsedValue::List(vec![target, workspace, channel, title, value]),
            Self::Notification {
                target,
                subject,
                value,
            } => ParsedValue::List(vec![target, subject, value]),
            Self::Webhook { target, value } => ParsedValue::List(vec![target, value]),
            Self::SideConversation {
                subject,
                value,
                target,
                content_type,
            } => ParsedValue::List(vec![subject, value, target, content_type]),
            Self::SideConversationSlack { value, target } => {
                ParsedValue::List(vec![value, target])
            }
            Self::DaysFromNow { value } => {
                ParsedValue::List(vec![DAYS_FROM_NOW.to_string(), value])
            }
            Self::Scalar(value) => ParsedValue::Scalar(value),
        }
    }

    /// Writes the slots into the value attributes of `model`. Attributes the
    /// layout does not carry become `Null`.
    fn apply(self, model: &mut ActionModel) {
        model.value = Value::Null;
        model.target = Value::Null;
        model.notification_subject = Value::Null;
        model.content_type = Value::Null;
        model.slack_workspace = Value::Null;
        model.slack_channel = Value::Null;
        model.slack_title = Value::Null;

        match self {
            Self::Zis {
                target,
                workspace,
                channel,
                title,
                value,
            } => {
                model.target = target.into();
                model.slack_workspace = workspace.into();
                model.slack_channel = channel.into();
                model.slack_title = title.into();
                model.value = value.into();
            }
            Self::Notification {
                target,
                subject,
                value,
            } => {
                model.target = target.into();
                model.notification_subject = subject.into();
                model.value = value.into();
            }
            Self::Webhook { target, value } | Self::SideConversationSlack { value, target } => {
                model.target = target.into();
                model.value = value.into();
            }
            Self::SideConversation {
                subject,
                value,
                target,
                content_type,
            } => {
                model.notification_subject = subject.into();
                model.value = value.into();
                model.target = target.into();
                model.content_type = content_type.into();
            }
            Self::DaysFromNow { value } => {
                model.target = DAYS_FROM_NOW.into();
                model.value = value.into();
            }
            Self::Scalar(value) => model.value = value.into(),
        }
    }
}

fn text(value: &Value<String>, path: &AttributePath) -> Result<String, Diagnostic> {
    Ok(value.resolve_cloned(path)?.unwrap_or_default())
}

/// Converts one action for the API.
///
/// Returns `Ok(None)` when the action sets a target the field does not use;
/// a warning is recorded and the caller keeps a zero-value entry.
pub fn action_to_api(
    model: &ActionModel,
    path: &AttributePath,
    batch_path: &AttributePath,
    diags: &mut Diagnostics,
) -> Result<Option<Action>, Diagnostic> {
    let name = text(&model.field, &path.attr("field"))?;
    if name.is_empty() {
        return Err(Diagnostic::attribute_error(
            batch_path.clone(),
            "Invalid action",
            format!("{path}: field must not be empty"),
        ));
    }

    let custom_field_id = model
        .custom_field_id
        .resolve_cloned(&path.attr("custom_field_id"))?;
    let field = FieldRef::from_config(&name, custom_field_id, RefScope::Action).map_err(|e| {
        Diagnostic::attribute_error(path.attr("custom_field_id"), "Invalid action", e.to_string())
    })?;

    let value = text(&model.value, &path.attr("value"))?;
    let target = text(&model.target, &path.attr("target"))?;
    let subject = text(&model.notification_subject, &path.attr("notification_subject"))?;
    let content_type = text(&model.content_type, &path.attr("content_type"))?;

    let shape = ActionShape::for_field(&name);
    if !content_type.is_empty() && !matches!(shape, None | Some(ActionShape::SideConversation)) {
        return Err(Diagnostic::attribute_error(
            path.attr("content_type"),
            "Invalid action",
            format!("{name} does not take a content_type"),
        ));
    }

    let encoded = match shape {
        None if !content_type.is_empty() => ActionValue::SideConversation {
            subject,
            value,
            target,
            content_type,
        },
        Some(ActionShape::SideConversation) => ActionValue::SideConversation {
            subject,
            value,
            target,
            content_type,
        },
        Some(ActionShape::Zis) => {
            if target != SLACK_TARGET {
                return Err(Diagnostic::attribute_error(
                    path.attr("target"),
                    "Unsupported notification target",
                    format!("{name} only supports target {SLACK_TARGET:?}, got {target:?}"),
                ));
            }
            ActionValue::Zis {
                target,
                workspace: text(&model.slack_workspace, &path.attr("slack_workspace"))?,
                channel: text(&model.slack_channel, &path.attr("slack_channel"))?,
                title: text(&model.slack_title, &path.attr("slack_title"))?,
                value,
            }
        }
        Some(ActionShape::Notification) => ActionValue::Notification {
            target,
            subject,
            value,
        },
        Some(ActionShape::Webhook) => ActionValue::Webhook { target, value },
        Some(ActionShape::SideConversationSlack) => {
            ActionValue::SideConversationSlack { value, target }
        }
        None if target == DAYS_FROM_NOW => ActionValue::DaysFromNow { value },
        None if !target.is_empty() => {
            diags.add_attribute_warning(
                path.attr("target"),
                "unknown usage of target",
                format!("{name} does not take a target; the action is sent empty"),
            );
            return Ok(None);
        }
        None => ActionValue::Scalar(value),
    };

    Ok(Some(Action {
        field: field.to_wire(),
        value: encoded.into_parsed(),
    }))
}

/// Converts an API action back to its configuration form.
pub fn action_from_api(
    action: Action,
    path: &AttributePath,
    diags: &mut Diagnostics,
) -> Result<ActionModel, Diagnostic> {
    let field = FieldRef::from_wire(&action.field, RefScope::Action).map_err(|e| {
        Diagnostic::attribute_error(path.attr("field"), "Unreadable action", e.to_string())
    })?;

    let decoded = if action.value.is_empty() {
        tracing::warn!(field = %action.field, "action has an empty value");
        diags.add_attribute_warning(
            path.attr("value"),
            "Empty action value",
            format!(
                "the API returned an empty value for {}; this may be an upstream data issue",
                action.field
            ),
        );
        ActionValue::Scalar(String::new())
    } else {
        ActionValue::decode(&action.field, action.value).map_err(|detail| {
            Diagnostic::attribute_error(path.attr("value"), "Unsupported action value", detail)
        })?
    };

    let mut model = ActionModel {
        field: Value::Known(field.logical_name().to_string()),
        custom_field_id: Value::from_option(field.custom_field_id()),
        ..Default::default()
    };
    decoded.apply(&mut model);
    Ok(model)
}

/// Converts an action list for the API.
///
/// Entries with an unused target stay in place as zero-value actions. The
/// first fatal entry aborts the whole list.
pub fn actions_to_api(
    list: &Value<Vec<ActionModel>>,
    path: &AttributePath,
    diags: &mut Diagnostics,
) -> Option<Vec<Action>> {
    let models = diags.capture(list.resolve(path))?;
    let Some(models) = models else {
        return Some(Vec::new());
    };

    let mut actions = vec![Action::default(); models.len()];
    for (i, model) in models.iter().enumerate() {
        let encoded = action_to_api(model, &path.index(i), path, diags);
        if let Some(action) = diags.capture(encoded)? {
            actions[i] = action;
        }
    }
    Some(actions)
}

/// Converts an API action list, treating an empty list as absent.
pub fn actions_from_api(
    actions: Vec<Action>,
    path: &AttributePath,
    diags: &mut Diagnostics,
) -> Option<Value<Vec<ActionModel>>> {
    let mut models = Vec::with_capacity(actions.len());
    for (i, action) in actions.into_iter().enumerate() {
        let decoded = action_from_api(action, &path.index(i), diags);
        models.push(diags.capture(decoded)?);
    }
    Some(Value::from_non_empty(models))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn path() -> AttributePath {
        AttributePath::root("actions")
    }

    fn encode(model: &ActionModel) -> (Option<Action>, Diagnostics) {
        let mut diags = Diagnostics::new();
        let action = action_to_api(model, &path().index(0), &path(), &mut diags).unwrap();
        (action, diags)
    }

    fn decode(action: Action) -> ActionModel {
        let mut diags = Diagnostics::new();
        let model = action_from_api(action, &path().index(0), &mut diags).unwrap();
        assert!(diags.is_empty());
        model
    }

    fn round_trip(model: ActionModel) {
        let (action, diags) = encode(&model);
        assert!(diags.is_empty());
        assert_eq!(decode(action.unwrap()), model);
    }

    #[test]
    fn test_custom_field_scalar_action() {
        let model = ActionModel {
            field: "custom_field".into(),
            custom_field_id: Value::Known(123),
            value: "42".into(),
            ..Default::default()
        };
        let (action, _) = encode(&model);
        assert_eq!(
            action.clone().unwrap(),
            Action {
                field: "custom_fields_123".to_string(),
                value: ParsedValue::scalar("42"),
            }
        );
        assert_eq!(decode(action.unwrap()), model);
    }

    #[test]
    fn test_webhook_action_layout() {
        let model = ActionModel {
            field: "notification_webhook".into(),
            target: "https://x".into(),
            value: "body".into(),
            ..Default::default()
        };
        let (action, _) = encode(&model);
        assert_eq!(
            action.unwrap(),
            Action {
                field: "notification_webhook".to_string(),
                value: ParsedValue::list(["https://x", "body"]),
            }
        );
        round_trip(model);
    }

    #[test]
    fn test_every_shape_round_trips() {
        round_trip(ActionModel {
            field: "notification_zis".into(),
            target: "slack".into(),
            slack_workspace: "T123".into(),
            slack_channel: "C456".into(),
            slack_title: "New ticket".into(),
            value: "{{ticket.title}}".into(),
            ..Default::default()
        });
        round_trip(ActionModel {
            field: "notification_user".into(),
            target: "requester_id".into(),
            notification_subject: "Received".into(),
            value: "We got it".into(),
            ..Default::default()
        });
        round_trip(ActionModel {
            field: "notification_group".into(),
            target: "360001".into(),
            notification_subject: "Escalated".into(),
            value: "Please look".into(),
            ..Default::default()
        });
        round_trip(ActionModel {
            field: "side_conversation_ticket".into(),
            notification_subject: "Hand-off".into(),
            value: "Details".into(),
            target: "support_assignee_id".into(),
            content_type: "text/html".into(),
            ..Default::default()
        });
        round_trip(ActionModel {
            field: "side_conversation_slack".into(),
            value: "Heads up".into(),
            target: "C789".into(),
            ..Default::default()
        });
        round_trip(ActionModel {
            field: "status".into(),
            value: "solved".into(),
            ..Default::default()
        });
    }

    #[test]
    fn test_side_conversation_layout() {
        let model = ActionModel {
            field: "side_conversation".into(),
            notification_subject: "Subj".into(),
            value: "Body".into(),
            target: "ops@example.com".into(),
            content_type: "text/plain".into(),
            ..Default::default()
        };
        let (action, _) = encode(&model);
        assert_eq!(
            action.unwrap().value,
            ParsedValue::list(["Subj", "Body", "ops@example.com", "text/plain"])
        );
    }

    #[test]
    fn test_days_from_now_round_trip() {
        let model = ActionModel {
            field: "custom_field".into(),
            custom_field_id: Value::Known(9),
            target: DAYS_FROM_NOW.into(),
            value: "3".into(),
            ..Default::default()
        };
        let (action, _) = encode(&model);
        let action = action.unwrap();
        assert_eq!(action.value, ParsedValue::list(["days_from_now", "3"]));
        assert_eq!(decode(action), model);
    }

    #[test]
    fn test_zis_requires_slack_target() {
        let model = ActionModel {
            field: "notification_zis".into(),
            target: "teams".into(),
            ..Default::default()
        };
        let mut diags = Diagnostics::new();
        let err = action_to_api(&model, &path().index(0), &path(), &mut diags).unwrap_err();
        assert!(err.is_error());
        assert_eq!(err.path, Some(path().index(0).attr("target")));
    }

    #[test]
    fn test_content_type_rejected_on_shaped_fields() {
        let notification = ActionModel {
            field: "notification_user".into(),
            target: "requester_id".into(),
            notification_subject: "Subj".into(),
            value: "Body".into(),
            content_type: "text/plain".into(),
            ..Default::default()
        };
        let zis = ActionModel {
            field: "notification_zis".into(),
            target: "teams".into(),
            value: "Body".into(),
            content_type: "text/plain".into(),
            ..Default::default()
        };

        for model in [notification, zis] {
            let mut diags = Diagnostics::new();
            let err = action_to_api(&model, &path().index(0), &path(), &mut diags).unwrap_err();
            assert!(err.is_error());
            assert_eq!(err.path, Some(path().index(0).attr("content_type")));
        }
    }

    #[test]
    fn test_side_conversation_ticket_round_trip() {
        let model = ActionModel {
            field: "side_conversation_ticket".into(),
            notification_subject: "Subj".into(),
            value: "Body".into(),
            target: "ops@example.com".into(),
            content_type: "text/html".into(),
            ..Default::default()
        };
        round_trip(model);
    }

    #[test]
    fn test_unused_target_warns_and_keeps_batch() {
        let list = Value::Known(vec![
            ActionModel {
                field: "status".into(),
                value: "open".into(),
                ..Default::default()
            },
            ActionModel {
                field: "priority".into(),
                target: "someone".into(),
                value: "high".into(),
                ..Default::default()
            },
            ActionModel {
                field: "group_id".into(),
                value: "77".into(),
                ..Default::default()
            },
        ]);
        let mut diags = Diagnostics::new();
        let actions = actions_to_api(&list, &path(), &mut diags).unwrap();

        assert!(!diags.has_error());
        assert_eq!(diags.warnings().count(), 1);
        assert_eq!(actions.len(), 3);
        assert_eq!(actions[0].field, "status");
        assert_eq!(actions[1], Action::default());
        assert_eq!(actions[2].value, ParsedValue::scalar("77"));
    }

    #[test]
    fn test_empty_field_aborts_batch() {
        let list = Value::Known(vec![ActionModel {
            field: "".into(),
            ..Default::default()
        }]);
        let mut diags = Diagnostics::new();
        assert!(actions_to_api(&list, &path(), &mut diags).is_none());
        assert_eq!(diags.errors().next().unwrap().path, Some(path()));
    }

    #[test]
    fn test_empty_value_warns_and_falls_back() {
        let mut diags = Diagnostics::new();
        let model = action_from_api(
            Action {
                field: "notification_user".to_string(),
                value: ParsedValue::List(Vec::new()),
            },
            &path().index(0),
            &mut diags,
        )
        .unwrap();
        assert_eq!(model.value, Value::Known(String::new()));
        assert_eq!(model.target, Value::Null);
        assert!(!diags.has_error());
        assert_eq!(diags.warnings().count(), 1);
    }

    #[test]
    fn test_unrecognized_list_is_error() {
        let mut diags = Diagnostics::new();
        let err = action_from_api(
            Action {
                field: "status".to_string(),
                value: ParsedValue::list(["a", "b", "c"]),
            },
            &path().index(0),
            &mut diags,
        )
        .unwrap_err();
        assert!(err.is_error());
    }

    #[test]
    fn test_wrong_slot_count_is_error() {
        let mut diags = Diagnostics::new();
        let result = actions_from_api(
            vec![Action {
                field: "notification_user".to_string(),
                value: ParsedValue::list(["requester_id", "body"]),
            }],
            &path(),
            &mut diags,
        );
        assert!(result.is_none());
        assert!(diags.has_error());
    }

    #[test]
    fn test_unknown_target_fails_fast() {
        let model = ActionModel {
            field: "notification_webhook".into(),
            target: Value::Unknown,
            ..Default::default()
        };
        let mut diags = Diagnostics::new();
        let err = action_to_api(&model, &path().index(0), &path(), &mut diags).unwrap_err();
        assert_eq!(err.summary, "Value not yet known");
    }
}
