//! SLA policy models.

use serde::{Deserialize, Serialize};

use super::{ApiResource, Conditions};

/// A single response-time target of an SLA policy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolicyMetric {
    /// Ticket priority the target applies to (`low` .. `urgent`).
    pub priority: String,

    /// Measured metric (`first_reply_time`, `requester_wait_time`, ...).
    pub metric: String,

    /// Target in minutes.
    pub target: i64,

    /// Whether the target counts business hours only.
    #[serde(default)]
    pub business_hours: bool,
}

/// An SLA policy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SlaPolicy {
    /// Unique policy ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Policy title.
    pub title: String,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Ordering among policies; the first matching policy applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,

    /// Tickets the policy applies to.
    #[serde(default)]
    pub filter: Conditions,

    /// Targets per priority and metric.
    #[serde(default)]
    pub policy_metrics: Vec<PolicyMetric>,

    /// Creation timestamp.
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,

    /// Last update timestamp.
    #[serde(default, skip_serializing)]
    pub updated_at: Option<String>,
}

impl ApiResource for SlaPolicy {
    type Id = i64;
    const COLLECTION: &'static str = "slas/policies";
    const ENVELOPE: &'static str = "sla_policy";
}
