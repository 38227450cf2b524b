//! SLA policies.

use serde::{Deserialize, Serialize};

use super::{filter_from_api, filter_to_api, optional, required};
use crate::crud::ResourceModel;
use crate::framework::{AttributePath, Diagnostic, Diagnostics, Value};
use crate::models::{PolicyMetric, SlaPolicy};
use crate::transform::ConditionsModel;

/// A response-time target for one priority.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolicyMetricModel {
    /// Ticket priority the target applies to.
    #[serde(default)]
    pub priority: Value<String>,

    /// Metric name, e.g. `first_reply_time`.
    #[serde(default)]
    pub metric: Value<String>,

    /// Minutes.
    #[serde(default)]
    pub target: Value<i64>,

    /// Whether the target counts business hours only.
    #[serde(default)]
    pub business_hours: Value<bool>,
}

/// Configuration of an SLA policy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlaPolicyModel {
    /// Server-assigned id.
    #[serde(default)]
    pub id: Value<i64>,

    /// Policy title.
    #[serde(default)]
    pub title: Value<String>,

    /// Free-text description.
    #[serde(default)]
    pub description: Value<String>,

    /// Order among policies.
    #[serde(default)]
    pub position: Value<i64>,

    /// Tickets the policy applies to.
    #[serde(default)]
    pub filter: Value<ConditionsModel>,

    /// Targets per priority and metric.
    #[serde(default)]
    pub policy_metrics: Value<Vec<PolicyMetricModel>>,
}

fn metric_to_api(
    model: &PolicyMetricModel,
    path: &AttributePath,
) -> Result<PolicyMetric, Diagnostic> {
    Ok(PolicyMetric {
        priority: model.priority.require(&path.attr("priority"))?.clone(),
        metric: model.metric.require(&path.attr("metric"))?.clone(),
        target: *model.target.require(&path.attr("target"))?,
        business_hours: model
            .business_hours
            .resolve_cloned(&path.attr("business_hours"))?
            .unwrap_or(false),
    })
}

impl SlaPolicyModel {
    fn build(&self) -> Result<SlaPolicy, Diagnostic> {
        let path = AttributePath::root("policy_metrics");
        let policy_metrics = match self.policy_metrics.resolve(&path)? {
            Some(metrics) => metrics
                .iter()
                .enumerate()
                .map(|(i, m)| metric_to_api(m, &path.index(i)))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        Ok(SlaPolicy {
            title: required(&self.title, "title")?,
            description: optional(&self.description, "description")?,
            position: optional(&self.position, "position")?,
            policy_metrics,
            ..Default::default()
        })
    }
}

impl ResourceModel for SlaPolicyModel {
    type Api = SlaPolicy;
    const TYPE_NAME: &'static str = "SLA policy";

    fn to_api_model(&self, diags: &mut Diagnostics) -> Option<SlaPolicy> {
        let mut policy = diags.capture(self.build())?;
        policy.filter = filter_to_api(&self.filter, &AttributePath::root("filter"), diags)?
            .unwrap_or_default();
        Some(policy)
    }

    fn from_api_model(&mut self, api: SlaPolicy, diags: &mut Diagnostics) {
        self.id = Value::from_option(api.id);
        self.title = Value::Known(api.title);
        self.description = Value::from_option(api.description);
        self.position = Value::from_option(api.position);
        self.policy_metrics = Value::from_non_empty(
            api.policy_metrics
                .into_iter()
                .map(|m| PolicyMetricModel {
                    priority: Value::Known(m.priority),
                    metric: Value::Known(m.metric),
                    target: Value::Known(m.target),
                    business_hours: Value::Known(m.business_hours),
                })
                .collect(),
        );
        let filter_path = AttributePath::root("filter");
        if let Some(filter) = filter_from_api(Some(api.filter), &filter_path, diags) {
            self.filter = filter;
        }
    }

    fn id(&self) -> Option<i64> {
        self.id.as_known().copied()
    }
}
