//! Business-hours schedules.

use serde::{Deserialize, Serialize};

use super::required;
use crate::crud::ResourceModel;
use crate::framework::{AttributePath, Diagnostics, Value};
use crate::models::Schedule;
use crate::transform::{schedule_from_api, schedule_to_api, WeeklyScheduleModel};

/// Configuration of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScheduleModel {
    /// Server-assigned id.
    #[serde(default)]
    pub id: Value<i64>,

    /// Schedule name.
    #[serde(default)]
    pub name: Value<String>,

    /// IANA-style time zone name used by the helpdesk.
    #[serde(default)]
    pub time_zone: Value<String>,

    /// Business hours per weekday.
    #[serde(default)]
    pub intervals: WeeklyScheduleModel,
}

impl ResourceModel for ScheduleModel {
    type Api = Schedule;
    const TYPE_NAME: &'static str = "schedule";

    fn to_api_model(&self, diags: &mut Diagnostics) -> Option<Schedule> {
        let name = diags.capture(required(&self.name, "name"))?;
        let time_zone = diags.capture(required(&self.time_zone, "time_zone"))?;
        let intervals = schedule_to_api(&self.intervals, &AttributePath::root("intervals"), diags)?;
        Some(Schedule {
            name,
            time_zone,
            intervals,
            ..Default::default()
        })
    }

    fn from_api_model(&mut self, api: Schedule, _diags: &mut Diagnostics) {
        self.id = Value::from_option(api.id);
        self.name = Value::Known(api.name);
        self.time_zone = Value::Known(api.time_zone);
        self.intervals = schedule_from_api(&api.intervals);
    }

    fn id(&self) -> Option<i64> {
        self.id.as_known().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduleInterval;
    use crate::transform::DayIntervalModel;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_schedule_model_to_api() {
        let model = ScheduleModel {
            name: "Support".into(),
            time_zone: "Copenhagen".into(),
            intervals: WeeklyScheduleModel {
                monday: Value::Known(DayIntervalModel::new(540, 1020)),
                friday: Value::Known(DayIntervalModel::new(540, 900)),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut diags = Diagnostics::new();
        let api = model.to_api_model(&mut diags).unwrap();
        assert_eq!(
            api.intervals,
            vec![
                ScheduleInterval::new(1980, 2460),
                ScheduleInterval::new(7740, 8100),
            ]
        );

        let mut back = ScheduleModel::default();
        back.from_api_model(api, &mut diags);
        assert_eq!(back.intervals, model.intervals);
    }
}
