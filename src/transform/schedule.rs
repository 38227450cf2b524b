//! Weekly schedule conversion.
//!
//! Configuration holds one optional `{start_time, end_time}` pair per
//! weekday, in minutes of the day. The API holds a flat list of intervals
//! in minutes from Sunday 00:00.

use serde::{Deserialize, Serialize};

use crate::framework::{AttributePath, Diagnostic, Diagnostics, Value};
use crate::models::{ScheduleInterval, MINUTES_PER_DAY};

const MINUTES_PER_HOUR: i64 = 60;
const HOURS_PER_DAY: i64 = 24;

/// Coverage of a single day.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DayIntervalModel {
    /// Start, in minutes after midnight.
    #[serde(default)]
    pub start_time: Value<i64>,

    /// End, in minutes after midnight.
    #[serde(default)]
    pub end_time: Value<i64>,
}

impl DayIntervalModel {
    /// Creates a known interval.
    pub fn new(start_time: i64, end_time: i64) -> Self {
        Self {
            start_time: Value::Known(start_time),
            end_time: Value::Known(end_time),
        }
    }
}

/// Coverage of every weekday. A `Null` day has no business hours.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeeklyScheduleModel {
    /// Sunday coverage.
    #[serde(default)]
    pub sunday: Value<DayIntervalModel>,
    /// Monday coverage.
    #[serde(default)]
    pub monday: Value<DayIntervalModel>,
    /// Tuesday coverage.
    #[serde(default)]
    pub tuesday: Value<DayIntervalModel>,
    /// Wednesday coverage.
    #[serde(default)]
    pub wednesday: Value<DayIntervalModel>,
    /// Thursday coverage.
    #[serde(default)]
    pub thursday: Value<DayIntervalModel>,
    /// Friday coverage.
    #[serde(default)]
    pub friday: Value<DayIntervalModel>,
    /// Saturday coverage.
    #[serde(default)]
    pub saturday: Value<DayIntervalModel>,
}

/// Weekday attribute names, Sunday first.
pub const WEEKDAYS: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

impl WeeklyScheduleModel {
    fn days(&self) -> [&Value<DayIntervalModel>; 7] {
        [
            &self.sunday,
            &self.monday,
            &self.tuesday,
            &self.wednesday,
            &self.thursday,
            &self.friday,
            &self.saturday,
        ]
    }

    fn days_mut(&mut self) -> [&mut Value<DayIntervalModel>; 7] {
        [
            &mut self.sunday,
            &mut self.monday,
            &mut self.tuesday,
            &mut self.wednesday,
            &mut self.thursday,
            &mut self.friday,
            &mut self.saturday,
        ]
    }
}

fn day_to_api(
    day_index: i64,
    day: &DayIntervalModel,
    path: &AttributePath,
) -> Result<ScheduleInterval, Diagnostic> {
    let offset = day_index * MINUTES_PER_DAY;
    let start_path = path.attr("start_time");
    let end_path = path.attr("end_time");
    let start = *day.start_time.require(&start_path)?;
    let end = *day.end_time.require(&end_path)?;
    if !(0..MINUTES_PER_DAY).contains(&start) {
        return Err(Diagnostic::attribute_error(
            start_path,
            "Start time out of range",
            format!("start_time must be between 0 and {}, got {start}", MINUTES_PER_DAY - 1),
        ));
    }
    if !(0..=MINUTES_PER_DAY).contains(&end) {
        return Err(Diagnostic::attribute_error(
            end_path,
            "End time out of range",
            format!("end_time must be between 0 and {MINUTES_PER_DAY}, got {end}"),
        ));
    }
    if end < start {
        return Err(Diagnostic::attribute_error(
            end_path,
            "End time before start time",
            format!("end_time {end} is earlier than start_time {start}"),
        ));
    }
    Ok(ScheduleInterval::new(start + offset, end + offset))
}

/// Flattens the weekly model into API intervals, Sunday first.
pub fn schedule_to_api(
    model: &WeeklyScheduleModel,
    path: &AttributePath,
    diags: &mut Diagnostics,
) -> Option<Vec<ScheduleInterval>> {
    let mut intervals = Vec::new();
    for (day_index, (name, day)) in WEEKDAYS.iter().zip(model.days()).enumerate() {
        let day_path = path.attr(*name);
        let Some(day) = diags.capture(day.resolve(&day_path))? else {
            continue;
        };
        intervals.push(diags.capture(day_to_api(day_index as i64, day, &day_path))?);
    }
    Some(intervals)
}

/// Spreads API intervals over the weekdays.
///
/// Each day takes the first interval starting within it. Times come back
/// truncated to the whole hour.
pub fn schedule_from_api(intervals: &[ScheduleInterval]) -> WeeklyScheduleModel {
    let mut model = WeeklyScheduleModel::default();
    for (day_index, day) in model.days_mut().into_iter().enumerate() {
        let day_index = day_index as i64;
        let day_start = day_index * MINUTES_PER_DAY;
        let found = intervals
            .iter()
            .find(|i| (day_start..day_start + MINUTES_PER_DAY).contains(&i.start_time));
        *day = match found {
            Some(interval) => {
                let to_day = |minutes: i64| {
                    (minutes / MINUTES_PER_HOUR - day_index * HOURS_PER_DAY) * MINUTES_PER_HOUR
                };
                Value::Known(DayIntervalModel::new(
                    to_day(interval.start_time),
                    to_day(interval.end_time),
                ))
            }
            None => Value::Null,
        };
    }
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn path() -> AttributePath {
        AttributePath::root("intervals")
    }

    #[test]
    fn test_sunday_only_round_trip() {
        let model = WeeklyScheduleModel {
            sunday: Value::Known(DayIntervalModel::new(300, 780)),
            ..Default::default()
        };
        let mut diags = Diagnostics::new();
        let intervals = schedule_to_api(&model, &path(), &mut diags).unwrap();
        assert_eq!(intervals, vec![ScheduleInterval::new(300, 780)]);

        let decoded = schedule_from_api(&intervals);
        assert_eq!(decoded, model);
        assert!(decoded.monday.is_null());
        assert!(decoded.saturday.is_null());
    }

    #[test]
    fn test_hour_aligned_week_round_trips() {
        let model = WeeklyScheduleModel {
            monday: Value::Known(DayIntervalModel::new(480, 1020)),
            wednesday: Value::Known(DayIntervalModel::new(0, 1440)),
            saturday: Value::Known(DayIntervalModel::new(600, 840)),
            ..Default::default()
        };
        let mut diags = Diagnostics::new();
        let intervals = schedule_to_api(&model, &path(), &mut diags).unwrap();
        assert_eq!(
            intervals,
            vec![
                ScheduleInterval::new(1920, 2460),
                ScheduleInterval::new(4320, 5760),
                ScheduleInterval::new(9240, 9480),
            ]
        );
        assert_eq!(schedule_from_api(&intervals), model);
    }

    #[test]
    fn test_sub_hour_times_truncate_to_the_hour() {
        let model = WeeklyScheduleModel {
            tuesday: Value::Known(DayIntervalModel::new(510, 1065)),
            ..Default::default()
        };
        let mut diags = Diagnostics::new();
        let intervals = schedule_to_api(&model, &path(), &mut diags).unwrap();
        let decoded = schedule_from_api(&intervals);
        assert_eq!(
            decoded.tuesday,
            Value::Known(DayIntervalModel::new(480, 1020))
        );
        assert_ne!(decoded, model);
    }

    #[test]
    fn test_first_interval_of_a_day_wins() {
        let intervals = [
            ScheduleInterval::new(1500, 1700),
            ScheduleInterval::new(1800, 2000),
        ];
        let decoded = schedule_from_api(&intervals);
        assert_eq!(decoded.monday, Value::Known(DayIntervalModel::new(60, 240)));
    }

    #[test]
    fn test_missing_end_time_is_error() {
        let model = WeeklyScheduleModel {
            friday: Value::Known(DayIntervalModel {
                start_time: Value::Known(540),
                end_time: Value::Null,
            }),
            ..Default::default()
        };
        let mut diags = Diagnostics::new();
        assert!(schedule_to_api(&model, &path(), &mut diags).is_none());
        assert_eq!(
            diags.errors().next().unwrap().path,
            Some(path().attr("friday").attr("end_time"))
        );
    }

    fn assert_rejected(day: DayIntervalModel, attr: &str) {
        let model = WeeklyScheduleModel {
            sunday: Value::Known(day),
            ..Default::default()
        };
        let mut diags = Diagnostics::new();
        assert!(schedule_to_api(&model, &path(), &mut diags).is_none());
        assert_eq!(
            diags.errors().next().unwrap().path,
            Some(path().attr("sunday").attr(attr))
        );
    }

    #[test]
    fn test_time_past_midnight_is_error() {
        assert_rejected(DayIntervalModel::new(1500, 1600), "start_time");
        assert_rejected(DayIntervalModel::new(60, 1441), "end_time");
        assert_rejected(DayIntervalModel::new(-60, 120), "start_time");
    }

    #[test]
    fn test_end_before_start_is_error() {
        assert_rejected(DayIntervalModel::new(600, 540), "end_time");
    }

    #[test]
    fn test_full_day_is_accepted() {
        let model = WeeklyScheduleModel {
            saturday: Value::Known(DayIntervalModel::new(0, MINUTES_PER_DAY)),
            ..Default::default()
        };
        let mut diags = Diagnostics::new();
        assert_eq!(
            schedule_to_api(&model, &path(), &mut diags).unwrap(),
            vec![ScheduleInterval::new(8640, 10080)]
        );
    }

    fn hour_aligned_day() -> impl Strategy<Value = Value<DayIntervalModel>> {
        let open = (0..HOURS_PER_DAY)
            .prop_flat_map(|start| (Just(start), start..=HOURS_PER_DAY))
            .prop_map(|(start, end)| {
                Value::Known(DayIntervalModel::new(
                    start * MINUTES_PER_HOUR,
                    end * MINUTES_PER_HOUR,
                ))
            });
        prop_oneof![Just(Value::Null), open]
    }

    fn hour_aligned_week() -> impl Strategy<Value = WeeklyScheduleModel> {
        prop::array::uniform7(hour_aligned_day()).prop_map(|days| {
            let mut model = WeeklyScheduleModel::default();
            for (slot, day) in model.days_mut().into_iter().zip(days) {
                *slot = day;
            }
            model
        })
    }

    proptest! {
        #[test]
        fn test_hour_aligned_weeks_round_trip(model in hour_aligned_week()) {
            let mut diags = Diagnostics::new();
            let intervals = schedule_to_api(&model, &path(), &mut diags).unwrap();
            prop_assert!(diags.is_empty());
            prop_assert!(intervals.windows(2).all(|w| w[0].start_time < w[1].start_time));
            prop_assert_eq!(schedule_from_api(&intervals), model);
        }
    }
}
