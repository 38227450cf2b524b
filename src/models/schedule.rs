//! Business-hours schedule models.

use serde::{Deserialize, Serialize};

use super::ApiResource;

/// Minutes in one day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// One covered span of the week.
///
/// Both ends are minute offsets from Sunday 00:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScheduleInterval {
    /// Start, in minutes since the start of the week.
    pub start_time: i64,
    /// End, in minutes since the start of the week.
    pub end_time: i64,
}

impl ScheduleInterval {
    /// Creates an interval from week-relative minute offsets.
    pub fn new(start_time: i64, end_time: i64) -> Self {
        Self {
            start_time,
            end_time,
        }
    }
}

/// A business-hours schedule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schedule {
    /// Unique schedule ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Schedule name.
    pub name: String,

    /// IANA-style time zone name (`Pacific Time (US & Canada)`).
    pub time_zone: String,

    /// Weekly coverage.
    #[serde(default)]
    pub intervals: Vec<ScheduleInterval>,

    /// Creation timestamp.
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,

    /// Last update timestamp.
    #[serde(default, skip_serializing)]
    pub updated_at: Option<String>,
}

impl ApiResource for Schedule {
    type Id = i64;
    const COLLECTION: &'static str = "business_hours/schedules";
    const ENVELOPE: &'static str = "schedule";
}
