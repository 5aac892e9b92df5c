use serde::{Deserialize, Serialize};

use crate::domain::common::{EntryId, Identifiable, TimeSlot, Weekday};

/// A single opening window on one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRangeEntry {
    pub id: EntryId,
    pub day: Weekday,
    pub open_time: TimeSlot,
    pub close_time: TimeSlot,
}

impl TimeRangeEntry {
    pub fn new(id: EntryId, day: Weekday, open_time: TimeSlot, close_time: TimeSlot) -> Self {
        Self {
            id,
            day,
            open_time,
            close_time,
        }
    }

    /// `12:00 AM` to `12:00 AM` marks a 24-hour day.
    pub fn is_full_day(&self) -> bool {
        self.open_time == TimeSlot::MIDNIGHT && self.close_time == TimeSlot::MIDNIGHT
    }

    /// Ordering key: weekday, then opening minute, then closing minute.
    pub fn sort_key(&self) -> (u8, u16, u16) {
        (
            self.day.ordinal(),
            self.open_time.minute_of_day(),
            self.close_time.minute_of_day(),
        )
    }

    pub fn same_window(&self, day: Weekday, open_time: TimeSlot, close_time: TimeSlot) -> bool {
        self.day == day && self.open_time == open_time && self.close_time == close_time
    }
}

impl Identifiable for TimeRangeEntry {
    fn id(&self) -> EntryId {
        self.id
    }
}

/// Unsubmitted picker values for a new hours entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursDraft {
    pub day: Option<Weekday>,
    pub open_time: Option<TimeSlot>,
    pub close_time: Option<TimeSlot>,
}

impl HoursDraft {
    pub fn new(day: Weekday, open_time: TimeSlot, close_time: TimeSlot) -> Self {
        Self {
            day: Some(day),
            open_time: Some(open_time),
            close_time: Some(close_time),
        }
    }
}
