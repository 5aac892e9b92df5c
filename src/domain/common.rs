//! Shared identifiers, weekdays and the half-hour time vocabulary.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Exposes the stable identifier used as a list key.
pub trait Identifiable {
    fn id(&self) -> EntryId;
}

/// Creation timestamp (milliseconds) used as the stable key of list entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the agency record a submission is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Days of the week in canonical (Monday-first) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Zero-based position in the week, Monday first.
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeSlotError {
    #[error("`{0}` is not a time of day (use e.g. 9:00 AM)")]
    Unparseable(String),
    #[error("`{0}` is not on a half-hour boundary")]
    OffGrid(String),
}

/// One of the 48 half-hour slots offered by the hours pickers ("12:00 AM" ..
/// "11:30 PM"). Stored as minutes after midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot(u16);

impl TimeSlot {
    pub const SLOT_MINUTES: u16 = 30;
    pub const COUNT: u16 = 48;
    pub const MIDNIGHT: TimeSlot = TimeSlot(0);

    /// Builds a slot from a zero-based index into the 48-slot vocabulary.
    pub fn from_index(index: u16) -> Option<Self> {
        (index < Self::COUNT).then_some(Self(index * Self::SLOT_MINUTES))
    }

    pub fn all() -> impl Iterator<Item = TimeSlot> {
        (0..Self::COUNT).map(|index| TimeSlot(index * Self::SLOT_MINUTES))
    }

    pub fn minute_of_day(self) -> u16 {
        self.0
    }

    pub fn parse(input: &str) -> Result<Self, TimeSlotError> {
        let trimmed = input.trim();
        let time = NaiveTime::parse_from_str(trimmed, "%I:%M %p")
            .map_err(|_| TimeSlotError::Unparseable(trimmed.to_string()))?;
        let minutes = (time.hour() * 60 + time.minute()) as u16;
        if minutes % Self::SLOT_MINUTES != 0 {
            return Err(TimeSlotError::OffGrid(trimmed.to_string()));
        }
        Ok(Self(minutes))
    }

    pub fn label(self) -> String {
        NaiveTime::from_hms_opt(u32::from(self.0 / 60), u32::from(self.0 % 60), 0)
            .map(|time| time.format("%-I:%M %p").to_string())
            .unwrap_or_default()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for TimeSlot {
    type Err = TimeSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = TimeSlotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.label()
    }
}
