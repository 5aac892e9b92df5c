use serde::{Deserialize, Serialize};

use crate::domain::common::{EntryId, Weekday};
use crate::domain::contact::ContactNumberEntry;
use crate::domain::hours::TimeRangeEntry;
use crate::domain::selection::{FlagGroup, FundingSource, Language, YesNo};
use crate::domain::service::ServiceRecord;

/// Checkbox row of the days the agency is regularly open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayFlags {
    #[serde(default)]
    pub monday: bool,
    #[serde(default)]
    pub tuesday: bool,
    #[serde(default)]
    pub wednesday: bool,
    #[serde(default)]
    pub thursday: bool,
    #[serde(default)]
    pub friday: bool,
    #[serde(default)]
    pub saturday: bool,
    #[serde(default)]
    pub sunday: bool,
}

impl DayFlags {
    pub fn of(days: &[Weekday]) -> Self {
        let mut flags = Self::default();
        for day in days {
            flags.set(*day, true);
        }
        flags
    }

    pub fn get(&self, day: Weekday) -> bool {
        match day {
            Weekday::Monday => self.monday,
            Weekday::Tuesday => self.tuesday,
            Weekday::Wednesday => self.wednesday,
            Weekday::Thursday => self.thursday,
            Weekday::Friday => self.friday,
            Weekday::Saturday => self.saturday,
            Weekday::Sunday => self.sunday,
        }
    }

    pub fn set(&mut self, day: Weekday, open: bool) {
        let slot = match day {
            Weekday::Monday => &mut self.monday,
            Weekday::Tuesday => &mut self.tuesday,
            Weekday::Wednesday => &mut self.wednesday,
            Weekday::Thursday => &mut self.thursday,
            Weekday::Friday => &mut self.friday,
            Weekday::Saturday => &mut self.saturday,
            Weekday::Sunday => &mut self.sunday,
        };
        *slot = open;
    }

    pub fn any(&self) -> bool {
        Weekday::ALL.into_iter().any(|day| self.get(day))
    }
}

/// Everything the wizard has collected so far, in the shape the pages edit it.
///
/// Field names follow the form's input names so validation messages can be
/// keyed by them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlexibleFormState {
    // Agency profile
    pub legal_name: String,
    pub director_name: String,
    pub main_phone: String,
    pub email: String,
    pub website: String,
    pub physical_address: String,
    pub mailing_address: String,
    pub mission: String,

    // Contact
    pub contact_name: String,
    pub contact_phone: String,
    pub additional_numbers: Vec<ContactNumberEntry>,

    // Hours
    pub hours: Vec<TimeRangeEntry>,
    pub regular_days_open: DayFlags,
    pub holiday_schedule: String,

    pub services: Vec<ServiceRecord>,

    // Funding and languages
    pub funding_sources: FlagGroup<FundingSource>,
    pub languages: FlagGroup<Language>,
    pub non_profit: YesNo,

    // Opportunities
    pub volunteers: YesNo,
    pub vol_reqs: String,
    pub vol_coor: String,
    pub vol_coor_tel: String,
    pub donation: YesNo,
    pub don_ex: String,
    pub pickup: YesNo,
    pub pickup_loc: String,
    pub don_coor: String,
    pub don_coor_tel: String,
    pub recommendation: YesNo,
    pub recommendations_contact: String,

    // Review
    pub submitter_name: String,
}

impl FlexibleFormState {
    pub fn service(&self, id: EntryId) -> Option<&ServiceRecord> {
        self.services.iter().find(|service| service.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let state: FlexibleFormState =
            serde_json::from_str(r#"{"legal_name":"Helping Hands","donation":"true"}"#).unwrap();
        assert_eq!(state.legal_name, "Helping Hands");
        assert_eq!(state.donation, YesNo::Yes);
        assert_eq!(state.volunteers, YesNo::Unanswered);
        assert!(state.services.is_empty());
    }

    #[test]
    fn day_flags_round_through_weekdays() {
        let mut flags = DayFlags::of(&[Weekday::Monday, Weekday::Friday]);
        assert!(flags.get(Weekday::Friday));
        assert!(!flags.get(Weekday::Sunday));
        flags.set(Weekday::Friday, false);
        flags.set(Weekday::Monday, false);
        assert!(!flags.any());
    }
}
