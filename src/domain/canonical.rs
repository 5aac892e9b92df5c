//! Backend-shaped agency record produced at submission time.

use serde::{Deserialize, Serialize};

use crate::domain::common::{EntryId, TimeSlot, Weekday};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalHours {
    pub day: Weekday,
    pub open_time: TimeSlot,
    pub close_time: TimeSlot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalContact {
    pub label: String,
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalService {
    pub id: EntryId,
    pub name: String,
    pub full_description: String,
    pub contact_person_name: String,
    pub days_open: Vec<CanonicalHours>,
    pub eligibility_requirements: String,
    pub application_process: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_requirements: Option<String>,
    pub fee_category: Vec<String>,
    pub required_documents: Vec<String>,
    pub is_seasonal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalAgencyInfo {
    pub legal_name: String,
    pub director_name: String,
    pub main_phone: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub physical_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailing_address: Option<String>,
    pub mission: String,

    pub contact_name: String,
    pub contact_phone: String,
    pub additional_numbers: Vec<CanonicalContact>,

    pub hours: Vec<CanonicalHours>,
    pub regular_days_open: Vec<Weekday>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holiday_schedule: Option<String>,

    pub services: Vec<CanonicalService>,

    pub funding_sources: Vec<String>,
    pub languages: Vec<String>,
    pub non_profit: bool,

    pub volunteer_opportunities: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volunteer_requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volunteer_coordinator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volunteer_coordinator_phone: Option<String>,

    pub donation_opportunities: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donation_examples: Option<String>,
    pub donation_pickup: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donation_pickup_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donation_coordinator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donation_coordinator_phone: Option<String>,

    pub recommendation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations_contact: Option<String>,

    pub submitted_by: String,
}
