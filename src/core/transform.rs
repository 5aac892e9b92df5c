//! Conversion of a validated form into the canonical agency record.

use tracing::debug;

use crate::core::rules::{Ruleset, ValidationReport};
use crate::domain::canonical::{
    CanonicalAgencyInfo, CanonicalContact, CanonicalHours, CanonicalService,
};
use crate::domain::common::Weekday;
use crate::domain::contact::ContactNumberEntry;
use crate::domain::form::FlexibleFormState;
use crate::domain::hours::TimeRangeEntry;
use crate::domain::selection::{FlagGroup, FlagOption};
use crate::domain::service::ServiceRecord;

/// Proof that a form passed the full ruleset. Only this type can be
/// canonicalized, so conversion itself never fails.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedForm<'a> {
    state: &'a FlexibleFormState,
}

impl<'a> ValidatedForm<'a> {
    pub fn new(state: &'a FlexibleFormState, rules: &Ruleset) -> Result<Self, ValidationReport> {
        let report = rules.validate(state);
        if report.is_valid() {
            Ok(Self { state })
        } else {
            Err(report)
        }
    }

    pub fn state(&self) -> &'a FlexibleFormState {
        self.state
    }
}

/// Maps the editable form onto the backend record.
pub fn canonicalize(form: &ValidatedForm<'_>) -> CanonicalAgencyInfo {
    let state = form.state();
    let volunteers = state.volunteers.is_yes();
    let donation = state.donation.is_yes();
    let pickup = donation && state.pickup.is_yes();
    let recommendation = state.recommendation.is_yes();

    let info = CanonicalAgencyInfo {
        legal_name: clean(&state.legal_name),
        director_name: clean(&state.director_name),
        main_phone: clean(&state.main_phone),
        email: clean(&state.email),
        website: optional(&state.website),
        physical_address: clean(&state.physical_address),
        mailing_address: optional(&state.mailing_address),
        mission: clean(&state.mission),

        contact_name: clean(&state.contact_name),
        contact_phone: clean(&state.contact_phone),
        additional_numbers: state.additional_numbers.iter().map(contact).collect(),

        hours: state.hours.iter().map(hours).collect(),
        regular_days_open: Weekday::ALL
            .into_iter()
            .filter(|day| state.regular_days_open.get(*day))
            .collect(),
        holiday_schedule: optional(&state.holiday_schedule),

        services: state.services.iter().map(service).collect(),

        funding_sources: flatten_group(&state.funding_sources),
        languages: flatten_group(&state.languages),
        non_profit: state.non_profit.is_yes(),

        volunteer_opportunities: volunteers,
        volunteer_requirements: when(volunteers, &state.vol_reqs),
        volunteer_coordinator: when(volunteers, &state.vol_coor),
        volunteer_coordinator_phone: when(volunteers, &state.vol_coor_tel),

        donation_opportunities: donation,
        donation_examples: when(donation, &state.don_ex),
        donation_pickup: pickup,
        donation_pickup_location: when(pickup, &state.pickup_loc),
        donation_coordinator: when(donation, &state.don_coor),
        donation_coordinator_phone: when(donation, &state.don_coor_tel),

        recommendation,
        recommendations_contact: when(recommendation, &state.recommendations_contact),

        submitted_by: clean(&state.submitter_name),
    };
    debug!(
        services = info.services.len(),
        hours = info.hours.len(),
        "form canonicalized"
    );
    info
}

/// Selected labels in declared order, followed by the "other" text, as typed,
/// when that box is ticked.
pub fn flatten_group<O: FlagOption>(group: &FlagGroup<O>) -> Vec<String> {
    let mut labels: Vec<String> = group
        .ordered()
        .map(|option| option.label().to_string())
        .collect();
    if group.other.selected && group.other.has_content() {
        labels.push(group.other.content.clone());
    }
    labels
}

fn service(record: &ServiceRecord) -> CanonicalService {
    let process = &record.application_process;
    let referral = process.referral.required.then(|| clean(&process.referral.content));
    CanonicalService {
        id: record.id,
        name: clean(&record.name),
        full_description: clean(&record.full_description),
        contact_person_name: clean(&record.contact_person_name),
        days_open: record.days_open.iter().map(hours).collect(),
        eligibility_requirements: clean(&record.eligibility_requirements),
        application_process: flatten_group(&process.methods),
        referral_requirements: referral,
        fee_category: flatten_group(&record.fee_category),
        required_documents: flatten_group(&record.required_documents),
        is_seasonal: record.is_seasonal,
    }
}

fn hours(entry: &TimeRangeEntry) -> CanonicalHours {
    CanonicalHours {
        day: entry.day,
        open_time: entry.open_time,
        close_time: entry.close_time,
    }
}

fn contact(entry: &ContactNumberEntry) -> CanonicalContact {
    CanonicalContact {
        label: clean(&entry.label),
        number: clean(&entry.number),
    }
}

fn clean(value: &str) -> String {
    value.trim().to_string()
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn when(active: bool, value: &str) -> Option<String> {
    if active {
        optional(value)
    } else {
        None
    }
}
