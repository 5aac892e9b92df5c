//! Declarative whole-form validation.
//!
//! A [`Ruleset`] is a flat list of [`Rule`]s. Each rule reads the part of the
//! form it cares about through a plain function pointer and, when it fails,
//! reports a message at one field path. Rules never short-circuit each other:
//! a report always carries every failing path.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::contact::is_valid_phone_number;
use crate::domain::form::FlexibleFormState;
use crate::domain::selection::{OtherText, Referral, YesNo};
use crate::domain::service::ServiceRecord;
use crate::domain::steps::StepCatalog;
use crate::errors::{IntakeError, Result};

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));

/// Validation messages keyed by field path (`vol_coor`,
/// `services[1].fee_category`, `funding_sources.other`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationReport {
    errors: BTreeMap<String, String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure. The first message reported for a path wins.
    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(path.into()).or_insert_with(|| message.into());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.errors.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|(path, message)| (path.as_str(), message.as_str()))
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(path, message)| format!("{path}: {message}"))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// What a rule inspects. All variants except [`Check::When`] and
/// [`Check::Services`] are leaf checks.
pub enum Check {
    /// Scalar text must be non-blank.
    Text(fn(&FlexibleFormState) -> &str),
    /// Scalar text, when filled in, must be a 10-digit phone number.
    Phone(fn(&FlexibleFormState) -> &str),
    /// Scalar text, when filled in, must look like an email address.
    Email(fn(&FlexibleFormState) -> &str),
    /// A radio must be answered.
    Answered(fn(&FlexibleFormState) -> YesNo),
    /// At least one option of a group (or its "other" box) must be ticked.
    AnySelected(fn(&FlexibleFormState) -> bool),
    /// A ticked "other" box needs text.
    OtherContent(fn(&FlexibleFormState) -> &OtherText),
    /// A list must hold at least one element.
    NonEmptyList(fn(&FlexibleFormState) -> usize),
    /// The inner check only applies while the trigger radio is "true".
    When {
        trigger: &'static str,
        read: fn(&FlexibleFormState) -> YesNo,
        then: Box<Check>,
    },
    /// Per-service checks, reported as `services[i].<suffix>`.
    Services(Vec<ServiceRule>),
}

/// What a per-service rule inspects.
pub enum ServiceCheck {
    Text(fn(&ServiceRecord) -> &str),
    AnySelected(fn(&ServiceRecord) -> bool),
    OtherContent(fn(&ServiceRecord) -> &OtherText),
    ReferralContent(fn(&ServiceRecord) -> &Referral),
}

pub struct ServiceRule {
    pub suffix: &'static str,
    pub message: &'static str,
    pub check: ServiceCheck,
}

impl ServiceRule {
    pub fn new(suffix: &'static str, message: &'static str, check: ServiceCheck) -> Self {
        Self {
            suffix,
            message,
            check,
        }
    }

    fn passes(&self, service: &ServiceRecord) -> bool {
        match &self.check {
            ServiceCheck::Text(read) => !read(service).trim().is_empty(),
            ServiceCheck::AnySelected(test) => test(service),
            ServiceCheck::OtherContent(read) => {
                let other = read(service);
                !other.selected || other.has_content()
            }
            ServiceCheck::ReferralContent(read) => {
                let referral = read(service);
                !referral.required || referral.has_content()
            }
        }
    }
}

/// One declarative rule: the field name it belongs to (matched against a
/// subpage's field list), the path it reports at, and its message.
pub struct Rule {
    pub scope: &'static str,
    pub path: &'static str,
    pub message: &'static str,
    pub check: Check,
}

impl Rule {
    pub fn new(scope: &'static str, message: &'static str, check: Check) -> Self {
        Self {
            scope,
            path: scope,
            message,
            check,
        }
    }

    /// Reports at `path` instead of the scope name.
    pub fn at(mut self, path: &'static str) -> Self {
        self.path = path;
        self
    }

    /// Only applies while the `trigger` radio is answered "true".
    pub fn when(
        mut self,
        trigger: &'static str,
        read: fn(&FlexibleFormState) -> YesNo,
    ) -> Self {
        self.check = Check::When {
            trigger,
            read,
            then: Box::new(self.check),
        };
        self
    }

    /// Field names this rule touches: its scope plus any trigger radios.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields = vec![self.scope];
        let mut check = &self.check;
        while let Check::When { trigger, then, .. } = check {
            fields.push(*trigger);
            check = then.as_ref();
        }
        fields
    }

    fn evaluate(&self, state: &FlexibleFormState, report: &mut ValidationReport) {
        Self::run(&self.check, self.path, self.message, state, report);
    }

    fn run(
        check: &Check,
        path: &str,
        message: &str,
        state: &FlexibleFormState,
        report: &mut ValidationReport,
    ) {
        let passed = match check {
            Check::Text(read) => !read(state).trim().is_empty(),
            Check::Phone(read) => {
                let value = read(state).trim();
                value.is_empty() || is_valid_phone_number(value)
            }
            Check::Email(read) => {
                let value = read(state).trim();
                value.is_empty() || EMAIL.is_match(value)
            }
            Check::Answered(read) => read(state).is_answered(),
            Check::AnySelected(test) => test(state),
            Check::OtherContent(read) => {
                let other = read(state);
                !other.selected || other.has_content()
            }
            Check::NonEmptyList(len) => len(state) > 0,
            Check::When { read, then, .. } => {
                if read(state).is_yes() {
                    Self::run(then, path, message, state, report);
                }
                true
            }
            Check::Services(rules) => {
                for (index, service) in state.services.iter().enumerate() {
                    for rule in rules {
                        if !rule.passes(service) {
                            report.add(format!("services[{index}].{}", rule.suffix), rule.message);
                        }
                    }
                }
                true
            }
        };
        if !passed {
            report.add(path, message);
        }
    }
}

/// The full set of cross-field rules for the intake form.
pub struct Ruleset {
    rules: Vec<Rule>,
}

impl Ruleset {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Evaluates every rule against the whole form.
    pub fn validate(&self, state: &FlexibleFormState) -> ValidationReport {
        let mut report = ValidationReport::new();
        for rule in &self.rules {
            rule.evaluate(state, &mut report);
        }
        report
    }

    /// Evaluates only the rules scoped to `fields` (a subpage's field list).
    pub fn validate_fields<S: AsRef<str>>(
        &self,
        state: &FlexibleFormState,
        fields: &[S],
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        for rule in self
            .rules
            .iter()
            .filter(|rule| fields.iter().any(|field| field.as_ref() == rule.scope))
        {
            rule.evaluate(state, &mut report);
        }
        debug!(fields = fields.len(), errors = report.len(), "subpage validated");
        report
    }

    /// Every field name any rule touches.
    pub fn known_fields(&self) -> BTreeSet<&'static str> {
        self.rules.iter().flat_map(Rule::fields).collect()
    }

    /// Rejects step layouts that name fields no rule knows about, and layouts
    /// that put a conditional rule on a different subpage than its trigger.
    pub fn check_catalog(&self, catalog: &StepCatalog) -> Result<()> {
        let known = self.known_fields();
        let unknown: Vec<&str> = catalog
            .field_names()
            .filter(|field| !known.contains(*field))
            .collect();
        if !unknown.is_empty() {
            return Err(IntakeError::Config(format!(
                "step catalog names unknown fields: {}",
                unknown.join(", ")
            )));
        }

        for subpage in catalog.steps().iter().flat_map(|step| step.subpages.iter()) {
            for rule in self
                .rules
                .iter()
                .filter(|rule| subpage.fields.iter().any(|field| field == rule.scope))
            {
                if let Some(missing) = rule
                    .fields()
                    .into_iter()
                    .find(|field| !subpage.fields.iter().any(|listed| listed == field))
                {
                    return Err(IntakeError::Config(format!(
                        "subpage `{}` validates `{}` without its trigger `{}`",
                        subpage.id, rule.scope, missing
                    )));
                }
            }
        }
        Ok(())
    }

    /// The agency intake rules.
    pub fn standard() -> Self {
        Self::new(vec![
            // Agency profile
            Rule::new(
                "legal_name",
                "Please enter the agency's legal name",
                Check::Text(|s| s.legal_name.as_str()),
            ),
            Rule::new(
                "director_name",
                "Please enter the executive director's name",
                Check::Text(|s| s.director_name.as_str()),
            ),
            Rule::new(
                "main_phone",
                "Please enter the main phone number",
                Check::Text(|s| s.main_phone.as_str()),
            ),
            Rule::new(
                "main_phone",
                "Please enter a valid phone number",
                Check::Phone(|s| s.main_phone.as_str()),
            ),
            Rule::new(
                "email",
                "Please enter an email address",
                Check::Text(|s| s.email.as_str()),
            ),
            Rule::new(
                "email",
                "Please enter a valid email address",
                Check::Email(|s| s.email.as_str()),
            ),
            Rule::new(
                "physical_address",
                "Please enter the physical address",
                Check::Text(|s| s.physical_address.as_str()),
            ),
            Rule::new(
                "mission",
                "Please describe the agency's mission",
                Check::Text(|s| s.mission.as_str()),
            ),
            // Contact
            Rule::new(
                "contact_name",
                "Please enter a contact name",
                Check::Text(|s| s.contact_name.as_str()),
            ),
            Rule::new(
                "contact_phone",
                "Please enter a contact phone number",
                Check::Text(|s| s.contact_phone.as_str()),
            ),
            Rule::new(
                "contact_phone",
                "Please enter a valid phone number",
                Check::Phone(|s| s.contact_phone.as_str()),
            ),
            // Hours
            Rule::new(
                "regular_days_open",
                "Please select at least one day",
                Check::AnySelected(|s| s.regular_days_open.any()),
            ),
            // Services
            Rule::new(
                "services",
                "Please add at least one service",
                Check::NonEmptyList(|s| s.services.len()),
            ),
            Rule::new(
                "services",
                "Please complete every service",
                Check::Services(Self::service_rules()),
            ),
            // Funding and languages
            Rule::new(
                "funding_sources",
                "Please select at least one funding source",
                Check::AnySelected(|s| s.funding_sources.has_selection()),
            ),
            Rule::new(
                "funding_sources",
                "Please describe the other funding source",
                Check::OtherContent(|s| &s.funding_sources.other),
            )
            .at("funding_sources.other"),
            Rule::new(
                "languages",
                "Please select at least one language",
                Check::AnySelected(|s| s.languages.has_selection()),
            ),
            Rule::new(
                "languages",
                "Please name the other language",
                Check::OtherContent(|s| &s.languages.other),
            )
            .at("languages.other"),
            Rule::new(
                "non_profit",
                "Please indicate whether the agency is a non-profit",
                Check::Answered(|s| s.non_profit),
            ),
            // Volunteers
            Rule::new(
                "vol_reqs",
                "Please describe the volunteer requirements",
                Check::Text(|s| s.vol_reqs.as_str()),
            )
            .when("volunteers", |s| s.volunteers),
            Rule::new(
                "vol_coor",
                "Please enter the volunteer coordinator's name",
                Check::Text(|s| s.vol_coor.as_str()),
            )
            .when("volunteers", |s| s.volunteers),
            Rule::new(
                "vol_coor_tel",
                "Please enter the volunteer coordinator's phone number",
                Check::Text(|s| s.vol_coor_tel.as_str()),
            )
            .when("volunteers", |s| s.volunteers),
            Rule::new(
                "vol_coor_tel",
                "Please enter a valid phone number",
                Check::Phone(|s| s.vol_coor_tel.as_str()),
            )
            .when("volunteers", |s| s.volunteers),
            // Donations
            Rule::new(
                "don_ex",
                "Please give examples of accepted donations",
                Check::Text(|s| s.don_ex.as_str()),
            )
            .when("donation", |s| s.donation),
            Rule::new(
                "pickup",
                "Please indicate whether donations can be picked up",
                Check::Answered(|s| s.pickup),
            )
            .when("donation", |s| s.donation),
            Rule::new(
                "pickup_loc",
                "Please enter the pickup location",
                Check::Text(|s| s.pickup_loc.as_str()),
            )
            .when("pickup", |s| s.pickup)
            .when("donation", |s| s.donation),
            Rule::new(
                "don_coor",
                "Please enter the donation coordinator's name",
                Check::Text(|s| s.don_coor.as_str()),
            )
            .when("donation", |s| s.donation),
            Rule::new(
                "don_coor_tel",
                "Please enter the donation coordinator's phone number",
                Check::Text(|s| s.don_coor_tel.as_str()),
            )
            .when("donation", |s| s.donation),
            Rule::new(
                "don_coor_tel",
                "Please enter a valid phone number",
                Check::Phone(|s| s.don_coor_tel.as_str()),
            )
            .when("donation", |s| s.donation),
            // Recommendations
            Rule::new(
                "recommendations_contact",
                "Please enter who we should contact about recommendations",
                Check::Text(|s| s.recommendations_contact.as_str()),
            )
            .when("recommendation", |s| s.recommendation),
            // Review
            Rule::new(
                "submitter_name",
                "Please enter your name to confirm the submission",
                Check::Text(|s| s.submitter_name.as_str()),
            ),
        ])
    }

    fn service_rules() -> Vec<ServiceRule> {
        vec![
            ServiceRule::new(
                "name",
                "Please name this service",
                ServiceCheck::Text(|s| s.name.as_str()),
            ),
            ServiceRule::new(
                "full_description",
                "Please describe this service",
                ServiceCheck::Text(|s| s.full_description.as_str()),
            ),
            ServiceRule::new(
                "eligibility_requirements",
                "Please describe who is eligible",
                ServiceCheck::Text(|s| s.eligibility_requirements.as_str()),
            ),
            ServiceRule::new(
                "application_process",
                "Please select at least one way to apply",
                ServiceCheck::AnySelected(|s| s.application_process.has_selection()),
            ),
            ServiceRule::new(
                "application_process.other",
                "Please describe the other application process",
                ServiceCheck::OtherContent(|s| &s.application_process.methods.other),
            ),
            ServiceRule::new(
                "application_process.referral",
                "Please describe the referral that is required",
                ServiceCheck::ReferralContent(|s| &s.application_process.referral),
            ),
            ServiceRule::new(
                "fee_category",
                "Please select at least one fee option",
                ServiceCheck::AnySelected(|s| s.fee_category.has_selection()),
            ),
            ServiceRule::new(
                "fee_category.other",
                "Please describe the other fee arrangement",
                ServiceCheck::OtherContent(|s| &s.fee_category.other),
            ),
            ServiceRule::new(
                "required_documents",
                "Please select the documents clients must bring",
                ServiceCheck::AnySelected(|s| s.required_documents.has_selection()),
            ),
            ServiceRule::new(
                "required_documents.other",
                "Please describe the other required document",
                ServiceCheck::OtherContent(|s| &s.required_documents.other),
            ),
        ]
    }
}

impl fmt::Debug for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ruleset")
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::standard()
    }
}
