//! Checkbox groups, their free-text escape hatches, and yes/no radios.
//!
//! Every group is a set of enum options plus an optional "other" extension.
//! Groups never hold unknown keys: an option either exists in the enum or it
//! cannot be selected.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A fixed checkbox option with a display label. `ALL` is the declared order
/// used whenever a group is flattened.
pub trait FlagOption: Copy + Ord + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;
}

/// Free-text "Other" checkbox.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherText {
    pub selected: bool,
    pub content: String,
}

impl OtherText {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            selected: true,
            content: content.into(),
        }
    }

    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// "Referral required" flag with the description of who must refer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referral {
    pub required: bool,
    pub content: String,
}

impl Referral {
    pub fn required(content: impl Into<String>) -> Self {
        Self {
            required: true,
            content: content.into(),
        }
    }

    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagGroup<O: FlagOption> {
    pub selected: BTreeSet<O>,
    #[serde(default)]
    pub other: OtherText,
}

impl<O: FlagOption> Default for FlagGroup<O> {
    fn default() -> Self {
        Self {
            selected: BTreeSet::new(),
            other: OtherText::default(),
        }
    }
}

impl<O: FlagOption> FlagGroup<O> {
    pub fn of(options: &[O]) -> Self {
        Self {
            selected: options.iter().copied().collect(),
            other: OtherText::default(),
        }
    }

    pub fn with_other(mut self, content: impl Into<String>) -> Self {
        self.other = OtherText::new(content);
        self
    }

    pub fn set(&mut self, option: O, on: bool) {
        if on {
            self.selected.insert(option);
        } else {
            self.selected.remove(&option);
        }
    }

    /// True when any fixed option or the "other" box is ticked.
    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty() || self.other.selected
    }

    /// Selected options in declared order.
    pub fn ordered(&self) -> impl Iterator<Item = O> + '_ {
        O::ALL
            .iter()
            .copied()
            .filter(move |option| self.selected.contains(option))
    }
}

/// Radio answer stored the way the form posts it: `""`, `"true"` or `"false"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    #[default]
    #[serde(rename = "")]
    Unanswered,
    #[serde(rename = "true")]
    Yes,
    #[serde(rename = "false")]
    No,
}

impl YesNo {
    pub fn is_yes(self) -> bool {
        self == YesNo::Yes
    }

    pub fn is_answered(self) -> bool {
        self != YesNo::Unanswered
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value {
            YesNo::Yes
        } else {
            YesNo::No
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationMethod {
    WalkIn,
    Telephone,
    Appointment,
    Online,
}

impl FlagOption for ApplicationMethod {
    const ALL: &'static [Self] = &[
        ApplicationMethod::WalkIn,
        ApplicationMethod::Telephone,
        ApplicationMethod::Appointment,
        ApplicationMethod::Online,
    ];

    fn label(self) -> &'static str {
        match self {
            ApplicationMethod::WalkIn => "Walk-in",
            ApplicationMethod::Telephone => "Telephone",
            ApplicationMethod::Appointment => "Appointment",
            ApplicationMethod::Online => "Online",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeOption {
    NoFee,
    SlidingScale,
    FlatFee,
    Medicaid,
    Medicare,
    PrivateInsurance,
}

impl FlagOption for FeeOption {
    const ALL: &'static [Self] = &[
        FeeOption::NoFee,
        FeeOption::SlidingScale,
        FeeOption::FlatFee,
        FeeOption::Medicaid,
        FeeOption::Medicare,
        FeeOption::PrivateInsurance,
    ];

    fn label(self) -> &'static str {
        match self {
            FeeOption::NoFee => "No Fee",
            FeeOption::SlidingScale => "Sliding Scale",
            FeeOption::FlatFee => "Flat Fee",
            FeeOption::Medicaid => "Medicaid",
            FeeOption::Medicare => "Medicare",
            FeeOption::PrivateInsurance => "Private Insurance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentOption {
    NoDocuments,
    PhotoId,
    ProofOfAddress,
    ProofOfIncome,
    SocialSecurityCard,
    BirthCertificate,
}

impl FlagOption for DocumentOption {
    const ALL: &'static [Self] = &[
        DocumentOption::NoDocuments,
        DocumentOption::PhotoId,
        DocumentOption::ProofOfAddress,
        DocumentOption::ProofOfIncome,
        DocumentOption::SocialSecurityCard,
        DocumentOption::BirthCertificate,
    ];

    fn label(self) -> &'static str {
        match self {
            DocumentOption::NoDocuments => "No Documents Required",
            DocumentOption::PhotoId => "Photo ID",
            DocumentOption::ProofOfAddress => "Proof of Address",
            DocumentOption::ProofOfIncome => "Proof of Income",
            DocumentOption::SocialSecurityCard => "Social Security Card",
            DocumentOption::BirthCertificate => "Birth Certificate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingSource {
    Federal,
    State,
    County,
    City,
    Donations,
    Foundations,
    FeesDues,
    UnitedWay,
}

impl FlagOption for FundingSource {
    const ALL: &'static [Self] = &[
        FundingSource::Federal,
        FundingSource::State,
        FundingSource::County,
        FundingSource::City,
        FundingSource::Donations,
        FundingSource::Foundations,
        FundingSource::FeesDues,
        FundingSource::UnitedWay,
    ];

    fn label(self) -> &'static str {
        match self {
            FundingSource::Federal => "Federal",
            FundingSource::State => "State",
            FundingSource::County => "County",
            FundingSource::City => "City",
            FundingSource::Donations => "Donations",
            FundingSource::Foundations => "Foundations/Private Organizations",
            FundingSource::FeesDues => "Fees/Dues",
            FundingSource::UnitedWay => "United Way",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    English,
    Spanish,
    Vietnamese,
    Chinese,
    Arabic,
    SignLanguage,
}

impl FlagOption for Language {
    const ALL: &'static [Self] = &[
        Language::English,
        Language::Spanish,
        Language::Vietnamese,
        Language::Chinese,
        Language::Arabic,
        Language::SignLanguage,
    ];

    fn label(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::Vietnamese => "Vietnamese",
            Language::Chinese => "Chinese",
            Language::Arabic => "Arabic",
            Language::SignLanguage => "American Sign Language",
        }
    }
}
