use serde::{Deserialize, Serialize};

use crate::domain::common::{EntryId, Identifiable};
use crate::domain::hours::TimeRangeEntry;
use crate::domain::selection::{
    ApplicationMethod, DocumentOption, FeeOption, FlagGroup, Referral,
};

/// How clients apply for a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationProcessSelection {
    pub methods: FlagGroup<ApplicationMethod>,
    #[serde(default)]
    pub referral: Referral,
}

impl ApplicationProcessSelection {
    pub fn has_selection(&self) -> bool {
        self.methods.has_selection() || self.referral.required
    }
}

/// One entry of the repeatable services list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: EntryId,
    pub name: String,
    #[serde(default)]
    pub full_description: String,
    #[serde(default)]
    pub contact_person_name: String,
    #[serde(default)]
    pub days_open: Vec<TimeRangeEntry>,
    #[serde(default)]
    pub eligibility_requirements: String,
    #[serde(default)]
    pub application_process: ApplicationProcessSelection,
    #[serde(default)]
    pub fee_category: FlagGroup<FeeOption>,
    #[serde(default)]
    pub required_documents: FlagGroup<DocumentOption>,
    #[serde(default)]
    pub is_seasonal: bool,
}

impl ServiceRecord {
    /// Blank service named after its 1-based list position.
    pub fn new(id: EntryId, position: usize) -> Self {
        Self {
            id,
            name: Self::default_name(position),
            full_description: String::new(),
            contact_person_name: String::new(),
            days_open: Vec::new(),
            eligibility_requirements: String::new(),
            application_process: ApplicationProcessSelection::default(),
            fee_category: FlagGroup::default(),
            required_documents: FlagGroup::default(),
            is_seasonal: false,
        }
    }

    pub fn default_name(position: usize) -> String {
        format!("Service {}", position)
    }
}

impl Identifiable for ServiceRecord {
    fn id(&self) -> EntryId {
        self.id
    }
}
