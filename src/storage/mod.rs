pub mod json_backend;

use crate::domain::canonical::CanonicalAgencyInfo;
use crate::domain::common::RecordId;
use crate::domain::form::FlexibleFormState;
use crate::errors::Result;

/// Persistence collaborator for finished submissions and in-progress drafts.
pub trait SubmissionStore: Send + Sync {
    fn save(&self, record: &RecordId, info: &CanonicalAgencyInfo) -> Result<()>;
    fn load(&self, record: &RecordId) -> Result<CanonicalAgencyInfo>;

    fn save_draft(&self, record: &RecordId, state: &FlexibleFormState) -> Result<()>;
    fn load_draft(&self, record: &RecordId) -> Result<FlexibleFormState>;
    /// Removes a draft. Missing drafts are not an error.
    fn discard_draft(&self, record: &RecordId) -> Result<()>;
}

impl<S: SubmissionStore + ?Sized> SubmissionStore for Box<S> {
    fn save(&self, record: &RecordId, info: &CanonicalAgencyInfo) -> Result<()> {
        (**self).save(record, info)
    }

    fn load(&self, record: &RecordId) -> Result<CanonicalAgencyInfo> {
        (**self).load(record)
    }

    fn save_draft(&self, record: &RecordId, state: &FlexibleFormState) -> Result<()> {
        (**self).save_draft(record, state)
    }

    fn load_draft(&self, record: &RecordId) -> Result<FlexibleFormState> {
        (**self).load_draft(record)
    }

    fn discard_draft(&self, record: &RecordId) -> Result<()> {
        (**self).discard_draft(record)
    }
}

pub use json_backend::JsonStorage;
