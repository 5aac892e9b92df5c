//! Wizard logic: list editors, validation, navigation and the submission
//! transform. Nothing in here touches the filesystem except through a
//! [`storage::SubmissionStore`](crate::storage::SubmissionStore).

pub mod clock;
pub mod collection;
pub mod navigator;
pub mod rules;
pub mod service_editor;
pub mod session;
pub mod transform;

pub use clock::{Clock, EntryIdGenerator, FixedClock, SystemClock};
pub use collection::{
    AdditionalNumbers, AgencyHours, CollectionEntry, ContactNumbersEditor, EntryError,
    FieldCollectionEditor, HoursEditor, ListField, ServiceHours,
};
pub use navigator::{Direction, FormNavigator, NavigatorPhase, Refusal, Transition};
pub use rules::{Rule, Ruleset, ValidationReport};
pub use service_editor::{adjust_selection, ServiceRecordEditor};
pub use session::{AccessGate, AllowAll, FormObserver, FormSnapshot, IntakeSession, SessionOutcome};
pub use transform::{canonicalize, flatten_group, ValidatedForm};
