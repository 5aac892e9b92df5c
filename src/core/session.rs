//! One user's pass through the intake wizard.
//!
//! `IntakeSession` owns the form state and is the single writer to it. Every
//! editor call and navigation request goes through here so observers see
//! each change exactly once.

use tracing::{info, warn};

use crate::core::clock::EntryIdGenerator;
use crate::core::collection::{
    AdditionalNumbers, AgencyHours, ContactNumbersEditor, EntryError, FieldCollectionEditor,
    HoursEditor,
};
use crate::core::navigator::{FormNavigator, NavigatorPhase, Refusal, Transition};
use crate::core::rules::{Ruleset, ValidationReport};
use crate::core::service_editor::ServiceRecordEditor;
use crate::domain::canonical::CanonicalAgencyInfo;
use crate::domain::common::{EntryId, RecordId};
use crate::domain::contact::ContactDraft;
use crate::domain::form::FlexibleFormState;
use crate::domain::hours::HoursDraft;
use crate::domain::service::ServiceRecord;
use crate::domain::steps::{FormPosition, StepCatalog};
use crate::errors::{IntakeError, Result};
use crate::storage::SubmissionStore;

/// Allow/deny decision made before a record is persisted.
pub trait AccessGate: Send + Sync {
    fn allows(&self, record: &RecordId) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessGate for AllowAll {
    fn allows(&self, _record: &RecordId) -> bool {
        true
    }
}

/// What the presentation layer receives after every change.
#[derive(Debug, Clone, Copy)]
pub struct FormSnapshot<'a> {
    pub position: FormPosition,
    pub state: &'a FlexibleFormState,
    pub errors: &'a ValidationReport,
    pub phase: NavigatorPhase,
    pub submission_error: Option<&'a str>,
}

pub trait FormObserver {
    fn on_change(&mut self, snapshot: &FormSnapshot<'_>);

    /// Called once per successful page transition.
    fn scroll_to_top(&mut self) {}
}

/// Result of a `next`/`prev` request at the session level.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Moved(FormPosition),
    Refused(Refusal),
    Submitted(Box<CanonicalAgencyInfo>),
}

pub struct IntakeSession<S: SubmissionStore> {
    record: RecordId,
    state: FlexibleFormState,
    ids: EntryIdGenerator,
    hours: HoursEditor,
    numbers: ContactNumbersEditor,
    services: ServiceRecordEditor,
    navigator: FormNavigator,
    store: S,
    gate: Box<dyn AccessGate>,
    observers: Vec<Box<dyn FormObserver>>,
}

impl<S: SubmissionStore> IntakeSession<S> {
    /// Starts an empty form under a fresh record id.
    pub fn new(store: S, catalog: StepCatalog, rules: Ruleset) -> Result<Self> {
        let navigator = FormNavigator::new(catalog, rules)?;
        Ok(Self {
            record: RecordId::new(),
            state: FlexibleFormState::default(),
            ids: EntryIdGenerator::system(),
            hours: FieldCollectionEditor::new(AgencyHours),
            numbers: FieldCollectionEditor::new(AdditionalNumbers),
            services: ServiceRecordEditor::new(),
            navigator,
            store,
            gate: Box::new(AllowAll),
            observers: Vec::new(),
        })
    }

    /// Reopens a saved draft at the first page.
    pub fn resume(store: S, catalog: StepCatalog, rules: Ruleset, record: RecordId) -> Result<Self> {
        let state = store.load_draft(&record)?;
        let mut session = Self::new(store, catalog, rules)?;
        session.record = record;
        session.observe_ids(&state);
        session.state = state;
        info!(%record, "draft resumed");
        Ok(session)
    }

    pub fn with_gate(mut self, gate: impl AccessGate + 'static) -> Self {
        self.gate = Box::new(gate);
        self
    }

    pub fn with_ids(mut self, ids: EntryIdGenerator) -> Self {
        self.ids = ids;
        let state = self.state.clone();
        self.observe_ids(&state);
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn FormObserver>) {
        self.observers.push(observer);
    }

    pub fn record(&self) -> RecordId {
        self.record
    }

    pub fn state(&self) -> &FlexibleFormState {
        &self.state
    }

    pub fn position(&self) -> FormPosition {
        self.navigator.position()
    }

    pub fn phase(&self) -> NavigatorPhase {
        self.navigator.phase()
    }

    pub fn errors(&self) -> &ValidationReport {
        self.navigator.errors()
    }

    pub fn navigator(&self) -> &FormNavigator {
        &self.navigator
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Applies `edit` to a copy of the form and stores the copy.
    pub fn edit<F>(&mut self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut FlexibleFormState),
    {
        if self.is_closed() {
            return Err(IntakeError::SessionClosed);
        }
        let mut next = self.state.clone();
        edit(&mut next);
        self.state = next;
        self.notify();
        Ok(())
    }

    pub fn add_hours(&mut self, draft: &HoursDraft) -> std::result::Result<EntryId, EntryError> {
        if self.is_closed() {
            return Err(EntryError::FormClosed);
        }
        let added = self.hours.add(&mut self.state, &mut self.ids, draft);
        self.notify();
        added
    }

    pub fn remove_hours(&mut self, id: EntryId) -> bool {
        if self.is_closed() {
            return false;
        }
        let removed = self.hours.remove(&mut self.state, id);
        self.notify();
        removed
    }

    pub fn hours_error(&self) -> Option<&EntryError> {
        self.hours.error()
    }

    pub fn add_contact_number(
        &mut self,
        draft: &ContactDraft,
    ) -> std::result::Result<EntryId, EntryError> {
        if self.is_closed() {
            return Err(EntryError::FormClosed);
        }
        let added = self.numbers.add(&mut self.state, &mut self.ids, draft);
        self.notify();
        added
    }

    pub fn remove_contact_number(&mut self, id: EntryId) -> bool {
        if self.is_closed() {
            return false;
        }
        let removed = self.numbers.remove(&mut self.state, id);
        self.notify();
        removed
    }

    pub fn contact_number_error(&self) -> Option<&EntryError> {
        self.numbers.error()
    }

    pub fn add_service(&mut self) -> Result<EntryId> {
        if self.is_closed() {
            return Err(IntakeError::SessionClosed);
        }
        let id = self.services.add_service(&mut self.state, &mut self.ids);
        self.notify();
        Ok(id)
    }

    pub fn delete_service(&mut self, id: EntryId) -> bool {
        if self.is_closed() {
            return false;
        }
        let deleted = self.services.delete_service(&mut self.state, id);
        self.notify();
        deleted
    }

    pub fn select_service(&mut self, index: Option<usize>) -> bool {
        if self.is_closed() {
            return false;
        }
        let selected = self.services.select(&self.state, index);
        self.notify();
        selected
    }

    pub fn selected_service_index(&self) -> Option<usize> {
        self.services.selected()
    }

    pub fn selected_service(&self) -> Option<&ServiceRecord> {
        self.services.selected_service(&self.state)
    }

    pub fn update_service<F>(&mut self, edit: F) -> bool
    where
        F: FnOnce(&mut ServiceRecord),
    {
        if self.is_closed() {
            return false;
        }
        let updated = self.services.update_selected(&mut self.state, edit);
        self.notify();
        updated
    }

    pub fn add_service_hours(
        &mut self,
        draft: &HoursDraft,
    ) -> std::result::Result<EntryId, EntryError> {
        if self.is_closed() {
            return Err(EntryError::FormClosed);
        }
        let added = self.services.add_hours(&mut self.state, &mut self.ids, draft);
        self.notify();
        added
    }

    pub fn remove_service_hours(&mut self, id: EntryId) -> bool {
        if self.is_closed() {
            return false;
        }
        let removed = self.services.remove_hours(&mut self.state, id);
        self.notify();
        removed
    }

    pub fn service_hours_error(&self, service: EntryId) -> Option<&EntryError> {
        self.services.hours_error(service)
    }

    /// Validates and advances. On the last subpage this submits; a failed
    /// submission is returned as an error and leaves the form untouched on
    /// the last subpage.
    pub fn next(&mut self) -> Result<SessionOutcome> {
        match self.navigator.next(&self.state) {
            Transition::Moved { to, .. } => {
                self.scroll_to_top();
                self.notify();
                Ok(SessionOutcome::Moved(to))
            }
            Transition::Refused(refusal) => {
                self.notify();
                Ok(SessionOutcome::Refused(refusal))
            }
            Transition::Submit(info) => {
                let outcome = self.persist(&info);
                let finished = self.navigator.finish_submission(outcome);
                self.notify();
                finished?;
                if let Err(err) = self.store.discard_draft(&self.record) {
                    warn!(record = %self.record, error = %err, "could not discard draft");
                }
                Ok(SessionOutcome::Submitted(info))
            }
        }
    }

    pub fn prev(&mut self) -> SessionOutcome {
        match self.navigator.prev() {
            Transition::Moved { to, .. } => {
                self.scroll_to_top();
                self.notify();
                SessionOutcome::Moved(to)
            }
            Transition::Refused(refusal) => SessionOutcome::Refused(refusal),
            // prev never submits
            Transition::Submit(_) => SessionOutcome::Refused(Refusal::Closed),
        }
    }

    pub fn save_draft(&self) -> Result<()> {
        match self.navigator.phase() {
            NavigatorPhase::Editing => {}
            NavigatorPhase::Submitting => return Err(IntakeError::SubmissionInFlight),
            NavigatorPhase::Submitted => return Err(IntakeError::SessionClosed),
        }
        self.store.save_draft(&self.record, &self.state)
    }

    /// A submitted form is read-only.
    fn is_closed(&self) -> bool {
        self.navigator.phase() == NavigatorPhase::Submitted
    }

    fn persist(&self, info: &CanonicalAgencyInfo) -> Result<()> {
        if !self.gate.allows(&self.record) {
            return Err(IntakeError::AccessDenied(format!(
                "record {} may not be submitted",
                self.record
            )));
        }
        self.store.save(&self.record, info)
    }

    fn observe_ids(&mut self, state: &FlexibleFormState) {
        let ids = state
            .hours
            .iter()
            .map(|entry| entry.id)
            .chain(state.additional_numbers.iter().map(|entry| entry.id))
            .chain(state.services.iter().flat_map(|service| {
                std::iter::once(service.id).chain(service.days_open.iter().map(|entry| entry.id))
            }));
        for id in ids {
            self.ids.observe(id);
        }
    }

    fn scroll_to_top(&mut self) {
        for observer in &mut self.observers {
            observer.scroll_to_top();
        }
    }

    fn notify(&mut self) {
        let snapshot = FormSnapshot {
            position: self.navigator.position(),
            state: &self.state,
            errors: self.navigator.errors(),
            phase: self.navigator.phase(),
            submission_error: self.navigator.submission_error(),
        };
        for observer in &mut self.observers {
            observer.on_change(&snapshot);
        }
    }
}
