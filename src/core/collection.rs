//! Editor for the small repeatable sublists of the form: hours of operation
//! and additional contact numbers.
//!
//! `add` runs three checks in a fixed order (presence, duplicate, semantic)
//! and stops at the first failure. Every successful mutation builds a fresh
//! list and writes it back into the bound form field.

use std::marker::PhantomData;

use thiserror::Error;
use tracing::{debug, warn};

use crate::core::clock::EntryIdGenerator;
use crate::domain::common::{EntryId, Identifiable, TimeSlot, Weekday};
use crate::domain::contact::{is_valid_phone_number, ContactDraft, ContactNumberEntry};
use crate::domain::form::FlexibleFormState;
use crate::domain::hours::{HoursDraft, TimeRangeEntry};

/// Rejection of a single `add` call. At most one is visible per list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("Please fill in the {0} field")]
    MissingField(&'static str),
    #[error("These hours have already been added")]
    DuplicateEntry,
    #[error("A number labelled `{0}` already exists")]
    DuplicateLabel(String),
    #[error("The number {0} has already been added")]
    DuplicateNumber(String),
    #[error("Please enter a valid phone number (10 digits, no punctuation)")]
    InvalidPhoneNumber,
    #[error("Opening time must be before closing time")]
    InvalidTimeRange,
    #[error("Select a service before adding its hours")]
    NoServiceSelected,
    #[error("This form has already been submitted")]
    FormClosed,
}

/// Entry type managed by a [`FieldCollectionEditor`].
pub trait CollectionEntry: Identifiable + Clone {
    /// Raw input collected by the page before `add`.
    type Draft;
    /// Required values extracted from a draft once presence is confirmed.
    type Key;

    /// Presence check: every required input is filled in.
    fn require(draft: &Self::Draft) -> Result<Self::Key, EntryError>;

    /// Duplicate check against the current list.
    fn check_duplicate(key: &Self::Key, existing: &[Self]) -> Result<(), EntryError>;

    /// Type-specific semantic check.
    fn check_semantics(key: &Self::Key) -> Result<(), EntryError>;

    fn build(id: EntryId, key: Self::Key) -> Self;

    /// Restores the list's ordering after an insertion. Unordered lists keep
    /// insertion order.
    fn arrange(_entries: &mut [Self]) {}
}

impl CollectionEntry for TimeRangeEntry {
    type Draft = HoursDraft;
    type Key = (Weekday, TimeSlot, TimeSlot);

    fn require(draft: &HoursDraft) -> Result<Self::Key, EntryError> {
        let day = draft.day.ok_or(EntryError::MissingField("day"))?;
        let open = draft.open_time.ok_or(EntryError::MissingField("opening time"))?;
        let close = draft
            .close_time
            .ok_or(EntryError::MissingField("closing time"))?;
        Ok((day, open, close))
    }

    fn check_duplicate(key: &Self::Key, existing: &[Self]) -> Result<(), EntryError> {
        let (day, open, close) = *key;
        if existing
            .iter()
            .any(|entry| entry.same_window(day, open, close))
        {
            Err(EntryError::DuplicateEntry)
        } else {
            Ok(())
        }
    }

    fn check_semantics(key: &Self::Key) -> Result<(), EntryError> {
        let (_, open, close) = *key;
        let full_day = open == TimeSlot::MIDNIGHT && close == TimeSlot::MIDNIGHT;
        if full_day || open < close {
            Ok(())
        } else {
            Err(EntryError::InvalidTimeRange)
        }
    }

    fn build(id: EntryId, key: Self::Key) -> Self {
        let (day, open, close) = key;
        TimeRangeEntry::new(id, day, open, close)
    }

    fn arrange(entries: &mut [Self]) {
        entries.sort_by_key(TimeRangeEntry::sort_key);
    }
}

impl CollectionEntry for ContactNumberEntry {
    type Draft = ContactDraft;
    type Key = (String, String);

    fn require(draft: &ContactDraft) -> Result<Self::Key, EntryError> {
        let label = draft.label.trim();
        if label.is_empty() {
            return Err(EntryError::MissingField("label"));
        }
        let number = draft.number.trim();
        if number.is_empty() {
            return Err(EntryError::MissingField("phone number"));
        }
        Ok((label.to_string(), number.to_string()))
    }

    fn check_duplicate(key: &Self::Key, existing: &[Self]) -> Result<(), EntryError> {
        let (label, number) = key;
        if existing
            .iter()
            .any(|entry| entry.label.eq_ignore_ascii_case(label))
        {
            return Err(EntryError::DuplicateLabel(label.clone()));
        }
        if existing.iter().any(|entry| &entry.number == number) {
            return Err(EntryError::DuplicateNumber(number.clone()));
        }
        Ok(())
    }

    fn check_semantics(key: &Self::Key) -> Result<(), EntryError> {
        if is_valid_phone_number(&key.1) {
            Ok(())
        } else {
            Err(EntryError::InvalidPhoneNumber)
        }
    }

    fn build(id: EntryId, key: Self::Key) -> Self {
        let (label, number) = key;
        ContactNumberEntry { id, label, number }
    }
}

/// Binds an editor to one list-valued field of the form state.
pub trait ListField<E> {
    fn name(&self) -> String;

    fn read<'a>(&self, state: &'a FlexibleFormState) -> &'a [E];

    fn write(&self, state: &mut FlexibleFormState, entries: Vec<E>);
}

/// The agency-level hours of operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgencyHours;

impl ListField<TimeRangeEntry> for AgencyHours {
    fn name(&self) -> String {
        "hours".into()
    }

    fn read<'a>(&self, state: &'a FlexibleFormState) -> &'a [TimeRangeEntry] {
        &state.hours
    }

    fn write(&self, state: &mut FlexibleFormState, entries: Vec<TimeRangeEntry>) {
        state.hours = entries;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AdditionalNumbers;

impl ListField<ContactNumberEntry> for AdditionalNumbers {
    fn name(&self) -> String {
        "additional_numbers".into()
    }

    fn read<'a>(&self, state: &'a FlexibleFormState) -> &'a [ContactNumberEntry] {
        &state.additional_numbers
    }

    fn write(&self, state: &mut FlexibleFormState, entries: Vec<ContactNumberEntry>) {
        state.additional_numbers = entries;
    }
}

/// The hours of one service, located by the service's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceHours(pub EntryId);

impl ListField<TimeRangeEntry> for ServiceHours {
    fn name(&self) -> String {
        format!("services[{}].days_open", self.0)
    }

    fn read<'a>(&self, state: &'a FlexibleFormState) -> &'a [TimeRangeEntry] {
        state
            .service(self.0)
            .map(|service| service.days_open.as_slice())
            .unwrap_or(&[])
    }

    fn write(&self, state: &mut FlexibleFormState, entries: Vec<TimeRangeEntry>) {
        let mut services = state.services.clone();
        match services.iter_mut().find(|service| service.id == self.0) {
            Some(service) => {
                service.days_open = entries;
                state.services = services;
            }
            None => warn!(service = %self.0, "hours written for a service that no longer exists"),
        }
    }
}

/// Controller for one ordered, de-duplicated sublist.
#[derive(Debug, Clone)]
pub struct FieldCollectionEditor<E, F> {
    field: F,
    error: Option<EntryError>,
    _entry: PhantomData<E>,
}

impl<E: CollectionEntry, F: ListField<E>> FieldCollectionEditor<E, F> {
    pub fn new(field: F) -> Self {
        Self {
            field,
            error: None,
            _entry: PhantomData,
        }
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    pub fn entries<'a>(&self, state: &'a FlexibleFormState) -> &'a [E] {
        self.field.read(state)
    }

    /// Message from the last rejected `add`, if it has not been cleared.
    pub fn error(&self) -> Option<&EntryError> {
        self.error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Validates and inserts a new entry. A rejected draft leaves the list
    /// untouched and becomes the visible error.
    pub fn add(
        &mut self,
        state: &mut FlexibleFormState,
        ids: &mut EntryIdGenerator,
        draft: &E::Draft,
    ) -> Result<EntryId, EntryError> {
        let existing = self.field.read(state);
        let key = match Self::check(draft, existing) {
            Ok(key) => key,
            Err(err) => {
                debug!(field = %self.field.name(), error = %err, "entry rejected");
                self.error = Some(err.clone());
                return Err(err);
            }
        };

        let id = ids.next_id();
        let mut next = existing.to_vec();
        next.push(E::build(id, key));
        E::arrange(&mut next);
        self.field.write(state, next);
        self.error = None;
        debug!(field = %self.field.name(), %id, "entry added");
        Ok(id)
    }

    /// Removes the entry with `id`. Unknown ids are ignored.
    pub fn remove(&mut self, state: &mut FlexibleFormState, id: EntryId) -> bool {
        let existing = self.field.read(state);
        if !existing.iter().any(|entry| entry.id() == id) {
            return false;
        }
        let next: Vec<E> = existing
            .iter()
            .filter(|entry| entry.id() != id)
            .cloned()
            .collect();
        self.field.write(state, next);
        debug!(field = %self.field.name(), %id, "entry removed");
        true
    }

    fn check(draft: &E::Draft, existing: &[E]) -> Result<E::Key, EntryError> {
        let key = E::require(draft)?;
        E::check_duplicate(&key, existing)?;
        E::check_semantics(&key)?;
        Ok(key)
    }
}

pub type HoursEditor<F = AgencyHours> = FieldCollectionEditor<TimeRangeEntry, F>;
pub type ContactNumbersEditor = FieldCollectionEditor<ContactNumberEntry, AdditionalNumbers>;
