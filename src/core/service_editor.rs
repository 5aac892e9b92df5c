//! CRUD over the services list plus the "currently selected service" pointer.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::core::clock::EntryIdGenerator;
use crate::core::collection::{EntryError, FieldCollectionEditor, ServiceHours};
use crate::domain::common::EntryId;
use crate::domain::form::FlexibleFormState;
use crate::domain::hours::{HoursDraft, TimeRangeEntry};
use crate::domain::service::ServiceRecord;

type ServiceHoursEditor = FieldCollectionEditor<TimeRangeEntry, ServiceHours>;

/// Where the selection lands after the service at `deleted` is removed from a
/// list that held `old_len` services.
///
/// Deleting the selected service clears the selection; deleting one before it
/// shifts it down; deleting one after it leaves it alone.
pub fn adjust_selection(selected: Option<usize>, deleted: usize, old_len: usize) -> Option<usize> {
    debug_assert!(deleted < old_len, "deleted index out of range");
    let current = selected.filter(|index| *index < old_len)?;
    match current.cmp(&deleted) {
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Greater => Some(current - 1),
        std::cmp::Ordering::Less => Some(current),
    }
}

#[derive(Debug, Default)]
pub struct ServiceRecordEditor {
    selected: Option<usize>,
    hours: BTreeMap<EntryId, ServiceHoursEditor>,
}

impl ServiceRecordEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_service<'a>(&self, state: &'a FlexibleFormState) -> Option<&'a ServiceRecord> {
        self.selected.and_then(|index| state.services.get(index))
    }

    /// Appends a blank service named after its position and selects it.
    pub fn add_service(
        &mut self,
        state: &mut FlexibleFormState,
        ids: &mut EntryIdGenerator,
    ) -> EntryId {
        let id = ids.next_id();
        let mut services = state.services.clone();
        services.push(ServiceRecord::new(id, services.len() + 1));
        self.selected = Some(services.len() - 1);
        state.services = services;
        self.hours
            .insert(id, FieldCollectionEditor::new(ServiceHours(id)));
        debug!(%id, selected = ?self.selected, "service added");
        id
    }

    /// Removes the service with `id` and re-points the selection. Returns
    /// false when no such service exists.
    pub fn delete_service(&mut self, state: &mut FlexibleFormState, id: EntryId) -> bool {
        let Some(index) = state.services.iter().position(|service| service.id == id) else {
            debug!(%id, "delete requested for unknown service");
            return false;
        };
        let old_len = state.services.len();
        let services: Vec<ServiceRecord> = state
            .services
            .iter()
            .filter(|service| service.id != id)
            .cloned()
            .collect();
        state.services = services;
        self.hours.remove(&id);
        self.selected = adjust_selection(self.selected, index, old_len);
        debug!(%id, index, selected = ?self.selected, "service deleted");
        true
    }

    /// Points the selection at `index`, or clears it with `None`. Indices past
    /// the end of the list are refused.
    pub fn select(&mut self, state: &FlexibleFormState, index: Option<usize>) -> bool {
        match index {
            Some(value) if value >= state.services.len() => {
                warn!(
                    index = value,
                    len = state.services.len(),
                    "refusing out-of-range service selection"
                );
                false
            }
            _ => {
                self.selected = index;
                true
            }
        }
    }

    /// Applies `edit` to a copy of the selected service and writes the list
    /// back. Returns false when nothing is selected.
    pub fn update_selected<F>(&mut self, state: &mut FlexibleFormState, edit: F) -> bool
    where
        F: FnOnce(&mut ServiceRecord),
    {
        let Some(index) = self.selected.filter(|index| *index < state.services.len()) else {
            return false;
        };
        let mut services = state.services.clone();
        let id = services[index].id;
        edit(&mut services[index]);
        services[index].id = id;
        state.services = services;
        true
    }

    /// Adds an hours entry to the selected service.
    pub fn add_hours(
        &mut self,
        state: &mut FlexibleFormState,
        ids: &mut EntryIdGenerator,
        draft: &HoursDraft,
    ) -> Result<EntryId, EntryError> {
        let service_id = self
            .selected_service(state)
            .map(|service| service.id)
            .ok_or(EntryError::NoServiceSelected)?;
        self.hours_editor(service_id).add(state, ids, draft)
    }

    /// Removes an hours entry from the selected service.
    pub fn remove_hours(&mut self, state: &mut FlexibleFormState, entry: EntryId) -> bool {
        let Some(service_id) = self.selected_service(state).map(|service| service.id) else {
            return false;
        };
        self.hours_editor(service_id).remove(state, entry)
    }

    pub fn hours_error(&self, service: EntryId) -> Option<&EntryError> {
        self.hours.get(&service).and_then(|editor| editor.error())
    }

    fn hours_editor(&mut self, service: EntryId) -> &mut ServiceHoursEditor {
        self.hours
            .entry(service)
            .or_insert_with(|| FieldCollectionEditor::new(ServiceHours(service)))
    }
}
