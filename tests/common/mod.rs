#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use referral_intake::core::{
    EntryIdGenerator, FixedClock, FormObserver, FormSnapshot, IntakeSession,
};
use referral_intake::domain::{
    ApplicationMethod, CanonicalAgencyInfo, DayFlags, DocumentOption, EntryId, FeeOption,
    FlagGroup, FlexibleFormState, FundingSource, Language, RecordId, ServiceRecord, StepCatalog,
    TimeSlot, Weekday, YesNo,
};
use referral_intake::core::Ruleset;
use referral_intake::errors::{IntakeError, Result};
use referral_intake::storage::{JsonStorage, SubmissionStore};
use tempfile::TempDir;

pub fn slot(label: &str) -> TimeSlot {
    TimeSlot::parse(label).expect("valid time label")
}

/// Deterministic id source starting at 2025-03-01 09:00 UTC.
pub fn fixed_ids() -> EntryIdGenerator {
    let instant = Utc
        .with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
        .single()
        .expect("valid instant");
    EntryIdGenerator::new(Arc::new(FixedClock(instant)))
}

pub fn complete_service(id: i64) -> ServiceRecord {
    let mut service = ServiceRecord::new(EntryId(id), 1);
    service.name = "Food Pantry".into();
    service.full_description = "Weekly groceries for families".into();
    service.contact_person_name = "Jo Park".into();
    service.eligibility_requirements = "County residents".into();
    service.application_process.methods =
        FlagGroup::of(&[ApplicationMethod::WalkIn, ApplicationMethod::Telephone]);
    service.fee_category = FlagGroup::of(&[FeeOption::NoFee]);
    service.required_documents = FlagGroup::of(&[DocumentOption::PhotoId]);
    service
}

/// A form that satisfies every rule of the standard ruleset.
pub fn valid_state() -> FlexibleFormState {
    FlexibleFormState {
        legal_name: "Helping Hands Inc.".into(),
        director_name: "Dana Reyes".into(),
        main_phone: "5551234567".into(),
        email: "info@helpinghands.org".into(),
        website: "https://helpinghands.org".into(),
        physical_address: "1 Main St, Springfield".into(),
        mission: "Make sure nobody in the county goes hungry".into(),
        contact_name: "Sam Lee".into(),
        contact_phone: "5559876543".into(),
        regular_days_open: DayFlags::of(&[Weekday::Monday, Weekday::Wednesday]),
        services: vec![complete_service(100)],
        funding_sources: FlagGroup::of(&[FundingSource::Donations, FundingSource::UnitedWay]),
        languages: FlagGroup::of(&[Language::English, Language::Spanish]),
        non_profit: YesNo::Yes,
        volunteers: YesNo::No,
        donation: YesNo::No,
        recommendation: YesNo::No,
        submitter_name: "Dana Reyes".into(),
        ..Default::default()
    }
}

pub fn temp_storage() -> (JsonStorage, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let storage = JsonStorage::new(Some(temp.path().to_path_buf())).expect("json storage");
    (storage, temp)
}

pub fn session_with<S: SubmissionStore>(store: S) -> IntakeSession<S> {
    IntakeSession::new(store, StepCatalog::standard(), Ruleset::standard())
        .expect("standard session")
        .with_ids(fixed_ids())
}

/// In-memory store that counts saves and can be told to fail them.
#[derive(Default)]
pub struct MemoryStore {
    pub saves: AtomicUsize,
    pub fail_saves: AtomicBool,
    submissions: Mutex<HashMap<RecordId, CanonicalAgencyInfo>>,
    drafts: Mutex<HashMap<RecordId, FlexibleFormState>>,
}

impl MemoryStore {
    pub fn failing() -> Self {
        let store = Self::default();
        store.fail_saves.store(true, Ordering::SeqCst);
        store
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn has_draft(&self, record: &RecordId) -> bool {
        self.drafts.lock().expect("drafts lock").contains_key(record)
    }
}

impl SubmissionStore for MemoryStore {
    fn save(&self, record: &RecordId, info: &CanonicalAgencyInfo) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(IntakeError::Storage("backend unavailable".into()));
        }
        self.submissions
            .lock()
            .expect("submissions lock")
            .insert(*record, info.clone());
        Ok(())
    }

    fn load(&self, record: &RecordId) -> Result<CanonicalAgencyInfo> {
        self.submissions
            .lock()
            .expect("submissions lock")
            .get(record)
            .cloned()
            .ok_or_else(|| IntakeError::RecordNotFound(record.to_string()))
    }

    fn save_draft(&self, record: &RecordId, state: &FlexibleFormState) -> Result<()> {
        self.drafts
            .lock()
            .expect("drafts lock")
            .insert(*record, state.clone());
        Ok(())
    }

    fn load_draft(&self, record: &RecordId) -> Result<FlexibleFormState> {
        self.drafts
            .lock()
            .expect("drafts lock")
            .get(record)
            .cloned()
            .ok_or_else(|| IntakeError::RecordNotFound(record.to_string()))
    }

    fn discard_draft(&self, record: &RecordId) -> Result<()> {
        self.drafts.lock().expect("drafts lock").remove(record);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ObserverLog {
    pub changes: usize,
    pub scrolls: usize,
    pub last_error_count: usize,
}

/// Observer that records into a shared log the test keeps a handle to.
pub struct RecordingObserver(pub Rc<RefCell<ObserverLog>>);

impl FormObserver for RecordingObserver {
    fn on_change(&mut self, snapshot: &FormSnapshot<'_>) {
        let mut log = self.0.borrow_mut();
        log.changes += 1;
        log.last_error_count = snapshot.errors.len();
    }

    fn scroll_to_top(&mut self) {
        self.0.borrow_mut().scrolls += 1;
    }
}

pub fn recording_observer() -> (Box<dyn FormObserver>, Rc<RefCell<ObserverLog>>) {
    let log = Rc::new(RefCell::new(ObserverLog::default()));
    (Box::new(RecordingObserver(Rc::clone(&log))), log)
}
