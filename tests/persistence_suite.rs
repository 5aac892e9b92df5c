mod common;

use std::fs;

use common::{fixed_ids, session_with, slot, temp_storage, valid_state};
use referral_intake::core::{IntakeSession, Ruleset, SessionOutcome};
use referral_intake::domain::{HoursDraft, RecordId, StepCatalog, Weekday};
use referral_intake::errors::IntakeError;
use referral_intake::storage::SubmissionStore;
use referral_intake::utils::paths::tmp_path;

#[test]
fn drafts_resume_with_their_entries() {
    let (storage, _guard) = temp_storage();
    let mut session = session_with(storage.clone());
    session.edit(|state| state.legal_name = "Helping Hands".into()).expect("editable");
    let first = session
        .add_hours(&HoursDraft::new(Weekday::Monday, slot("9:00 AM"), slot("5:00 PM")))
        .expect("hours");
    session.save_draft().expect("save draft");
    let record = session.record();

    let mut resumed = IntakeSession::resume(
        storage.clone(),
        StepCatalog::standard(),
        Ruleset::standard(),
        record,
    )
    .expect("resume")
    .with_ids(fixed_ids());
    assert_eq!(resumed.state().legal_name, "Helping Hands");
    assert_eq!(resumed.record(), record);

    let second = resumed
        .add_hours(&HoursDraft::new(Weekday::Tuesday, slot("9:00 AM"), slot("5:00 PM")))
        .expect("more hours");
    assert!(second > first, "resumed ids must not collide");
}

#[test]
fn resuming_an_unknown_record_fails() {
    let (storage, _guard) = temp_storage();
    let result = IntakeSession::resume(
        storage,
        StepCatalog::standard(),
        Ruleset::standard(),
        RecordId::new(),
    );
    assert!(matches!(result, Err(IntakeError::RecordNotFound(_))));
}

#[test]
fn submission_is_written_and_draft_removed() {
    let (storage, _guard) = temp_storage();
    let mut session = session_with(storage.clone());
    session.edit(|state| *state = valid_state()).expect("editable");
    session.save_draft().expect("draft");
    let record = session.record();
    assert!(storage.draft_path(&record).exists());

    let last = session.navigator().catalog().last_position();
    while session.position() != last {
        session.next().expect("advance");
    }
    let submitted = match session.next().expect("submit") {
        SessionOutcome::Submitted(info) => info,
        other => panic!("expected submission, got {other:?}"),
    };

    let path = storage.submission_path(&record);
    assert!(path.exists());
    assert!(!tmp_path(&path).exists());
    assert!(!storage.draft_path(&record).exists());

    let loaded = storage.load(&record).expect("load submission");
    assert_eq!(&loaded, submitted.as_ref());
    assert_eq!(storage.list_submissions().expect("list"), vec![record]);

    let raw = fs::read_to_string(path).expect("read json");
    assert!(raw.contains("\"legalName\""));
}

#[test]
fn corrupt_draft_is_a_storage_error() {
    let (storage, _guard) = temp_storage();
    let record = RecordId::new();
    fs::write(storage.draft_path(&record), "{ broken").expect("write");
    assert!(matches!(
        storage.load_draft(&record),
        Err(IntakeError::Storage(_))
    ));
}
