mod common;

use common::{recording_observer, session_with, slot, valid_state, MemoryStore};
use referral_intake::core::{
    AccessGate, EntryError, FormNavigator, NavigatorPhase, Refusal, SessionOutcome, Transition,
};
use referral_intake::domain::{FlexibleFormState, FormPosition, HoursDraft, RecordId, Weekday};
use referral_intake::errors::IntakeError;

fn walk_to_last(session: &mut referral_intake::core::IntakeSession<MemoryStore>) {
    let last = session.navigator().catalog().last_position();
    while session.position() != last {
        match session.next().expect("navigation") {
            SessionOutcome::Moved(_) => {}
            other => panic!("unexpected outcome {other:?} at {:?}", session.position()),
        }
    }
}

#[test]
fn prev_at_start_never_moves() {
    let mut session = session_with(MemoryStore::default());
    for _ in 0..3 {
        assert_eq!(session.prev(), SessionOutcome::Refused(Refusal::AtStart));
    }
    assert_eq!(session.position(), FormPosition::START);
}

#[test]
fn prev_from_a_step_start_lands_on_the_previous_steps_last_subpage() {
    let mut session = session_with(MemoryStore::default());
    session.edit(|state| *state = valid_state()).expect("editable");
    for _ in 0..3 {
        session.next().expect("advance");
    }
    assert_eq!(session.position(), FormPosition::new(1, 0));
    assert_eq!(session.prev(), SessionOutcome::Moved(FormPosition::new(0, 2)));
}

#[test]
fn invalid_page_refuses_next_and_reports_every_field() {
    let mut session = session_with(MemoryStore::default());
    let (observer, log) = recording_observer();
    session.add_observer(observer);

    match session.next().expect("navigation") {
        SessionOutcome::Refused(Refusal::Invalid(report)) => {
            for field in ["legal_name", "director_name", "main_phone", "email", "physical_address", "mission"] {
                assert!(report.contains(field), "missing error for {field}");
            }
        }
        other => panic!("expected refusal, got {other:?}"),
    }
    assert_eq!(session.position(), FormPosition::START);
    assert_eq!(log.borrow().scrolls, 0);
    assert_eq!(log.borrow().last_error_count, 6);
}

#[test]
fn back_navigation_ignores_invalid_data() {
    let mut session = session_with(MemoryStore::default());
    session.edit(|state| *state = valid_state()).expect("editable");
    session.next().expect("advance");
    session.edit(|state| state.contact_name.clear()).expect("editable");
    assert_eq!(session.prev(), SessionOutcome::Moved(FormPosition::START));
}

#[test]
fn scroll_resets_once_per_successful_transition() {
    let mut session = session_with(MemoryStore::default());
    let (observer, log) = recording_observer();
    session.add_observer(observer);
    session.edit(|state| *state = valid_state()).expect("editable");

    session.next().expect("advance");
    session.next().expect("advance");
    session.prev();
    session.prev();
    session.prev();

    assert_eq!(log.borrow().scrolls, 4);
}

#[test]
fn full_walk_submits_exactly_once() {
    let mut session = session_with(MemoryStore::default());
    session.edit(|state| *state = valid_state()).expect("editable");
    session.save_draft().expect("draft");
    walk_to_last(&mut session);

    let info = match session.next().expect("submit") {
        SessionOutcome::Submitted(info) => info,
        other => panic!("expected submission, got {other:?}"),
    };
    assert_eq!(info.legal_name, "Helping Hands Inc.");
    assert_eq!(session.phase(), NavigatorPhase::Submitted);
    assert_eq!(session.position(), session.navigator().catalog().last_position());

    assert_eq!(
        session.next().expect("second next"),
        SessionOutcome::Refused(Refusal::Closed)
    );
    assert_eq!(session.prev(), SessionOutcome::Refused(Refusal::Closed));
    assert_eq!(session.store().save_count(), 1);
    assert!(!session.store().has_draft(&session.record()));
    assert!(matches!(session.save_draft(), Err(IntakeError::SessionClosed)));
}

#[test]
fn submitted_form_is_read_only() {
    let mut session = session_with(MemoryStore::default());
    session.edit(|state| *state = valid_state()).expect("editable");
    walk_to_last(&mut session);
    assert!(matches!(session.next(), Ok(SessionOutcome::Submitted(_))));
    let submitted = session.state().clone();

    assert!(matches!(session.add_service(), Err(IntakeError::SessionClosed)));
    assert!(matches!(
        session.edit(|state| state.legal_name = "changed".into()),
        Err(IntakeError::SessionClosed)
    ));
    let draft = HoursDraft::new(Weekday::Sunday, slot("9:00 AM"), slot("1:00 PM"));
    assert_eq!(session.add_hours(&draft), Err(EntryError::FormClosed));
    assert_eq!(session.add_service_hours(&draft), Err(EntryError::FormClosed));
    let service = submitted.services[0].id;
    assert!(!session.delete_service(service));
    assert!(!session.select_service(Some(0)));
    assert!(!session.update_service(|record| record.name = "changed".into()));

    assert_eq!(session.state(), &submitted);
}

#[test]
fn navigator_blocks_reentry_while_submitting() {
    let mut nav = FormNavigator::standard().expect("standard navigator");
    let state = valid_state();
    while !nav.is_last() {
        assert!(nav.next(&state).is_move());
    }

    assert!(matches!(nav.next(&state), Transition::Submit(_)));
    assert_eq!(nav.phase(), NavigatorPhase::Submitting);
    assert_eq!(
        nav.next(&state),
        Transition::Refused(Refusal::SubmissionInFlight)
    );
    assert_eq!(nav.prev(), Transition::Refused(Refusal::SubmissionInFlight));

    nav.finish_submission(Ok(())).expect("stored");
    assert_eq!(nav.phase(), NavigatorPhase::Submitted);
}

#[test]
fn failed_submission_keeps_the_form_for_a_retry() {
    let mut session = session_with(MemoryStore::failing());
    session.edit(|state| *state = valid_state()).expect("editable");
    walk_to_last(&mut session);
    let before = session.state().clone();

    let err = session.next().unwrap_err();
    assert!(matches!(err, IntakeError::Storage(_)));
    assert_eq!(session.phase(), NavigatorPhase::Editing);
    assert_eq!(session.position(), session.navigator().catalog().last_position());
    assert_eq!(session.state(), &before);
    assert!(session.navigator().submission_error().is_some());

    session
        .store()
        .fail_saves
        .store(false, std::sync::atomic::Ordering::SeqCst);
    assert!(matches!(
        session.next().expect("retry"),
        SessionOutcome::Submitted(_)
    ));
    assert_eq!(session.store().save_count(), 2);
}

#[test]
fn last_page_validates_the_whole_form() {
    let mut session = session_with(MemoryStore::default());
    session.edit(|state| *state = valid_state()).expect("editable");
    walk_to_last(&mut session);
    // Break a field that lives on an earlier page.
    session.edit(|state| state.mission.clear()).expect("editable");

    match session.next().expect("navigation") {
        SessionOutcome::Refused(Refusal::Invalid(report)) => {
            assert_eq!(report.len(), 1);
            assert!(report.contains("mission"));
        }
        other => panic!("expected refusal, got {other:?}"),
    }
    assert_eq!(session.store().save_count(), 0);
}

struct DenyAll;

impl AccessGate for DenyAll {
    fn allows(&self, _record: &RecordId) -> bool {
        false
    }
}

#[test]
fn denied_access_is_a_failed_submission() {
    let mut session = session_with(MemoryStore::default()).with_gate(DenyAll);
    session.edit(|state| *state = valid_state()).expect("editable");
    walk_to_last(&mut session);

    assert!(matches!(session.next(), Err(IntakeError::AccessDenied(_))));
    assert_eq!(session.phase(), NavigatorPhase::Editing);
    assert_eq!(session.store().save_count(), 0);
}

#[test]
fn empty_form_cannot_leave_the_first_page() {
    let mut nav = FormNavigator::standard().expect("standard navigator");
    let state = FlexibleFormState::default();
    assert!(matches!(
        nav.next(&state),
        Transition::Refused(Refusal::Invalid(_))
    ));
    assert_eq!(nav.position(), FormPosition::START);
}
