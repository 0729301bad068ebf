#![forbid(unsafe_code)]
mod common;

use chrono::Duration;
use common::{alice, at, org, workspace, MemoryBackend};
use horaires::{
    CancelToken, EmployeeId, Outcome, RejectionReason, SchedError, Scheduler, SessionOptions,
    Shift, ShiftId,
};

fn scheduler_with_alice() -> (Scheduler<MemoryBackend>, EmployeeId) {
    let a = alice();
    let id = a.id.clone();
    let backend = MemoryBackend::new(workspace(vec![a]));
    let s = Scheduler::open(backend, org(), SessionOptions::default()).unwrap();
    (s, id)
}

fn placed(s: &mut Scheduler<MemoryBackend>, id: &EmployeeId) -> Shift {
    s.create_until(id, at(7, 9, 0), at(7, 12, 0), &CancelToken::new())
        .unwrap()
        .applied()
        .unwrap()
}

#[test]
fn create_defaults_to_one_hour_and_commits() {
    let (mut s, id) = scheduler_with_alice();
    let shift = s
        .create(&id, at(7, 10, 0), &CancelToken::new())
        .unwrap()
        .applied()
        .unwrap();
    assert_eq!(shift.end - shift.start, Duration::hours(1));
    assert_eq!(s.backend().calls, vec!["create"]);
    assert_eq!(s.session().shifts().count(), 1);
    assert_eq!(s.session().title_of(&shift), "Alice Martin");
}

#[test]
fn default_length_follows_options() {
    let a = alice();
    let id = a.id.clone();
    let backend = MemoryBackend::new(workspace(vec![a]));
    let opts = SessionOptions {
        default_shift_minutes: 240,
    };
    let mut s = Scheduler::open(backend, org(), opts).unwrap();
    let shift = s
        .create(&id, at(7, 9, 0), &CancelToken::new())
        .unwrap()
        .applied()
        .unwrap();
    assert_eq!(shift.end, at(7, 13, 0));
}

#[test]
fn rejected_create_never_reaches_persistence() {
    let (mut s, id) = scheduler_with_alice();
    let outcome = s.create(&id, at(8, 10, 0), &CancelToken::new()).unwrap();
    let rejection = outcome.rejection().unwrap();
    assert_eq!(rejection.reason, RejectionReason::TimeOffConflict);
    assert_eq!(rejection.employee, id);
    assert!(s.backend().calls.is_empty());
    assert_eq!(s.session().shifts().count(), 0);
}

#[test]
fn create_for_unknown_employee_is_an_error() {
    let (mut s, _) = scheduler_with_alice();
    let err = s
        .create(&EmployeeId::new("nobody"), at(7, 10, 0), &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, SchedError::UnknownEmployee(_)));
}

#[test]
fn inverted_interval_is_refused_before_gates() {
    let (mut s, id) = scheduler_with_alice();
    let err = s
        .create_until(&id, at(7, 12, 0), at(7, 10, 0), &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, SchedError::InvalidTimeRange));
}

#[test]
fn failed_create_leaves_session_untouched() {
    let (mut s, id) = scheduler_with_alice();
    s.backend_mut().fail = true;
    let err = s.create(&id, at(7, 10, 0), &CancelToken::new()).unwrap_err();
    assert!(matches!(err, SchedError::PersistenceFailed(_)));
    assert_eq!(s.session().shifts().count(), 0);
}

#[test]
fn move_updates_interval() {
    let (mut s, id) = scheduler_with_alice();
    let shift = placed(&mut s, &id);
    let moved = s
        .move_shift(&shift.id, at(7, 13, 0), at(7, 16, 0), &CancelToken::new())
        .unwrap()
        .applied()
        .unwrap();
    assert_eq!((moved.start, moved.end), (at(7, 13, 0), at(7, 16, 0)));
    let in_session = s.session().find_shift(&shift.id).unwrap();
    assert_eq!(in_session, &moved);
}

#[test]
fn move_outside_window_is_rejected_without_update() {
    let (mut s, id) = scheduler_with_alice();
    let shift = placed(&mut s, &id);
    let outcome = s
        .move_shift(&shift.id, at(7, 15, 0), at(7, 19, 0), &CancelToken::new())
        .unwrap();
    assert_eq!(
        outcome.rejection().map(|r| r.reason),
        Some(RejectionReason::OutsideAvailabilityWindow)
    );
    assert_eq!(s.backend().calls, vec!["create"]);
    assert_eq!(s.session().find_shift(&shift.id), Some(&shift));
}

#[test]
fn resize_failing_persistence_keeps_prior_interval() {
    let (mut s, id) = scheduler_with_alice();
    let shift = placed(&mut s, &id);
    s.backend_mut().fail = true;
    let err = s
        .resize_shift(&shift.id, at(7, 9, 0), at(7, 17, 0), &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, SchedError::PersistenceFailed(_)));
    let kept = s.session().find_shift(&shift.id).unwrap();
    assert_eq!((kept.start, kept.end), (shift.start, shift.end));
}

#[test]
fn move_of_unknown_shift_is_an_error() {
    let (mut s, _) = scheduler_with_alice();
    let err = s
        .move_shift(
            &ShiftId::new("missing"),
            at(7, 9, 0),
            at(7, 10, 0),
            &CancelToken::new(),
        )
        .unwrap_err();
    assert!(matches!(err, SchedError::UnknownShift(_)));
}

#[test]
fn abandoned_move_is_not_applied() {
    let (mut s, id) = scheduler_with_alice();
    let shift = placed(&mut s, &id);
    let cancel = CancelToken::new();
    s.backend_mut().cancel_during_call = Some(cancel.clone());
    let outcome = s
        .move_shift(&shift.id, at(7, 13, 0), at(7, 16, 0), &cancel)
        .unwrap();
    assert_eq!(outcome, Outcome::Abandoned);
    assert_eq!(s.session().find_shift(&shift.id), Some(&shift));
}

#[test]
fn delete_requires_confirmation() {
    let (mut s, id) = scheduler_with_alice();
    let shift = placed(&mut s, &id);

    let decline = |_: &str| false;
    let outcome = s
        .delete_shift(&shift.id, &decline, &CancelToken::new())
        .unwrap();
    assert_eq!(outcome, Outcome::DeletionCancelled);
    assert_eq!(s.backend().calls, vec!["create"]);
    assert_eq!(s.session().shifts().count(), 1);

    let accept = |prompt: &str| prompt.contains("Alice Martin");
    let outcome = s
        .delete_shift(&shift.id, &accept, &CancelToken::new())
        .unwrap();
    assert_eq!(outcome, Outcome::Applied(()));
    assert_eq!(s.backend().calls, vec!["create", "delete"]);
    assert_eq!(s.session().shifts().count(), 0);
}

#[test]
fn failed_delete_keeps_shift() {
    let (mut s, id) = scheduler_with_alice();
    let shift = placed(&mut s, &id);
    s.backend_mut().fail = true;
    let yes = |_: &str| true;
    let err = s
        .delete_shift(&shift.id, &yes, &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, SchedError::PersistenceFailed(_)));
    assert!(s.session().find_shift(&shift.id).is_some());
}

#[test]
fn double_booking_is_not_checked() {
    let (mut s, id) = scheduler_with_alice();
    placed(&mut s, &id);
    let second = s
        .create_until(&id, at(7, 10, 0), at(7, 11, 0), &CancelToken::new())
        .unwrap();
    assert!(matches!(second, Outcome::Applied(_)));
    assert_eq!(s.session().shifts().count(), 2);
}

#[test]
fn failed_move_keeps_prior_interval() {
    let (mut s, id) = scheduler_with_alice();
    let shift = placed(&mut s, &id);
    s.backend_mut().fail = true;
    let err = s
        .move_shift(&shift.id, at(7, 13, 0), at(7, 16, 0), &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, SchedError::PersistenceFailed(_)));
    assert_eq!(s.session().find_shift(&shift.id), Some(&shift));
}

#[test]
fn abandoned_create_is_not_applied() {
    let (mut s, id) = scheduler_with_alice();
    let cancel = CancelToken::new();
    s.backend_mut().cancel_during_call = Some(cancel.clone());
    let outcome = s.create(&id, at(7, 10, 0), &cancel).unwrap();
    assert_eq!(outcome, Outcome::Abandoned);
    assert_eq!(s.backend().calls, vec!["create"]);
    assert_eq!(s.session().shifts().count(), 0);
}

#[test]
fn abandoned_delete_keeps_shift() {
    let (mut s, id) = scheduler_with_alice();
    let shift = placed(&mut s, &id);
    let cancel = CancelToken::new();
    s.backend_mut().cancel_during_call = Some(cancel.clone());
    let yes = |_: &str| true;
    let outcome = s.delete_shift(&shift.id, &yes, &cancel).unwrap();
    assert_eq!(outcome, Outcome::Abandoned);
    assert_eq!(s.backend().calls, vec!["create", "delete"]);
    assert_eq!(s.session().find_shift(&shift.id), Some(&shift));
}

#[test]
fn validate_refuses_inverted_interval_like_create() {
    let (s, id) = scheduler_with_alice();
    let err = s.validate(&id, at(7, 12, 0), at(7, 10, 0)).unwrap_err();
    assert!(matches!(err, SchedError::InvalidTimeRange));
}
