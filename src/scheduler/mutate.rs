use super::{CancelToken, Outcome, Rejection, SchedError, Scheduler, Verdict};
use crate::model::{EmployeeId, Shift, ShiftId};
use crate::notification::{ConfirmDeletion, NoticeRenderer, TextNotice};
use crate::storage::Persistence;
use chrono::{DateTime, Utc};

// La session n'est modifiée qu'après un succès de persistance observé et non annulé :
// un échec laisse donc l'état en mémoire identique à celui d'avant l'appel.

fn gate(
    scheduler: &Scheduler<impl Persistence>,
    employee: &EmployeeId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Option<Rejection>, SchedError> {
    Ok(match scheduler.session.validate(employee, start, end)? {
        Verdict::Accept => None,
        Verdict::Reject(reason) => Some(Rejection {
            employee: employee.clone(),
            start,
            end,
            reason,
        }),
    })
}

pub(super) fn create<P: Persistence>(
    scheduler: &mut Scheduler<P>,
    employee: &EmployeeId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    cancel: &CancelToken,
) -> Result<Outcome<Shift>, SchedError> {
    if let Some(rejection) = gate(&*scheduler, employee, start, end)? {
        return Ok(Outcome::Rejected(rejection));
    }

    let shift = scheduler
        .backend
        .create_shift(employee, start, end)
        .map_err(SchedError::PersistenceFailed)?;
    if cancel.is_cancelled() {
        return Ok(Outcome::Abandoned);
    }

    let owner = scheduler
        .session
        .employee_mut(employee)
        .ok_or_else(|| SchedError::UnknownEmployee(employee.as_str().to_string()))?;
    owner.shifts.push(shift.clone());
    Ok(Outcome::Applied(shift))
}

pub(super) fn reschedule<P: Persistence>(
    scheduler: &mut Scheduler<P>,
    shift_id: &ShiftId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    cancel: &CancelToken,
) -> Result<Outcome<Shift>, SchedError> {
    let Some(current) = scheduler.session.find_shift(shift_id) else {
        return Err(SchedError::UnknownShift(shift_id.as_str().to_string()));
    };
    let employee = current.employee.clone();

    if let Some(rejection) = gate(&*scheduler, &employee, start, end)? {
        return Ok(Outcome::Rejected(rejection));
    }

    let updated = scheduler
        .backend
        .update_shift(shift_id, start, end)
        .map_err(SchedError::PersistenceFailed)?;
    if cancel.is_cancelled() {
        return Ok(Outcome::Abandoned);
    }

    let slot = scheduler
        .session
        .shift_mut(shift_id)
        .ok_or_else(|| SchedError::UnknownShift(shift_id.as_str().to_string()))?;
    slot.start = updated.start;
    slot.end = updated.end;
    Ok(Outcome::Applied(slot.clone()))
}

pub(super) fn delete<P: Persistence>(
    scheduler: &mut Scheduler<P>,
    shift_id: &ShiftId,
    confirm: &dyn ConfirmDeletion,
    cancel: &CancelToken,
) -> Result<Outcome<()>, SchedError> {
    let Some(shift) = scheduler.session.find_shift(shift_id) else {
        return Err(SchedError::UnknownShift(shift_id.as_str().to_string()));
    };

    let prompt = TextNotice.deletion_prompt(&scheduler.session.title_of(shift), shift);
    if !confirm.confirm(&prompt) {
        return Ok(Outcome::DeletionCancelled);
    }

    scheduler
        .backend
        .delete_shift(shift_id)
        .map_err(SchedError::PersistenceFailed)?;
    if cancel.is_cancelled() {
        return Ok(Outcome::Abandoned);
    }

    for employee in scheduler.session.employees.iter_mut() {
        employee.shifts.retain(|s| &s.id != shift_id);
    }
    Ok(Outcome::Applied(()))
}
