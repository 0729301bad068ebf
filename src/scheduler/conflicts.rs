use super::index::{AvailabilityIndex, TimeOffIndex};
use super::{RejectionReason, Verdict};
use crate::model::Employee;
use crate::window;
use chrono::{DateTime, Utc};

/// Vérifie qu'un placement est légal pour l'employé. Le premier critère en échec
/// détermine le motif : congé, puis jour sans disponibilité, puis fenêtre horaire.
///
/// Les chevauchements avec les autres shifts du même employé ne sont pas vérifiés.
pub fn validate_employee(
    employee: &Employee,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Verdict {
    if TimeOffIndex::for_employee(employee).is_on_approved_time_off(start) {
        return Verdict::Reject(RejectionReason::TimeOffConflict);
    }

    let Some(availability) =
        AvailabilityIndex::for_employee(employee).lookup(window::day_of_week(start))
    else {
        return Verdict::Reject(RejectionReason::NoAvailabilityThatDay);
    };

    // bornes incluses : finir pile à l'heure de fin est autorisé
    let requested = (window::hour_of(start), window::hour_of(end));
    if !window::contains((availability.start_time, availability.end_time), requested) {
        return Verdict::Reject(RejectionReason::OutsideAvailabilityWindow);
    }

    Verdict::Accept
}
