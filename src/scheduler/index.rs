use crate::model::{Availability, Employee, TimeOffStatus};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;

/// Disponibilité par jour de semaine. En cas de doublon, la première gagne.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityIndex {
    by_day: [Option<Availability>; 7],
}

impl AvailabilityIndex {
    pub fn for_employee(employee: &Employee) -> Self {
        let mut by_day = [None; 7];
        for availability in &employee.availabilities {
            if let Some(slot) = by_day.get_mut(usize::from(availability.day)) {
                if slot.is_none() {
                    *slot = Some(*availability);
                }
            }
        }
        Self { by_day }
    }

    pub fn lookup(&self, day_of_week: u8) -> Option<Availability> {
        self.by_day.get(usize::from(day_of_week)).copied().flatten()
    }
}

/// Dates de congés approuvés. Les demandes en attente ou refusées ne bloquent pas.
#[derive(Debug, Clone, Default)]
pub struct TimeOffIndex {
    approved: BTreeSet<NaiveDate>,
}

impl TimeOffIndex {
    pub fn for_employee(employee: &Employee) -> Self {
        let approved = employee
            .time_off_requests
            .iter()
            .filter(|r| r.status == TimeOffStatus::Approved)
            .map(|r| r.date)
            .collect();
        Self { approved }
    }

    /// Granularité jour : seule la date calendaire (UTC) de `at` compte.
    pub fn is_on_approved_time_off(&self, at: DateTime<Utc>) -> bool {
        self.approved.contains(&at.date_naive())
    }
}
