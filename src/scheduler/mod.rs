mod conflicts;
mod coverage;
mod index;
mod mutate;
mod types;

pub use conflicts::validate_employee;
pub use coverage::{compute_coverage, CoverageBucket, CoverageSummary};
pub use index::{AvailabilityIndex, TimeOffIndex};
pub use types::{
    CancelToken, CoverageOptions, Outcome, Rejection, RejectionReason, SchedError,
    SessionOptions, Verdict,
};

use crate::model::{BusinessHours, Employee, EmployeeId, OrganizationId, Shift, ShiftId};
use crate::notification::ConfirmDeletion;
use crate::storage::Persistence;
use crate::window::ScheduleRange;
use chrono::{DateTime, Utc};

/// Contexte d'une session de planification : employés chargés et horaires.
#[derive(Debug, Clone)]
pub struct Session {
    organization: OrganizationId,
    employees: Vec<Employee>,
    business_hours: BusinessHours,
}

impl Session {
    pub fn new(
        organization: OrganizationId,
        employees: Vec<Employee>,
        business_hours: BusinessHours,
    ) -> Self {
        Self {
            organization,
            employees,
            business_hours,
        }
    }

    /// Charge employés et horaires depuis la persistance.
    pub fn load<P: Persistence + ?Sized>(
        backend: &P,
        organization: OrganizationId,
    ) -> Result<Self, SchedError> {
        let employees = backend
            .fetch_employees(&organization)
            .map_err(SchedError::PersistenceFailed)?;
        let business_hours = backend
            .fetch_business_hours(&organization)
            .map_err(SchedError::PersistenceFailed)?;
        Ok(Self::new(organization, employees, business_hours))
    }

    pub fn organization(&self) -> &OrganizationId {
        &self.organization
    }
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }
    pub fn business_hours(&self) -> &BusinessHours {
        &self.business_hours
    }

    pub fn find_employee(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| &e.id == id)
    }

    pub fn find_shift(&self, id: &ShiftId) -> Option<&Shift> {
        self.shifts().find(|s| &s.id == id)
    }

    /// Tous les shifts de tous les employés, à plat.
    pub fn shifts(&self) -> impl Iterator<Item = &Shift> {
        self.employees.iter().flat_map(|e| e.shifts.iter())
    }

    /// Titre affiché : nom de l'employé.
    pub fn title_of(&self, shift: &Shift) -> String {
        self.find_employee(&shift.employee)
            .map(Employee::display_name)
            .unwrap_or_else(|| shift.employee.as_str().to_string())
    }

    pub fn validate(
        &self,
        employee: &EmployeeId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Verdict, SchedError> {
        if end <= start {
            return Err(SchedError::InvalidTimeRange);
        }
        let employee = self
            .find_employee(employee)
            .ok_or_else(|| SchedError::UnknownEmployee(employee.as_str().to_string()))?;
        Ok(validate_employee(employee, start, end))
    }

    pub fn coverage(&self, range: &ScheduleRange, opts: CoverageOptions) -> CoverageSummary {
        let visible = self
            .shifts()
            .filter(|s| crate::window::overlaps(s.start, s.end, range.start, range.end));
        compute_coverage(visible, range, &self.business_hours, opts)
    }

    fn employee_mut(&mut self, id: &EmployeeId) -> Option<&mut Employee> {
        self.employees.iter_mut().find(|e| &e.id == id)
    }

    fn shift_mut(&mut self, id: &ShiftId) -> Option<&mut Shift> {
        self.employees
            .iter_mut()
            .flat_map(|e| e.shifts.iter_mut())
            .find(|s| &s.id == id)
    }
}

/// Scheduler : possède la session et orchestre validation puis persistance.
pub struct Scheduler<P> {
    session: Session,
    backend: P,
    opts: SessionOptions,
}

impl<P: Persistence> Scheduler<P> {
    pub fn new(session: Session, backend: P, opts: SessionOptions) -> Self {
        Self {
            session,
            backend,
            opts,
        }
    }

    /// Ouvre une session en chargeant l'organisation depuis `backend`.
    pub fn open(
        backend: P,
        organization: OrganizationId,
        opts: SessionOptions,
    ) -> Result<Self, SchedError> {
        let session = Session::load(&backend, organization)?;
        Ok(Self::new(session, backend, opts))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
    pub fn backend(&self) -> &P {
        &self.backend
    }
    pub fn backend_mut(&mut self) -> &mut P {
        &mut self.backend
    }
    pub fn options(&self) -> SessionOptions {
        self.opts
    }

    pub fn validate(
        &self,
        employee: &EmployeeId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Verdict, SchedError> {
        self.session.validate(employee, start, end)
    }

    /// Place un shift d'une durée par défaut à partir de `start`.
    pub fn create(
        &mut self,
        employee: &EmployeeId,
        start: DateTime<Utc>,
        cancel: &CancelToken,
    ) -> Result<Outcome<Shift>, SchedError> {
        let end = start + chrono::Duration::minutes(i64::from(self.opts.default_shift_minutes));
        mutate::create(self, employee, start, end, cancel)
    }

    /// Place un shift avec une fin explicite.
    pub fn create_until(
        &mut self,
        employee: &EmployeeId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        cancel: &CancelToken,
    ) -> Result<Outcome<Shift>, SchedError> {
        mutate::create(self, employee, start, end, cancel)
    }

    pub fn move_shift(
        &mut self,
        shift: &ShiftId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        cancel: &CancelToken,
    ) -> Result<Outcome<Shift>, SchedError> {
        mutate::reschedule(self, shift, start, end, cancel)
    }

    /// Même contrat que `move_shift` ; seule l'intention de l'appelant diffère.
    pub fn resize_shift(
        &mut self,
        shift: &ShiftId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        cancel: &CancelToken,
    ) -> Result<Outcome<Shift>, SchedError> {
        mutate::reschedule(self, shift, start, end, cancel)
    }

    pub fn delete_shift(
        &mut self,
        shift: &ShiftId,
        confirm: &dyn ConfirmDeletion,
        cancel: &CancelToken,
    ) -> Result<Outcome<()>, SchedError> {
        mutate::delete(self, shift, confirm, cancel)
    }

    pub fn coverage(&self, range: &ScheduleRange, opts: CoverageOptions) -> CoverageSummary {
        self.session.coverage(range, opts)
    }
}
