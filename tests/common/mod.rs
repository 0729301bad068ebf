#![allow(dead_code)]
use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use horaires::{
    Availability, BusinessHours, CancelToken, Employee, EmployeeId, OpeningHours,
    OrganizationId, Persistence, Shift, ShiftId, TimeOffRequest, Workspace,
};

pub fn at(d: u32, h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, d, h, m, 0).unwrap()
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
}

pub fn org() -> OrganizationId {
    OrganizationId::new("acme")
}

/// Alice : mardi 9–17, mercredi 8–16, congé approuvé le mercredi 8 octobre 2025.
pub fn alice() -> Employee {
    Employee::new(org(), "Alice", "Martin")
        .with_availability(Availability::new(2, 9, 17).unwrap())
        .with_availability(Availability::new(3, 8, 16).unwrap())
        .with_time_off(TimeOffRequest::approved(day(8)))
}

pub fn workspace(employees: Vec<Employee>) -> Workspace {
    let mut ws = Workspace::new(org());
    ws.business_hours = BusinessHours::every_day(OpeningHours::new(8, 18).unwrap());
    ws.employees = employees;
    ws
}

/// Persistance en mémoire avec injection de pannes.
#[derive(Default)]
pub struct MemoryBackend {
    pub workspace: Option<Workspace>,
    pub calls: Vec<&'static str>,
    pub fail: bool,
    /// Annule ce jeton pendant l'appel, comme un appelant qui quitte la vue.
    pub cancel_during_call: Option<CancelToken>,
}

impl MemoryBackend {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace: Some(workspace),
            ..Self::default()
        }
    }

    fn enter(&mut self, call: &'static str) -> anyhow::Result<&mut Workspace> {
        self.calls.push(call);
        if let Some(token) = &self.cancel_during_call {
            token.cancel();
        }
        if self.fail {
            bail!("connection reset by peer");
        }
        self.workspace.as_mut().context("no workspace")
    }
}

impl Persistence for MemoryBackend {
    fn fetch_employees(&self, _org: &OrganizationId) -> anyhow::Result<Vec<Employee>> {
        Ok(self.workspace.as_ref().context("no workspace")?.employees.clone())
    }

    fn fetch_business_hours(&self, _org: &OrganizationId) -> anyhow::Result<BusinessHours> {
        Ok(self
            .workspace
            .as_ref()
            .context("no workspace")?
            .business_hours
            .clone())
    }

    fn create_shift(
        &mut self,
        employee: &EmployeeId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Shift> {
        let ws = self.enter("create")?;
        let shift = Shift {
            id: ShiftId::random(),
            employee: employee.clone(),
            start,
            end,
        };
        ws.find_employee_mut(employee)
            .context("unknown employee")?
            .shifts
            .push(shift.clone());
        Ok(shift)
    }

    fn update_shift(
        &mut self,
        id: &ShiftId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Shift> {
        let ws = self.enter("update")?;
        let shift = ws.find_shift_mut(id).context("unknown shift")?;
        shift.start = start;
        shift.end = end;
        Ok(shift.clone())
    }

    fn delete_shift(&mut self, id: &ShiftId) -> anyhow::Result<()> {
        let ws = self.enter("delete")?;
        for e in ws.employees.iter_mut() {
            e.shifts.retain(|s| &s.id != id);
        }
        Ok(())
    }
}
