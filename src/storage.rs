use crate::model::{BusinessHours, Employee, EmployeeId, OrganizationId, Shift, ShiftId, Workspace};
use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use std::cell::OnceCell;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Service de persistance : CRUD des employés et des shifts d'une organisation.
pub trait Persistence {
    /// Employés avec disponibilités, congés et shifts.
    fn fetch_employees(&self, org: &OrganizationId) -> anyhow::Result<Vec<Employee>>;
    fn fetch_business_hours(&self, org: &OrganizationId) -> anyhow::Result<BusinessHours>;
    /// Crée le shift et lui attribue un identifiant durable.
    fn create_shift(
        &mut self,
        employee: &EmployeeId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Shift>;
    fn update_shift(
        &mut self,
        id: &ShiftId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Shift>;
    fn delete_shift(&mut self, id: &ShiftId) -> anyhow::Result<()>;
}

/// Persistance fichier : un document JSON par organisation, écrit de manière atomique.
///
/// Le premier fetch lie le backend à son organisation ; les écritures suivantes
/// refusent un document appartenant à une autre organisation.
pub struct JsonBackend {
    path: PathBuf,
    organization: OnceCell<OrganizationId>,
}

impl JsonBackend {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            organization: OnceCell::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> anyhow::Result<Workspace> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let workspace: Workspace =
            serde_json::from_slice(&data).with_context(|| "parsing workspace.json")?;
        Ok(workspace)
    }

    /// Sauvegarde de manière atomique.
    pub fn save(&self, workspace: &Workspace) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(workspace)?;
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        #[cfg(feature = "logging")]
        tracing::debug!(path = %self.path.display(), bytes = json.len(), "workspace saved");
        Ok(())
    }

    fn load_for(&self, org: &OrganizationId) -> anyhow::Result<Workspace> {
        let workspace = self.load()?;
        if &workspace.organization_id != org {
            bail!(
                "workspace {} belongs to organization {}, not {}",
                self.path.display(),
                workspace.organization_id,
                org
            );
        }
        Ok(workspace)
    }

    fn load_for_write(&self) -> anyhow::Result<Workspace> {
        match self.organization.get() {
            Some(org) => self.load_for(org),
            None => self.load(),
        }
    }

    fn bind(&self, org: &OrganizationId) {
        let _ = self.organization.set(org.clone());
    }
}

impl Persistence for JsonBackend {
    fn fetch_employees(&self, org: &OrganizationId) -> anyhow::Result<Vec<Employee>> {
        let workspace = self.load_for(org)?;
        self.bind(org);
        Ok(workspace.employees)
    }

    fn fetch_business_hours(&self, org: &OrganizationId) -> anyhow::Result<BusinessHours> {
        let workspace = self.load_for(org)?;
        self.bind(org);
        Ok(workspace.business_hours)
    }

    fn create_shift(
        &mut self,
        employee: &EmployeeId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Shift> {
        let mut workspace = self.load_for_write()?;
        let owner = workspace
            .find_employee_mut(employee)
            .with_context(|| format!("unknown employee: {employee}"))?;
        let shift = Shift {
            id: ShiftId::random(),
            employee: employee.clone(),
            start,
            end,
        };
        owner.shifts.push(shift.clone());
        self.save(&workspace)?;
        #[cfg(feature = "logging")]
        tracing::debug!(shift = %shift.id, employee = %employee, "shift created");
        Ok(shift)
    }

    fn update_shift(
        &mut self,
        id: &ShiftId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Shift> {
        let mut workspace = self.load_for_write()?;
        let shift = workspace
            .find_shift_mut(id)
            .with_context(|| format!("unknown shift: {id}"))?;
        shift.start = start;
        shift.end = end;
        let updated = shift.clone();
        self.save(&workspace)?;
        #[cfg(feature = "logging")]
        tracing::debug!(shift = %id, "shift updated");
        Ok(updated)
    }

    fn delete_shift(&mut self, id: &ShiftId) -> anyhow::Result<()> {
        let mut workspace = self.load_for_write()?;
        let mut removed = false;
        for employee in workspace.employees.iter_mut() {
            let before = employee.shifts.len();
            employee.shifts.retain(|s| &s.id != id);
            removed |= employee.shifts.len() != before;
        }
        if !removed {
            bail!("unknown shift: {id}");
        }
        self.save(&workspace)?;
        #[cfg(feature = "logging")]
        tracing::debug!(shift = %id, "shift deleted");
        Ok(())
    }
}
