use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! strong_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new<S: AsRef<str>>(s: S) -> Self {
                Self(s.as_ref().to_owned())
            }
            pub fn random() -> Self {
                Self(Uuid::new_v4().to_string())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

strong_id!(
    /// Identifiant fort pour Employee
    EmployeeId
);
strong_id!(
    /// Identifiant fort pour l'organisation propriétaire des employés
    OrganizationId
);
strong_id!(
    /// Identifiant fort pour Shift (attribué par la persistance)
    ShiftId
);

/// Fenêtre de disponibilité hebdomadaire : jour (0 = dimanche) et heures pleines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub day: u8,
    pub start_time: u8,
    pub end_time: u8,
}

impl Availability {
    pub fn new(day: u8, start_time: u8, end_time: u8) -> Result<Self, String> {
        if day > 6 {
            return Err(format!("day of week out of range: {day}"));
        }
        if start_time > 23 || end_time > 23 {
            return Err("availability hours must be within 0..=23".to_string());
        }
        if end_time < start_time {
            return Err("availability end_time must not precede start_time".to_string());
        }
        Ok(Self {
            day,
            start_time,
            end_time,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOffStatus {
    Pending,
    Approved,
    Denied,
}

impl std::str::FromStr for TimeOffStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "denied" => Ok(Self::Denied),
            other => Err(format!("unknown time-off status: {other}")),
        }
    }
}

/// Demande de congé sur une journée calendaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOffRequest {
    pub date: NaiveDate,
    pub status: TimeOffStatus,
}

impl TimeOffRequest {
    pub fn new(date: NaiveDate, status: TimeOffStatus) -> Self {
        Self { date, status }
    }
    pub fn approved(date: NaiveDate) -> Self {
        Self::new(date, TimeOffStatus::Approved)
    }
}

/// Shift durable (UTC, intervalle [start, end)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    pub employee: EmployeeId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Shift {
    /// Durée en minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Employé avec ses disponibilités, congés et shifts courants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub organization_id: OrganizationId,
    #[serde(default)]
    pub availabilities: Vec<Availability>,
    #[serde(default)]
    pub time_off_requests: Vec<TimeOffRequest>,
    #[serde(default, alias = "events")]
    pub shifts: Vec<Shift>,
}

impl Employee {
    pub fn new<F: Into<String>, L: Into<String>>(
        organization_id: OrganizationId,
        first_name: F,
        last_name: L,
    ) -> Self {
        Self {
            id: EmployeeId::random(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            organization_id,
            availabilities: Vec::new(),
            time_off_requests: Vec::new(),
            shifts: Vec::new(),
        }
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availabilities.push(availability);
        self
    }

    pub fn with_time_off(mut self, request: TimeOffRequest) -> Self {
        self.time_off_requests.push(request);
        self
    }

    /// Titre affiché pour les shifts de cet employé.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Horaires d'ouverture d'une journée, en heures [open, close).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHours {
    pub open: u8,
    pub close: u8,
}

impl OpeningHours {
    pub fn new(open: u8, close: u8) -> Result<Self, String> {
        if close > 24 || close <= open {
            return Err(format!("invalid opening hours {open}-{close}"));
        }
        Ok(Self { open, close })
    }
}

/// Horaires d'ouverture par jour de semaine (index 0 = dimanche). `None` = fermé.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    pub days: [Option<OpeningHours>; 7],
}

impl BusinessHours {
    /// Mêmes horaires pour les sept jours.
    pub fn every_day(hours: OpeningHours) -> Self {
        Self {
            days: [Some(hours); 7],
        }
    }

    pub fn set(&mut self, day: u8, hours: Option<OpeningHours>) {
        if let Some(slot) = self.days.get_mut(usize::from(day)) {
            *slot = hours;
        }
    }

    pub fn for_weekday(&self, day: u8) -> Option<OpeningHours> {
        self.days.get(usize::from(day)).copied().flatten()
    }

    /// Plage horaire la plus large sur les jours ouverts : (ouverture min, fermeture max).
    pub fn hour_range(&self) -> Option<(u8, u8)> {
        self.days.iter().flatten().fold(None, |acc, h| match acc {
            None => Some((h.open, h.close)),
            Some((open, close)) => Some((open.min(h.open), close.max(h.close))),
        })
    }
}

/// Document persisté d'une organisation (employés, shifts, horaires).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    pub organization_id: OrganizationId,
    #[serde(default)]
    pub business_hours: BusinessHours,
    #[serde(default)]
    pub employees: Vec<Employee>,
}

impl Workspace {
    pub fn new(organization_id: OrganizationId) -> Self {
        Self {
            organization_id,
            business_hours: BusinessHours::default(),
            employees: Vec::new(),
        }
    }

    pub fn find_employee_mut(&mut self, id: &EmployeeId) -> Option<&mut Employee> {
        self.employees.iter_mut().find(|e| &e.id == id)
    }
    pub fn find_shift_mut(&mut self, id: &ShiftId) -> Option<&mut Shift> {
        self.employees
            .iter_mut()
            .flat_map(|e| e.shifts.iter_mut())
            .find(|s| &s.id == id)
    }
}
