use crate::model::EmployeeId;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Options de session
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Durée d'un shift créé sans fin explicite.
    pub default_shift_minutes: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            default_shift_minutes: 60,
        }
    }
}

/// Options de calcul de couverture
#[derive(Debug, Clone, Copy)]
pub struct CoverageOptions {
    pub bucket_minutes: u32,
}

impl Default for CoverageOptions {
    fn default() -> Self {
        Self { bucket_minutes: 60 }
    }
}

/// Motif de refus, du plus global au plus fin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    TimeOffConflict,
    NoAvailabilityThatDay,
    OutsideAvailabilityWindow,
}

impl RejectionReason {
    pub fn code(self) -> &'static str {
        match self {
            RejectionReason::TimeOffConflict => "time_off_conflict",
            RejectionReason::NoAvailabilityThatDay => "no_availability_that_day",
            RejectionReason::OutsideAvailabilityWindow => "outside_availability_window",
        }
    }
}

/// Refus d'un placement, avec le contexte de la demande.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub employee: EmployeeId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub reason: RejectionReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(RejectionReason),
}

impl Verdict {
    pub fn is_accept(self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// Résultat normal d'une mutation : seul l'échec de persistance est une erreur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Applied(T),
    Rejected(Rejection),
    /// L'utilisateur a refusé la confirmation de suppression.
    DeletionCancelled,
    /// L'appelant a annulé pendant l'appel de persistance ; rien n'est appliqué.
    Abandoned,
}

impl<T> Outcome<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(v) => Some(v),
            _ => None,
        }
    }
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Outcome::Rejected(r) => Some(r),
            _ => None,
        }
    }
}

/// Jeton d'annulation partagé entre l'appelant et une mutation en cours.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid time range: end must be after start")]
    InvalidTimeRange,
    #[error("unknown employee: {0}")]
    UnknownEmployee(String),
    #[error("unknown shift: {0}")]
    UnknownShift(String),
    #[error("persistence failed")]
    PersistenceFailed(#[source] anyhow::Error),
}
