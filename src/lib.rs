#![forbid(unsafe_code)]
//! Horaires — placement de shifts d'employés et calcul de couverture.
//!
//! - Validation d'un placement contre les congés approuvés et les disponibilités hebdomadaires.
//! - Orchestration validation → persistance pour créer, déplacer, redimensionner, supprimer.
//! - Couverture par tranche horaire sur les heures d'ouverture.
//! - Tout en UTC ; parsing RFC3339 ; affichage local en dehors de la lib.

pub mod io;
pub mod model;
pub mod notification;
pub mod scheduler;
pub mod storage;
pub mod window;

pub use model::{
    Availability, BusinessHours, Employee, EmployeeId, OpeningHours, OrganizationId, Shift,
    ShiftId, TimeOffRequest, TimeOffStatus, Workspace,
};
pub use notification::{
    ConfirmDeletion, NoticeRenderer, RejectionReporter, StderrReporter, TextNotice,
};
pub use scheduler::{
    CancelToken, CoverageOptions, CoverageSummary, Outcome, Rejection, RejectionReason,
    SchedError, Scheduler, Session, SessionOptions, Verdict,
};
pub use storage::{JsonBackend, Persistence};
pub use window::{ScheduleRange, Selection};
