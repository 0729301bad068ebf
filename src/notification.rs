use crate::model::{Employee, Shift};
use crate::scheduler::{Rejection, RejectionReason};

/// Demande une confirmation humaine avant une suppression.
pub trait ConfirmDeletion {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> ConfirmDeletion for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Présente un refus de placement à l'utilisateur (alerte, bandeau, stderr…).
pub trait RejectionReporter {
    fn report(&self, employee: Option<&Employee>, rejection: &Rejection);
}

/// Permet de customiser le rendu des messages.
pub trait NoticeRenderer {
    fn rejection(&self, employee: Option<&Employee>, rejection: &Rejection) -> String;
    fn deletion_prompt(&self, title: &str, shift: &Shift) -> String;
}

/// Rendu texte simple, en anglais comme l'interface d'administration.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextNotice;

impl NoticeRenderer for TextNotice {
    fn rejection(&self, employee: Option<&Employee>, rejection: &Rejection) -> String {
        let who = employee
            .map(|e| e.display_name())
            .unwrap_or_else(|| "this employee".to_string());
        match rejection.reason {
            RejectionReason::TimeOffConflict => {
                format!("Sorry, you can't schedule {who} during their approved time off.")
            }
            RejectionReason::NoAvailabilityThatDay => {
                format!("Sorry, {who} isn't available on this day.")
            }
            RejectionReason::OutsideAvailabilityWindow => {
                format!("Sorry, you can't schedule {who} outside their availability window.")
            }
        }
    }

    fn deletion_prompt(&self, title: &str, shift: &Shift) -> String {
        format!(
            "Would you like to cancel this shift?\n\n{title}\nBegin: {begin}\nEnd: {end}\n",
            begin = shift.start.format("%a, %B %-d, %-I:%M %P"),
            end = shift.end.format("%a, %B %-d, %-I:%M %P"),
        )
    }
}

/// Reporter qui écrit le message rendu sur stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrReporter<R = TextNotice> {
    renderer: R,
}

impl<R: NoticeRenderer> StderrReporter<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }
}

impl<R: NoticeRenderer> RejectionReporter for StderrReporter<R> {
    fn report(&self, employee: Option<&Employee>, rejection: &Rejection) {
        eprintln!("{}", self.renderer.rejection(employee, rejection));
    }
}
