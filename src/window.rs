//! Arithmétique de dates : jour de semaine, heure, bornes de jour et de semaine.
//!
//! Tout est en UTC. Les semaines commencent le dimanche (jour 0).

use crate::scheduler::SchedError;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Jour de semaine, 0 = dimanche … 6 = samedi.
pub fn day_of_week(at: DateTime<Utc>) -> u8 {
    at.weekday().num_days_from_sunday() as u8
}

/// Heure pleine (minutes tronquées).
pub fn hour_of(at: DateTime<Utc>) -> u8 {
    at.hour() as u8
}

pub fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    midnight(at.date_naive())
}

/// Dernière milliseconde de la journée.
pub fn end_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    start_of_day(at) + Duration::days(1) - Duration::milliseconds(1)
}

pub fn start_of_week(at: DateTime<Utc>) -> DateTime<Utc> {
    start_of_day(at) - Duration::days(i64::from(day_of_week(at)))
}

pub fn end_of_week(at: DateTime<Utc>) -> DateTime<Utc> {
    end_of_day(start_of_week(at) + Duration::days(6))
}

/// `[a_start, a_end)` et `[b_start, b_end)` se chevauchent.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// `inner` est contenu (bornes incluses) dans `outer`.
pub fn contains(outer: (u8, u8), inner: (u8, u8)) -> bool {
    outer.0 <= inner.0 && outer.1 >= inner.1
}

pub(crate) fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Sélection faite dans le calendrier.
#[derive(Debug, Clone)]
pub enum Selection {
    /// Un ou plusieurs jours cliqués (vue jour/semaine).
    Days(Vec<DateTime<Utc>>),
    /// Intervalle explicite (vue mois/agenda).
    Span {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Fenêtre visible du calendrier, normalisée aux bornes de jour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ScheduleRange {
    pub fn from_selection(selection: &Selection) -> Result<Self, SchedError> {
        let (first, last) = match selection {
            Selection::Days(days) => {
                let first = days.iter().min().ok_or(SchedError::InvalidTimeRange)?;
                let last = days.iter().max().ok_or(SchedError::InvalidTimeRange)?;
                (*first, *last)
            }
            Selection::Span { start, end } => {
                if end < start {
                    return Err(SchedError::InvalidTimeRange);
                }
                (*start, *end)
            }
        };
        Ok(Self {
            start: start_of_day(first),
            end: end_of_day(last),
        })
    }

    /// Semaine courante (dimanche → samedi), fenêtre par défaut.
    pub fn current_week(now: DateTime<Utc>) -> Self {
        Self {
            start: start_of_week(now),
            end: end_of_week(now),
        }
    }

    /// Journées calendaires couvertes, dans l'ordre.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.end.date_naive();
        let mut current = Some(self.start.date_naive());
        std::iter::from_fn(move || {
            let day = current.filter(|d| *d <= last)?;
            current = day.succ_opt();
            Some(day)
        })
    }
}
