use super::CoverageOptions;
use crate::model::{BusinessHours, Shift};
use crate::window::{self, ScheduleRange};
use chrono::{DateTime, Duration, Utc};

/// Tranche horaire et nombre de shifts qui la recouvrent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageBucket {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub count: u32,
}

/// Couverture dérivée, jamais persistée.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageSummary {
    pub buckets: Vec<CoverageBucket>,
}

impl CoverageSummary {
    /// Somme de count × durée de tranche, en heures.
    pub fn total_staffed_hours(&self) -> f64 {
        let minutes: i64 = self
            .buckets
            .iter()
            .map(|b| i64::from(b.count) * (b.end - b.start).num_minutes())
            .sum();
        minutes as f64 / 60.0
    }

    pub fn peak(&self) -> Option<&CoverageBucket> {
        self.buckets.iter().max_by_key(|b| b.count)
    }

    /// Tranches d'ouverture sans personne.
    pub fn gaps(&self) -> impl Iterator<Item = &CoverageBucket> {
        self.buckets.iter().filter(|b| b.count == 0)
    }
}

pub fn compute_coverage<'a, I>(
    shifts: I,
    range: &ScheduleRange,
    hours: &BusinessHours,
    opts: CoverageOptions,
) -> CoverageSummary
where
    I: IntoIterator<Item = &'a Shift>,
{
    let mut ordered: Vec<&Shift> = shifts.into_iter().collect();
    ordered.sort_by_key(|s| s.start);

    let step = Duration::minutes(i64::from(opts.bucket_minutes.max(1)));
    let mut buckets = Vec::new();

    for day in range.days() {
        let midnight = window::midnight(day);
        let Some(opening) = hours.for_weekday(window::day_of_week(midnight)) else {
            continue;
        };
        let close = midnight + Duration::hours(i64::from(opening.close));
        let mut cursor = midnight + Duration::hours(i64::from(opening.open));

        while cursor < close {
            let end = (cursor + step).min(close);
            let count = ordered
                .iter()
                .take_while(|s| s.start < end)
                .filter(|s| window::overlaps(s.start, s.end, cursor, end))
                .count() as u32;
            buckets.push(CoverageBucket {
                start: cursor,
                end,
                count,
            });
            cursor = end;
        }
    }

    CoverageSummary { buckets }
}
