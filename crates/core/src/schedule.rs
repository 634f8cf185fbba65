//! Calendar placement of generated pairings.
//!
//! The scheduler binds abstract `(round, home, away)` pairings to concrete
//! kick-off datetimes inside the season window. It does not attempt venue
//! conflict resolution — all matches of a round share the same date and may
//! run simultaneously.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::SeasonError;
use crate::roundrobin::Pairing;
use crate::types::TeamId;

/// Scheduling inputs, taken from the season row.
#[derive(Debug, Clone)]
pub struct SeasonWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Days between consecutive round numbers.
    pub match_frequency_days: u32,
    /// Kick-off time stamped onto every computed date (UTC).
    pub preferred_match_time: NaiveTime,
}

/// A pairing bound to a concrete kick-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ScheduledFixture {
    pub round: u32,
    pub home: TeamId,
    pub away: TeamId,
    pub kickoff: NaiveDateTime,
}

/// Assign kick-off datetimes to pairings.
///
/// Round `r` (1-based) lands on `start_date + (r - 1) * match_frequency_days`
/// at `preferred_match_time`. Fails with `ScheduleExceedsSeasonWindow` when
/// the final round would land after `end_date` — validated up front, before
/// anything is persisted, and against the full round count (both passes of
/// a double round-robin).
pub fn place_rounds(
    pairings: &[Pairing],
    window: &SeasonWindow,
) -> Result<Vec<ScheduledFixture>, SeasonError> {
    let last_round = pairings.iter().map(|p| p.round).max().unwrap_or(0);
    if last_round > 0 {
        let required_days = (i64::from(last_round) - 1) * i64::from(window.match_frequency_days);
        let available_days = (window.end_date - window.start_date).num_days();
        if required_days > available_days {
            return Err(SeasonError::ScheduleExceedsSeasonWindow {
                required_days,
                available_days,
            });
        }
    }

    pairings
        .iter()
        .map(|p| {
            let offset = u64::from(p.round - 1) * u64::from(window.match_frequency_days);
            let date = window
                .start_date
                .checked_add_days(Days::new(offset))
                .ok_or_else(|| {
                    SeasonError::Validation("match date exceeds the calendar range".into())
                })?;
            Ok(ScheduledFixture {
                round: p.round,
                home: p.home,
                away: p.away,
                kickoff: date.and_time(window.preferred_match_time),
            })
        })
        .collect()
}
