//! Round-robin pairing generation (circle method).
//!
//! Pure and deterministic: the output depends only on the order of
//! `team_ids` and on `rounds_per_pairing`. No dates, no venues, no RNG —
//! calendar placement is a separate concern (see [`crate::schedule`]).

use crate::error::SeasonError;
use crate::types::TeamId;

/// One generated pairing. `round` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Pairing {
    pub round: u32,
    pub home: TeamId,
    pub away: TeamId,
}

/// Synthetic slot that pads an odd field out to even size. Pairings
/// involving it are dropped, giving the opponent a bye that round.
const BYE: usize = usize::MAX;

/// Generate a round-robin pairing schedule.
///
/// The circle method: the first team is pinned to slot 0 and the rest of
/// the field rotates one step per round; slot `i` plays slot `n - 1 - i`.
/// A single pass yields `n - 1` rounds for an even field (`n` rounds with
/// byes for an odd one) in which every team meets every other team exactly
/// once and appears at most once per round.
///
/// Venue assignment: the pinned team's pairing alternates home/away by
/// round parity; every other pairing is hosted by the top-half slot. Each
/// non-pinned team sits in the bottom slot opposite the pinned team exactly
/// once per pass, so per-team home/away imbalance never exceeds 1.
///
/// With `rounds_per_pairing == 2` the whole pass is repeated with venues
/// swapped and rounds renumbered, so every pair meets twice (once per
/// venue role) and the schedule is exactly balanced.
pub fn generate(team_ids: &[TeamId], rounds_per_pairing: i16) -> Result<Vec<Pairing>, SeasonError> {
    if team_ids.len() < 2 {
        return Err(SeasonError::NotEnoughTeamsToSchedule {
            found: team_ids.len(),
        });
    }
    if !(1..=2).contains(&rounds_per_pairing) {
        return Err(SeasonError::Validation(format!(
            "rounds_per_pairing must be 1 or 2, got {rounds_per_pairing}"
        )));
    }

    let mut ring: Vec<usize> = (1..team_ids.len()).collect();
    if team_ids.len() % 2 == 1 {
        ring.push(BYE);
    }
    let n = ring.len() + 1;
    let rounds = n - 1;

    let mut pass = Vec::with_capacity(rounds * (n / 2));
    for round in 0..rounds {
        let mut slots = Vec::with_capacity(n);
        slots.push(0usize);
        slots.extend_from_slice(&ring);

        for i in 0..n / 2 {
            let a = slots[i];
            let b = slots[n - 1 - i];
            if a == BYE || b == BYE {
                continue;
            }

            let (home, away) = if i == 0 {
                // Pinned team's pairing alternates venue by round parity.
                if round % 2 == 0 {
                    (a, b)
                } else {
                    (b, a)
                }
            } else {
                (a, b)
            };

            pass.push(Pairing {
                round: (round + 1) as u32,
                home: team_ids[home],
                away: team_ids[away],
            });
        }

        ring.rotate_right(1);
    }

    let mut pairings = pass;
    if rounds_per_pairing == 2 {
        let swapped: Vec<Pairing> = pairings
            .iter()
            .map(|p| Pairing {
                round: p.round + rounds as u32,
                home: p.away,
                away: p.home,
            })
            .collect();
        pairings.extend(swapped);
    }

    Ok(pairings)
}
