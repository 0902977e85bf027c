//! Final standings and prize distribution. Read-only over the tournament.

use crate::models::{Participant, PrizeAward, Tournament, TournamentStatus};
use std::cmp::Reverse;

/// Non-eliminated participants ordered by wins (desc), losses (asc), rating (desc).
/// Full ties keep roster order.
pub fn get_final_standings(tournament: &Tournament) -> Vec<&Participant> {
    let mut standings: Vec<&Participant> = tournament
        .participants
        .iter()
        .filter(|p| !p.eliminated)
        .collect();
    standings.sort_by_key(|p| (Reverse(p.wins), p.losses, Reverse(p.rating)));
    standings
}

/// Map prize-pool positions onto final standings.
///
/// Empty until the tournament is finished. Positions past the end of the standings
/// pay nothing.
pub fn calculate_prizes(tournament: &Tournament) -> Vec<PrizeAward<'_>> {
    if tournament.status != TournamentStatus::Finished {
        return Vec::new();
    }
    let standings = get_final_standings(tournament);
    let mut pool: Vec<_> = tournament.config.prize_pool.iter().collect();
    pool.sort_by_key(|entry| entry.position);
    pool.into_iter()
        .filter_map(|prize| {
            let participant = *standings.get(prize.position.checked_sub(1)?)?;
            Some(PrizeAward {
                position: prize.position,
                participant,
                prize,
            })
        })
        .collect()
}
