//! Round robin via the circle method: fix the first entry, rotate the rest.

use crate::models::{
    Advancement, Bracket, BracketSide, ByeSlot, Match, ParticipantId, Round, TournamentFormat,
};

/// `N - 1` rounds for even `N`, `N` rounds for odd `N` (a bye joins the rotation).
/// Pairings against the bye are recorded as passes, not matches.
pub(crate) fn generate(ids: &[ParticipantId]) -> Bracket {
    let mut wheel: Vec<Option<ParticipantId>> = ids.iter().cloned().map(Some).collect();
    if wheel.len() % 2 == 1 {
        wheel.push(None);
    }
    let size = wheel.len();

    let mut rounds = Vec::with_capacity(size - 1);
    for index in 0..size - 1 {
        let number = index as u32 + 1;
        let mut round = Round::new(number, format!("Round {number}"), BracketSide::Winners);
        for slot in 0..size / 2 {
            match (&wheel[slot], &wheel[size - 1 - slot]) {
                (Some(home), Some(away)) => round
                    .matches
                    .push(Match::seeded(number, slot, home.clone(), away.clone())),
                (Some(p), None) | (None, Some(p)) => round.byes.push(ByeSlot {
                    slot,
                    participant: p.clone(),
                }),
                (None, None) => {}
            }
        }
        rounds.push(round);
        wheel[1..].rotate_right(1);
    }

    Bracket::new(TournamentFormat::RoundRobin, rounds, Advancement::All)
}
