//! Bracket generation: dispatch by format, plus helpers shared by the elimination generators.

use crate::logic::{double_elimination, round_robin, single_elimination, swiss};
use crate::models::{
    Bracket, BracketSide, ByeSlot, Match, Participant, ParticipantId, Round, TournamentError,
    TournamentFormat,
};

/// Build the bracket for `format` from an already seeded participant list.
///
/// Fails without side effects when fewer than two participants are given.
pub fn generate_bracket(
    seeded: &[&Participant],
    format: TournamentFormat,
) -> Result<Bracket, TournamentError> {
    if seeded.len() < 2 {
        return Err(TournamentError::NotEnoughParticipants {
            needed: 2,
            current: seeded.len(),
        });
    }
    let ids: Vec<ParticipantId> = seeded.iter().map(|p| p.id.clone()).collect();
    let bracket = match format {
        TournamentFormat::SingleElimination => single_elimination::generate(&ids),
        TournamentFormat::DoubleElimination => double_elimination::generate(&ids),
        TournamentFormat::RoundRobin => round_robin::generate(&ids),
        TournamentFormat::Swiss => swiss::generate(&ids),
    };
    log::debug!(
        "generated {} bracket: {} participants, {} rounds, {} matches",
        format,
        ids.len(),
        bracket.rounds.len(),
        bracket.matches().count()
    );
    Ok(bracket)
}

/// `ceil(log2(n))`, 0 for n <= 1.
pub(crate) fn ceil_log2(n: usize) -> u32 {
    n.max(1).next_power_of_two().trailing_zeros()
}

/// First-round pairing positions over a field padded to the next power of two.
///
/// The top seeds take the byes, one each; the remaining seeds pair adjacently
/// (1v2, 3v4, ...). No position ever holds two byes.
pub(crate) fn opening_pairings(ids: &[ParticipantId]) -> Vec<(ParticipantId, Option<ParticipantId>)> {
    let size = ids.len().next_power_of_two();
    let byes = size - ids.len();
    let (bye_holders, rest) = ids.split_at(byes);
    bye_holders
        .iter()
        .map(|id| (id.clone(), None))
        .chain(
            rest.chunks_exact(2)
                .map(|pair| (pair[0].clone(), Some(pair[1].clone()))),
        )
        .collect()
}

/// Materialize the opening round: real pairings become matches, bye pairings are
/// recorded as automatic advances.
pub(crate) fn opening_round(
    ids: &[ParticipantId],
    number: u32,
    name: impl Into<String>,
    side: BracketSide,
) -> Round {
    let mut round = Round::new(number, name, side);
    for (slot, (first, second)) in opening_pairings(ids).into_iter().enumerate() {
        match second {
            Some(second) => round
                .matches
                .push(Match::seeded(number, slot, first, second).in_side(side)),
            None => round.byes.push(ByeSlot {
                slot,
                participant: first,
            }),
        }
    }
    round
}
