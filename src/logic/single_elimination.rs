//! Single elimination: `ceil(log2(N))` rounds, winners feed the next round pairwise.

use crate::logic::bracket::{ceil_log2, opening_round};
use crate::models::{
    round_name, Advancement, Bracket, BracketSide, Feed, Match, ParticipantId, Round, SlotRef,
    TournamentFormat,
};

/// Round 1 is fully seeded; later rounds are placeholders whose slot `i` is fed by
/// the winners of slots `2i` and `2i + 1` of the previous round.
pub(crate) fn generate(ids: &[ParticipantId]) -> Bracket {
    let total = ceil_log2(ids.len());
    let mut rounds = vec![opening_round(
        ids,
        1,
        round_name(1, total),
        BracketSide::Winners,
    )];

    let mut slots = ids.len().next_power_of_two() / 2;
    for number in 2..=total {
        slots /= 2;
        rounds.push(feeder_round(
            number,
            round_name(number, total),
            BracketSide::Winners,
            rounds.len() - 1,
            slots,
        ));
    }

    Bracket::new(
        TournamentFormat::SingleElimination,
        rounds,
        Advancement::PerMatch(1),
    )
}

/// A round of `slots` placeholder matches, each fed by two adjacent winners of `previous`.
pub(crate) fn feeder_round(
    number: u32,
    name: String,
    side: BracketSide,
    previous: usize,
    slots: usize,
) -> Round {
    let mut round = Round::new(number, name, side);
    round.matches = (0..slots)
        .map(|slot| {
            Match::placeholder(
                number,
                slot,
                side,
                [
                    Feed::WinnerOf(SlotRef {
                        round: previous,
                        slot: 2 * slot,
                    }),
                    Feed::WinnerOf(SlotRef {
                        round: previous,
                        slot: 2 * slot + 1,
                    }),
                ],
            )
        })
        .collect();
    round
}
