//! Double elimination: winners bracket, losers bracket, and a single Grand Finals match.
//!
//! With `W = ceil(log2(N))` winners rounds and a field padded to `S = 2^W`:
//!
//! - Losers round 1 pairs the losers of winners round 1.
//! - Every later winners round `R` drops its losers into a drop-in round, where they
//!   meet the losers-bracket survivors. The drop order is reversed on even `R` to
//!   delay rematches.
//! - Between drop-ins, a consolidation round halves the survivors.
//!
//! That gives `2W - 2` losers rounds. Rounds are stored in play order (W1, W2, L1, L2,
//! W3, L3, L4, ..., Grand Finals) so a round's feeders are always complete before it
//! becomes active.

use crate::logic::bracket::{ceil_log2, opening_round};
use crate::logic::single_elimination::feeder_round;
use crate::models::{
    round_name, Advancement, Bracket, BracketSide, Feed, Match, ParticipantId, Round, SlotRef,
    TournamentFormat,
};

pub(crate) fn generate(ids: &[ParticipantId]) -> Bracket {
    let winners_total = ceil_log2(ids.len());
    let losers_total = 2 * winners_total - 2;
    let size = ids.len().next_power_of_two();

    let mut rounds = vec![opening_round(
        ids,
        1,
        winners_name(1, winners_total),
        BracketSide::Winners,
    )];
    let mut winners_last = 0;
    // Index and slot count of the latest losers round.
    let mut losers_last: Option<(usize, usize)> = None;
    let mut losers_number = 0;

    for r in 2..=winners_total {
        let slots = size >> r;

        let number = next_number(&rounds);
        rounds.push(feeder_round(
            number,
            winners_name(r, winners_total),
            BracketSide::Winners,
            winners_last,
            slots,
        ));
        let winners_idx = rounds.len() - 1;

        // Survivors entering the drop-in: losers round 1, or a consolidation of the
        // previous drop-in.
        losers_number += 1;
        let number = next_number(&rounds);
        let name = losers_name(losers_number, losers_total);
        let survivors = match losers_last {
            None => {
                let mut round = Round::new(number, name, BracketSide::Losers);
                round.matches = (0..slots)
                    .map(|slot| {
                        Match::placeholder(
                            number,
                            slot,
                            BracketSide::Losers,
                            [
                                Feed::LoserOf(SlotRef {
                                    round: 0,
                                    slot: 2 * slot,
                                }),
                                Feed::LoserOf(SlotRef {
                                    round: 0,
                                    slot: 2 * slot + 1,
                                }),
                            ],
                        )
                    })
                    .collect();
                round
            }
            Some((previous, _)) => {
                feeder_round(number, name, BracketSide::Losers, previous, slots)
            }
        };
        rounds.push(survivors);
        let survivors_idx = rounds.len() - 1;

        losers_number += 1;
        let number = next_number(&rounds);
        let mut drop_in = Round::new(
            number,
            losers_name(losers_number, losers_total),
            BracketSide::Losers,
        );
        drop_in.matches = (0..slots)
            .map(|slot| {
                let from = if r % 2 == 0 { slots - 1 - slot } else { slot };
                Match::placeholder(
                    number,
                    slot,
                    BracketSide::Losers,
                    [
                        Feed::LoserOf(SlotRef {
                            round: winners_idx,
                            slot: from,
                        }),
                        Feed::WinnerOf(SlotRef {
                            round: survivors_idx,
                            slot,
                        }),
                    ],
                )
            })
            .collect();
        rounds.push(drop_in);

        winners_last = winners_idx;
        losers_last = Some((rounds.len() - 1, slots));
    }

    let number = next_number(&rounds);
    let challenger = match losers_last {
        Some((idx, _)) => Feed::WinnerOf(SlotRef { round: idx, slot: 0 }),
        // Two-player field: the only loser gets a second chance in the final.
        None => Feed::LoserOf(SlotRef { round: 0, slot: 0 }),
    };
    let mut grand_finals = Round::new(number, "Grand Finals", BracketSide::GrandFinals);
    grand_finals.matches.push(Match::placeholder(
        number,
        0,
        BracketSide::GrandFinals,
        [
            Feed::WinnerOf(SlotRef {
                round: winners_last,
                slot: 0,
            }),
            challenger,
        ],
    ));
    rounds.push(grand_finals);

    Bracket::new(
        TournamentFormat::DoubleElimination,
        rounds,
        Advancement::PerMatch(1),
    )
}

fn next_number(rounds: &[Round]) -> u32 {
    rounds.len() as u32 + 1
}

fn winners_name(number: u32, total: u32) -> String {
    format!("Winners {}", round_name(number, total))
}

fn losers_name(number: u32, total: u32) -> String {
    if number == total {
        "Losers Finals".to_string()
    } else {
        format!("Losers Round {number}")
    }
}
