//! Swiss: round count, pairing without rematches, byes, and the qualifying cut.

mod common;

use bracket_engine::{
    generate_bracket, pair_swiss_round, seed_participants, swiss_qualifiers, Advancement, Bracket,
    Participant, ScoreGroupPairing, SwissPairing, SwissPairings, TournamentError,
    TournamentFormat, TournamentStatus,
};
use common::{play_out, play_round, registered, roster, started};
use std::collections::HashSet;

fn swiss_bracket(n: usize) -> Bracket {
    let players = roster(n);
    let seeded = seed_participants(&players);
    generate_bracket(&seeded, TournamentFormat::Swiss).unwrap()
}

#[test]
fn round_count_is_log2_plus_one() {
    assert_eq!(swiss_bracket(2).rounds.len(), 2);
    assert_eq!(swiss_bracket(5).rounds.len(), 4);
    assert_eq!(swiss_bracket(8).rounds.len(), 4);
    assert_eq!(swiss_bracket(9).rounds.len(), 5);
    assert_eq!(swiss_bracket(8).advancement, Advancement::Cut(2));
    let names: Vec<String> = swiss_bracket(8).rounds.into_iter().map(|r| r.name).collect();
    assert_eq!(names, ["Round 1", "Round 2", "Round 3", "Round 4"]);
}

#[test]
fn first_round_is_paired_at_start() {
    let t = started(TournamentFormat::Swiss, 8);
    let bracket = t.bracket.as_ref().unwrap();
    assert_eq!(bracket.rounds[0].matches.len(), 4);
    assert!(bracket.rounds[1].matches.is_empty());
}

#[test]
fn no_rematches_over_a_full_event() {
    let mut t = started(TournamentFormat::Swiss, 4);
    play_out(&mut t);
    assert_eq!(t.status, TournamentStatus::Finished);

    let mut seen = HashSet::new();
    for m in t.bracket.as_ref().unwrap().matches() {
        let mut pair = [m.participant1.clone().unwrap(), m.participant2.clone().unwrap()];
        pair.sort();
        assert!(seen.insert(pair.clone()), "rematch {pair:?}");
    }
}

#[test]
fn odd_field_rotates_the_bye() {
    let mut t = started(TournamentFormat::Swiss, 5);
    play_out(&mut t);
    assert_eq!(t.status, TournamentStatus::Finished);

    let byes: Vec<&str> = t
        .bracket
        .as_ref()
        .unwrap()
        .rounds
        .iter()
        .flat_map(|r| r.byes.iter().map(|b| b.participant.as_str()))
        .collect();
    assert_eq!(byes.len(), 4);
    let unique: HashSet<&str> = byes.iter().copied().collect();
    assert_eq!(unique.len(), 4);
    // Lowest seed sits out first.
    assert_eq!(byes[0], "p4");
}

#[test]
fn winners_are_paired_together() {
    let mut t = started(TournamentFormat::Swiss, 8);
    play_round(&mut t);
    assert!(bracket_engine::advance_to_next_round(&mut t));

    let bracket = t.bracket.as_ref().unwrap();
    let round = bracket.current().unwrap();
    assert_eq!(round.matches.len(), 4);
    for m in &round.matches {
        let a = t.participant(m.participant1.as_deref().unwrap()).unwrap();
        let b = t.participant(m.participant2.as_deref().unwrap()).unwrap();
        assert_eq!(a.points(), b.points());
    }
}

#[test]
fn qualifiers_are_the_top_of_the_standings() {
    let mut t = started(TournamentFormat::Swiss, 8);
    play_out(&mut t);
    let qualifiers: Vec<&str> = swiss_qualifiers(&t).iter().map(|p| p.id.as_str()).collect();
    assert_eq!(qualifiers.len(), 2);
    assert_eq!(qualifiers[0], "p0");

    let elimination = started(TournamentFormat::SingleElimination, 8);
    assert!(swiss_qualifiers(&elimination).is_empty());
}

/// Pairs strictly by ranking order, ignoring history.
struct Adjacent;

impl SwissPairing for Adjacent {
    fn pair(&self, ranked: &[&Participant], _bracket: &Bracket) -> SwissPairings {
        SwissPairings {
            pairs: ranked
                .chunks_exact(2)
                .map(|c| (c[0].id.clone(), c[1].id.clone()))
                .collect(),
            bye: None,
        }
    }
}

#[test]
fn custom_pairing_replaces_an_unplayed_round() {
    let mut t = started(TournamentFormat::Swiss, 4);
    pair_swiss_round(&mut t, &Adjacent).unwrap();
    let round = t.bracket.as_ref().unwrap().current().unwrap();
    assert_eq!(round.matches[0].participant1.as_deref(), Some("p0"));
    assert_eq!(round.matches[0].participant2.as_deref(), Some("p1"));

    play_round(&mut t);
    let err = pair_swiss_round(&mut t, &ScoreGroupPairing).unwrap_err();
    assert!(matches!(err, TournamentError::InvalidMatchState { .. }));
}

#[test]
fn pairing_hook_rejects_other_formats() {
    let mut t = started(TournamentFormat::RoundRobin, 4);
    assert!(matches!(
        pair_swiss_round(&mut t, &ScoreGroupPairing),
        Err(TournamentError::UnsupportedFormat(_))
    ));
    let mut pending = registered(TournamentFormat::Swiss, 4);
    assert!(matches!(
        pair_swiss_round(&mut pending, &ScoreGroupPairing),
        Err(TournamentError::InvalidState { .. })
    ));
}

#[test]
fn draws_count_towards_the_cut() {
    let mut t = started(TournamentFormat::Swiss, 8);
    for p in &mut t.participants {
        p.wins = 0;
        p.losses = 0;
        p.draws = 0;
    }
    t.participant_mut("p0").unwrap().wins = 3;
    // Same wins and losses; p5 is lower rated but has two draws on top.
    t.participant_mut("p1").unwrap().wins = 1;
    let drawer = t.participant_mut("p5").unwrap();
    drawer.wins = 1;
    drawer.draws = 2;

    let qualifiers: Vec<&str> = swiss_qualifiers(&t).iter().map(|p| p.id.as_str()).collect();
    assert_eq!(qualifiers, ["p0", "p5"]);
}
