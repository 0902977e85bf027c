//! Single elimination: round structure, byes, and advancement.

mod common;

use bracket_engine::{
    advance_to_next_round, generate_bracket, seed_participants, MatchStatus, TournamentError,
    TournamentFormat, TournamentStatus,
};
use common::{participant, play_out, play_round, roster, started};

fn pairs(t: &bracket_engine::Tournament, round: usize) -> Vec<(String, String)> {
    t.bracket.as_ref().unwrap().rounds[round]
        .matches
        .iter()
        .map(|m| (m.participant1.clone().unwrap(), m.participant2.clone().unwrap()))
        .collect()
}

#[test]
fn eight_players_make_three_named_rounds() {
    let players = roster(8);
    let seeded = seed_participants(&players);
    let bracket = generate_bracket(&seeded, TournamentFormat::SingleElimination).unwrap();
    let names: Vec<&str> = bracket.rounds.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Quarter-Finals", "Semi-Finals", "Finals"]);
    assert_eq!(bracket.rounds[0].matches.len(), 4);
    assert_eq!(bracket.rounds[1].matches.len(), 2);
    assert_eq!(bracket.rounds[2].matches.len(), 1);
    assert!(bracket.rounds[0].byes.is_empty());
    assert_eq!(bracket.current_round, 1);
}

#[test]
fn fewer_than_two_participants_is_rejected() {
    let players = roster(1);
    let seeded = seed_participants(&players);
    assert_eq!(
        generate_bracket(&seeded, TournamentFormat::SingleElimination),
        Err(TournamentError::NotEnoughParticipants { needed: 2, current: 1 })
    );
}

#[test]
fn winners_fill_the_next_round_in_slot_order() {
    let mut t = started(TournamentFormat::SingleElimination, 8);
    assert_eq!(
        pairs(&t, 0),
        [("p0", "p1"), ("p2", "p3"), ("p4", "p5"), ("p6", "p7")]
            .map(|(a, b)| (a.to_string(), b.to_string()))
    );
    // Later rounds stay empty until they become active.
    assert!(t.bracket.as_ref().unwrap().rounds[1].matches[0].participant1.is_none());

    play_round(&mut t);
    assert!(advance_to_next_round(&mut t));
    assert_eq!(t.bracket.as_ref().unwrap().current_round, 2);
    assert_eq!(
        pairs(&t, 1),
        [("p0", "p2"), ("p4", "p6")].map(|(a, b)| (a.to_string(), b.to_string()))
    );
}

#[test]
fn top_seeds_receive_the_byes() {
    let players = roster(5);
    let seeded = seed_participants(&players);
    let bracket = generate_bracket(&seeded, TournamentFormat::SingleElimination).unwrap();
    let opening = &bracket.rounds[0];
    let bye_holders: Vec<&str> = opening.byes.iter().map(|b| b.participant.as_str()).collect();
    assert_eq!(bye_holders, ["p0", "p1", "p2"]);
    assert_eq!(opening.matches.len(), 1);
    assert_eq!(opening.matches[0].participant1.as_deref(), Some("p3"));
    assert_eq!(opening.matches[0].participant2.as_deref(), Some("p4"));
    assert_eq!(bracket.rounds.len(), 3);

    let players = roster(6);
    let seeded = seed_participants(&players);
    let bracket = generate_bracket(&seeded, TournamentFormat::SingleElimination).unwrap();
    assert_eq!(bracket.rounds[0].byes.len(), 2);
    assert_eq!(bracket.rounds[0].matches.len(), 2);
    let slots: Vec<usize> = bracket.rounds[0].matches.iter().map(|m| m.slot).collect();
    assert_eq!(slots, [2, 3]);
}

#[test]
fn bye_holders_meet_in_the_second_round() {
    let mut t = started(TournamentFormat::SingleElimination, 5);
    play_round(&mut t);
    assert!(advance_to_next_round(&mut t));
    assert_eq!(
        pairs(&t, 1),
        [("p0", "p1"), ("p2", "p3")].map(|(a, b)| (a.to_string(), b.to_string()))
    );
}

#[test]
fn full_run_finishes_with_the_top_seed_undefeated() {
    let mut t = started(TournamentFormat::SingleElimination, 8);
    play_out(&mut t);
    assert_eq!(t.status, TournamentStatus::Finished);
    assert!(t.ended_at.is_some());

    let bracket = t.bracket.as_ref().unwrap();
    assert!(bracket.rounds.iter().all(|r| r.is_complete));
    assert!(bracket.matches().all(|m| m.status == MatchStatus::Finished));
    assert_eq!(bracket.matches().count(), 7);

    let champion = participant(&t, "p0");
    assert_eq!((champion.wins, champion.losses), (3, 0));
    let total_losses: u32 = t.participants.iter().map(|p| p.losses).sum();
    assert_eq!(total_losses, 7);
}

#[test]
fn two_player_field_is_a_single_final() {
    let mut t = started(TournamentFormat::SingleElimination, 2);
    let bracket = t.bracket.as_ref().unwrap();
    assert_eq!(bracket.rounds.len(), 1);
    assert_eq!(bracket.rounds[0].name, "Finals");
    play_out(&mut t);
    assert_eq!(t.status, TournamentStatus::Finished);
}
