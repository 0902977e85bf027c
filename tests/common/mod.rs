//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use bracket_engine::{
    advance_to_next_round, advance_winner, mark_ready, start_tournament, MatchId, Participant,
    ParticipantId, RankTier, Tournament, TournamentConfig, TournamentFormat,
};
use chrono::Utc;

/// `n` participants `p0..p{n-1}`, rated so that seed order equals index order.
pub fn roster(n: usize) -> Vec<Participant> {
    (0..n)
        .map(|i| Participant::new(format!("p{i}"), format!("Player {i}"), 2000 - 10 * i as u32, RankTier::Gold))
        .collect()
}

/// A tournament in Registration with `n` registered (not checked in) participants.
pub fn registered(format: TournamentFormat, n: usize) -> Tournament {
    let config = TournamentConfig::new("Test Cup", format).with_capacity(2, 64);
    let mut t = Tournament::new(config).unwrap();
    for p in roster(n) {
        t.register_participant(p).unwrap();
    }
    t
}

/// A started tournament with every participant checked in.
pub fn started(format: TournamentFormat, n: usize) -> Tournament {
    let mut t = registered(format, n);
    let ids: Vec<ParticipantId> = t.participants.iter().map(|p| p.id.clone()).collect();
    for id in &ids {
        t.check_in(id).unwrap();
    }
    mark_ready(&mut t).unwrap();
    start_tournament(&mut t, Utc::now()).unwrap();
    t
}

/// Unfinished matches of the active round with their first-listed participant.
pub fn open_matches(t: &Tournament) -> Vec<(MatchId, ParticipantId)> {
    let round = t.bracket.as_ref().and_then(|b| b.current()).unwrap();
    round
        .matches
        .iter()
        .filter(|m| !m.is_finished())
        .map(|m| (m.id, m.participant1.clone().unwrap()))
        .collect()
}

/// Finish the active round, first-listed participant winning every match.
pub fn play_round(t: &mut Tournament) {
    for (id, winner) in open_matches(t) {
        advance_winner(t, id, &winner, None).unwrap();
    }
}

/// Play rounds until the tournament stops advancing.
pub fn play_out(t: &mut Tournament) {
    for _ in 0..200 {
        play_round(t);
        if !advance_to_next_round(t) {
            return;
        }
    }
    panic!("tournament did not settle");
}

pub fn participant<'a>(t: &'a Tournament, id: &str) -> &'a Participant {
    t.participant(id).unwrap()
}
