//! Round progression: match lifecycle, result recording, and round advancement.

use crate::logic::swiss::{self, ScoreGroupPairing, SwissPairing};
use crate::models::{
    Bracket, EndReason, Feed, Match, MatchId, MatchResult, MatchStatus, Participant,
    ParticipantId, Round, Tournament, TournamentError, TournamentFormat, TournamentStatus,
};
use chrono::{DateTime, Utc};

/// A match may start when it is waiting, both slots hold real participants, and both
/// are checked in.
pub fn can_start_match(tournament: &Tournament, m: &Match) -> bool {
    if m.status != MatchStatus::Waiting || m.has_bye() {
        return false;
    }
    [&m.participant1, &m.participant2].into_iter().all(|slot| {
        slot.as_deref()
            .and_then(|id| tournament.participant(id))
            .is_some_and(|p| p.checked_in)
    })
}

/// A round is complete once every materialized match is finished.
pub fn is_round_complete(round: &Round) -> bool {
    round.matches.iter().all(Match::is_finished)
}

/// Shared preconditions for mutating a match: tournament running, match in the active
/// round, match not finished, both slots filled with real participants.
fn active_match(tournament: &Tournament, match_id: MatchId) -> Result<&Match, TournamentError> {
    match tournament.status {
        TournamentStatus::InProgress => {}
        TournamentStatus::Finished => return Err(TournamentError::AlreadyFinished),
        actual => {
            return Err(TournamentError::InvalidState {
                expected: TournamentStatus::InProgress,
                actual,
            })
        }
    }
    let bracket = tournament.bracket.as_ref().ok_or(TournamentError::NoBracket)?;
    let (round_idx, m) = bracket
        .find_match(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if round_idx + 1 != bracket.current_round {
        return Err(TournamentError::MatchNotActive(match_id));
    }
    if m.is_finished() {
        return Err(TournamentError::InvalidMatchState {
            id: match_id,
            status: m.status,
            action: "record a result",
        });
    }
    if !m.is_populated() || m.has_bye() {
        return Err(TournamentError::MatchNotReady(match_id));
    }
    Ok(m)
}

fn match_mut(tournament: &mut Tournament, match_id: MatchId) -> Result<&mut Match, TournamentError> {
    tournament
        .bracket
        .as_mut()
        .and_then(|b| b.find_match_mut(match_id))
        .map(|(_, m)| m)
        .ok_or(TournamentError::MatchNotFound(match_id))
}

fn roster_entry<'a>(
    participants: &'a mut [Participant],
    id: &str,
) -> Result<&'a mut Participant, TournamentError> {
    participants
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| TournamentError::ParticipantNotFound(id.to_string()))
}

/// Move a match from waiting to in progress.
pub fn start_match(
    tournament: &mut Tournament,
    match_id: MatchId,
    now: DateTime<Utc>,
) -> Result<(), TournamentError> {
    let m = active_match(tournament, match_id)?;
    if m.status != MatchStatus::Waiting {
        return Err(TournamentError::InvalidMatchState {
            id: match_id,
            status: m.status,
            action: "start",
        });
    }
    if !can_start_match(tournament, m) {
        return Err(TournamentError::MatchNotReady(match_id));
    }
    let m = match_mut(tournament, match_id)?;
    m.status = MatchStatus::InProgress;
    m.started_at = Some(now);
    log::info!("match {} started", match_id);
    Ok(())
}

/// Record `winner` for a waiting or in-progress match of the active round.
///
/// Finishes the match and adds exactly one win to the winner and one loss to the loser.
/// A `Disqualification` end reason also eliminates the loser. A payload marked as a
/// draw is recorded through [`record_draw`] instead.
pub fn advance_winner(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner: &str,
    result: Option<MatchResult>,
) -> Result<(), TournamentError> {
    if result
        .as_ref()
        .is_some_and(|r| r.end_reason == EndReason::Draw)
    {
        return record_draw(tournament, match_id, result);
    }

    let m = active_match(tournament, match_id)?;
    if !m.involves(winner) {
        return Err(TournamentError::WinnerNotInMatch {
            id: match_id,
            winner: winner.to_string(),
        });
    }
    let loser: ParticipantId = m
        .opponent_of(winner)
        .cloned()
        .ok_or(TournamentError::MatchNotReady(match_id))?;
    // Both must exist before anything is mutated.
    for id in [winner, loser.as_str()] {
        if tournament.participant(id).is_none() {
            return Err(TournamentError::ParticipantNotFound(id.to_string()));
        }
    }
    let disqualified = result
        .as_ref()
        .is_some_and(|r| r.end_reason == EndReason::Disqualification);

    let now = Utc::now();
    let m = match_mut(tournament, match_id)?;
    m.status = MatchStatus::Finished;
    m.winner = Some(winner.to_string());
    m.result = result;
    m.ended_at = Some(now);

    roster_entry(&mut tournament.participants, winner)?.add_win();
    let loser_entry = roster_entry(&mut tournament.participants, &loser)?;
    loser_entry.add_loss();
    if disqualified {
        loser_entry.eliminate();
    }
    log::info!("match {}: {} beat {}", match_id, winner, loser);
    Ok(())
}

/// Record a draw: both participants get one draw, no winner is set.
///
/// Elimination formats must produce a winner and reject this.
pub fn record_draw(
    tournament: &mut Tournament,
    match_id: MatchId,
    result: Option<MatchResult>,
) -> Result<(), TournamentError> {
    let format = tournament.format();
    if format.is_elimination() {
        return Err(TournamentError::DrawNotAllowed(format));
    }
    let m = active_match(tournament, match_id)?;
    let (Some(first), Some(second)) = (m.participant1.clone(), m.participant2.clone()) else {
        return Err(TournamentError::MatchNotReady(match_id));
    };
    for id in [&first, &second] {
        if tournament.participant(id).is_none() {
            return Err(TournamentError::ParticipantNotFound(id.clone()));
        }
    }

    let now = Utc::now();
    let m = match_mut(tournament, match_id)?;
    m.status = MatchStatus::Finished;
    m.winner = None;
    m.result = Some(result.unwrap_or_default().with_reason(EndReason::Draw));
    m.ended_at = Some(now);

    roster_entry(&mut tournament.participants, &first)?.add_draw();
    roster_entry(&mut tournament.participants, &second)?.add_draw();
    log::info!("match {}: {} drew with {}", match_id, first, second);
    Ok(())
}

/// Close the active round and open the next one, using score-group pairing for Swiss.
///
/// Returns `false` and changes nothing when the tournament is not running or the
/// active round still has unfinished matches. Calling it again after a successful
/// advance is therefore a no-op until the new round completes. Completing the last
/// round finishes the tournament.
pub fn advance_to_next_round(tournament: &mut Tournament) -> bool {
    advance_to_next_round_with(tournament, &ScoreGroupPairing)
}

/// [`advance_to_next_round`] with a caller-supplied Swiss pairing.
///
/// Rounds that resolve entirely through byes are passed through in the same call.
pub fn advance_to_next_round_with(tournament: &mut Tournament, pairing: &dyn SwissPairing) -> bool {
    let now = Utc::now();
    if !advance_once(tournament, pairing, now) {
        return false;
    }
    while advance_once(tournament, pairing, now) {}
    true
}

fn advance_once(tournament: &mut Tournament, pairing: &dyn SwissPairing, now: DateTime<Utc>) -> bool {
    if tournament.status != TournamentStatus::InProgress {
        return false;
    }
    let tournament_id = tournament.id;
    let Tournament {
        bracket,
        participants,
        status,
        ended_at,
        ..
    } = tournament;
    let Some(bracket) = bracket.as_mut() else {
        return false;
    };
    let Some(round) = bracket.current_mut() else {
        return false;
    };
    if round.is_complete || !is_round_complete(round) {
        return false;
    }
    round.is_complete = true;
    round.completed_at = Some(now);
    log::info!("{}: {} complete", tournament_id, round.name);

    if bracket.is_last_round() {
        *status = TournamentStatus::Finished;
        *ended_at = Some(now);
        log::info!("{}: tournament finished", tournament_id);
        return true;
    }

    bracket.current_round += 1;
    match bracket.format {
        TournamentFormat::Swiss => swiss::fill_current_round(bracket, participants, pairing),
        _ => populate_current_round(bracket, now),
    }
    true
}

/// Fill the active round's slots from their feeders. Slots whose feeder produced
/// nobody become byes and resolve immediately.
pub(crate) fn populate_current_round(bracket: &mut Bracket, now: DateTime<Utc>) {
    let Some(idx) = bracket.current_round.checked_sub(1) else {
        return;
    };
    let Some(round) = bracket.rounds.get(idx) else {
        return;
    };
    let resolved: Vec<Option<(Option<ParticipantId>, Option<ParticipantId>)>> = round
        .matches
        .iter()
        .map(|m| {
            if m.feeds.iter().all(|f| *f == Feed::Seeded) {
                return None;
            }
            Some((
                resolve_feed(bracket, m.feeds[0], &m.participant1),
                resolve_feed(bracket, m.feeds[1], &m.participant2),
            ))
        })
        .collect();

    let round = &mut bracket.rounds[idx];
    for (m, entrants) in round.matches.iter_mut().zip(resolved) {
        if let Some((first, second)) = entrants {
            m.populate(first, second, now);
        }
    }
    log::debug!(
        "populated {}: {} matches, {} resolved by bye",
        round.name,
        round.matches.len(),
        round.matches.iter().filter(|m| m.is_finished()).count()
    );
}

fn resolve_feed(
    bracket: &Bracket,
    feed: Feed,
    current: &Option<ParticipantId>,
) -> Option<ParticipantId> {
    match feed {
        Feed::Seeded => current.clone(),
        Feed::WinnerOf(at) => bracket.winner_of(at).cloned(),
        Feed::LoserOf(at) => bracket.loser_of(at).cloned(),
    }
}
