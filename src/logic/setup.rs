//! Lifecycle transitions: Registration -> Ready -> InProgress, and cancellation.

use crate::logic::bracket::generate_bracket;
use crate::logic::progression::populate_current_round;
use crate::logic::seeding::seed_participants;
use crate::logic::swiss::{self, ScoreGroupPairing};
use crate::models::{
    ParticipantId, Tournament, TournamentError, TournamentFormat, TournamentStatus,
};
use chrono::{DateTime, Utc};

/// Registration -> Ready once the minimum capacity is met.
pub fn mark_ready(tournament: &mut Tournament) -> Result<(), TournamentError> {
    tournament.require_status(TournamentStatus::Registration)?;
    let needed = tournament.config.min_participants;
    if tournament.participants.len() < needed {
        return Err(TournamentError::NotEnoughParticipants {
            needed,
            current: tournament.participants.len(),
        });
    }
    tournament.config.validate()?;
    tournament.status = TournamentStatus::Ready;
    log::info!("{}: ready with {} participants", tournament.id, tournament.participants.len());
    Ok(())
}

/// Ready -> InProgress: requires minimum capacity and `now >= scheduled_start`.
///
/// Seeds the roster, validates the prize pool, and generates the bracket. Any failure
/// leaves the tournament untouched.
pub fn start_tournament(tournament: &mut Tournament, now: DateTime<Utc>) -> Result<(), TournamentError> {
    tournament.require_status(TournamentStatus::Ready)?;
    let needed = tournament.config.min_participants;
    if tournament.participants.len() < needed {
        return Err(TournamentError::NotEnoughParticipants {
            needed,
            current: tournament.participants.len(),
        });
    }
    if now < tournament.config.scheduled_start {
        return Err(TournamentError::NotStartedYet(tournament.config.scheduled_start));
    }
    tournament.config.validate_prize_pool()?;

    let (mut bracket, seed_order) = {
        let seeded = seed_participants(&tournament.participants);
        let bracket = generate_bracket(&seeded, tournament.config.format)?;
        let order: Vec<ParticipantId> = seeded.iter().map(|p| p.id.clone()).collect();
        (bracket, order)
    };

    for (position, id) in seed_order.iter().enumerate() {
        if let Some(p) = tournament.participant_mut(id) {
            p.bracket_position = Some(position);
        }
    }
    match tournament.config.format {
        TournamentFormat::Swiss => {
            swiss::fill_current_round(&mut bracket, &tournament.participants, &ScoreGroupPairing)
        }
        _ => populate_current_round(&mut bracket, now),
    }

    tournament.bracket = Some(bracket);
    tournament.status = TournamentStatus::InProgress;
    tournament.started_at = Some(now);
    log::info!(
        "{}: started {} with {} participants",
        tournament.id,
        tournament.config.format,
        tournament.participants.len()
    );
    Ok(())
}

/// Cancel from any state before Finished. Cancelling twice is a no-op.
pub fn cancel_tournament(tournament: &mut Tournament, now: DateTime<Utc>) -> Result<(), TournamentError> {
    match tournament.status {
        TournamentStatus::Finished => Err(TournamentError::AlreadyFinished),
        TournamentStatus::Cancelled => Ok(()),
        _ => {
            tournament.status = TournamentStatus::Cancelled;
            tournament.ended_at = Some(now);
            log::info!("{}: cancelled", tournament.id);
            Ok(())
        }
    }
}
