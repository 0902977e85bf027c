//! Swiss system: round skeleton, per-round pairing hook, and the qualifying cut.

use crate::logic::bracket::ceil_log2;
use crate::logic::prizes::get_final_standings;
use crate::models::{
    Advancement, Bracket, BracketSide, ByeSlot, Match, MatchStatus, Participant, ParticipantId,
    Round, Tournament, TournamentError, TournamentFormat, TournamentStatus,
};
use std::cmp::Reverse;

/// `ceil(log2(N)) + 1` empty rounds; each is paired when it becomes active.
pub(crate) fn generate(ids: &[ParticipantId]) -> Bracket {
    let total = ceil_log2(ids.len()) + 1;
    let rounds = (1..=total)
        .map(|number| Round::new(number, format!("Round {number}"), BracketSide::Winners))
        .collect();
    Bracket::new(
        TournamentFormat::Swiss,
        rounds,
        Advancement::Cut(ids.len().div_ceil(4)),
    )
}

/// Pairings for one Swiss round.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SwissPairings {
    pub pairs: Vec<(ParticipantId, ParticipantId)>,
    pub bye: Option<ParticipantId>,
}

/// Hook for the per-round pairing algorithm.
pub trait SwissPairing {
    /// Pair `ranked` (best first) given the matches already in `bracket`.
    fn pair(&self, ranked: &[&Participant], bracket: &Bracket) -> SwissPairings;
}

/// Score-group pairing.
///
/// Participants are grouped by points. Within a group the top half meets the bottom
/// half, skipping opponents already met; whoever stays unpaired floats down into the
/// next group. Rematches only happen among the last floaters when nothing else is left.
/// With an odd count the lowest-ranked participant without a previous bye sits out.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScoreGroupPairing;

impl SwissPairing for ScoreGroupPairing {
    fn pair(&self, ranked: &[&Participant], bracket: &Bracket) -> SwissPairings {
        let mut pool: Vec<&Participant> = ranked.to_vec();

        let bye = if pool.len() % 2 == 1 {
            let idx = pool
                .iter()
                .rposition(|p| !bracket.had_bye(&p.id))
                .unwrap_or(pool.len() - 1);
            Some(pool.remove(idx).id.clone())
        } else {
            None
        };

        let mut pairs = Vec::with_capacity(pool.len() / 2);
        let mut floaters: Vec<&Participant> = Vec::new();
        let mut start = 0;
        while start < pool.len() {
            let points = pool[start].points();
            let end = pool[start..]
                .iter()
                .position(|p| p.points() != points)
                .map_or(pool.len(), |offset| start + offset);
            let mut group = std::mem::take(&mut floaters);
            group.extend_from_slice(&pool[start..end]);
            floaters = pair_group(&group, bracket, &mut pairs);
            start = end;
        }

        // Whoever is still unpaired: avoid rematches where possible, then accept them.
        let mut used = vec![false; floaters.len()];
        for i in 0..floaters.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            let fresh = (i + 1..floaters.len())
                .find(|&j| !used[j] && !bracket.have_met(&floaters[i].id, &floaters[j].id));
            let partner = fresh.or_else(|| (i + 1..floaters.len()).find(|&j| !used[j]));
            if let Some(j) = partner {
                used[j] = true;
                pairs.push((floaters[i].id.clone(), floaters[j].id.clone()));
            }
        }

        SwissPairings { pairs, bye }
    }
}

/// Top half against bottom half without rematches; returns the unpaired, in rank order.
fn pair_group<'a>(
    group: &[&'a Participant],
    bracket: &Bracket,
    pairs: &mut Vec<(ParticipantId, ParticipantId)>,
) -> Vec<&'a Participant> {
    let half = group.len() / 2;
    let (top, bottom) = group.split_at(half);
    let mut bottom_used = vec![false; bottom.len()];
    let mut unpaired = Vec::new();

    for upper in top {
        let partner = (0..bottom.len())
            .find(|&j| !bottom_used[j] && !bracket.have_met(&upper.id, &bottom[j].id));
        match partner {
            Some(j) => {
                bottom_used[j] = true;
                pairs.push((upper.id.clone(), bottom[j].id.clone()));
            }
            None => unpaired.push(*upper),
        }
    }
    unpaired.extend(
        bottom
            .iter()
            .zip(&bottom_used)
            .filter(|(_, used)| !**used)
            .map(|(p, _)| *p),
    );
    unpaired
}

/// Active participants ordered for pairing: points, then fewer losses, then seed.
fn pairing_order(participants: &[Participant]) -> Vec<&Participant> {
    let mut ranked: Vec<&Participant> = participants.iter().filter(|p| !p.eliminated).collect();
    ranked.sort_by_key(|p| {
        (
            Reverse(p.points()),
            p.losses,
            p.bracket_position.unwrap_or(usize::MAX),
        )
    });
    ranked
}

/// Replace the active round's matches with a fresh pairing.
pub(crate) fn fill_current_round(
    bracket: &mut Bracket,
    participants: &[Participant],
    pairing: &dyn SwissPairing,
) {
    let ranked = pairing_order(participants);
    if let Some(round) = bracket.current_mut() {
        round.matches.clear();
        round.byes.clear();
    }
    let plan = pairing.pair(&ranked, bracket);
    let number = bracket.current_round as u32;
    let Some(round) = bracket.current_mut() else {
        return;
    };
    round.matches = plan
        .pairs
        .into_iter()
        .enumerate()
        .map(|(slot, (a, b))| Match::seeded(number, slot, a, b))
        .collect();
    let bye_slot = round.matches.len();
    round.byes = plan
        .bye
        .into_iter()
        .map(|participant| ByeSlot {
            slot: bye_slot,
            participant,
        })
        .collect();
    log::debug!(
        "paired swiss round {}: {} matches, {} byes",
        number,
        round.matches.len(),
        round.byes.len()
    );
}

/// Re-pair the active Swiss round with a caller-supplied algorithm.
///
/// Only allowed while every match of the round is still waiting.
pub fn pair_swiss_round(
    tournament: &mut Tournament,
    pairing: &dyn SwissPairing,
) -> Result<(), TournamentError> {
    tournament.require_status(TournamentStatus::InProgress)?;
    if tournament.format() != TournamentFormat::Swiss {
        return Err(TournamentError::UnsupportedFormat(
            tournament.format().to_string(),
        ));
    }
    let Tournament {
        bracket,
        participants,
        ..
    } = tournament;
    let bracket = bracket.as_mut().ok_or(TournamentError::NoBracket)?;
    let round = bracket.current().ok_or(TournamentError::NoBracket)?;
    if let Some(played) = round
        .matches
        .iter()
        .find(|m| m.status != MatchStatus::Waiting)
    {
        return Err(TournamentError::InvalidMatchState {
            id: played.id,
            status: played.status,
            action: "re-pair the round",
        });
    }
    fill_current_round(bracket, participants, pairing);
    Ok(())
}

/// The top `ceil(N/4)` participants by points, ties broken by final standings order.
/// Empty for non-Swiss tournaments.
pub fn swiss_qualifiers(tournament: &Tournament) -> Vec<&Participant> {
    let cut = match tournament.bracket.as_ref().map(|b| b.advancement) {
        Some(Advancement::Cut(cut)) => cut,
        _ => return Vec::new(),
    };
    let mut ranked = get_final_standings(tournament);
    ranked.sort_by_key(|p| Reverse(p.points()));
    ranked.truncate(cut);
    ranked
}
