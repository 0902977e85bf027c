//! Match: a single contest between two participants within one round.

use crate::models::participant::{is_bye, ParticipantId, BYE_ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Lifecycle of a match. Only moves forward.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Waiting,
    InProgress,
    Finished,
}

/// How a match ended, as reported by the match-execution service.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    #[default]
    Victory,
    Forfeit,
    Timeout,
    Disqualification,
    Draw,
}

/// Result payload attached to a finished match.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub player1_score: u32,
    pub player2_score: u32,
    pub duration_secs: u32,
    pub end_reason: EndReason,
}

impl MatchResult {
    pub fn victory(player1_score: u32, player2_score: u32) -> Self {
        Self {
            player1_score,
            player2_score,
            ..Self::default()
        }
    }

    pub fn with_reason(mut self, end_reason: EndReason) -> Self {
        self.end_reason = end_reason;
        self
    }
}

/// Which part of the bracket a match belongs to.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketSide {
    #[default]
    Winners,
    Losers,
    GrandFinals,
}

/// A pairing position within a round: index into `Bracket::rounds` plus slot.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct SlotRef {
    pub round: usize,
    pub slot: usize,
}

/// Where a match slot gets its participant from.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Feed {
    /// Filled at generation time.
    #[default]
    Seeded,
    WinnerOf(SlotRef),
    LoserOf(SlotRef),
}

/// A single match between two participants.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// 1-based round number within the bracket.
    pub round: u32,
    /// Pairing position within the round.
    pub slot: usize,
    pub side: BracketSide,
    /// None until populated from the feeders.
    pub participant1: Option<ParticipantId>,
    pub participant2: Option<ParticipantId>,
    pub feeds: [Feed; 2],
    pub winner: Option<ParticipantId>,
    pub result: Option<MatchResult>,
    pub status: MatchStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub spectators: u32,
}

impl Match {
    /// A match whose participants are known at generation time.
    pub fn seeded(
        round: u32,
        slot: usize,
        participant1: ParticipantId,
        participant2: ParticipantId,
    ) -> Self {
        Self {
            participant1: Some(participant1),
            participant2: Some(participant2),
            ..Self::placeholder(round, slot, BracketSide::Winners, [Feed::Seeded; 2])
        }
    }

    /// A match filled in later from `feeds`.
    pub fn placeholder(round: u32, slot: usize, side: BracketSide, feeds: [Feed; 2]) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            slot,
            side,
            participant1: None,
            participant2: None,
            feeds,
            winner: None,
            result: None,
            status: MatchStatus::Waiting,
            started_at: None,
            ended_at: None,
            spectators: 0,
        }
    }

    pub fn in_side(mut self, side: BracketSide) -> Self {
        self.side = side;
        self
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    /// Both slots populated.
    pub fn is_populated(&self) -> bool {
        self.participant1.is_some() && self.participant2.is_some()
    }

    /// Either slot holds the bye sentinel.
    pub fn has_bye(&self) -> bool {
        [&self.participant1, &self.participant2]
            .into_iter()
            .flatten()
            .any(|p| is_bye(p))
    }

    /// True if `id` is one of the two (non-bye) participants.
    pub fn involves(&self, id: &str) -> bool {
        !is_bye(id)
            && (self.participant1.as_deref() == Some(id) || self.participant2.as_deref() == Some(id))
    }

    /// The other participant of a populated match.
    pub fn opponent_of(&self, id: &str) -> Option<&ParticipantId> {
        if self.participant1.as_deref() == Some(id) {
            self.participant2.as_ref()
        } else if self.participant2.as_deref() == Some(id) {
            self.participant1.as_ref()
        } else {
            None
        }
    }

    /// Loser of a decided match; `None` for byes, draws and undecided matches.
    pub fn loser(&self) -> Option<&ParticipantId> {
        let winner = self.winner.as_deref()?;
        self.opponent_of(winner).filter(|p| !is_bye(p))
    }

    /// Fill the slots; a missing side becomes a bye and the match resolves at once
    /// to the present participant. With nobody at all the match resolves empty.
    pub fn populate(
        &mut self,
        participant1: Option<ParticipantId>,
        participant2: Option<ParticipantId>,
        now: DateTime<Utc>,
    ) {
        match (participant1, participant2) {
            (Some(p1), Some(p2)) => {
                self.participant1 = Some(p1);
                self.participant2 = Some(p2);
            }
            (Some(present), None) => {
                self.participant1 = Some(present.clone());
                self.participant2 = Some(BYE_ID.to_string());
                self.resolve_bye(present, now);
            }
            (None, Some(present)) => {
                self.participant1 = Some(BYE_ID.to_string());
                self.participant2 = Some(present.clone());
                self.resolve_bye(present, now);
            }
            (None, None) => {
                self.participant1 = Some(BYE_ID.to_string());
                self.participant2 = Some(BYE_ID.to_string());
                self.status = MatchStatus::Finished;
                self.ended_at = Some(now);
            }
        }
    }

    fn resolve_bye(&mut self, winner: ParticipantId, now: DateTime<Utc>) {
        self.winner = Some(winner);
        self.status = MatchStatus::Finished;
        self.ended_at = Some(now);
    }
}
