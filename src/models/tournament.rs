//! Tournament, its configuration, status, and registration-time operations.

use crate::models::bracket::{Bracket, TournamentFormat};
use crate::models::game::{MatchId, MatchStatus};
use crate::models::participant::{is_bye, Participant, ParticipantId};
use crate::models::prize::PrizeEntry;
use crate::models::rank::RankTier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TournamentError {
    #[error("Unsupported tournament format: {0}")]
    UnsupportedFormat(String),

    #[error("Need at least {needed} participants, have {current}")]
    NotEnoughParticipants { needed: usize, current: usize },

    #[error("Tournament is full")]
    TournamentFull,

    #[error("Participant {0} is already registered")]
    AlreadyRegistered(ParticipantId),

    #[error("Participant {0} not found")]
    ParticipantNotFound(ParticipantId),

    #[error("Match {0} not found")]
    MatchNotFound(MatchId),

    #[error("Tournament not in correct state: expected {expected:?}, got {actual:?}")]
    InvalidState {
        expected: TournamentStatus,
        actual: TournamentStatus,
    },

    #[error("Tournament is finished")]
    AlreadyFinished,

    #[error("Match {id} is {status:?}, cannot {action}")]
    InvalidMatchState {
        id: MatchId,
        status: MatchStatus,
        action: &'static str,
    },

    #[error("Match {0} is not part of the active round")]
    MatchNotActive(MatchId),

    #[error("Match {0} cannot start: slots unfilled, bye, or participants not checked in")]
    MatchNotReady(MatchId),

    #[error("{winner} is not a participant of match {id}")]
    WinnerNotInMatch { id: MatchId, winner: ParticipantId },

    #[error("Draws are not allowed in {0}")]
    DrawNotAllowed(TournamentFormat),

    #[error("Not eligible: {0}")]
    NotEligible(String),

    #[error("Invalid prize pool: {0}")]
    InvalidPrizePool(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Registration is closed")]
    RegistrationClosed,

    #[error("Tournament cannot start before {0}")]
    NotStartedYet(DateTime<Utc>),

    #[error("No bracket has been generated")]
    NoBracket,

    #[error("Roster error: {0}")]
    Roster(String),
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Tournament lifecycle. Cancelled is reachable from any non-Finished state.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    Registration,
    Ready,
    InProgress,
    Finished,
    Cancelled,
}

impl TournamentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TournamentStatus::Finished | TournamentStatus::Cancelled)
    }
}

/// Per-match rules. The time limit is enforced by the match-execution service.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRules {
    pub best_of: u8,
    pub time_limit_secs: u32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            best_of: 1,
            time_limit_secs: 30 * 60,
        }
    }
}

/// Who may register.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Eligibility {
    pub min_rating: Option<u32>,
    pub min_rank: Option<RankTier>,
    #[serde(default)]
    pub require_deck: bool,
}

impl Eligibility {
    /// Check a participant, returning the first failed requirement.
    pub fn check(&self, p: &Participant) -> Result<(), TournamentError> {
        if let Some(min) = self.min_rating {
            if p.rating < min {
                return Err(TournamentError::NotEligible(format!(
                    "rating {} below minimum {}",
                    p.rating, min
                )));
            }
        }
        if let Some(min) = self.min_rank {
            if p.rank < min {
                return Err(TournamentError::NotEligible(format!(
                    "rank {} below minimum {}",
                    p.rank, min
                )));
            }
        }
        if self.require_deck && p.deck_id.is_none() {
            return Err(TournamentError::NotEligible("a deck is required".to_string()));
        }
        Ok(())
    }
}

/// Static configuration fixed at creation time.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub name: String,
    pub format: TournamentFormat,
    pub min_participants: usize,
    pub max_participants: usize,
    pub registration_closes: Option<DateTime<Utc>>,
    pub scheduled_start: DateTime<Utc>,
    #[serde(default)]
    pub eligibility: Eligibility,
    #[serde(default)]
    pub prize_pool: Vec<PrizeEntry>,
    #[serde(default)]
    pub rules: MatchRules,
}

impl TournamentConfig {
    /// 2..=64 participants, starting as soon as it is ready.
    pub fn new(name: impl Into<String>, format: TournamentFormat) -> Self {
        Self {
            name: name.into(),
            format,
            min_participants: 2,
            max_participants: 64,
            registration_closes: None,
            scheduled_start: Utc::now(),
            eligibility: Eligibility::default(),
            prize_pool: Vec::new(),
            rules: MatchRules::default(),
        }
    }

    pub fn with_capacity(mut self, min_participants: usize, max_participants: usize) -> Self {
        self.min_participants = min_participants;
        self.max_participants = max_participants;
        self
    }

    pub fn starting_at(mut self, scheduled_start: DateTime<Utc>) -> Self {
        self.scheduled_start = scheduled_start;
        self
    }

    pub fn with_prize_pool(mut self, prize_pool: Vec<PrizeEntry>) -> Self {
        self.prize_pool = prize_pool;
        self
    }

    pub fn with_eligibility(mut self, eligibility: Eligibility) -> Self {
        self.eligibility = eligibility;
        self
    }

    /// Capacity and match rules must be coherent.
    pub fn validate(&self) -> Result<(), TournamentError> {
        if self.min_participants < 2 {
            return Err(TournamentError::InvalidConfig(
                "min_participants must be at least 2".to_string(),
            ));
        }
        if self.max_participants < self.min_participants {
            return Err(TournamentError::InvalidConfig(format!(
                "max_participants {} below min_participants {}",
                self.max_participants, self.min_participants
            )));
        }
        if self.rules.best_of == 0 || self.rules.best_of % 2 == 0 {
            return Err(TournamentError::InvalidConfig(format!(
                "best_of must be odd, got {}",
                self.rules.best_of
            )));
        }
        Ok(())
    }

    /// Positions are 1-based and unique.
    pub fn validate_prize_pool(&self) -> Result<(), TournamentError> {
        let mut seen = HashSet::new();
        for entry in &self.prize_pool {
            if entry.position == 0 {
                return Err(TournamentError::InvalidPrizePool(
                    "positions start at 1".to_string(),
                ));
            }
            if !seen.insert(entry.position) {
                return Err(TournamentError::InvalidPrizePool(format!(
                    "position {} listed twice",
                    entry.position
                )));
            }
        }
        Ok(())
    }
}

/// Full tournament state: configuration, roster, bracket, and lifecycle timestamps.
///
/// The roster is the single owner of participant records; matches refer to them by id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub config: TournamentConfig,
    pub status: TournamentStatus,
    pub participants: Vec<Participant>,
    pub bracket: Option<Bracket>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Tournament {
    /// Create a tournament in Registration with an empty roster.
    pub fn new(config: TournamentConfig) -> Result<Self, TournamentError> {
        config.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            config,
            status: TournamentStatus::Registration,
            participants: Vec::new(),
            bracket: None,
            created_at: Utc::now(),
            started_at: None,
            ended_at: None,
        })
    }

    pub fn format(&self) -> TournamentFormat {
        self.config.format
    }

    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn participant_mut(&mut self, id: &str) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    pub(crate) fn require_status(&self, expected: TournamentStatus) -> Result<(), TournamentError> {
        if self.status != expected {
            return Err(TournamentError::InvalidState {
                expected,
                actual: self.status,
            });
        }
        Ok(())
    }

    fn accepting_registrations(&self) -> Result<(), TournamentError> {
        match self.status {
            TournamentStatus::Registration | TournamentStatus::Ready => Ok(()),
            actual => Err(TournamentError::InvalidState {
                expected: TournamentStatus::Registration,
                actual,
            }),
        }
    }

    /// Register a participant (Registration or Ready). Counters are reset.
    pub fn register_participant(&mut self, mut participant: Participant) -> Result<(), TournamentError> {
        self.accepting_registrations()?;
        let now = Utc::now();
        if self.config.registration_closes.is_some_and(|closes| now > closes) {
            return Err(TournamentError::RegistrationClosed);
        }
        if participant.is_bye() {
            return Err(TournamentError::NotEligible(format!(
                "participant id '{}' is reserved",
                participant.id
            )));
        }
        if self.participant(&participant.id).is_some() {
            return Err(TournamentError::AlreadyRegistered(participant.id));
        }
        if self.participants.len() >= self.config.max_participants {
            return Err(TournamentError::TournamentFull);
        }
        self.config.eligibility.check(&participant)?;

        participant.reset_record();
        participant.registered_at = now;
        log::debug!("{}: registered {}", self.id, participant.id);
        self.participants.push(participant);
        Ok(())
    }

    /// Withdraw before the start. Drops back to Registration if capacity is lost.
    pub fn withdraw_participant(&mut self, id: &str) -> Result<(), TournamentError> {
        self.accepting_registrations()?;
        let idx = self
            .participants
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| TournamentError::ParticipantNotFound(id.to_string()))?;
        self.participants.remove(idx);
        if self.status == TournamentStatus::Ready
            && self.participants.len() < self.config.min_participants
        {
            self.status = TournamentStatus::Registration;
        }
        Ok(())
    }

    /// Mark a participant present. Allowed until the tournament ends.
    pub fn check_in(&mut self, id: &str) -> Result<(), TournamentError> {
        if self.status.is_terminal() {
            return Err(TournamentError::AlreadyFinished);
        }
        self.participant_mut(id)
            .ok_or_else(|| TournamentError::ParticipantNotFound(id.to_string()))?
            .checked_in = true;
        Ok(())
    }

    /// Remove a participant from standings (e.g. disqualification). InProgress only.
    pub fn eliminate_participant(&mut self, id: &str) -> Result<(), TournamentError> {
        self.require_status(TournamentStatus::InProgress)?;
        if is_bye(id) {
            return Err(TournamentError::ParticipantNotFound(id.to_string()));
        }
        self.participant_mut(id)
            .ok_or_else(|| TournamentError::ParticipantNotFound(id.to_string()))?
            .eliminate();
        Ok(())
    }
}
