//! Bracket structure: format, rounds, byes, and the active round pointer.

use crate::models::game::{BracketSide, Match, MatchId, SlotRef};
use crate::models::participant::ParticipantId;
use crate::models::tournament::TournamentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bracket topology.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    #[default]
    SingleElimination,
    DoubleElimination,
    RoundRobin,
    Swiss,
}

impl TournamentFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            TournamentFormat::SingleElimination => "single_elimination",
            TournamentFormat::DoubleElimination => "double_elimination",
            TournamentFormat::RoundRobin => "round_robin",
            TournamentFormat::Swiss => "swiss",
        }
    }

    /// Elimination formats decide every match; draws are not allowed.
    pub fn is_elimination(self) -> bool {
        matches!(
            self,
            TournamentFormat::SingleElimination | TournamentFormat::DoubleElimination
        )
    }
}

impl fmt::Display for TournamentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TournamentFormat {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "single_elimination" => Ok(TournamentFormat::SingleElimination),
            "double_elimination" => Ok(TournamentFormat::DoubleElimination),
            "round_robin" => Ok(TournamentFormat::RoundRobin),
            "swiss" => Ok(TournamentFormat::Swiss),
            _ => Err(TournamentError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// How many participants go through per match / at the end.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "count")]
pub enum Advancement {
    /// One per match (elimination formats).
    PerMatch(usize),
    /// Everybody advances every round (round robin).
    All,
    /// Top N by record qualify at completion (swiss).
    Cut(usize),
}

/// A participant who advances from a pairing position without playing.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ByeSlot {
    pub slot: usize,
    pub participant: ParticipantId,
}

/// One bracket stage.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based position in `Bracket::rounds`.
    pub number: u32,
    pub name: String,
    pub side: BracketSide,
    pub matches: Vec<Match>,
    /// Pairings against the bye sentinel that were not materialized as matches.
    pub byes: Vec<ByeSlot>,
    pub is_complete: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Round {
    pub fn new(number: u32, name: impl Into<String>, side: BracketSide) -> Self {
        Self {
            number,
            name: name.into(),
            side,
            matches: Vec::new(),
            byes: Vec::new(),
            is_complete: false,
            completed_at: None,
        }
    }

    pub fn match_at(&self, slot: usize) -> Option<&Match> {
        self.matches.iter().find(|m| m.slot == slot)
    }

    pub fn bye_at(&self, slot: usize) -> Option<&ParticipantId> {
        self.byes
            .iter()
            .find(|b| b.slot == slot)
            .map(|b| &b.participant)
    }

    /// Who comes out on top at `slot`: the match winner or the bye holder.
    pub fn winner_at(&self, slot: usize) -> Option<&ParticipantId> {
        match self.match_at(slot) {
            Some(m) => m.winner.as_ref(),
            None => self.bye_at(slot),
        }
    }

    /// Who lost at `slot`; byes produce no loser.
    pub fn loser_at(&self, slot: usize) -> Option<&ParticipantId> {
        self.match_at(slot).and_then(Match::loser)
    }
}

/// Round name from distance to the last round of its side.
pub fn round_name(number: u32, total: u32) -> String {
    match total.saturating_sub(number) {
        0 => "Finals".to_string(),
        1 => "Semi-Finals".to_string(),
        2 => "Quarter-Finals".to_string(),
        3 => "Round of 16".to_string(),
        _ => format!("Round {number}"),
    }
}

/// Full round/match structure for one tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub format: TournamentFormat,
    pub rounds: Vec<Round>,
    /// 1-based index of the active round.
    pub current_round: usize,
    pub advancement: Advancement,
}

impl Bracket {
    pub fn new(format: TournamentFormat, rounds: Vec<Round>, advancement: Advancement) -> Self {
        Self {
            format,
            rounds,
            current_round: 1,
            advancement,
        }
    }

    pub fn current(&self) -> Option<&Round> {
        self.current_round
            .checked_sub(1)
            .and_then(|i| self.rounds.get(i))
    }

    pub fn current_mut(&mut self) -> Option<&mut Round> {
        self.current_round
            .checked_sub(1)
            .and_then(move |i| self.rounds.get_mut(i))
    }

    pub fn is_last_round(&self) -> bool {
        self.current_round == self.rounds.len()
    }

    /// All materialized matches across all rounds.
    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.rounds.iter().flat_map(|r| r.matches.iter())
    }

    pub fn find_match(&self, id: MatchId) -> Option<(usize, &Match)> {
        self.rounds.iter().enumerate().find_map(|(i, r)| {
            r.matches.iter().find(|m| m.id == id).map(|m| (i, m))
        })
    }

    pub fn find_match_mut(&mut self, id: MatchId) -> Option<(usize, &mut Match)> {
        self.rounds.iter_mut().enumerate().find_map(|(i, r)| {
            r.matches.iter_mut().find(|m| m.id == id).map(|m| (i, m))
        })
    }

    pub fn winner_of(&self, at: SlotRef) -> Option<&ParticipantId> {
        self.rounds.get(at.round).and_then(|r| r.winner_at(at.slot))
    }

    pub fn loser_of(&self, at: SlotRef) -> Option<&ParticipantId> {
        self.rounds.get(at.round).and_then(|r| r.loser_at(at.slot))
    }

    /// Whether two participants already met in a materialized match.
    pub fn have_met(&self, a: &str, b: &str) -> bool {
        self.matches().any(|m| m.involves(a) && m.involves(b))
    }

    /// Whether `id` has already received a bye in any round.
    pub fn had_bye(&self, id: &str) -> bool {
        self.rounds
            .iter()
            .any(|r| r.byes.iter().any(|b| b.participant == id))
    }
}
