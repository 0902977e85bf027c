//! Participant: a registrant in a tournament, plus the bye sentinel and CSV roster import.

use crate::models::rank::RankTier;
use crate::models::tournament::TournamentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Stable participant identity. Matches refer to participants by id only.
pub type ParticipantId = String;

/// Reserved id of the "no opponent" sentinel.
pub const BYE_ID: &str = "bye";

/// True if `id` is the bye sentinel.
pub fn is_bye(id: &str) -> bool {
    id == BYE_ID
}

/// A player registered in one tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub rank: RankTier,
    pub rating: u32,
    /// Chosen deck / loadout reference.
    pub deck_id: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub checked_in: bool,
    pub eliminated: bool,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    /// Seed position (0-based) assigned when the bracket is generated.
    pub bracket_position: Option<usize>,
}

impl Participant {
    /// Create a participant with zeroed counters, not checked in.
    pub fn new(
        id: impl Into<ParticipantId>,
        name: impl Into<String>,
        rating: u32,
        rank: RankTier,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rank,
            rating,
            deck_id: None,
            registered_at: Utc::now(),
            checked_in: false,
            eliminated: false,
            wins: 0,
            losses: 0,
            draws: 0,
            bracket_position: None,
        }
    }

    pub fn with_deck(mut self, deck_id: impl Into<String>) -> Self {
        self.deck_id = Some(deck_id.into());
        self
    }

    pub fn is_bye(&self) -> bool {
        is_bye(&self.id)
    }

    /// Matches played (wins + losses + draws).
    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Swiss points: two per win, one per draw.
    pub fn points(&self) -> u32 {
        self.wins * 2 + self.draws
    }

    pub fn add_win(&mut self) {
        self.wins += 1;
    }

    pub fn add_loss(&mut self) {
        self.losses += 1;
    }

    pub fn add_draw(&mut self) {
        self.draws += 1;
    }

    pub fn eliminate(&mut self) {
        self.eliminated = true;
    }

    /// Clear tournament state; called on registration.
    pub fn reset_record(&mut self) {
        self.wins = 0;
        self.losses = 0;
        self.draws = 0;
        self.eliminated = false;
        self.checked_in = false;
        self.bracket_position = None;
    }
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    id: String,
    name: String,
    rating: u32,
    #[serde(default)]
    rank: Option<String>,
    #[serde(default)]
    deck: Option<String>,
}

/// Parse a CSV roster with header `id,name,rating,rank,deck`.
///
/// `rank` and `deck` may be empty; a missing rank defaults to Bronze.
pub fn read_roster<R: Read>(reader: R) -> Result<Vec<Participant>, TournamentError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut participants = Vec::new();
    for row in csv_reader.deserialize::<RosterRow>() {
        let row = row.map_err(|e| TournamentError::Roster(e.to_string()))?;
        if is_bye(&row.id) {
            return Err(TournamentError::Roster(format!(
                "participant id '{}' is reserved",
                row.id
            )));
        }
        let rank = match row.rank.as_deref().filter(|r| !r.is_empty()) {
            Some(r) => r
                .parse::<RankTier>()
                .map_err(|e| TournamentError::Roster(e.to_string()))?,
            None => RankTier::default(),
        };
        let mut participant = Participant::new(row.id, row.name, row.rating, rank);
        participant.deck_id = row.deck.filter(|d| !d.is_empty());
        participants.push(participant);
    }
    Ok(participants)
}
