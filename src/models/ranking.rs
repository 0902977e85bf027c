//! PlayerRanking: cross-tournament competitive record.

use crate::models::rank::RankTier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Starting rating for a new player.
pub const DEFAULT_RATING: u32 = 1000;

/// Persistent per-player rating record. Only the rating calculator mutates it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerRanking {
    pub player_id: String,
    pub rating: u32,
    pub rank: RankTier,
    /// 1..=3 within the rank.
    pub division: u8,
    pub season_wins: u32,
    pub season_losses: u32,
    pub season_draws: u32,
    pub win_streak: u32,
    pub loss_streak: u32,
    pub best_win_streak: u32,
    pub peak_rating: u32,
    pub peak_rank: RankTier,
    pub last_match_at: Option<DateTime<Utc>>,
}

impl PlayerRanking {
    /// New player at the default rating. Rank and division are derived by the caller
    /// through the rating calculator; the defaults match `DEFAULT_RATING`.
    pub fn new(player_id: impl Into<String>) -> Self {
        Self::with_rating(player_id, DEFAULT_RATING, RankTier::Silver, 2)
    }

    pub fn with_rating(
        player_id: impl Into<String>,
        rating: u32,
        rank: RankTier,
        division: u8,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            rating,
            rank,
            division,
            season_wins: 0,
            season_losses: 0,
            season_draws: 0,
            win_streak: 0,
            loss_streak: 0,
            best_win_streak: 0,
            peak_rating: rating,
            peak_rank: rank,
            last_match_at: None,
        }
    }

    pub fn season_games(&self) -> u32 {
        self.season_wins + self.season_losses + self.season_draws
    }

    /// Share of season games won, 0.0 with no games.
    pub fn win_rate(&self) -> f64 {
        match self.season_games() {
            0 => 0.0,
            n => f64::from(self.season_wins) / f64::from(n),
        }
    }

    /// Clear season tallies and streaks; rating and peaks carry over.
    pub fn start_new_season(&mut self) {
        self.season_wins = 0;
        self.season_losses = 0;
        self.season_draws = 0;
        self.win_streak = 0;
        self.loss_streak = 0;
    }
}
