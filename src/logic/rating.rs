//! Elo-style rating with a rating- and rank-dependent K-factor, plus rank/division lookup.

use crate::models::{PlayerRanking, RankTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Width of Legend's division span (Legend has no next tier to bound it).
const LEGEND_SPAN: u32 = 200;

/// Outcome from the rated player's point of view.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Win,
    Draw,
    Loss,
}

impl GameResult {
    /// Actual score: 1 / 0.5 / 0.
    pub fn score(self) -> f64 {
        match self {
            GameResult::Win => 1.0,
            GameResult::Draw => 0.5,
            GameResult::Loss => 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub new_rating: u32,
    pub change: i32,
}

/// Probability-like expected score of the player against the opponent.
pub fn expected_score(player_rating: u32, opponent_rating: u32) -> f64 {
    let diff = f64::from(opponent_rating) - f64::from(player_rating);
    1.0 / (1.0 + 10_f64.powf(diff / 400.0))
}

/// Rating bands first; the rank override only applies from 2000 up.
pub fn k_factor(rating: u32, rank: RankTier) -> f64 {
    match rating {
        r if r < 1200 => 40.0,
        r if r < 1600 => 32.0,
        r if r < 2000 => 24.0,
        _ if matches!(rank, RankTier::Grandmaster | RankTier::Legend) => 16.0,
        _ => 20.0,
    }
}

/// New rating after one game. The change is rounded half away from zero and the
/// resulting rating is clamped to the `u32` range.
pub fn calculate_new_rating(
    player_rating: u32,
    opponent_rating: u32,
    result: GameResult,
    rank: RankTier,
) -> RatingChange {
    let expected = expected_score(player_rating, opponent_rating);
    let k = k_factor(player_rating, rank);
    let change = (k * (result.score() - expected)).round() as i32;
    let new_rating = player_rating.saturating_add_signed(change);
    RatingChange { new_rating, change }
}

/// Highest tier whose base rating is at or below `rating`.
pub fn get_rank_from_rating(rating: u32) -> RankTier {
    RankTier::ALL
        .into_iter()
        .rev()
        .find(|tier| rating >= tier.base_rating())
        .unwrap_or_default()
}

/// Division 1..=3 within `rank`: the span up to the next tier's base, cut into three
/// equal bands, lowest band first.
pub fn get_division_from_rating(rating: u32, rank: RankTier) -> u8 {
    let base = rank.base_rating();
    let ceiling = rank
        .next()
        .map_or(base + LEGEND_SPAN, RankTier::base_rating);
    let band = f64::from(ceiling - base) / 3.0;
    let offset = f64::from(rating.saturating_sub(base));
    ((offset / band).floor() as i64 + 1).clamp(1, 3) as u8
}

/// First ranking record for a player entering at `rating`, with rank and division
/// derived from it.
pub fn ranking_from_rating(player_id: impl Into<String>, rating: u32) -> PlayerRanking {
    let rank = get_rank_from_rating(rating);
    PlayerRanking::with_rating(player_id, rating, rank, get_division_from_rating(rating, rank))
}

/// Apply one result to a player's ranking record.
///
/// Updates rating, rank, division, season tallies, streaks, and peaks. Callers must
/// serialize updates per player.
pub fn update_player_ranking(
    ranking: &mut PlayerRanking,
    opponent_rating: u32,
    result: GameResult,
    now: DateTime<Utc>,
) -> RatingChange {
    let outcome = calculate_new_rating(ranking.rating, opponent_rating, result, ranking.rank);
    ranking.rating = outcome.new_rating;
    ranking.rank = get_rank_from_rating(outcome.new_rating);
    ranking.division = get_division_from_rating(outcome.new_rating, ranking.rank);

    match result {
        GameResult::Win => {
            ranking.season_wins += 1;
            ranking.win_streak += 1;
            ranking.loss_streak = 0;
            ranking.best_win_streak = ranking.best_win_streak.max(ranking.win_streak);
        }
        GameResult::Loss => {
            ranking.season_losses += 1;
            ranking.loss_streak += 1;
            ranking.win_streak = 0;
        }
        GameResult::Draw => {
            ranking.season_draws += 1;
            ranking.win_streak = 0;
            ranking.loss_streak = 0;
        }
    }

    if ranking.rating > ranking.peak_rating {
        ranking.peak_rating = ranking.rating;
    }
    if ranking.rank > ranking.peak_rank {
        ranking.peak_rank = ranking.rank;
    }
    ranking.last_match_at = Some(now);
    log::debug!(
        "{}: {:?} vs {} -> {} ({:+})",
        ranking.player_id,
        result,
        opponent_rating,
        ranking.rating,
        outcome.change
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_score_equal_ratings() {
        let expected = expected_score(1500, 1500);
        assert!((expected - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_expected_score_higher_rated() {
        let expected = expected_score(1700, 1500);
        assert!(expected > 0.7 && expected < 0.8);
    }

    #[test]
    fn test_k_factor_bands() {
        assert_eq!(k_factor(1199, RankTier::Gold), 40.0);
        assert_eq!(k_factor(1200, RankTier::Gold), 32.0);
        assert_eq!(k_factor(1599, RankTier::Platinum), 32.0);
        assert_eq!(k_factor(1600, RankTier::Platinum), 24.0);
        assert_eq!(k_factor(1999, RankTier::Diamond), 24.0);
        assert_eq!(k_factor(2000, RankTier::Master), 20.0);
        assert_eq!(k_factor(2300, RankTier::Grandmaster), 16.0);
        assert_eq!(k_factor(2500, RankTier::Legend), 16.0);
    }

    #[test]
    fn test_k_factor_rank_override_needs_2000() {
        // A sub-2000 Grandmaster still uses the rating band.
        assert_eq!(k_factor(1900, RankTier::Grandmaster), 24.0);
        assert_eq!(k_factor(1100, RankTier::Legend), 40.0);
    }

    #[test]
    fn test_win_against_equal_opponent() {
        let outcome = calculate_new_rating(1500, 1500, GameResult::Win, RankTier::Platinum);
        assert_eq!(outcome.change, 16);
        assert_eq!(outcome.new_rating, 1516);
    }

    #[test]
    fn test_draw_against_equal_opponent() {
        let outcome = calculate_new_rating(1000, 1000, GameResult::Draw, RankTier::Silver);
        assert_eq!(outcome.change, 0);
        assert_eq!(outcome.new_rating, 1000);
    }

    #[test]
    fn test_rating_clamped_at_zero() {
        let outcome = calculate_new_rating(10, 10, GameResult::Loss, RankTier::Bronze);
        assert_eq!(outcome.change, -20);
        assert_eq!(outcome.new_rating, 0);
        let outcome = calculate_new_rating(0, 0, GameResult::Loss, RankTier::Bronze);
        assert_eq!(outcome.change, -20);
        assert_eq!(outcome.new_rating, 0);
    }

    #[test]
    fn test_rating_saturates_at_the_top() {
        let outcome = calculate_new_rating(u32::MAX - 5, u32::MAX, GameResult::Win, RankTier::Legend);
        assert_eq!(outcome.change, 8);
        assert_eq!(outcome.new_rating, u32::MAX);
        let outcome = calculate_new_rating(u32::MAX, u32::MAX, GameResult::Loss, RankTier::Legend);
        assert_eq!(outcome.new_rating, u32::MAX - 8);
    }

    #[test]
    fn test_ranking_from_rating_derives_rank_and_division() {
        let ranking = ranking_from_rating("seed", 2000);
        assert_eq!(ranking.rating, 2000);
        assert_eq!(ranking.rank, RankTier::Master);
        assert_eq!(ranking.division, 1);
        assert_eq!(ranking.peak_rating, 2000);
        assert_eq!(ranking.peak_rank, RankTier::Master);
    }

    #[test]
    fn test_division_bands() {
        assert_eq!(get_division_from_rating(0, RankTier::Bronze), 1);
        assert_eq!(get_division_from_rating(299, RankTier::Bronze), 1);
        assert_eq!(get_division_from_rating(300, RankTier::Bronze), 2);
        assert_eq!(get_division_from_rating(899, RankTier::Bronze), 3);
        assert_eq!(get_division_from_rating(1200, RankTier::Gold), 1);
        assert_eq!(get_division_from_rating(1450, RankTier::Gold), 3);
        assert_eq!(get_division_from_rating(2000, RankTier::Master), 1);
        assert_eq!(get_division_from_rating(2199, RankTier::Master), 3);
        assert_eq!(get_division_from_rating(9000, RankTier::Legend), 3);
        // Rating below the tier base clamps to the lowest division.
        assert_eq!(get_division_from_rating(100, RankTier::Diamond), 1);
    }

    #[test]
    fn test_update_player_ranking_tracks_streaks_and_peaks() {
        let mut ranking = PlayerRanking::new("p1");
        let now = Utc::now();
        update_player_ranking(&mut ranking, 1000, GameResult::Win, now);
        update_player_ranking(&mut ranking, 1000, GameResult::Win, now);
        assert_eq!(ranking.season_wins, 2);
        assert_eq!(ranking.win_streak, 2);
        assert_eq!(ranking.best_win_streak, 2);
        let peak = ranking.peak_rating;
        assert!(peak > 1000);

        update_player_ranking(&mut ranking, 1000, GameResult::Loss, now);
        assert_eq!(ranking.win_streak, 0);
        assert_eq!(ranking.loss_streak, 1);
        assert_eq!(ranking.best_win_streak, 2);
        assert_eq!(ranking.peak_rating, peak);
        assert_eq!(ranking.rank, get_rank_from_rating(ranking.rating));
        assert_eq!(ranking.last_match_at, Some(now));
    }
}
