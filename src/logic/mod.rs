//! Engine logic: seeding, bracket generation, round progression, prizes, and rating.

mod bracket;
mod double_elimination;
mod prizes;
mod progression;
mod rating;
mod round_robin;
mod seeding;
mod setup;
mod single_elimination;
mod swiss;

pub use bracket::generate_bracket;
pub use prizes::{calculate_prizes, get_final_standings};
pub use progression::{
    advance_to_next_round, advance_to_next_round_with, advance_winner, can_start_match,
    is_round_complete, record_draw, start_match,
};
pub use rating::{
    calculate_new_rating, expected_score, get_division_from_rating, get_rank_from_rating,
    k_factor, ranking_from_rating, update_player_ranking, GameResult, RatingChange,
};
pub use seeding::seed_participants;
pub use setup::{cancel_tournament, mark_ready, start_tournament};
pub use swiss::{
    pair_swiss_round, swiss_qualifiers, ScoreGroupPairing, SwissPairing, SwissPairings,
};
