//! Tournament bracket engine: seeding, bracket generation for four formats, round
//! progression, prize distribution, and Elo-style competitive rating.
//!
//! The engine works on plain data. A hosting service owns persistence, match
//! execution, and notification, and must serialize mutations per tournament.

pub mod logic;
pub mod models;

pub use logic::{
    advance_to_next_round, advance_to_next_round_with, advance_winner, calculate_new_rating,
    calculate_prizes, can_start_match, cancel_tournament, expected_score, generate_bracket,
    get_division_from_rating, get_final_standings, get_rank_from_rating, is_round_complete,
    k_factor, mark_ready, pair_swiss_round, ranking_from_rating, record_draw, seed_participants,
    start_match, start_tournament, swiss_qualifiers, update_player_ranking, GameResult,
    RatingChange, ScoreGroupPairing, SwissPairing, SwissPairings,
};
pub use models::{
    is_bye, read_roster, round_name, Advancement, Bracket, BracketSide, ByeSlot, Currency,
    Eligibility, EndReason, Feed, Match, MatchId, MatchResult, MatchRules, MatchStatus,
    Participant, ParticipantId, PlayerRanking, PrizeAward, PrizeEntry, RankTier, Round,
    SlotRef, Tournament, TournamentConfig, TournamentError, TournamentFormat, TournamentId,
    TournamentStatus, BYE_ID, DEFAULT_RATING,
};
