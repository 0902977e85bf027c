//! Data structures for the engine: participants, matches, brackets, tournaments, rankings.

mod bracket;
mod game;
mod participant;
mod prize;
mod rank;
mod ranking;
mod tournament;

pub use bracket::{
    round_name, Advancement, Bracket, ByeSlot, Round, TournamentFormat,
};
pub use game::{
    BracketSide, EndReason, Feed, Match, MatchId, MatchResult, MatchStatus, SlotRef,
};
pub use participant::{is_bye, read_roster, Participant, ParticipantId, BYE_ID};
pub use prize::{Currency, PrizeAward, PrizeEntry};
pub use rank::{RankTier, UnknownRank};
pub use ranking::{PlayerRanking, DEFAULT_RATING};
pub use tournament::{
    Eligibility, MatchRules, Tournament, TournamentConfig, TournamentError, TournamentId,
    TournamentStatus,
};
