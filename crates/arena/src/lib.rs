//! Bot-vs-bot arena: play any two drivers against each other, collect
//! game records and timing, and persist them as JSON.

pub mod match_runner;
pub mod results;

pub use match_runner::{BotStats, GameRecord, GameResult, MatchConfig, MatchResult, MatchRunner};
pub use results::SessionRecord;
