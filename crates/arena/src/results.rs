//! What an arena session leaves behind: a game-by-game record that can be
//! tallied, summarised, or kept as JSON.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::match_runner::{BotStats, GameRecord, GameResult, MatchResult};

/// A finished session between two bots: the pairing, every game in the
/// order it was played, and each side's thinking time. Standings are not
/// stored; they are folded out of the game list on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub first: String,
    pub second: String,
    /// Edge length of the cubic board the games were played on.
    pub board_edge: usize,
    pub games: Vec<GameRecord>,
    pub first_stats: BotStats,
    pub second_stats: BotStats,
}

impl SessionRecord {
    /// Win/loss/draw tally for the first bot.
    pub fn tally(&self) -> MatchResult {
        let mut tally = MatchResult::default();
        for game in &self.games {
            match game.result {
                GameResult::Win => tally.wins += 1,
                GameResult::Loss => tally.losses += 1,
                GameResult::Draw => tally.draws += 1,
            }
        }
        tally
    }

    /// Human-readable account of the session: one headline, one line per
    /// game, one line of timing.
    pub fn summary(&self) -> String {
        let tally = self.tally();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} {}-{}-{} {} over {} games on a {}^3 board",
            self.first,
            tally.wins,
            tally.losses,
            tally.draws,
            self.second,
            self.games.len(),
            self.board_edge,
        );
        for (number, game) in self.games.iter().enumerate() {
            let side = if game.first_played_x { 'x' } else { 'o' };
            let verdict = match game.result {
                GameResult::Win => "won",
                GameResult::Loss => "lost",
                GameResult::Draw => "drew",
            };
            let _ = writeln!(
                out,
                "  game {:>2}: {} as {} {} ({} plies)",
                number + 1,
                self.first,
                side,
                verdict,
                game.plies,
            );
        }
        let _ = writeln!(
            out,
            "  thinking: {} {} ms/move, {} {} ms/move",
            self.first,
            self.first_stats.average_ms(),
            self.second,
            self.second_stats.average_ms(),
        );
        out
    }

    /// Keep the session as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Read a session back from [`save`](Self::save)'s output.
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&text).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SessionRecord {
        SessionRecord {
            first: "AlphaBeta".into(),
            second: "Random".into(),
            board_edge: 3,
            games: vec![
                GameRecord { first_played_x: true, result: GameResult::Win, plies: 7 },
                GameRecord { first_played_x: false, result: GameResult::Draw, plies: 27 },
                GameRecord { first_played_x: true, result: GameResult::Win, plies: 9 },
            ],
            first_stats: BotStats { name: "AlphaBeta".into(), moves: 22, total_ms: 440 },
            second_stats: BotStats { name: "Random".into(), moves: 21, total_ms: 2 },
        }
    }

    #[test]
    fn tally_folds_the_game_list() {
        let tally = sample().tally();
        assert_eq!(tally.wins, 2);
        assert_eq!(tally.losses, 0);
        assert_eq!(tally.draws, 1);
        assert_eq!(tally.total_games(), 3);
    }

    #[test]
    fn summary_accounts_for_every_game() {
        let summary = sample().summary();
        assert!(summary.starts_with("AlphaBeta 2-0-1 Random"));
        // Headline, three game lines, one timing line.
        assert_eq!(summary.lines().count(), 5);
        assert_eq!(summary.matches("  game").count(), 3);
        assert!(summary.contains("as o drew (27 plies)"));
        assert!(summary.contains("thinking:"));
    }

    #[test]
    fn save_and_load_round_trip() {
        let record = sample();
        let path = std::env::temp_dir().join("arena_session_roundtrip_test.json");
        record.save(&path).unwrap();
        let loaded = SessionRecord::load(&path).unwrap();
        assert_eq!(loaded.first, record.first);
        assert_eq!(loaded.games.len(), 3);
        assert_eq!(loaded.tally().wins, 2);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn load_rejects_garbage() {
        let path = std::env::temp_dir().join("arena_session_garbage_test.json");
        fs::write(&path, "not json").unwrap();
        assert!(SessionRecord::load(&path).is_err());
        let _ = fs::remove_file(&path);
    }
}
