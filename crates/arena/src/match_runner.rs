//! Bot-vs-bot match runner.

use std::time::{Duration, Instant};

use qubic_core::{Board, Bot, Dims, Player};
use serde::{Deserialize, Serialize};

use crate::results::SessionRecord;

/// Configuration for a match.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Number of games to play.
    pub num_games: u32,
    /// Board geometry for every game.
    pub board: Dims,
    /// Exponential scoring base handed to each board.
    pub base: i64,
    /// Whether to swap symbols between games.
    pub alternate_symbols: bool,
    /// Print per-game lines while running.
    pub verbose: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            num_games: 8,
            board: Dims::cube(3),
            base: 10,
            alternate_symbols: true,
            verbose: true,
        }
    }
}

/// Result of a single game, from the first bot's perspective.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

impl GameResult {
    fn flipped(self) -> GameResult {
        match self {
            GameResult::Win => GameResult::Loss,
            GameResult::Loss => GameResult::Win,
            GameResult::Draw => GameResult::Draw,
        }
    }
}

/// One finished game inside a session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GameRecord {
    /// Whether the first bot held the x pieces this game.
    pub first_played_x: bool,
    /// Outcome from the first bot's perspective.
    pub result: GameResult,
    /// Moves played before the game ended.
    pub plies: u32,
}

/// Win/loss/draw counts from the first bot's perspective.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchResult {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl MatchResult {
    pub fn total_games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }
}

/// Per-bot timing over a match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotStats {
    pub name: String,
    pub moves: u32,
    pub total_ms: u64,
}

impl BotStats {
    fn record(&mut self, took: Duration) {
        self.moves += 1;
        self.total_ms += took.as_millis() as u64;
    }

    pub fn average_ms(&self) -> u64 {
        if self.moves == 0 {
            0
        } else {
            self.total_ms / u64::from(self.moves)
        }
    }
}

/// Builds a bot for an assigned symbol; each game gets fresh bots so the
/// stateful drivers start clean.
pub type BotFactory<'a> = &'a dyn Fn(Player) -> Box<dyn Bot>;

/// Runs matches between two bots.
pub struct MatchRunner {
    config: MatchConfig,
}

impl MatchRunner {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Play the configured number of games and collect them into a session
    /// record. The first factory's bot holds x in game one; when symbol
    /// alternation is on, the assignment toggles after every game so
    /// neither side keeps the first-move advantage.
    pub fn run_match(
        &self,
        make_first: BotFactory<'_>,
        make_second: BotFactory<'_>,
    ) -> SessionRecord {
        let mut first_stats = BotStats::default();
        let mut second_stats = BotStats::default();
        let mut games = Vec::with_capacity(self.config.num_games as usize);
        let mut first_plays_x = true;

        for game_no in 1..=self.config.num_games {
            let (mut x_bot, mut o_bot) = if first_plays_x {
                (make_first(Player::X), make_second(Player::O))
            } else {
                (make_second(Player::X), make_first(Player::O))
            };

            let (x_result, plies) = {
                let (x_stats, o_stats) = if first_plays_x {
                    (&mut first_stats, &mut second_stats)
                } else {
                    (&mut second_stats, &mut first_stats)
                };
                self.play_game(&mut *x_bot, &mut *o_bot, x_stats, o_stats)
            };

            if self.config.verbose {
                let line = match x_result {
                    GameResult::Win => {
                        format!("{} (x) beats {} in {} plies", x_bot.name(), o_bot.name(), plies)
                    }
                    GameResult::Loss => {
                        format!("{} (o) beats {} in {} plies", o_bot.name(), x_bot.name(), plies)
                    }
                    GameResult::Draw => {
                        format!("{} and {} draw after {} plies", x_bot.name(), o_bot.name(), plies)
                    }
                };
                println!("game {game_no}: {line}");
            }

            let result = if first_plays_x { x_result } else { x_result.flipped() };
            games.push(GameRecord { first_played_x: first_plays_x, result, plies });

            if self.config.alternate_symbols {
                first_plays_x = !first_plays_x;
            }
        }

        SessionRecord {
            first: first_stats.name.clone(),
            second: second_stats.name.clone(),
            board_edge: self.config.board.length,
            games,
            first_stats,
            second_stats,
        }
    }

    /// Play one game. Returns the result from X's perspective plus the
    /// number of plies; the caller flips the result when the first bot
    /// held O.
    fn play_game(
        &self,
        x_bot: &mut dyn Bot,
        o_bot: &mut dyn Bot,
        x_stats: &mut BotStats,
        o_stats: &mut BotStats,
    ) -> (GameResult, u32) {
        let mut board = Board::new(self.config.board, self.config.base);
        if x_stats.name.is_empty() {
            x_stats.name = x_bot.name().to_string();
        }
        if o_stats.name.is_empty() {
            o_stats.name = o_bot.name().to_string();
        }

        let mut plies = 0u32;
        let mut current = Player::X;
        let outcome = loop {
            let start = Instant::now();
            let played = if current == Player::X {
                let played = x_bot.choose_move(&mut board);
                x_stats.record(start.elapsed());
                played
            } else {
                let played = o_bot.choose_move(&mut board);
                o_stats.record(start.elapsed());
                played
            };

            let Some((mv, _)) = played else {
                break GameResult::Draw; // no legal move anywhere
            };
            plies += 1;

            // The resting bot hears about the move so a persistent tree
            // can follow along.
            if current == Player::X {
                o_bot.opponent_move(mv);
            } else {
                x_bot.opponent_move(mv);
            }

            if let Some(winner) = board.winner() {
                break if winner == Player::X {
                    GameResult::Win
                } else {
                    GameResult::Loss
                };
            }
            if board.is_full() {
                break GameResult::Draw;
            }
            current = current.other();
        };

        x_bot.close();
        o_bot.close();
        (outcome, plies)
    }
}

#[cfg(test)]
#[path = "match_runner_tests.rs"]
mod match_runner_tests;
