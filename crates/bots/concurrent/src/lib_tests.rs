use super::*;
use minimax_bot::{delta, threshold};
use std::time::{Duration, Instant};

fn cube3() -> Board {
    Board::cube(3, 10)
}

fn midgame() -> Board {
    let mut board = cube3();
    board.make_move_str("B2", Player::X);
    board.make_move_str("A1", Player::O);
    board.make_move_str("C3", Player::X);
    board.make_move_str("B2", Player::O);
    board
}

#[test]
fn root_parallel_matches_the_sequential_score() {
    for board in [cube3(), midgame()] {
        for depth in [2, 3] {
            let (_, parallel_score) = parallel::root_search(&board, depth, true).unwrap();
            let mut b = board.clone();
            let (sequential_score, _) = delta::search(&mut b, depth, true);
            assert_eq!(parallel_score, sequential_score, "depth {depth}");
        }
    }
}

#[test]
fn root_parallel_short_circuits_a_single_candidate() {
    // A one-column board always has exactly one legal move, which takes
    // the no-spawn path.
    let board = Board::new(qubic_core::Dims::new(1, 1, 3, 1), 10);
    assert_eq!(board.valid_moves(), vec![Move::new(0, 0)]);

    let (mv, _) = parallel::root_search(&board, 3, true).unwrap();
    assert_eq!(mv, Move::new(0, 0));
}

#[test]
fn root_parallel_returns_none_without_moves() {
    let mut board = cube3();
    let mut player = Player::X;
    while let Some(&mv) = board.valid_moves().first() {
        board.make_move(mv, player);
        player = player.other();
    }
    assert!(board.is_full());
    assert!(parallel::root_search(&board, 3, true).is_none());
}

#[test]
fn deep_parallel_matches_the_sequential_score() {
    for board in [cube3(), midgame()] {
        for depth in [3, 4] {
            let (parallel_score, _) =
                parallel::deep_search_root(&board, depth, true, ForkPolicy::default());
            let mut b = board.clone();
            let (sequential_score, _) = threshold::search_root(&mut b, depth, true);
            assert_eq!(parallel_score, sequential_score, "depth {depth}");
        }
    }
}

fn x_about_to_win() -> Board {
    let mut board = cube3();
    board.make_move_str("B3", Player::X);
    board.make_move_str("A1", Player::O);
    board.make_move_str("B3", Player::X);
    board.make_move_str("C2", Player::O);
    board
}

#[test]
fn deep_parallel_takes_the_winning_move() {
    // At depth 2 only the immediate completion scores as a win, so the
    // chosen move is deterministic even with racing workers.
    let mut board = x_about_to_win();
    let mut bot = ConcurrentAlphaBetaBot::new(Player::X, 2);
    let (mv, _) = bot.choose_move(&mut board).unwrap();
    assert_eq!(mv, Move::parse("B3").unwrap());
    assert_eq!(board.winner(), Some(Player::X));
}

#[test]
fn deep_parallel_sees_the_forced_win_from_depth() {
    // Deeper searches may surface several winning lines; which one is
    // reported depends on arrival order, but the score is pinned.
    let board = x_about_to_win();
    let (score, line) = parallel::deep_search_root(&board, 4, true, ForkPolicy::default());
    assert_eq!(score, qubic_core::WIN_SCORE);
    assert!(!line.is_empty());
}

#[test]
fn streaming_emissions_are_strictly_monotone_and_end_final() {
    let board = midgame();
    let bot = StreamingBot::new(Player::X, 3);
    let updates: Vec<SearchUpdate> = bot.analyze(&board).into_iter().collect();

    assert!(!updates.is_empty());
    let (finals, improvements): (Vec<_>, Vec<_>) =
        updates.iter().partition(|u| u.is_final);
    assert_eq!(finals.len(), 1, "exactly one final update");
    assert!(updates.last().unwrap().is_final, "final update arrives last");

    let mut previous = None;
    for update in &improvements {
        if let Some(prev) = previous {
            assert!(update.score > prev, "maximising stream must strictly rise");
        }
        previous = Some(update.score);
    }
}

#[test]
fn streaming_final_matches_the_sequential_score() {
    for maximizing in [true, false] {
        let board = midgame();
        let symbol = if maximizing { Player::X } else { Player::O };
        let bot = StreamingBot::new(symbol, 3);
        let final_update = bot
            .analyze(&board)
            .into_iter()
            .find(|u| u.is_final)
            .expect("stream must settle");

        let mut b = board.clone();
        let (expected, _) = threshold::search_root(&mut b, 3, maximizing);
        assert_eq!(final_update.score, expected);
    }
}

#[test]
fn streaming_bot_plays_its_final_candidate() {
    let mut board = midgame();
    let mut bot = StreamingBot::new(Player::X, 3);
    let (mv, coords) = bot.choose_move(&mut board).unwrap();
    assert_eq!(board.piece_at(coords), Some(Player::X));
    assert_eq!(board.last_move(), Some(coords));
    let _ = mv;
}

#[test]
fn cancelled_stream_terminates_quickly() {
    let board = cube3();
    let token = CancelToken::root();
    let rx = stream::stream_search(&board, 6, true, StreamPolicy::default(), token.clone());

    token.cancel();
    let deadline = Instant::now() + Duration::from_secs(10);
    // The channel must close (with or without a final) well before the
    // search could have finished depth 6 from the empty board.
    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                assert!(Instant::now() < deadline, "cancelled stream failed to wind down");
            }
        }
    }
}

#[test]
fn dropping_the_receiver_is_a_cancellation() {
    // No assertion beyond "this returns": dropped receivers turn the next
    // send into an error and the workers unwind on their own.
    for _ in 0..3 {
        let board = cube3();
        let rx = stream::stream_search(&board, 3, true, StreamPolicy::default(), CancelToken::root());
        drop(rx);
    }
}

#[test]
fn multi_depth_emits_one_final_from_the_requested_depths() {
    let board = midgame();
    let bot = MultiDepthBot::new(Player::O, vec![2, 3]);
    let updates: Vec<SearchUpdate> = bot.analyze(&board).into_iter().collect();

    let finals: Vec<_> = updates.iter().filter(|u| u.is_final).collect();
    assert_eq!(finals.len(), 1);
    assert!(updates.last().unwrap().is_final);
    for update in &updates {
        assert!(update.depth == 2 || update.depth == 3);
    }
}

#[test]
fn multi_depth_bot_plays_a_legal_move() {
    let mut board = midgame();
    let legal = board.valid_moves();
    let mut bot = MultiDepthBot::new(Player::O, vec![2, 3, 4]);
    let (mv, _) = bot.choose_move(&mut board).unwrap();
    assert!(legal.contains(&mv));
}
