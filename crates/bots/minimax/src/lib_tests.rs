use super::*;

fn cube3() -> Board {
    Board::cube(3, 10)
}

/// A midgame position with pieces of both colours and no immediate win.
fn midgame() -> Board {
    let mut board = cube3();
    board.make_move_str("B2", Player::X);
    board.make_move_str("A1", Player::O);
    board.make_move_str("C3", Player::X);
    board.make_move_str("B2", Player::O);
    board
}

#[test]
fn all_three_drivers_agree_on_the_root_score() {
    for board in [cube3(), midgame()] {
        for depth in 1..=3 {
            let (naive_score, _) = naive::search(&board, depth, true);
            let mut b = board.clone();
            let (delta_score, _) = delta::search(&mut b, depth, true);
            let mut b = board.clone();
            let (ab_score, _) = threshold::search_root(&mut b, depth, true);

            assert_eq!(naive_score, delta_score, "naive vs delta at depth {depth}");
            assert_eq!(delta_score, ab_score, "delta vs threshold at depth {depth}");
        }
    }
}

#[test]
fn pruned_search_agrees_at_deeper_depths() {
    let board = midgame();
    for maximizing in [true, false] {
        let mut b = board.clone();
        let (delta_score, _) = delta::search(&mut b, 5, maximizing);
        let mut b = board.clone();
        let (ab_score, _) = threshold::search_root(&mut b, 5, maximizing);
        assert_eq!(delta_score, ab_score);
    }
}

#[test]
fn search_leaves_the_board_untouched() {
    let board = midgame();
    let mut probe = board.clone();
    delta::search(&mut probe, 4, true);
    assert_eq!(probe, board);
    let mut probe = board.clone();
    threshold::search_root(&mut probe, 4, false);
    assert_eq!(probe, board);
}

#[test]
fn principal_variation_starts_with_a_legal_move() {
    let board = midgame();
    let (_, line) = naive::search(&board, 3, true);
    assert!(!line.is_empty());
    assert!(line.len() <= 3);
    assert!(board.valid_moves().contains(&line[0]));
}

/// Position where X completes a column on the next move.
fn x_about_to_win() -> Board {
    let mut board = cube3();
    board.make_move_str("B3", Player::X);
    board.make_move_str("A1", Player::O);
    board.make_move_str("B3", Player::X);
    board.make_move_str("C2", Player::O);
    board
}

/// Position where O completes the z=0 row `A1 B1 C1` unless X blocks at C1.
fn o_threatens_row() -> Board {
    let mut board = cube3();
    board.make_move_str("C3", Player::X);
    board.make_move_str("A1", Player::O);
    board.make_move_str("A2", Player::X);
    board.make_move_str("B1", Player::O);
    board
}

#[test]
fn every_driver_takes_the_winning_move() {
    // At depth 2 the column completion is the only move that scores as a
    // win; deeper searches find other forcing moves too, so move identity
    // is only pinned here.
    let win = Move::parse("B3").unwrap();

    let mut board = x_about_to_win();
    let mut bot = NaiveMinimaxBot::new(Player::X, 2);
    let (mv, _) = bot.choose_move(&mut board).unwrap();
    assert_eq!(mv, win);
    assert_eq!(board.winner(), Some(Player::X));

    let mut board = x_about_to_win();
    let mut bot = MinimaxBot::new(Player::X, 2);
    let (mv, _) = bot.choose_move(&mut board).unwrap();
    assert_eq!(mv, win);

    let mut board = x_about_to_win();
    let mut bot = AlphaBetaBot::new(Player::X, 2);
    let (mv, _) = bot.choose_move(&mut board).unwrap();
    assert_eq!(mv, win);
}

#[test]
fn deeper_searches_still_score_the_position_as_won() {
    let board = x_about_to_win();
    for depth in [3, 4] {
        let mut b = board.clone();
        let (delta_score, line) = delta::search(&mut b, depth, true);
        assert_eq!(delta_score, qubic_core::WIN_SCORE, "delta at depth {depth}");
        assert!(!line.is_empty());

        let mut b = board.clone();
        let (ab_score, _) = threshold::search_root(&mut b, depth, true);
        assert_eq!(ab_score, qubic_core::WIN_SCORE, "threshold at depth {depth}");
    }
}

#[test]
fn every_driver_blocks_the_immediate_threat() {
    let block = Move::parse("C1").unwrap();

    let mut board = o_threatens_row();
    let mut bot = NaiveMinimaxBot::new(Player::X, 2);
    let (mv, _) = bot.choose_move(&mut board).unwrap();
    assert_eq!(mv, block);

    for depth in [2, 3] {
        let mut board = o_threatens_row();
        let mut bot = MinimaxBot::new(Player::X, depth);
        let (mv, _) = bot.choose_move(&mut board).unwrap();
        assert_eq!(mv, block, "delta driver at depth {depth}");

        let mut board = o_threatens_row();
        let mut bot = AlphaBetaBot::new(Player::X, depth);
        let (mv, _) = bot.choose_move(&mut board).unwrap();
        assert_eq!(mv, block, "threshold driver at depth {depth}");
    }
}

#[test]
fn bots_apply_their_move_to_the_board() {
    let mut board = cube3();
    let mut bot = AlphaBetaBot::new(Player::X, 2);
    let (mv, coords) = bot.choose_move(&mut board).unwrap();
    assert_eq!(board.piece_at(coords), Some(Player::X));
    assert_eq!(board.last_move(), Some(coords));
    assert_eq!(board.height_at(mv.x as usize, mv.y as usize), coords.z + 1);
}

#[test]
fn no_move_on_a_decided_board() {
    let mut board = cube3();
    for s in ["A1", "A1", "A1"] {
        board.make_move_str(s, Player::X);
    }
    assert_eq!(board.winner(), Some(Player::X));
    let mut bot = MinimaxBot::new(Player::O, 3);
    assert!(bot.choose_move(&mut board).is_none());
}
