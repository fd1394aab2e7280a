use super::*;

#[test]
fn random_bot_plays_a_legal_move() {
    let mut bot = RandomBot::new(Player::X);
    let mut board = Board::cube(3, 10);
    let legal = board.valid_moves();

    let (mv, coords) = bot.choose_move(&mut board).unwrap();
    assert!(legal.contains(&mv));
    assert_eq!(board.piece_at(coords), Some(Player::X));
}

#[test]
fn random_bot_skips_full_columns() {
    let mut bot = RandomBot::new(Player::O);
    let mut board = Board::cube(3, 10);
    // Fill column A1 without a win.
    board.make_move_str("A1", Player::X);
    board.make_move_str("A1", Player::O);
    board.make_move_str("A1", Player::X);

    for _ in 0..20 {
        let mut probe = board.clone();
        let (mv, _) = bot.choose_move(&mut probe).unwrap();
        assert_ne!(mv, Move::parse("A1").unwrap());
    }
}

#[test]
fn random_bot_declines_a_full_board() {
    let mut bot = RandomBot::new(Player::O);
    let mut board = Board::cube(3, 10);
    let mut player = Player::X;
    while let Some(&mv) = board.valid_moves().first() {
        board.make_move(mv, player);
        player = player.other();
    }
    // Column-major filling runs through an X win; either ending declines.
    assert!(bot.choose_move(&mut board).is_none());
}
