use mcts_chess::board::{
    Board, CastlingRightsDict, ChessMove, Color, GameResult, PieceDict, PieceKind, PositionDict,
    Special, Square,
};

fn apply(board: &mut Board, from: (u8, u8), to: (u8, u8)) {
    let mv = ChessMove::new(Square::new(from.0, from.1), Square::new(to.0, to.1));
    assert_eq!(
        board.apply_move(mv),
        mcts_chess::board::ApplyOutcome::Applied,
        "move {from:?}->{to:?} should have been legal"
    );
}

fn perft(board: &Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0;
    for mv in board.legal_moves() {
        let mut next = board.clone_for_search();
        next.apply_move_unchecked(mv);
        nodes += perft(&next, depth - 1);
    }
    nodes
}

#[test]
fn perft_depth_three_from_the_starting_position() {
    let board = Board::new();
    assert_eq!(perft(&board, 3), 8902);
}

#[test]
fn fools_mate_ends_the_game_for_black() {
    let mut board = Board::new();
    apply(&mut board, (6, 5), (5, 5));
    apply(&mut board, (1, 4), (3, 4));
    apply(&mut board, (6, 6), (4, 6));
    apply(&mut board, (0, 3), (4, 7));

    assert!(board.is_checkmate());
    assert_eq!(board.get_result(), GameResult::BlackWins);
}

#[test]
fn scholars_mate_ends_the_game_for_white() {
    let mut board = Board::new();
    apply(&mut board, (6, 4), (4, 4));
    apply(&mut board, (1, 4), (3, 4));
    apply(&mut board, (7, 5), (4, 2));
    apply(&mut board, (0, 1), (2, 2));
    apply(&mut board, (7, 3), (3, 7));
    apply(&mut board, (0, 6), (2, 5));
    apply(&mut board, (3, 7), (1, 5));

    assert!(board.is_checkmate());
    assert_eq!(board.get_result(), GameResult::WhiteWins);
}

#[test]
fn en_passant_capture_removes_the_victim_pawn() {
    let mut board = Board::new();
    apply(&mut board, (6, 4), (4, 4));
    apply(&mut board, (0, 1), (2, 2));
    apply(&mut board, (4, 4), (3, 4));
    apply(&mut board, (1, 3), (3, 3));

    let mv = ChessMove::with_special(Square::new(3, 4), Square::new(2, 3), Special::EnPassant);
    assert_eq!(board.apply_move(mv), mcts_chess::board::ApplyOutcome::Applied);

    assert!(board.piece_at(Square::new(3, 3)).is_none());
    let mover = board.piece_at(Square::new(2, 3)).unwrap();
    assert_eq!(mover.kind, PieceKind::Pawn);
    assert_eq!(mover.color, Color::White);
}

#[test]
fn kingside_castle_moves_king_and_rook_and_clears_rights() {
    let mut board = Board::new();
    apply(&mut board, (6, 4), (4, 4));
    apply(&mut board, (1, 4), (3, 4));
    apply(&mut board, (7, 6), (5, 5));
    apply(&mut board, (0, 1), (2, 2));
    apply(&mut board, (7, 5), (4, 2));
    apply(&mut board, (0, 5), (3, 2));

    let mv = ChessMove::with_special(Square::new(7, 4), Square::new(7, 6), Special::KingsideCastle);
    assert_eq!(board.apply_move(mv), mcts_chess::board::ApplyOutcome::Applied);

    let king = board.piece_at(Square::new(7, 6)).unwrap();
    assert_eq!(king.kind, PieceKind::King);
    assert!(king.has_moved);
    let rook = board.piece_at(Square::new(7, 5)).unwrap();
    assert_eq!(rook.kind, PieceKind::Rook);
    assert!(rook.has_moved);

    let rights = board.castling_rights(Color::White);
    assert!(!rights.kingside);
    assert!(!rights.queenside);
}

fn empty_rank() -> Vec<Option<PieceDict>> {
    vec![None, None, None, None, None, None, None, None]
}

#[test]
fn pawn_promotes_to_a_queen_on_the_back_rank() {
    let mut squares = vec![empty_rank(); 8];
    squares[1][0] = Some(PieceDict {
        kind: 'P',
        color: "white".to_string(),
        has_moved: true,
    });
    squares[7][4] = Some(PieceDict {
        kind: 'K',
        color: "white".to_string(),
        has_moved: false,
    });
    squares[0][4] = Some(PieceDict {
        kind: 'K',
        color: "black".to_string(),
        has_moved: false,
    });

    let dict = PositionDict {
        squares,
        side_to_move: "white".to_string(),
        white_castling_rights: CastlingRightsDict { kingside: false, queenside: false },
        black_castling_rights: CastlingRightsDict { kingside: false, queenside: false },
        en_passant_target: None,
        halfmove_clock: 0,
        fullmove_number: 20,
    };
    let mut board = Board::from_position_dict(&dict);

    let mv = ChessMove::with_special(Square::new(1, 0), Square::new(0, 0), Special::Promotion(PieceKind::Queen));
    assert_eq!(board.apply_move(mv), mcts_chess::board::ApplyOutcome::Applied);

    let promoted = board.piece_at(Square::new(0, 0)).unwrap();
    assert_eq!(promoted.kind, PieceKind::Queen);
    assert_eq!(promoted.color, Color::White);
    assert!(promoted.has_moved);
}

#[test]
fn fifty_consecutive_half_moves_without_progress_is_a_draw() {
    let mut squares = vec![empty_rank(); 8];
    squares[7][4] = Some(PieceDict {
        kind: 'K',
        color: "white".to_string(),
        has_moved: true,
    });
    squares[0][4] = Some(PieceDict {
        kind: 'K',
        color: "black".to_string(),
        has_moved: true,
    });
    squares[7][0] = Some(PieceDict {
        kind: 'R',
        color: "white".to_string(),
        has_moved: true,
    });
    squares[0][0] = Some(PieceDict {
        kind: 'R',
        color: "black".to_string(),
        has_moved: true,
    });

    let dict = PositionDict {
        squares,
        side_to_move: "white".to_string(),
        white_castling_rights: CastlingRightsDict { kingside: false, queenside: false },
        black_castling_rights: CastlingRightsDict { kingside: false, queenside: false },
        en_passant_target: None,
        halfmove_clock: 100,
        fullmove_number: 60,
    };
    let board = Board::from_position_dict(&dict);

    assert!(!board.is_draw_by_insufficient_material());
    assert!(board.is_draw_by_fifty_moves());
    assert_eq!(board.get_result(), GameResult::Draw);
}
