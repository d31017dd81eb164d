//! The position representation and the termination ladder.
use super::castling_rights::CastlingRights;
use super::chess_move::{ChessMove, Special};
use super::color::Color;
use super::movegen;
use super::piece::{Piece, PieceKind};
use super::position_key::{compute_position_key, PositionKey};
use super::square::Square;
use log::trace;
use serde::{Deserialize, Serialize};

/// Outcome of `apply_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    Rejected,
    Terminal,
}

/// The termination ladder's result, total over every reachable position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    InProgress,
    WhiteWins,
    BlackWins,
    Draw,
}

impl GameResult {
    pub fn is_terminal(self) -> bool {
        self != GameResult::InProgress
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
    side_to_move: Color,
    king_square: [Square; 2],
    castling_rights: [CastlingRights; 2],
    en_passant_target: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    move_history: Vec<ChessMove>,
    position_history: Vec<PositionKey>,
}

impl Board {
    /// The standard starting position.
    pub fn new() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for col in 0..8u8 {
            board.squares[0][col as usize] = Some(Piece::new(back_rank[col as usize], Color::Black));
            board.squares[1][col as usize] = Some(Piece::new(PieceKind::Pawn, Color::Black));
            board.squares[6][col as usize] = Some(Piece::new(PieceKind::Pawn, Color::White));
            board.squares[7][col as usize] = Some(Piece::new(back_rank[col as usize], Color::White));
        }
        board.king_square = [Square::new(7, 4), Square::new(0, 4)];
        let key = compute_position_key(&board);
        board.position_history.push(key);
        board
    }

    /// An empty board with White to move and full castling rights, useful as
    /// a scratch base for constructing test positions.
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
            side_to_move: Color::White,
            king_square: [Square::new(7, 4), Square::new(0, 4)],
            castling_rights: [CastlingRights::new(), CastlingRights::new()],
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            move_history: Vec::new(),
            position_history: Vec::new(),
        }
    }

    /// A clone suitable for search: identical position, but with both history
    /// logs cleared, since rollouts never consult repetition.
    pub fn clone_for_search(&self) -> Board {
        Board {
            move_history: Vec::new(),
            position_history: Vec::new(),
            ..self.clone()
        }
    }

    pub(crate) fn set_piece_from_dict(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.row as usize][sq.col as usize] = piece;
        if let Some(p) = piece {
            if p.kind == PieceKind::King {
                self.king_square[p.color.index()] = sq;
            }
        }
    }

    pub(crate) fn set_side_to_move_from_dict(&mut self, color: Color) {
        self.side_to_move = color;
    }

    pub(crate) fn set_castling_rights_from_dict(&mut self, color: Color, rights: CastlingRights) {
        self.castling_rights[color.index()] = rights;
    }

    pub(crate) fn set_en_passant_from_dict(&mut self, target: Option<Square>) {
        self.en_passant_target = target;
    }

    pub(crate) fn set_clocks_from_dict(&mut self, halfmove_clock: u32, fullmove_number: u32) {
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number;
    }

    pub(crate) fn seed_position_history(&mut self, key: PositionKey) {
        self.position_history.push(key);
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.row as usize][sq.col as usize]
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn king_square(&self, color: Color) -> Square {
        self.king_square[color.index()]
    }

    pub fn castling_rights(&self, color: Color) -> CastlingRights {
        self.castling_rights[color.index()]
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn move_history(&self) -> &[ChessMove] {
        &self.move_history
    }

    pub fn position_history(&self) -> &[PositionKey] {
        &self.position_history
    }

    pub fn position_key(&self) -> PositionKey {
        compute_position_key(self)
    }

    pub fn reset(&mut self) {
        *self = Board::new();
    }

    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        movegen::is_square_attacked(self, sq, by)
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        self.is_square_attacked(self.king_square(color), color.opposite())
    }

    pub fn pseudo_legal_moves(&self) -> Vec<ChessMove> {
        movegen::pseudo_legal_moves(self)
    }

    pub fn legal_moves(&self) -> Vec<ChessMove> {
        movegen::legal_moves(self)
    }

    /// Applies `mv` without checking legality; callers must guarantee `mv`
    /// came from `legal_moves()` (or an equivalent check) on this board.
    pub fn apply_move_unchecked(&mut self, mv: ChessMove) {
        let moving = self.piece_at(mv.from).expect("apply_move_unchecked: no piece at from-square");
        let color = moving.color;
        let is_capture = self.piece_at(mv.to).is_some() || mv.special == Special::EnPassant;
        let is_pawn_move = moving.kind == PieceKind::Pawn;

        // Clear the origin and place the moved piece (possibly promoted).
        self.squares[mv.from.row as usize][mv.from.col as usize] = None;
        let placed = match mv.special {
            Special::Promotion(kind) => Piece {
                kind,
                color,
                has_moved: true,
            },
            _ => Piece {
                has_moved: true,
                ..moving
            },
        };
        self.squares[mv.to.row as usize][mv.to.col as usize] = Some(placed);

        if mv.special == Special::EnPassant {
            let victim_row = mv.from.row;
            self.squares[victim_row as usize][mv.to.col as usize] = None;
        }

        if let Special::KingsideCastle | Special::QueensideCastle = mv.special {
            let rank = color.home_rank();
            let (rook_from, rook_to) = if mv.special == Special::KingsideCastle {
                (Square::new(rank, 7), Square::new(rank, 5))
            } else {
                (Square::new(rank, 0), Square::new(rank, 3))
            };
            let rook = self.squares[rook_from.row as usize][rook_from.col as usize]
                .take()
                .expect("castling move with no rook on its home square");
            self.squares[rook_to.row as usize][rook_to.col as usize] = Some(Piece {
                has_moved: true,
                ..rook
            });
        }

        if moving.kind == PieceKind::King {
            self.king_square[color.index()] = mv.to;
            self.castling_rights[color.index()].clear_all();
        }
        self.update_castling_rights_on_rook_event(mv.from, color);
        self.update_castling_rights_on_rook_event(mv.to, color.opposite());

        self.en_passant_target = if mv.special == Special::DoublePawnPush {
            Square::try_new(
                (mv.from.row as i32 + mv.to.row as i32) / 2,
                mv.from.col as i32,
            )
        } else {
            None
        };

        self.halfmove_clock = if is_capture || is_pawn_move {
            0
        } else {
            self.halfmove_clock + 1
        };
        if color == Color::Black {
            self.fullmove_number += 1;
        }

        self.move_history.push(mv);
        self.side_to_move = self.side_to_move.opposite();
        let key = compute_position_key(self);
        self.position_history.push(key);
        trace!("applied move {:?} -> {:?} ({:?})", mv.from, mv.to, mv.special);
    }

    /// Clears a color's castling right when its rook leaves (or is captured
    /// on) a home square.
    fn update_castling_rights_on_rook_event(&mut self, sq: Square, rook_color: Color) {
        let rank = rook_color.home_rank();
        if sq.row != rank {
            return;
        }
        let rights = &mut self.castling_rights[rook_color.index()];
        if sq.col == 0 {
            rights.queenside = false;
        } else if sq.col == 7 {
            rights.kingside = false;
        }
    }

    /// Public entry contract: applies a move only if it is legal for
    /// the current position; otherwise rejects without mutating.
    pub fn apply_move(&mut self, mv: ChessMove) -> ApplyOutcome {
        if self.get_result().is_terminal() {
            return ApplyOutcome::Terminal;
        }
        let legal = self.legal_moves();
        if !legal.contains(&mv) {
            return ApplyOutcome::Rejected;
        }
        self.apply_move_unchecked(mv);
        ApplyOutcome::Applied
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_in_check(self.side_to_move) && self.legal_moves().is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check(self.side_to_move) && self.legal_moves().is_empty()
    }

    pub fn is_draw_by_fifty_moves(&self) -> bool {
        self.halfmove_clock >= 100
    }

    pub fn is_draw_by_insufficient_material(&self) -> bool {
        let mut minor_or_more = Vec::new();
        for row in 0..8u8 {
            for col in 0..8u8 {
                if let Some(p) = self.piece_at(Square::new(row, col)) {
                    if p.kind != PieceKind::King {
                        minor_or_more.push((p, Square::new(row, col)));
                    }
                }
            }
        }
        match minor_or_more.as_slice() {
            [] => true,
            [(p, _)] => matches!(p.kind, PieceKind::Bishop | PieceKind::Knight),
            [(p1, sq1), (p2, sq2)] => match (p1.kind, p2.kind) {
                (PieceKind::Bishop, PieceKind::Bishop) => {
                    p1.color != p2.color && square_color(*sq1) == square_color(*sq2)
                }
                (PieceKind::Knight, PieceKind::Knight) => p1.color != p2.color,
                _ => false,
            },
            _ => false,
        }
    }

    pub fn is_draw_by_threefold_repetition(&self) -> bool {
        let current = match self.position_history.last() {
            Some(k) => *k,
            None => return false,
        };
        self.position_history.iter().filter(|&&k| k == current).count() >= 3
    }

    /// Evaluates the termination ladder, in order.
    pub fn get_result(&self) -> GameResult {
        if self.is_checkmate() {
            return match self.side_to_move {
                Color::White => GameResult::BlackWins,
                Color::Black => GameResult::WhiteWins,
            };
        }
        if self.is_stalemate() {
            return GameResult::Draw;
        }
        if self.is_draw_by_fifty_moves() {
            return GameResult::Draw;
        }
        if self.is_draw_by_insufficient_material() {
            return GameResult::Draw;
        }
        if self.is_draw_by_threefold_repetition() {
            return GameResult::Draw;
        }
        GameResult::InProgress
    }

    #[cfg(test)]
    pub(crate) fn set_piece_for_test(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.row as usize][sq.col as usize] = piece;
        if let Some(p) = piece {
            if p.kind == PieceKind::King {
                self.king_square[p.color.index()] = sq;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn set_side_to_move_for_test(&mut self, color: Color) {
        self.side_to_move = color;
    }

    #[cfg(test)]
    pub(crate) fn set_halfmove_clock_for_test(&mut self, value: u32) {
        self.halfmove_clock = value;
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

fn square_color(sq: Square) -> bool {
    (sq.row + sq.col) % 2 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_has_one_king_per_side() {
        let board = Board::new();
        assert_eq!(board.piece_at(Square::new(7, 4)).unwrap().kind, PieceKind::King);
        assert_eq!(board.piece_at(Square::new(0, 4)).unwrap().kind, PieceKind::King);
    }

    #[test]
    fn apply_move_switches_side_to_move() {
        let mut board = Board::new();
        let mv = board.legal_moves()[0];
        assert_eq!(board.apply_move(mv), ApplyOutcome::Applied);
        assert_eq!(board.side_to_move(), Color::Black);
    }

    #[test]
    fn rejected_move_does_not_mutate_board() {
        let mut board = Board::new();
        let illegal = ChessMove::new(Square::new(6, 4), Square::new(3, 4));
        let before = board.position_key();
        assert_eq!(board.apply_move(illegal), ApplyOutcome::Rejected);
        assert_eq!(board.position_key(), before);
    }

    #[test]
    fn fifty_move_rule_reaches_a_draw() {
        let mut board = Board::empty();
        board.set_piece_for_test(Square::new(7, 4), Some(Piece::new(PieceKind::King, Color::White)));
        board.set_piece_for_test(Square::new(0, 4), Some(Piece::new(PieceKind::King, Color::Black)));
        board.set_side_to_move_for_test(Color::White);
        board.set_halfmove_clock_for_test(100);

        assert!(board.is_draw_by_fifty_moves());
        assert_eq!(board.get_result(), GameResult::Draw);
    }
}
