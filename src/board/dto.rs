//! The position dictionary: the stable shape the outer system
//! serializes a board into, independent of any wire format.
use super::board::Board;
use super::castling_rights::CastlingRights;
use super::color::Color;
use super::piece::{Piece, PieceKind};
use super::position_key::compute_position_key;
use super::square::Square;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceDict {
    #[serde(rename = "type")]
    pub kind: char,
    pub color: String,
    pub has_moved: bool,
}

impl From<Piece> for PieceDict {
    fn from(p: Piece) -> Self {
        PieceDict {
            kind: p.kind.letter(),
            color: match p.color {
                Color::White => "white".to_string(),
                Color::Black => "black".to_string(),
            },
            has_moved: p.has_moved,
        }
    }
}

impl PieceDict {
    fn into_piece(self) -> Option<Piece> {
        let kind = PieceKind::from_letter(self.kind)?;
        let color = match self.color.as_str() {
            "white" => Color::White,
            "black" => Color::Black,
            _ => return None,
        };
        Some(Piece {
            kind,
            color,
            has_moved: self.has_moved,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastlingRightsDict {
    pub kingside: bool,
    pub queenside: bool,
}

impl From<CastlingRights> for CastlingRightsDict {
    fn from(r: CastlingRights) -> Self {
        CastlingRightsDict {
            kingside: r.kingside,
            queenside: r.queenside,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionDict {
    pub squares: Vec<Vec<Option<PieceDict>>>,
    pub side_to_move: String,
    pub white_castling_rights: CastlingRightsDict,
    pub black_castling_rights: CastlingRightsDict,
    pub en_passant_target: Option<(u8, u8)>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Board {
    pub fn to_position_dict(&self) -> PositionDict {
        let mut squares = Vec::with_capacity(8);
        for row in 0..8u8 {
            let mut rank = Vec::with_capacity(8);
            for col in 0..8u8 {
                rank.push(self.piece_at(Square::new(row, col)).map(PieceDict::from));
            }
            squares.push(rank);
        }
        PositionDict {
            squares,
            side_to_move: match self.side_to_move() {
                Color::White => "white".to_string(),
                Color::Black => "black".to_string(),
            },
            white_castling_rights: self.castling_rights(Color::White).into(),
            black_castling_rights: self.castling_rights(Color::Black).into(),
            en_passant_target: self.en_passant_target().map(|s| (s.row, s.col)),
            halfmove_clock: self.halfmove_clock(),
            fullmove_number: self.fullmove_number(),
        }
    }

    /// Rebuilds a board from a position dictionary. The resulting board's
    /// history logs start fresh (a dictionary is a snapshot, not a game log);
    /// `position_history` gets exactly one entry, for the rebuilt position.
    pub fn from_position_dict(dict: &PositionDict) -> Board {
        let mut board = Board::empty();
        for (row, rank) in dict.squares.iter().enumerate() {
            for (col, cell) in rank.iter().enumerate() {
                if let Some(piece_dict) = cell.clone() {
                    let sq = Square::new(row as u8, col as u8);
                    board.set_piece_from_dict(sq, piece_dict.into_piece());
                }
            }
        }
        board.set_side_to_move_from_dict(if dict.side_to_move == "black" {
            Color::Black
        } else {
            Color::White
        });
        board.set_castling_rights_from_dict(
            Color::White,
            CastlingRights {
                kingside: dict.white_castling_rights.kingside,
                queenside: dict.white_castling_rights.queenside,
            },
        );
        board.set_castling_rights_from_dict(
            Color::Black,
            CastlingRights {
                kingside: dict.black_castling_rights.kingside,
                queenside: dict.black_castling_rights.queenside,
            },
        );
        board.set_en_passant_from_dict(dict.en_passant_target.map(|(r, c)| Square::new(r, c)));
        board.set_clocks_from_dict(dict.halfmove_clock, dict.fullmove_number);
        let key = compute_position_key(&board);
        board.seed_position_history(key);
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::piece::PieceKind;

    #[test]
    fn round_trip_preserves_piece_placement_and_scalars() {
        let board = Board::new();
        let dict = board.to_position_dict();
        let rebuilt = Board::from_position_dict(&dict);

        for row in 0..8u8 {
            for col in 0..8u8 {
                let sq = Square::new(row, col);
                assert_eq!(board.piece_at(sq), rebuilt.piece_at(sq));
            }
        }
        assert_eq!(board.side_to_move(), rebuilt.side_to_move());
        assert_eq!(
            board.castling_rights(Color::White),
            rebuilt.castling_rights(Color::White)
        );
        assert_eq!(rebuilt.king_square(Color::White), Square::new(7, 4));
        assert_eq!(
            rebuilt.piece_at(Square::new(7, 4)).unwrap().kind,
            PieceKind::King
        );
    }
}
