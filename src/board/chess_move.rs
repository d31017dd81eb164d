use super::piece::PieceKind;
use super::square::Square;
use serde::{Deserialize, Serialize};

/// Tags the kind of special handling `apply_move` must perform beyond a plain
/// relocation. Mirrors the move descriptor's special-move tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Special {
    None,
    DoublePawnPush,
    EnPassant,
    KingsideCastle,
    QueensideCastle,
    Promotion(PieceKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChessMove {
    pub from: Square,
    pub to: Square,
    pub special: Special,
}

impl ChessMove {
    pub fn new(from: Square, to: Square) -> Self {
        ChessMove {
            from,
            to,
            special: Special::None,
        }
    }

    pub fn with_special(from: Square, to: Square, special: Special) -> Self {
        ChessMove { from, to, special }
    }

    pub fn is_promotion(self) -> bool {
        matches!(self.special, Special::Promotion(_))
    }
}

/// The array-form move descriptor: `[from_row, from_col, to_row, to_col]`
/// plus an optional tag string and an optional promotion letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveDescriptor {
    pub from_row: u8,
    pub from_col: u8,
    pub to_row: u8,
    pub to_col: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion: Option<char>,
}

impl From<ChessMove> for MoveDescriptor {
    fn from(mv: ChessMove) -> Self {
        let (tag, promotion) = match mv.special {
            Special::None | Special::DoublePawnPush => (None, None),
            Special::EnPassant => (Some("en_passant".to_string()), None),
            Special::KingsideCastle => (Some("kingside_castle".to_string()), None),
            Special::QueensideCastle => (Some("queenside_castle".to_string()), None),
            Special::Promotion(kind) => (Some("promotion".to_string()), Some(kind.letter())),
        };
        MoveDescriptor {
            from_row: mv.from.row,
            from_col: mv.from.col,
            to_row: mv.to.row,
            to_col: mv.to.col,
            tag,
            promotion,
        }
    }
}
