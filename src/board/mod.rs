pub mod board;
pub mod castling_rights;
pub mod chess_move;
pub mod color;
pub mod dto;
pub mod movegen;
pub mod piece;
pub mod position_key;
pub mod square;

pub use board::{ApplyOutcome, Board, GameResult};
pub use castling_rights::CastlingRights;
pub use chess_move::{ChessMove, MoveDescriptor, Special};
pub use color::Color;
pub use dto::{CastlingRightsDict, PieceDict, PositionDict};
pub use piece::{Piece, PieceKind, PROMOTABLE_KINDS};
pub use position_key::PositionKey;
pub use square::Square;
