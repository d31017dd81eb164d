use serde::{Deserialize, Serialize};
use std::fmt;

/// A square on the 8x8 grid. Row 0 is Black's back rank; row 7 is White's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    pub const fn new(row: u8, col: u8) -> Self {
        Square { row, col }
    }

    /// Builds a square from signed coordinates, rejecting anything off the grid.
    pub fn try_new(row: i32, col: i32) -> Option<Square> {
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square::new(row as u8, col as u8))
        } else {
            None
        }
    }

    pub fn offset(self, dr: i32, dc: i32) -> Option<Square> {
        Square::try_new(self.row as i32 + dr, self.col as i32 + dc)
    }

    pub fn index(self) -> usize {
        self.row as usize * 8 + self.col as usize
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col) as char;
        let rank = 8 - self.row;
        write!(f, "{file}{rank}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_bounds_coordinates() {
        assert_eq!(Square::try_new(-1, 0), None);
        assert_eq!(Square::try_new(0, 8), None);
        assert_eq!(Square::try_new(7, 7), Some(Square::new(7, 7)));
    }

    #[test]
    fn display_matches_algebraic_notation() {
        assert_eq!(Square::new(7, 0).to_string(), "a1");
        assert_eq!(Square::new(0, 7).to_string(), "h8");
    }
}
