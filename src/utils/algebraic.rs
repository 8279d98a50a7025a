//! Square text conversions for long algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and mailbox
//! square indices.

use crate::board::board_types::{
    file_rank_to_square, Square, FILES_BOARD, FILE_NONE, RANKS_BOARD,
};

/// Render a playable mailbox square as a two-character coordinate.
pub fn square_to_algebraic(sq: Square) -> Result<String, String> {
    if sq >= FILES_BOARD.len() || FILES_BOARD[sq] == FILE_NONE {
        return Err(format!("Square index {sq} is not a playable square"));
    }
    let file_char = char::from(b'a' + FILES_BOARD[sq] as u8);
    let rank_char = char::from(b'1' + RANKS_BOARD[sq] as u8);
    Ok(format!("{file_char}{rank_char}"))
}

/// Parse a two-character coordinate into a mailbox square.
pub fn algebraic_to_square(text: &str) -> Result<Square, String> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return Err(format!("Invalid square coordinate: {text}"));
    }

    let file = bytes[0].wrapping_sub(b'a') as usize;
    let rank = bytes[1].wrapping_sub(b'1') as usize;
    if file > 7 || rank > 7 {
        return Err(format!("Invalid square coordinate: {text}"));
    }

    Ok(file_rank_to_square(file, rank))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board_types::{A1, E1, H8};

    #[test]
    fn coordinates_round_trip() {
        for (sq, text) in [(A1, "a1"), (E1, "e1"), (H8, "h8")] {
            assert_eq!(square_to_algebraic(sq).expect("square should render"), text);
            assert_eq!(algebraic_to_square(text).expect("text should parse"), sq);
        }
    }

    #[test]
    fn rejects_border_squares_and_garbage() {
        assert!(square_to_algebraic(0).is_err());
        assert!(square_to_algebraic(99).is_err());
        assert!(algebraic_to_square("i9").is_err());
        assert!(algebraic_to_square("e").is_err());
        assert!(algebraic_to_square("e44").is_err());
    }
}
