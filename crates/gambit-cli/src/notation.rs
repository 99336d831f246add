//! Coordinate text such as `E2` to grid squares.

use gambit_core::Square;

use crate::error::InputError;

/// Parse a two-character coordinate: a column letter `A`-`H` then a row digit `1`-`8`.
///
/// Case-insensitive and tolerant of surrounding whitespace. Row `8` is grid
/// row 0 and row `1` is grid row 7.
///
/// # Errors
///
/// [`InputError::Empty`] for a blank line and [`InputError::BadCoordinate`]
/// for anything else that is not a coordinate.
pub fn parse_square(text: &str) -> Result<Square, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty);
    }
    let bad = || InputError::BadCoordinate {
        text: trimmed.to_string(),
    };

    let mut chars = trimmed.chars();
    let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(bad());
    };
    let file = file.to_ascii_uppercase();
    if !('A'..='H').contains(&file) || !('1'..='8').contains(&rank) {
        return Err(bad());
    }

    let col = (file as u8 - b'A') as i8;
    let row = Square::SIDE - (rank as u8 - b'0') as i8;
    Ok(Square::new(row, col))
}
