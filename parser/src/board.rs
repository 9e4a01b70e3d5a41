//! Static board description: dimensions and jewel coordinates.

use std::fmt;

use jewel_sweep_core::Position;

use crate::{GridParser, ParseError};

/// Board as written in the input file.
///
/// Values are kept exactly as parsed. Bounds, positivity and uniqueness are
/// checked by the replay engine, not here.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoardDescription {
    height: i64,
    width: i64,
    jewels: Vec<Position>,
}

impl BoardDescription {
    /// Label used by [`BoardDescription::from_text`] callers that have no file name.
    pub const DEFAULT_LABEL: &'static str = "<board>";

    /// Creates a description from raw values.
    #[must_use]
    pub fn new(height: i64, width: i64, jewels: Vec<Position>) -> Self {
        Self {
            height,
            width,
            jewels,
        }
    }

    /// Parses a complete board text, requiring every token to be consumed.
    pub fn from_text(label: &str, text: &str) -> Result<Self, ParseError> {
        let mut parser = GridParser::new(label, text);
        let board = Self::parse(&mut parser)?;
        parser.expect_end_of_input()?;
        Ok(board)
    }

    /// Reads `H W N` followed by `N` lines of `y x`.
    pub fn parse(parser: &mut GridParser<'_>) -> Result<Self, ParseError> {
        let height = parser.next_integer()?;
        let width = parser.next_integer()?;
        let count = parser.next_count()?;
        parser.expect_end_of_line()?;

        let mut jewels = Vec::new();
        for _ in 0..count {
            let row = parser.next_integer()?;
            let column = parser.next_integer()?;
            parser.expect_end_of_line()?;
            jewels.push(Position::new(row, column));
        }

        Ok(Self {
            height,
            width,
            jewels,
        })
    }

    /// Declared number of rows.
    #[must_use]
    pub const fn height(&self) -> i64 {
        self.height
    }

    /// Declared number of columns.
    #[must_use]
    pub const fn width(&self) -> i64 {
        self.width
    }

    /// Jewel coordinates in file order.
    #[must_use]
    pub fn jewels(&self) -> &[Position] {
        &self.jewels
    }
}

impl fmt::Display for BoardDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {} {}", self.height, self.width, self.jewels.len())?;
        for jewel in &self.jewels {
            writeln!(f, "{} {}", jewel.row(), jewel.column())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParseErrorKind;

    #[test]
    fn parses_dimensions_and_jewels() {
        let board = BoardDescription::from_text("<board>", "3 4 2\n0 1\n2 3\n").unwrap();
        assert_eq!(board.height(), 3);
        assert_eq!(board.width(), 4);
        assert_eq!(
            board.jewels(),
            &[Position::new(0, 1), Position::new(2, 3)]
        );
    }

    #[test]
    fn missing_jewel_lines_fail_at_end_of_input() {
        let error = BoardDescription::from_text("<board>", "2 2 1\n").unwrap_err();
        assert_eq!(error.kind(), &ParseErrorKind::UnexpectedEndOfInput);
        assert_eq!(error.line(), 2);
        assert_eq!(error.label(), "<board>");
    }

    #[test]
    fn jewel_line_with_extra_token_fails() {
        let error = BoardDescription::from_text("<board>", "2 2 1\n0 1 5\n").unwrap_err();
        assert_eq!(
            error.kind(),
            &ParseErrorKind::ExpectedNewline {
                token: "5".to_owned()
            }
        );
        assert_eq!(error.line(), 2);
        assert_eq!(error.column(), 3);
    }

    #[test]
    fn header_split_across_lines_fails() {
        let error = BoardDescription::from_text("<board>", "2 2\n1\n0 1\n").unwrap_err();
        assert_eq!(error.kind(), &ParseErrorKind::UnexpectedEndOfLine);
        assert_eq!(error.line(), 1);
    }

    #[test]
    fn surplus_jewel_lines_are_rejected() {
        let error = BoardDescription::from_text("<board>", "2 2 1\n0 1\n1 1\n").unwrap_err();
        assert_eq!(
            error.kind(),
            &ParseErrorKind::TrailingInput {
                token: "1".to_owned()
            }
        );
        assert_eq!(error.line(), 3);
    }

    #[test]
    fn negative_jewel_count_is_rejected() {
        let error = BoardDescription::from_text("<board>", "2 2 -1\n").unwrap_err();
        assert_eq!(error.kind(), &ParseErrorKind::NegativeCount { value: -1 });
    }

    #[test]
    fn out_of_range_coordinates_are_left_to_the_caller() {
        let board = BoardDescription::from_text("<board>", "2 2 1\n5 -1\n").unwrap();
        assert_eq!(board.jewels(), &[Position::new(5, -1)]);
    }

    #[test]
    fn display_writes_canonical_text() {
        let board = BoardDescription::new(2, 3, vec![Position::new(1, 2)]);
        assert_eq!(board.to_string(), "2 3 1\n1 2\n");
    }
}
