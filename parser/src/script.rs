//! Action script: sensor pattern followed by one movement command per line.

use std::fmt;

use jewel_sweep_core::{CommandSequence, Direction, Offset, SensorPattern};

use crate::{GridParser, ParseError, ParseErrorKind};

/// Sensor pattern and command sequence recorded by a contestant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ActionScript {
    pattern: SensorPattern,
    commands: CommandSequence,
}

impl ActionScript {
    /// Label used by [`ActionScript::from_text`] callers that have no file name.
    pub const DEFAULT_LABEL: &'static str = "<script>";

    /// Creates a script from an already built pattern and command sequence.
    #[must_use]
    pub fn new(pattern: SensorPattern, commands: CommandSequence) -> Self {
        Self { pattern, commands }
    }

    /// Parses a complete script text.
    pub fn from_text(label: &str, text: &str) -> Result<Self, ParseError> {
        let mut parser = GridParser::new(label, text);
        let script = Self::parse(&mut parser)?;
        parser.expect_end_of_input()?;
        Ok(script)
    }

    /// Reads `P`, then `P` lines of `dy dx`, then commands until end of input.
    ///
    /// Blank lines between commands are skipped.
    pub fn parse(parser: &mut GridParser<'_>) -> Result<Self, ParseError> {
        let count = parser.next_count()?;
        parser.expect_end_of_line()?;

        let mut offsets = Vec::new();
        for _ in 0..count {
            let row = parser.next_integer()?;
            let column = parser.next_integer()?;
            parser.expect_end_of_line()?;
            offsets.push(Offset::new(row, column));
        }

        let mut directions = Vec::new();
        loop {
            parser.skip_blank_lines();
            if parser.at_end() {
                break;
            }
            let token = parser.next_token()?;
            let Some(direction) = Direction::from_symbol(token) else {
                parser.step_back();
                return Err(parser.error(ParseErrorKind::InvalidCommand {
                    token: token.to_owned(),
                }));
            };
            parser.expect_end_of_line()?;
            directions.push(direction);
        }

        Ok(Self {
            pattern: SensorPattern::new(offsets),
            commands: CommandSequence::new(directions),
        })
    }

    /// Relative offsets checked after each move.
    #[must_use]
    pub fn pattern(&self) -> &SensorPattern {
        &self.pattern
    }

    /// Movement commands in execution order.
    #[must_use]
    pub fn commands(&self) -> &CommandSequence {
        &self.commands
    }
}

impl fmt::Display for ActionScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.pattern.len())?;
        for offset in self.pattern.offsets() {
            writeln!(f, "{} {}", offset.row(), offset.column())?;
        }
        for direction in self.commands.directions() {
            writeln!(f, "{}", direction.symbol())?;
        }
        Ok(())
    }
}
