#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Strict line-oriented parsing for Jewel Sweep board descriptions and action
//! scripts.
//!
//! Both formats are whitespace-tokenized and purely positional. The
//! [`GridParser`] cursor walks the text one token at a time and fails fast
//! with a [`ParseError`] naming the label, line and column of the offending
//! token. There is no error recovery: a caller receiving an error must abandon
//! the parse.

mod board;
mod script;

pub use board::BoardDescription;
pub use script::ActionScript;

/// Reasons a parse may fail.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// A token was required but every line has been consumed.
    #[error("a word expected, but EOF")]
    UnexpectedEndOfInput,
    /// A token was required but the current line has no more tokens.
    #[error("a word expected, but newline")]
    UnexpectedEndOfLine,
    /// The token is not an optionally signed run of decimal digits, or does
    /// not fit in a 64-bit integer.
    #[error("a number expected, but word {token:?}")]
    InvalidInteger {
        /// Offending token.
        token: String,
    },
    /// The record should have ended with a newline but the input ended first.
    #[error("newline expected, but EOF")]
    NewlineExpectedAtEndOfInput,
    /// The record should have ended but another token follows on the line.
    #[error("newline expected, but word {token:?}")]
    ExpectedNewline {
        /// First unconsumed token on the line.
        token: String,
    },
    /// A declared record count is negative.
    #[error("a non-negative count expected, but {value}")]
    NegativeCount {
        /// Declared count.
        value: i64,
    },
    /// A command token is not one of `U`, `D`, `L` or `R`.
    #[error("a command (U, D, L or R) expected, but word {token:?}")]
    InvalidCommand {
        /// Offending token.
        token: String,
    },
    /// The format is complete but further tokens follow.
    #[error("EOF expected, but word {token:?}")]
    TrailingInput {
        /// First unconsumed token.
        token: String,
    },
}

/// Terminal parse failure carrying the source label and 1-based location.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{label}: line {line}: {kind}")]
pub struct ParseError {
    label: String,
    line: usize,
    column: usize,
    kind: ParseErrorKind,
}

impl ParseError {
    /// Label of the text that failed to parse, usually a file name.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// 1-based line number of the failure.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// 1-based token index within the line.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Specific reason for the failure.
    #[must_use]
    pub const fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }
}

/// Cursor over whitespace-separated tokens grouped by line.
#[derive(Clone, Debug)]
pub struct GridParser<'text> {
    label: String,
    lines: Vec<Vec<&'text str>>,
    line: usize,
    column: usize,
}

impl<'text> GridParser<'text> {
    /// Splits `text` into lines of tokens.
    ///
    /// Trailing blank lines are dropped so that a final newline never
    /// introduces an empty record.
    #[must_use]
    pub fn new(label: impl Into<String>, text: &'text str) -> Self {
        let mut lines: Vec<Vec<&str>> = text
            .lines()
            .map(|line| line.split_whitespace().collect())
            .collect();
        while lines.last().is_some_and(Vec::is_empty) {
            let _ = lines.pop();
        }

        Self {
            label: label.into(),
            lines,
            line: 0,
            column: 0,
        }
    }

    /// Label used when reporting errors.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// 1-based number of the line under the cursor.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        self.line + 1
    }

    /// Reports whether every line has been consumed.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.line >= self.lines.len()
    }

    /// Consumes and returns the next token on the current line.
    pub fn next_token(&mut self) -> Result<&'text str, ParseError> {
        let Some(tokens) = self.lines.get(self.line) else {
            return Err(self.error(ParseErrorKind::UnexpectedEndOfInput));
        };
        let Some(token) = tokens.get(self.column).copied() else {
            return Err(self.error(ParseErrorKind::UnexpectedEndOfLine));
        };
        self.column += 1;
        Ok(token)
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<&'text str, ParseError> {
        let token = self.next_token()?;
        self.step_back();
        Ok(token)
    }

    /// Consumes a token and parses it as a signed decimal integer.
    ///
    /// On failure the cursor is left on the offending token.
    pub fn next_integer(&mut self) -> Result<i64, ParseError> {
        let token = self.next_token()?;
        let parsed = if is_integer_literal(token) {
            token.parse::<i64>().ok()
        } else {
            None
        };
        match parsed {
            Some(value) => Ok(value),
            None => {
                self.step_back();
                Err(self.error(ParseErrorKind::InvalidInteger {
                    token: token.to_owned(),
                }))
            }
        }
    }

    /// Consumes a record count, rejecting negative values.
    pub fn next_count(&mut self) -> Result<usize, ParseError> {
        let value = self.next_integer()?;
        match usize::try_from(value) {
            Ok(count) => Ok(count),
            Err(_) => {
                self.step_back();
                Err(self.error(ParseErrorKind::NegativeCount { value }))
            }
        }
    }

    /// Requires the current line to be fully consumed and moves to the next.
    pub fn expect_end_of_line(&mut self) -> Result<(), ParseError> {
        let Some(tokens) = self.lines.get(self.line) else {
            return Err(self.error(ParseErrorKind::NewlineExpectedAtEndOfInput));
        };
        if let Some(token) = tokens.get(self.column) {
            return Err(self.error(ParseErrorKind::ExpectedNewline {
                token: (*token).to_owned(),
            }));
        }
        self.line += 1;
        self.column = 0;
        Ok(())
    }

    /// Requires every line to be consumed.
    ///
    /// A cursor resting after the last token of a line counts as having
    /// finished that line.
    pub fn expect_end_of_input(&mut self) -> Result<(), ParseError> {
        let line_exhausted = self
            .lines
            .get(self.line)
            .is_some_and(|tokens| self.column > 0 && self.column >= tokens.len());
        if line_exhausted {
            self.line += 1;
            self.column = 0;
        }
        self.skip_blank_lines();
        if self.at_end() {
            return Ok(());
        }
        let token = self.peek_token()?;
        Err(self.error(ParseErrorKind::TrailingInput {
            token: token.to_owned(),
        }))
    }

    /// Advances past lines that hold no tokens, if the cursor is at a line start.
    pub fn skip_blank_lines(&mut self) {
        while self.column == 0 && self.lines.get(self.line).is_some_and(Vec::is_empty) {
            self.line += 1;
        }
    }

    /// Moves the cursor one token backward.
    ///
    /// At the start of a line the cursor moves to the last token of the
    /// previous line. At the very start of the input this is a no-op.
    pub fn step_back(&mut self) {
        if self.column > 0 {
            self.column -= 1;
            return;
        }
        if self.line == 0 {
            return;
        }
        self.line -= 1;
        self.column = self
            .lines
            .get(self.line)
            .map_or(0, |tokens| tokens.len().saturating_sub(1));
    }

    /// Builds an error located at the cursor.
    #[must_use]
    pub fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            label: self.label.clone(),
            line: self.line + 1,
            column: self.column + 1,
            kind,
        }
    }
}

fn is_integer_literal(token: &str) -> bool {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit())
}
