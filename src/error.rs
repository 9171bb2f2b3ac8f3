use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::token::{Token, TokenType};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    #[error("Unterminated string.")]
    UnterminatedString,
    #[error("Unexpected character.")]
    UnexpectedCharacter(char),
}

#[derive(Error, Debug)]
pub enum LoxError {
    #[error("Could not read {}: {source}", .path.display())]
    ReadFile { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// One reported problem, rendered as `[line N] Error<location>: <message>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u32,
    pub location: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: u32, message: impl Into<String>) -> Self {
        Self {
            line,
            location: String::new(),
            message: message.into(),
        }
    }

    pub fn at_token(token: &Token, message: impl Into<String>) -> Self {
        let location = if token.t == TokenType::Eof {
            String::from(" at end")
        } else {
            format!(" at '{}'", token.lexeme)
        };
        Self {
            line: token.line,
            location,
            message: message.into(),
        }
    }
}

impl From<(u32, ScanError)> for Diagnostic {
    fn from((line, err): (u32, ScanError)) -> Self {
        Self::new(line, err.to_string())
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[line {}] Error{}: {}",
            self.line, self.location, self.message
        )
    }
}
