use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Diagnostic, LoxError};
use crate::lexer::scan;
use crate::token::Token;

pub const EX_USAGE: u8 = 64;
pub const EX_DATAERR: u8 = 65;
pub const EX_IOERR: u8 = 74;

const PROMPT: &[u8] = b"> ";

/// Receives the token sequence of each scanned unit. A parser plugs in here.
pub trait TokenConsumer {
    fn consume(&mut self, tokens: &[Token]) -> io::Result<()>;
}

/// Writes each token on its own line.
pub struct TokenPrinter<W> {
    out: W,
}

impl<W: Write> TokenPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TokenConsumer for TokenPrinter<W> {
    fn consume(&mut self, tokens: &[Token]) -> io::Result<()> {
        for token in tokens {
            writeln!(self.out, "{}", token)?;
        }
        self.out.flush()
    }
}

pub struct Discard;

impl TokenConsumer for Discard {
    fn consume(&mut self, _tokens: &[Token]) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    DataError,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::DataError => EX_DATAERR,
        }
    }
}

/// One driver session. `out` gets the prompt, `err` gets diagnostics.
pub struct Lox<O, E> {
    out: O,
    err: E,
    had_error: bool,
}

impl<O: Write, E: Write> Lox<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            had_error: false,
        }
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn reset_error(&mut self) {
        self.had_error = false;
    }

    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }

    pub fn run_file(
        &mut self,
        path: &Path,
        consumer: &mut dyn TokenConsumer,
    ) -> Result<Outcome, LoxError> {
        info!(path = %path.display(), "running script");
        let bytes = fs::read(path).map_err(|source| LoxError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        // Bad bytes become U+FFFD and are reported as unexpected characters.
        self.run(&String::from_utf8_lossy(&bytes), consumer)?;

        if self.had_error {
            Ok(Outcome::DataError)
        } else {
            Ok(Outcome::Success)
        }
    }

    pub fn run_prompt(
        &mut self,
        mut input: impl BufRead,
        consumer: &mut dyn TokenConsumer,
    ) -> Result<(), LoxError> {
        loop {
            self.out.write_all(PROMPT)?;
            self.out.flush()?;

            let mut buf = Vec::new();
            if input.read_until(b'\n', &mut buf)? == 0 {
                debug!("end of input, leaving prompt");
                return Ok(());
            }

            let line = String::from_utf8_lossy(&buf);
            let line = line.strip_suffix('\n').unwrap_or(&line);
            let line = line.strip_suffix('\r').unwrap_or(line);
            self.run(line, consumer)?;
            self.reset_error();
        }
    }

    /// Scans one unit, reports its diagnostics and hands the tokens on.
    pub fn run(
        &mut self,
        source: &str,
        consumer: &mut dyn TokenConsumer,
    ) -> Result<Vec<Token>, LoxError> {
        let result = scan(source);
        debug!(
            tokens = result.tokens.len(),
            errors = result.diagnostics.len(),
            "scanned unit"
        );

        for diagnostic in &result.diagnostics {
            self.report(diagnostic)?;
        }

        consumer.consume(&result.tokens)?;
        Ok(result.tokens)
    }

    pub fn error(&mut self, line: u32, message: &str) -> io::Result<()> {
        self.report(&Diagnostic::new(line, message))
    }

    pub fn error_at(&mut self, token: &Token, message: &str) -> io::Result<()> {
        self.report(&Diagnostic::at_token(token, message))
    }

    pub fn report(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        self.had_error = true;
        writeln!(self.err, "{}", diagnostic)?;
        self.err.flush()
    }
}
