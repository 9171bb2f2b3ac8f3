use tracing::trace;

use crate::error::{Diagnostic, ScanError};
use crate::token::{keyword, Literal, Token, TokenType};

/// Everything one scan produced: the tokens, terminated by a single `Eof`,
/// and every diagnostic reported along the way.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanResult {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ScanResult {
    pub fn had_error(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

pub fn scan(source: &str) -> ScanResult {
    Scanner::new(source).scan_tokens()
}

pub struct Scanner<'a> {
    source: &'a str,
    start: usize,
    current: usize,
    line: u32,
    start_line: u32,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            start: 0,
            current: 0,
            line: 1,
            start_line: 1,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn scan_tokens(mut self) -> ScanResult {
        while !self.is_end() {
            self.start = self.current;
            self.start_line = self.line;
            self.scan_token();
        }

        self.tokens.push(Token::eof(self.line));

        ScanResult {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    fn scan_token(&mut self) {
        match self.next_char() {
            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            '{' => self.add_token(TokenType::LeftBrace),
            '}' => self.add_token(TokenType::RightBrace),
            ';' => self.add_token(TokenType::Semicolon),
            ',' => self.add_token(TokenType::Comma),
            '.' => self.add_token(TokenType::Dot),
            '-' => self.add_token(TokenType::Minus),
            '+' => self.add_token(TokenType::Plus),
            '*' => self.add_token(TokenType::Star),
            '!' => {
                if self.match_next('=') {
                    self.add_token(TokenType::BangEqual)
                } else {
                    self.add_token(TokenType::Bang)
                }
            }
            '=' => {
                if self.match_next('=') {
                    self.add_token(TokenType::EqualEqual)
                } else {
                    self.add_token(TokenType::Equal)
                }
            }
            '<' => {
                if self.match_next('=') {
                    self.add_token(TokenType::LessEqual)
                } else {
                    self.add_token(TokenType::Less)
                }
            }
            '>' => {
                if self.match_next('=') {
                    self.add_token(TokenType::GreaterEqual)
                } else {
                    self.add_token(TokenType::Greater)
                }
            }
            '/' => {
                if self.match_next('/') {
                    // The newline is left for the next iteration.
                    while self.peek_char() != '\n' && !self.is_end() {
                        let _ = self.next_char();
                    }
                } else {
                    self.add_token(TokenType::Slash)
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '"' => self.string(),
            '0'..='9' => self.number(),
            'a'..='z' | 'A'..='Z' | '_' => self.identifier(),
            c => self.error(ScanError::UnexpectedCharacter(c)),
        }
    }

    fn is_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn next_char(&mut self) -> char {
        let c = self.peek_char();
        self.current += c.len_utf8();
        c
    }

    fn peek_char(&self) -> char {
        self.source[self.current..].chars().next().unwrap_or('\0')
    }

    fn peek_next_char(&self) -> char {
        let mut chars = self.source[self.current..].chars();
        chars.next();
        chars.next().unwrap_or('\0')
    }

    fn match_next(&mut self, expected: char) -> bool {
        if self.is_end() || self.peek_char() != expected {
            return false;
        }
        self.current += expected.len_utf8();
        true
    }

    fn add_token(&mut self, token_type: TokenType) {
        self.add_literal_token(token_type, Literal::None);
    }

    fn add_literal_token(&mut self, token_type: TokenType, literal: Literal) {
        let token = Token::new(
            token_type,
            &self.source[self.start..self.current],
            literal,
            self.start_line,
        );
        trace!(line = token.line, "token {}", token);
        self.tokens.push(token);
    }

    fn error(&mut self, err: ScanError) {
        trace!(line = self.line, error = ?err, "scan error");
        self.diagnostics.push(Diagnostic::from((self.line, err)));
    }

    fn string(&mut self) {
        while self.peek_char() != '"' && !self.is_end() {
            if self.next_char() == '\n' {
                self.line += 1;
            }
        }

        if self.is_end() {
            self.error(ScanError::UnterminatedString);
            return;
        }

        // Consume the closing quote.
        let _ = self.next_char();
        let value = &self.source[self.start + 1..self.current - 1];
        self.add_literal_token(TokenType::String, Literal::String(value.to_string()));
    }

    fn number(&mut self) {
        while self.peek_char().is_ascii_digit() {
            let _ = self.next_char();
        }

        if self.peek_char() == '.' && self.peek_next_char().is_ascii_digit() {
            let _ = self.next_char();

            while self.peek_char().is_ascii_digit() {
                let _ = self.next_char();
            }
        }

        // Digits with at most one inner dot always parse.
        let value = self.source[self.start..self.current]
            .parse::<f64>()
            .unwrap_or_default();
        self.add_literal_token(TokenType::Number, Literal::Number(value));
    }

    fn identifier(&mut self) {
        while self.peek_char().is_ascii_alphanumeric() || self.peek_char() == '_' {
            let _ = self.next_char();
        }

        let text = &self.source[self.start..self.current];
        self.add_token(keyword(text).unwrap_or(TokenType::Identifier));
    }
}
