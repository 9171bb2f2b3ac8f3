pub mod driver;
pub mod error;
pub mod lexer;
pub mod token;

pub use driver::{Discard, Lox, Outcome, TokenConsumer, TokenPrinter};
pub use error::{Diagnostic, LoxError, ScanError};
pub use lexer::{scan, ScanResult, Scanner};
pub use token::{Literal, Token, TokenType};
