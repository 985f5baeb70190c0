pub mod error;
pub mod lexer;

pub use error::ScanError;
pub use lexer::{scan, scan_with_eof, Literal, Scanner, Token, TokenKind, MAX_SOURCE_LEN};
