pub mod chars;
pub mod cursor;
pub mod token;

mod scanner;

pub use scanner::{scan, scan_with_eof, Scanner, MAX_SOURCE_LEN};
pub use token::{Literal, Token, TokenKind};
