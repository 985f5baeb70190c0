use log::{debug, trace};
use lox_common::{Position, Span};

use super::chars::{is_alpha, is_alphanumeric, is_digit};
use super::cursor::Cursor;
use super::token::{Literal, Token, TokenKind};
use crate::error::{Result, ScanError};

/// Hand-written scanner for Lox.
///
/// Every character of the source ends up in exactly one token, whitespace and
/// comments included, so concatenating the lexemes reproduces the input. The
/// first lexical error aborts the scan.
pub struct Scanner<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
    /// Position of the first character of the lexeme being scanned.
    start: Position,
    tokens: Vec<Token<'src>>,
}

/// Largest buffer the scanner accepts. One below `u32::MAX`, so that the
/// byte offset, line and column counters all fit in `u32`.
pub const MAX_SOURCE_LEN: usize = u32::MAX as usize - 1;

/// Byte length of a buffer as a `u32`, or `SourceTooLarge`.
fn checked_len(len: usize) -> Result<u32> {
    match u32::try_from(len) {
        Ok(n) if len <= MAX_SOURCE_LEN => Ok(n),
        _ => Err(ScanError::SourceTooLarge { len }),
    }
}

/// Scan `source` into tokens, without an end-of-input marker.
pub fn scan(source: &str) -> Result<Vec<Token<'_>>> {
    Scanner::new(source).scan_tokens()
}

/// Scan `source` into tokens and append an `Eof` token.
pub fn scan_with_eof(source: &str) -> Result<Vec<Token<'_>>> {
    Scanner::new(source).scan_tokens_with_eof()
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            cursor: Cursor::new(source),
            start: Position::default(),
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire source.
    pub fn scan_tokens(mut self) -> Result<Vec<Token<'src>>> {
        self.run()?;
        Ok(self.tokens)
    }

    /// Tokenize the entire source, then append an `Eof` token positioned
    /// after the last byte, on the final line.
    pub fn scan_tokens_with_eof(mut self) -> Result<Vec<Token<'src>>> {
        let len = self.run()?;
        let end = self.cursor.position();
        self.tokens.push(Token::eof(len, end.line, end.column));
        Ok(self.tokens)
    }

    /// Scan every token and return the buffer length.
    fn run(&mut self) -> Result<u32> {
        let len = checked_len(self.source.len())?;
        debug!("scanning {} bytes", len);
        loop {
            self.start = self.cursor.position();
            let Some(ch) = self.cursor.advance() else {
                break;
            };
            let token = self.scan_token(ch)?;
            trace!("{}:{} {}", self.start.line, self.start.column, token);
            self.tokens.push(token);
        }
        debug!(
            "scanned {} tokens over {} lines",
            self.tokens.len(),
            self.cursor.position().line
        );
        Ok(len)
    }

    /// Scan one token whose first character `ch` has just been consumed.
    fn scan_token(&mut self, ch: char) -> Result<Token<'src>> {
        let kind = match ch {
            // === Operators (one or two characters) ===
            '!' => self.either('=', TokenKind::BangEqual, TokenKind::Bang),
            '=' => self.either('=', TokenKind::EqualEqual, TokenKind::Equal),
            '<' => self.either('=', TokenKind::LessEqual, TokenKind::Less),
            '>' => self.either('=', TokenKind::GreaterEqual, TokenKind::Greater),

            // === Comments (must check before the punctuation table) ===
            '/' if self.cursor.peek() == Some('/') => return Ok(self.scan_comment()),

            // === Literals ===
            '"' => return self.scan_string(),
            c if is_digit(c) => return self.scan_number(),
            c if is_alpha(c) => return Ok(self.scan_identifier()),

            // === Punctuation and whitespace ===
            c => TokenKind::punctuation(c).ok_or_else(|| ScanError::UnexpectedCharacter {
                character: c,
                span: self.span(),
            })?,
        };
        Ok(self.make_token(kind))
    }

    /// Emit `double` if the next character is `second` (consuming it),
    /// else `single`.
    fn either(&mut self, second: char, double: TokenKind, single: TokenKind) -> TokenKind {
        if self.cursor.eat(second) {
            double
        } else {
            single
        }
    }

    // ---------------------------------------------------------------
    // Sub-scans
    // ---------------------------------------------------------------

    /// Line comment. Called with the first `/` consumed and the second one
    /// next. The terminating newline is left for the main loop.
    fn scan_comment(&mut self) -> Token<'src> {
        self.cursor.advance();
        self.cursor.eat_while(|c| c != '\n');
        let body = &self.lexeme()[2..];
        self.make_token_with_literal(TokenKind::Comment, Literal::Text(body))
    }

    /// String literal, opening `"` consumed. No escape sequences; newlines
    /// are part of the string.
    fn scan_string(&mut self) -> Result<Token<'src>> {
        self.cursor.eat_while(|c| c != '"');
        if !self.cursor.eat('"') {
            return Err(ScanError::UnterminatedString { span: self.span() });
        }
        let lexeme = self.lexeme();
        let value = &lexeme[1..lexeme.len() - 1];
        Ok(self.make_token_with_literal(TokenKind::String, Literal::Text(value)))
    }

    /// Number literal, first digit consumed. A `.` only belongs to the number
    /// when a digit follows it, so `1.foo` and `1.` leave the dot alone.
    fn scan_number(&mut self) -> Result<Token<'src>> {
        self.cursor.eat_while(is_digit);

        if self.cursor.peek() == Some('.') && self.cursor.peek_next().is_some_and(is_digit) {
            self.cursor.advance(); // consume '.'
            self.cursor.eat_while(is_digit);
        }

        let lexeme = self.lexeme();
        let value: f64 = lexeme.parse().map_err(|_| ScanError::InvalidNumber {
            lexeme: lexeme.to_string(),
            span: self.span(),
        })?;
        Ok(self.make_token_with_literal(TokenKind::Number, Literal::Number(value)))
    }

    /// Identifier or keyword. The whole run is consumed before the keyword
    /// lookup, so `classify` is one identifier.
    fn scan_identifier(&mut self) -> Token<'src> {
        self.cursor.eat_while(is_alphanumeric);
        let kind = TokenKind::keyword(self.lexeme()).unwrap_or(TokenKind::Identifier);
        self.make_token(kind)
    }

    // ---------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------

    /// Source text from the start of the current lexeme to the cursor.
    fn lexeme(&self) -> &'src str {
        self.cursor.slice_from(self.start.offset)
    }

    fn span(&self) -> Span {
        Span::new(self.start, self.cursor.position())
    }

    fn make_token(&self, kind: TokenKind) -> Token<'src> {
        let lexeme = self.lexeme();
        self.make_token_with_literal(kind, Literal::Lexeme(lexeme))
    }

    fn make_token_with_literal(&self, kind: TokenKind, literal: Literal<'src>) -> Token<'src> {
        Token {
            kind,
            lexeme: self.lexeme(),
            literal,
            line: self.cursor.position().line,
            column: self.start.column,
            offset: self.start.offset,
        }
    }
}
