use lox_common::{Diagnostic, Position, Span};
use thiserror::Error;

/// Lexical errors. Each one aborts the scan that produced it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    /// The opening quote at `span.start` has no closing quote; the span runs
    /// to the end of the buffer.
    #[error("unterminated string starting at {}", .span.start)]
    UnterminatedString { span: Span },

    #[error("unexpected character {character:?} at {}", .span.start)]
    UnexpectedCharacter { character: char, span: Span },

    #[error("invalid number literal '{lexeme}' at {}", .span.start)]
    InvalidNumber { lexeme: String, span: Span },

    /// Offsets, lines and columns are `u32`, so the buffer must stay under
    /// 4 GiB. Raised before any character is read.
    #[error("source of {len} bytes is too large to scan (limit is 4 GiB)")]
    SourceTooLarge { len: usize },
}

impl ScanError {
    /// The offending text. `SourceTooLarge` points at the start of the
    /// buffer with an empty span.
    pub fn span(&self) -> Span {
        match self {
            ScanError::UnterminatedString { span }
            | ScanError::UnexpectedCharacter { span, .. }
            | ScanError::InvalidNumber { span, .. } => *span,
            ScanError::SourceTooLarge { .. } => {
                Span::new(Position::default(), Position::default())
            }
        }
    }

    /// Where the offending lexeme starts.
    pub fn position(&self) -> Position {
        self.span().start
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        if let ScanError::SourceTooLarge { .. } = self {
            return diag;
        }
        let diag = diag.with_span(self.span());
        match self {
            ScanError::UnterminatedString { .. } => {
                diag.with_suggestion("add a closing '\"' to end the string")
            }
            ScanError::UnexpectedCharacter { character: '&', .. } => {
                diag.with_suggestion("use 'and' for logical conjunction")
            }
            ScanError::UnexpectedCharacter { character: '|', .. } => {
                diag.with_suggestion("use 'or' for logical disjunction")
            }
            ScanError::UnexpectedCharacter { character: '\'', .. } => {
                diag.with_suggestion("strings are delimited with double quotes")
            }
            _ => diag,
        }
    }
}

impl From<&ScanError> for Diagnostic {
    fn from(error: &ScanError) -> Self {
        error.to_diagnostic()
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
