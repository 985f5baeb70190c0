use std::fmt;

use serde::Serialize;

/// A token produced by the scanner.
///
/// `lexeme` borrows the scanned buffer. `line` is the scanner's line counter
/// when the token was emitted; `column` and `offset` locate its first
/// character.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub lexeme: &'src str,
    pub literal: Literal<'src>,
    pub line: u32,
    pub column: u32,
    /// Byte offset of the first character.
    pub offset: u32,
}

impl<'src> Token<'src> {
    /// End-of-input marker placed after the last byte of a `source_len`-byte
    /// buffer.
    pub fn eof(source_len: u32, line: u32, column: u32) -> Self {
        Self {
            kind: TokenKind::Eof,
            lexeme: "",
            literal: Literal::Lexeme(""),
            line,
            column,
            offset: source_len,
        }
    }

    /// Byte offset one past the last character.
    pub fn end_offset(&self) -> u32 {
        self.offset + self.lexeme.len() as u32
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} {}", self.kind, self.lexeme, self.literal)
    }
}

/// The interpreted value carried by a token.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal<'src> {
    Number(f64),
    /// Body of a string (between the quotes) or a comment (after `//`).
    Text(&'src str),
    /// Any other token carries its raw lexeme.
    Lexeme(&'src str),
}

impl Literal<'_> {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Literal::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Literal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{:?}", n),
            Literal::Text(s) | Literal::Lexeme(s) => write!(f, "{:?}", s),
        }
    }
}

/// All token kinds in Lox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    // === Single-character punctuation ===
    LeftParen,  // (
    RightParen, // )
    LeftBrace,  // {
    RightBrace, // }
    Comma,      // ,
    Dot,        // .
    Minus,      // -
    Plus,       // +
    Semicolon,  // ;
    Slash,      // /
    Star,       // *

    // === One or two character operators ===
    Bang,         // !
    BangEqual,    // !=
    Equal,        // =
    EqualEqual,   // ==
    Greater,      // >
    GreaterEqual, // >=
    Less,         // <
    LessEqual,    // <=

    // === Literals ===
    Identifier,
    String,
    Number,

    // === Keywords ===
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    // === Layout ===
    Space,
    Tab,
    Newline,
    CarriageReturn,
    Comment,

    Eof,
}

impl TokenKind {
    /// Look up a reserved word. Case-sensitive.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        match text {
            "and" => Some(TokenKind::And),
            "class" => Some(TokenKind::Class),
            "else" => Some(TokenKind::Else),
            "false" => Some(TokenKind::False),
            "fun" => Some(TokenKind::Fun),
            "for" => Some(TokenKind::For),
            "if" => Some(TokenKind::If),
            "nil" => Some(TokenKind::Nil),
            "or" => Some(TokenKind::Or),
            "print" => Some(TokenKind::Print),
            "return" => Some(TokenKind::Return),
            "super" => Some(TokenKind::Super),
            "this" => Some(TokenKind::This),
            "true" => Some(TokenKind::True),
            "var" => Some(TokenKind::Var),
            "while" => Some(TokenKind::While),
            _ => None,
        }
    }

    /// Kind of a character that always forms a token on its own.
    ///
    /// `/` maps to `Slash` here; the scanner checks for a comment first.
    pub fn punctuation(c: char) -> Option<TokenKind> {
        match c {
            '(' => Some(TokenKind::LeftParen),
            ')' => Some(TokenKind::RightParen),
            '{' => Some(TokenKind::LeftBrace),
            '}' => Some(TokenKind::RightBrace),
            ',' => Some(TokenKind::Comma),
            '.' => Some(TokenKind::Dot),
            '-' => Some(TokenKind::Minus),
            '+' => Some(TokenKind::Plus),
            ';' => Some(TokenKind::Semicolon),
            '/' => Some(TokenKind::Slash),
            '*' => Some(TokenKind::Star),
            ' ' => Some(TokenKind::Space),
            '\t' => Some(TokenKind::Tab),
            '\n' => Some(TokenKind::Newline),
            '\r' => Some(TokenKind::CarriageReturn),
            _ => None,
        }
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::And
                | TokenKind::Class
                | TokenKind::Else
                | TokenKind::False
                | TokenKind::Fun
                | TokenKind::For
                | TokenKind::If
                | TokenKind::Nil
                | TokenKind::Or
                | TokenKind::Print
                | TokenKind::Return
                | TokenKind::Super
                | TokenKind::This
                | TokenKind::True
                | TokenKind::Var
                | TokenKind::While
        )
    }

    /// Whitespace and comments: tokens a parser filters out before grammar
    /// analysis.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Space
                | TokenKind::Tab
                | TokenKind::Newline
                | TokenKind::CarriageReturn
                | TokenKind::Comment
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            TokenKind::LeftParen => "LEFT_PAREN",
            TokenKind::RightParen => "RIGHT_PAREN",
            TokenKind::LeftBrace => "LEFT_BRACE",
            TokenKind::RightBrace => "RIGHT_BRACE",
            TokenKind::Comma => "COMMA",
            TokenKind::Dot => "DOT",
            TokenKind::Minus => "MINUS",
            TokenKind::Plus => "PLUS",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Slash => "SLASH",
            TokenKind::Star => "STAR",
            TokenKind::Bang => "BANG",
            TokenKind::BangEqual => "BANG_EQUAL",
            TokenKind::Equal => "EQUAL",
            TokenKind::EqualEqual => "EQUAL_EQUAL",
            TokenKind::Greater => "GREATER",
            TokenKind::GreaterEqual => "GREATER_EQUAL",
            TokenKind::Less => "LESS",
            TokenKind::LessEqual => "LESS_EQUAL",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::String => "STRING",
            TokenKind::Number => "NUMBER",
            TokenKind::And => "AND",
            TokenKind::Class => "CLASS",
            TokenKind::Else => "ELSE",
            TokenKind::False => "FALSE",
            TokenKind::Fun => "FUN",
            TokenKind::For => "FOR",
            TokenKind::If => "IF",
            TokenKind::Nil => "NIL",
            TokenKind::Or => "OR",
            TokenKind::Print => "PRINT",
            TokenKind::Return => "RETURN",
            TokenKind::Super => "SUPER",
            TokenKind::This => "THIS",
            TokenKind::True => "TRUE",
            TokenKind::Var => "VAR",
            TokenKind::While => "WHILE",
            TokenKind::Space => "SPACE",
            TokenKind::Tab => "TAB",
            TokenKind::Newline => "NEWLINE",
            TokenKind::CarriageReturn => "CARRIAGE_RETURN",
            TokenKind::Comment => "COMMENT",
            TokenKind::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYWORDS: [&str; 16] = [
        "and", "class", "else", "false", "fun", "for", "if", "nil", "or", "print", "return",
        "super", "this", "true", "var", "while",
    ];

    #[test]
    fn every_reserved_word_maps_to_a_keyword() {
        for word in KEYWORDS {
            let kind = TokenKind::keyword(word).unwrap();
            assert!(kind.is_keyword(), "{word}");
            assert_eq!(kind.name(), word.to_uppercase());
        }
    }

    #[test]
    fn keyword_lookup_is_case_sensitive() {
        assert_eq!(TokenKind::keyword("Class"), None);
        assert_eq!(TokenKind::keyword("NIL"), None);
        assert_eq!(TokenKind::keyword("classify"), None);
        assert_eq!(TokenKind::keyword(""), None);
    }

    #[test]
    fn punctuation_table() {
        assert_eq!(TokenKind::punctuation('('), Some(TokenKind::LeftParen));
        assert_eq!(TokenKind::punctuation('*'), Some(TokenKind::Star));
        assert_eq!(TokenKind::punctuation('\r'), Some(TokenKind::CarriageReturn));
        assert_eq!(TokenKind::punctuation('!'), None);
        assert_eq!(TokenKind::punctuation('"'), None);
        assert_eq!(TokenKind::punctuation('a'), None);
    }

    #[test]
    fn trivia_kinds() {
        assert!(TokenKind::Space.is_trivia());
        assert!(TokenKind::Comment.is_trivia());
        assert!(!TokenKind::Slash.is_trivia());
        assert!(!TokenKind::Eof.is_trivia());
    }

    #[test]
    fn display_uses_upper_snake_names() {
        assert_eq!(TokenKind::BangEqual.to_string(), "BANG_EQUAL");
        assert_eq!(TokenKind::CarriageReturn.to_string(), "CARRIAGE_RETURN");
    }

    #[test]
    fn token_display() {
        let token = Token {
            kind: TokenKind::Number,
            lexeme: "12",
            literal: Literal::Number(12.0),
            line: 1,
            column: 1,
            offset: 0,
        };
        assert_eq!(token.to_string(), "NUMBER \"12\" 12.0");
        assert_eq!(token.end_offset(), 2);

        let newline = Token {
            kind: TokenKind::Newline,
            lexeme: "\n",
            literal: Literal::Lexeme("\n"),
            line: 2,
            column: 3,
            offset: 2,
        };
        assert_eq!(newline.to_string(), "NEWLINE \"\\n\" \"\\n\"");
    }

    #[test]
    fn eof_token() {
        let eof = Token::eof(7, 3, 2);
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(eof.lexeme, "");
        assert_eq!(eof.offset, 7);
        assert_eq!(eof.end_offset(), 7);
        assert_eq!(eof.literal, Literal::Lexeme(""));
        assert_eq!(eof.literal.as_number(), None);
    }
}
