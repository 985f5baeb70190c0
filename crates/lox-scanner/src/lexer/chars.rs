//! Character classes used by the scanner. ASCII only: non-ASCII letters and
//! digits are not part of the language.

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Letters and underscore: anything that may start an identifier.
pub fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub fn is_alphanumeric(c: char) -> bool {
    is_alpha(c) || is_digit(c)
}
