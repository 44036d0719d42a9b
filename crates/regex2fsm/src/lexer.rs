//! Tokenization of raw patterns: validation, concatenation marking, and
//! character-to-token mapping.

use thiserror::Error;

/// Explicit concatenation marker inserted by [`preprocess`].
const CONCAT_MARKER: char = '$';

/// The kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `.`
    Wildcard,
    /// `?`
    Optional,
    /// `*`
    Star,
    /// `+`
    Plus,
    /// `$`, inserted between adjacent atoms by preprocessing.
    Concat,
    /// `|`
    Or,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `-`, only meaningful inside a character class.
    Hyphen,
    /// Any alphanumeric symbol.
    Literal,
}

/// A single token: its kind plus the source character it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// What the character means to the parser.
    pub kind: TokenKind,
    /// The character itself.
    pub value: char,
}

impl Token {
    /// Create a token of the given kind.
    pub fn new(kind: TokenKind, value: char) -> Self {
        Self { kind, value }
    }
}

/// Error returned when a raw pattern cannot be turned into a token stream.
#[derive(Debug, Error)]
#[error("invalid pattern: {reason}")]
pub struct InvalidPatternError {
    reason: String,
}

impl InvalidPatternError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Map a character to its token kind, or `None` if the character has no
/// place in the restricted grammar.
fn token_kind(c: char) -> Option<TokenKind> {
    match c {
        '.' => Some(TokenKind::Wildcard),
        '?' => Some(TokenKind::Optional),
        '*' => Some(TokenKind::Star),
        '+' => Some(TokenKind::Plus),
        CONCAT_MARKER => Some(TokenKind::Concat),
        '|' => Some(TokenKind::Or),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '[' => Some(TokenKind::LBracket),
        ']' => Some(TokenKind::RBracket),
        '-' => Some(TokenKind::Hyphen),
        c if c.is_ascii_alphanumeric() => Some(TokenKind::Literal),
        _ => None,
    }
}

/// Insert explicit `$` concatenation markers between adjacent atoms.
///
/// A marker goes between a character that can end an atom (a literal, `)`,
/// `]`, `.`, or a quantifier) and one that can start an atom (a literal,
/// `(`, `[`, or `.`). Nothing is inserted while inside a `[...]` class, so
/// class members stay plain symbols.
pub fn preprocess(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut output = String::with_capacity(pattern.len() * 2);
    let mut in_class = false;

    for (i, &c) in chars.iter().enumerate() {
        if c == '[' {
            in_class = true;
        } else if c == ']' {
            in_class = false;
        }
        output.push(c);

        if in_class {
            continue;
        }
        let Some(&next) = chars.get(i + 1) else {
            continue;
        };

        let ends_atom = c.is_ascii_alphanumeric() || matches!(c, ')' | '*' | '.');
        let ends_quantifier = matches!(c, '*' | '+' | '?');
        let ends_group = matches!(c, ')' | ']');
        let starts_atom = next.is_ascii_alphanumeric() || matches!(next, '(' | '[' | '.');

        if (ends_atom || ends_quantifier || ends_group) && starts_atom {
            output.push(CONCAT_MARKER);
        }
    }

    output
}

/// Turn a raw pattern into a token stream.
///
/// The pattern is first checked against a full regex syntax validator, so
/// structurally broken input (unbalanced parentheses, dangling quantifiers,
/// unterminated classes) is rejected before any token is produced. The
/// surviving pattern is preprocessed and mapped character by character.
pub fn tokenize(pattern: &str) -> Result<Vec<Token>, InvalidPatternError> {
    if let Err(error) = regex_syntax::Parser::new().parse(pattern) {
        return Err(InvalidPatternError::new(format!(
            "pattern rejected by syntax validation: {error}"
        )));
    }

    preprocess(pattern)
        .chars()
        .map(|c| match token_kind(c) {
            Some(kind) => Ok(Token::new(kind, c)),
            None => Err(InvalidPatternError::new(format!(
                "character {c:?} has no token mapping"
            ))),
        })
        .collect()
}
