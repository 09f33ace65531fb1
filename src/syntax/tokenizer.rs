//! Tokenizer
//!
//! Splits a text slice into an ordered, gap-free sequence of tokens whose
//! lexemes concatenate back to the slice. Tokenizing is a pure function of
//! the slice and the profile's delimiter rules; any construct left open at
//! the end of the slice is reported through the token's `trailing` state
//! so the driver can carry it forward.

use super::language::LanguageProfile;
use super::state::{self, ContinuationState};

/// Operator clusters, matched longest first
const OPERATORS_3: &[&str] = &["<<=", ">>=", "**=", "//=", "===", "!==", "...", "..="];
const OPERATORS_2: &[&str] = &[
    "==", "!=", "<=", ">=", "//", "**", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<",
    ">>", "->", "=>", "::", "&&", "||", "..",
];

/// Lexical class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Run of non-newline whitespace
    Whitespace,
    /// A single '\n'
    Newline,
    /// Line comment up to (not including) the newline
    LineComment,
    /// Block comment, closed or running to the slice end
    BlockComment,
    /// Fenced string, closed or running to the slice end
    Fence,
    /// Plain quoted string
    Quoted,
    /// Decimal digits with at most one embedded '.'
    Number,
    /// Letters, digits and underscores, not starting with a digit
    Identifier,
    /// Known operator cluster
    Operator,
    /// Any other single character
    Other,
}

impl TokenKind {
    /// Whether the token is a string or comment literal
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::LineComment | TokenKind::BlockComment | TokenKind::Fence | TokenKind::Quoted
        )
    }
}

/// One lexeme of a slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The lexeme
    pub text: &'a str,
    /// Byte offset of the lexeme within the tokenized slice
    pub offset: usize,
    /// Lexical class
    pub kind: TokenKind,
    /// State in force right after this token (`Clear` unless a literal is left open)
    pub trailing: ContinuationState,
}

impl<'a> Token<'a> {
    /// Byte length of the lexeme
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Tokens are never empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte offset just past the lexeme within the slice
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    /// Whether the lexeme is all whitespace (including a newline)
    pub fn is_space(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Newline)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Check whether `text` is a valid identifier
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if is_ident_start(c) => chars.all(is_ident_char),
        _ => false,
    }
}

fn digits_end(text: &str, from: usize) -> usize {
    text[from..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(text.len(), |i| from + i)
}

/// Longest escape body accepted inside a character literal (`\u{10FFFF}`)
const MAX_CHAR_ESCAPE: usize = 9;

/// Byte length of a character literal at the start of `rest`, if one closes
fn char_literal_len(rest: &str, quote: char) -> Option<usize> {
    let mut chars = rest.char_indices().skip(1);
    let (_, first) = chars.next()?;
    if first == '\n' || first == quote {
        return None;
    }
    if first != '\\' {
        let (i, c) = chars.next()?;
        return (c == quote).then(|| i + c.len_utf8());
    }
    // The escaped character may itself be the quote
    let (_, escaped) = chars.next()?;
    if escaped == '\n' {
        return None;
    }
    for (i, c) in chars.take(MAX_CHAR_ESCAPE) {
        if c == quote {
            return Some(i + c.len_utf8());
        }
        if c.is_whitespace() {
            return None;
        }
    }
    None
}

/// Length and trailing state of the token starting at `pos`
fn scan_token(text: &str, pos: usize, profile: &LanguageProfile) -> (usize, TokenKind, ContinuationState) {
    let rest = &text[pos..];
    let Some(c) = rest.chars().next() else {
        return (0, TokenKind::Other, ContinuationState::Clear);
    };
    let clear = ContinuationState::Clear;

    if c == '\n' {
        return (pos + 1, TokenKind::Newline, clear);
    }
    if c.is_whitespace() {
        let end = rest
            .find(|ch: char| ch == '\n' || !ch.is_whitespace())
            .map_or(text.len(), |i| pos + i);
        return (end, TokenKind::Whitespace, clear);
    }

    if let Some(opener) = profile.line_comment.as_deref() {
        if rest.starts_with(opener) {
            let end = rest.find('\n').map_or(text.len(), |i| pos + i);
            return (end, TokenKind::LineComment, ContinuationState::InLineComment);
        }
    }

    if let Some((open, close)) = &profile.block_comment {
        if rest.starts_with(open.as_str()) {
            let scan = state::scan_block_comment(text, pos + open.len(), close, 0);
            return (scan.end, TokenKind::BlockComment, scan.state);
        }
    }

    if profile.fences.contains(&c) && profile.fence_len > 1 {
        let fence_bytes = c.len_utf8() * profile.fence_len as usize;
        if rest.chars().take(profile.fence_len as usize).filter(|&ch| ch == c).count()
            == profile.fence_len as usize
        {
            let scan = state::scan_fence_body(text, pos + fence_bytes, c, profile.fence_len, 0);
            return (scan.end, TokenKind::Fence, scan.state);
        }
    }

    if profile.char_quote == Some(c) {
        if let Some(len) = char_literal_len(rest, c) {
            return (pos + len, TokenKind::Quoted, clear);
        }
    }

    if profile.quotes.contains(&c) {
        let scan = state::scan_quoted_body(text, pos + c.len_utf8(), c, false);
        return (scan.end, TokenKind::Quoted, scan.state);
    }

    if c.is_ascii_digit() {
        let mut end = digits_end(text, pos);
        let bytes = text.as_bytes();
        if end + 1 < text.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
            end = digits_end(text, end + 1);
        }
        return (end, TokenKind::Number, clear);
    }

    if is_ident_start(c) {
        let end = rest
            .find(|ch: char| !is_ident_char(ch))
            .map_or(text.len(), |i| pos + i);
        return (end, TokenKind::Identifier, clear);
    }

    for op in OPERATORS_3.iter().chain(OPERATORS_2.iter()) {
        if rest.starts_with(op) {
            return (pos + op.len(), TokenKind::Operator, clear);
        }
    }

    (pos + c.len_utf8(), TokenKind::Other, clear)
}

/// Tokenize a slice under a profile's delimiter rules
///
/// The lexemes of the returned tokens concatenate to exactly `text`. An
/// empty slice yields no tokens.
pub fn tokenize<'a>(text: &'a str, profile: &LanguageProfile) -> Vec<Token<'a>> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let (mut end, kind, trailing) = scan_token(text, pos, profile);
        if end <= pos {
            // Never stall: fall back to a single character
            end = pos + text[pos..].chars().next().map_or(1, char::len_utf8);
        }
        tokens.push(Token {
            text: &text[pos..end],
            offset: pos,
            kind,
            trailing,
        });
        pos = end;
    }
    tokens
}
