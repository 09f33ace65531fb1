//! Style categories for syntax highlighting
//!
//! This module defines the closed set of categories the classifier
//! assigns to spans, and their default visual styles.

use super::style::{Color, Style};

/// Style category of an emitted span
///
/// Exactly one category applies to each span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleCategory {
    /// Plain text, identifiers with no better classification
    Default,
    /// Reserved words of the guest language
    Keyword,
    /// References to a class-like name declared in the buffer
    DeclaredType,
    /// String literals, including fences and their bodies
    String,
    /// Line and block comments
    Comment,
    /// Numeric literals, including a unary minus
    Number,
    /// ( ) [ ] { }
    Bracket,
    /// Operators and other punctuation
    Operator,
    /// Calls to a callable declared in the buffer (or that look like calls)
    DeclaredFunction,
    /// Name introduced by a function-like declaration keyword
    FunctionDef,
    /// Name introduced by a class-like declaration keyword
    ClassDef,
    /// Host types, boolean/null literals and self-like names
    BuiltinType,
    /// Host-environment callables
    BuiltinCallable,
}

impl StyleCategory {
    /// Every category, in declaration order
    pub const ALL: [StyleCategory; 13] = [
        StyleCategory::Default,
        StyleCategory::Keyword,
        StyleCategory::DeclaredType,
        StyleCategory::String,
        StyleCategory::Comment,
        StyleCategory::Number,
        StyleCategory::Bracket,
        StyleCategory::Operator,
        StyleCategory::DeclaredFunction,
        StyleCategory::FunctionDef,
        StyleCategory::ClassDef,
        StyleCategory::BuiltinType,
        StyleCategory::BuiltinCallable,
    ];

    /// Get the default style for this category
    pub fn default_style(&self) -> Style {
        match self {
            StyleCategory::Default => Style::default(),
            StyleCategory::Keyword => Style::fg(Color::Magenta).with_bold(),
            StyleCategory::DeclaredType => Style::fg(Color::Yellow),
            StyleCategory::String => Style::fg(Color::Green),
            StyleCategory::Comment => Style::fg(Color::BrightBlack).with_italic(),
            StyleCategory::Number => Style::fg(Color::Cyan),
            StyleCategory::Bracket => Style::fg(Color::BrightYellow),
            StyleCategory::Operator => Style::fg(Color::BrightWhite),
            StyleCategory::DeclaredFunction => Style::fg(Color::Blue),
            StyleCategory::FunctionDef => Style::fg(Color::BrightBlue).with_bold(),
            StyleCategory::ClassDef => Style::fg(Color::BrightYellow).with_bold(),
            StyleCategory::BuiltinType => Style::fg(Color::BrightCyan),
            StyleCategory::BuiltinCallable => Style::fg(Color::BrightMagenta),
        }
    }

    /// Get the canonical name of this category
    pub fn name(&self) -> &'static str {
        match self {
            StyleCategory::Default => "default",
            StyleCategory::Keyword => "keyword",
            StyleCategory::DeclaredType => "declared-type",
            StyleCategory::String => "string",
            StyleCategory::Comment => "comment",
            StyleCategory::Number => "numeric-constant",
            StyleCategory::Bracket => "bracket",
            StyleCategory::Operator => "operator",
            StyleCategory::DeclaredFunction => "declared-function",
            StyleCategory::FunctionDef => "function-definition-name",
            StyleCategory::ClassDef => "class-definition-name",
            StyleCategory::BuiltinType => "builtin-type",
            StyleCategory::BuiltinCallable => "builtin-callable",
        }
    }

    /// Parse a category from its canonical name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Whether this category is one of the literal-body modes
    pub fn is_literal(&self) -> bool {
        matches!(self, StyleCategory::String | StyleCategory::Comment)
    }
}
