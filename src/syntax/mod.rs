//! Syntax styling engine
//!
//! This module provides the incremental highlighter:
//! - Tokenizer and continuation state for resumable lexing
//! - Style classifier driven by declarative language profiles
//! - Restyle driver with a checkpoint cache per buffer
//! - Symbol index of names declared in the buffer

mod builtin;
mod classifier;
mod driver;
mod language;
mod manager;
mod state;
mod style;
mod symbols;
mod tokenizer;
mod tokens;

pub use builtin::{all_profiles, MarkdownHook};
pub use classifier::{Classifier, StyledRun};
pub use driver::{BufferContext, RestyleStats, StyleSink, CHECKPOINT_SPACING};
pub use language::{LanguageProfile, SyntaxHook};
pub use manager::SyntaxManager;
pub use state::{Checkpoint, CheckpointCache, ContinuationState, MAX_CHECKPOINTS};
pub use style::{Color, Style, StyleTag};
pub use symbols::{
    scan_declarations, Indexer, NameSnapshot, NamesChanged, RefreshDebouncer, SymbolIndex,
    DEFAULT_DEBOUNCE_MS,
};
pub use tokenizer::{is_identifier, tokenize, Token, TokenKind};
pub use tokens::StyleCategory;
