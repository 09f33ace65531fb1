//! restyle - incremental syntax highlighting engine
//!
//! Styles byte ranges of a text buffer on demand. A host hands the engine
//! a read-only snapshot and a range; the engine resumes from cached
//! continuation state, classifies tokens against a language profile and
//! the buffer's own declarations, and reports style tags back.

pub mod config;
pub mod error;
pub mod minimap;
pub mod syntax;
pub mod terminal;
pub mod viewport;

pub use config::Config;
pub use error::{EngineError, Result};
pub use syntax::{BufferContext, LanguageProfile, StyleCategory, StyleSink, StyleTag, SyntaxManager};
