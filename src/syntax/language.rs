//! Language profiles for syntax highlighting
//!
//! A `LanguageProfile` is a declarative description of a guest language:
//! keyword sets, comment and string delimiters, declaration keywords and
//! the host environment's builtin names. One engine serves every profile.
//! Languages whose syntax does not fit the token model (structural markup)
//! plug in a `SyntaxHook` that styles whole lines instead.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use super::classifier::StyledRun;
use super::state::ContinuationState;
use crate::error::{EngineError, Result};

/// Override hook for irregular syntax
///
/// The driver hands the hook one line at a time (including its trailing
/// newline, if any) together with the state in force at the line start.
/// The hook pushes runs with line-relative ranges and returns the state at
/// the line end.
pub trait SyntaxHook: Send + Sync {
    fn style_line(
        &self,
        line: &str,
        state: ContinuationState,
        out: &mut Vec<StyledRun>,
    ) -> ContinuationState;
}

/// A complete language profile
#[derive(Clone, Default)]
pub struct LanguageProfile {
    /// Profile name (e.g., "Python")
    pub name: String,
    /// File extensions (e.g., ["py", "pyw"])
    pub extensions: Vec<String>,
    /// Line comment opener (e.g., "#", "//")
    pub line_comment: Option<String>,
    /// Block comment opener and closer (e.g., "/*", "*/")
    pub block_comment: Option<(String, String)>,
    /// Characters that open a plain quoted string
    pub quotes: Vec<char>,
    /// Characters that open a fenced string when repeated `fence_len` times
    pub fences: Vec<char>,
    /// Fence repeat count
    pub fence_len: u8,
    /// Character that delimits a one-character literal (e.g., '\'' in Rust)
    ///
    /// A lone occurrence that does not close a character literal on the
    /// same line (a lifetime, say) is plain punctuation.
    pub char_quote: Option<char>,
    /// Reserved words (may include the literal set)
    pub keywords: HashSet<String>,
    /// Boolean/null literals, styled as builtin types
    pub literals: HashSet<String>,
    /// self/this-like names, styled as builtin types
    pub self_names: HashSet<String>,
    /// Keywords that declare a class-like name
    pub class_keywords: HashSet<String>,
    /// Keywords that declare a callable name
    pub function_keywords: HashSet<String>,
    /// Callables provided by the host environment
    pub host_callables: HashSet<String>,
    /// Types provided by the host environment
    pub host_types: HashSet<String>,
    /// Decorator prefix (e.g., '@')
    pub decorator: Option<char>,
    /// Line-level override for irregular syntax
    pub hook: Option<Arc<dyn SyntaxHook>>,
}

impl fmt::Debug for LanguageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageProfile")
            .field("name", &self.name)
            .field("extensions", &self.extensions)
            .field("line_comment", &self.line_comment)
            .field("block_comment", &self.block_comment)
            .field("quotes", &self.quotes)
            .field("fences", &self.fences)
            .field("char_quote", &self.char_quote)
            .field("hook", &self.hook.is_some())
            .finish_non_exhaustive()
    }
}

fn to_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl LanguageProfile {
    /// Create a new empty profile
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fence_len: 3,
            ..Default::default()
        }
    }

    /// Add a file extension
    pub fn add_extension(&mut self, ext: &str) {
        self.extensions.push(ext.to_string());
    }

    /// Set the line comment opener
    pub fn set_line_comment(&mut self, opener: &str) {
        self.line_comment = Some(opener.to_string());
    }

    /// Set the block comment delimiters
    pub fn set_block_comment(&mut self, open: &str, close: &str) {
        self.block_comment = Some((open.to_string(), close.to_string()));
    }

    /// Add a plain quote character
    pub fn add_quote(&mut self, quote: char) {
        self.quotes.push(quote);
    }

    /// Add a fence character
    pub fn add_fence(&mut self, fence: char) {
        self.fences.push(fence);
    }

    /// Set the character literal delimiter
    pub fn set_char_quote(&mut self, quote: char) {
        self.char_quote = Some(quote);
    }

    pub fn add_keywords(&mut self, words: &[&str]) {
        self.keywords.extend(to_set(words));
    }

    pub fn add_literals(&mut self, words: &[&str]) {
        self.literals.extend(to_set(words));
    }

    pub fn add_self_names(&mut self, words: &[&str]) {
        self.self_names.extend(to_set(words));
    }

    /// Class-like declaration keywords are reserved words too
    pub fn add_class_keywords(&mut self, words: &[&str]) {
        self.class_keywords.extend(to_set(words));
        self.keywords.extend(to_set(words));
    }

    /// Function-like declaration keywords are reserved words too
    pub fn add_function_keywords(&mut self, words: &[&str]) {
        self.function_keywords.extend(to_set(words));
        self.keywords.extend(to_set(words));
    }

    pub fn add_host_callables(&mut self, words: &[&str]) {
        self.host_callables.extend(to_set(words));
    }

    pub fn add_host_types(&mut self, words: &[&str]) {
        self.host_types.extend(to_set(words));
    }

    /// Install a line-level override hook
    pub fn set_hook(&mut self, hook: Arc<dyn SyntaxHook>) {
        self.hook = Some(hook);
    }

    /// Block comment closer, if the profile has block comments
    pub fn block_closer(&self) -> Option<&str> {
        self.block_comment.as_ref().map(|(_, close)| close.as_str())
    }

    /// Whether this profile declares any names the symbol index could collect
    pub fn has_declarations(&self) -> bool {
        !self.class_keywords.is_empty() || !self.function_keywords.is_empty()
    }

    /// Parse a profile from TOML text
    ///
    /// ```toml
    /// name = "AquaScript"
    /// extensions = ["aqua"]
    /// line-comment = "//"
    /// quotes = ['"']
    /// keywords = ["let", "if", "else", "return"]
    /// function-keywords = ["func"]
    /// host-callables = ["print"]
    /// literals = ["true", "false", "null"]
    /// ```
    pub fn from_toml(text: &str) -> Result<Self> {
        let file: ProfileFile = toml::from_str(text)?;
        file.into_profile()
    }
}

/// On-disk shape of a TOML profile
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ProfileFile {
    name: String,
    #[serde(default)]
    extensions: Vec<String>,
    line_comment: Option<String>,
    block_comment: Option<[String; 2]>,
    #[serde(default)]
    quotes: Vec<char>,
    #[serde(default)]
    fences: Vec<char>,
    fence_len: Option<u8>,
    char_quote: Option<char>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    literals: Vec<String>,
    #[serde(default)]
    self_names: Vec<String>,
    #[serde(default)]
    class_keywords: Vec<String>,
    #[serde(default)]
    function_keywords: Vec<String>,
    #[serde(default)]
    host_callables: Vec<String>,
    #[serde(default)]
    host_types: Vec<String>,
    decorator: Option<char>,
}

fn invalid(reason: String) -> EngineError {
    EngineError::InvalidProfile(reason)
}

fn is_delimiter_char(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace() && c != '_'
}

impl ProfileFile {
    fn into_profile(self) -> Result<LanguageProfile> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(invalid("profile name is empty".into()));
        }

        let mut profile = LanguageProfile::new(&name);
        profile.extensions = self
            .extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();

        if let Some(opener) = self.line_comment {
            if opener.is_empty() {
                return Err(invalid(format!("{name}: line-comment is empty")));
            }
            profile.line_comment = Some(opener);
        }
        if let Some([open, close]) = self.block_comment {
            if open.is_empty() || close.is_empty() || close.len() > u8::MAX as usize {
                return Err(invalid(format!("{name}: block-comment delimiters are invalid")));
            }
            profile.block_comment = Some((open, close));
        }

        for &c in self.quotes.iter().chain(self.fences.iter()).chain(self.char_quote.iter()) {
            if !is_delimiter_char(c) {
                return Err(invalid(format!("{name}: {c:?} cannot delimit a string")));
            }
        }
        profile.quotes = self.quotes;
        profile.fences = self.fences;
        profile.char_quote = self.char_quote;
        if let Some(len) = self.fence_len {
            if len < 2 {
                return Err(invalid(format!("{name}: fence-len must be at least 2")));
            }
            profile.fence_len = len;
        }

        profile.keywords = self.keywords.into_iter().collect();
        profile.literals = self.literals.into_iter().collect();
        profile.self_names = self.self_names.into_iter().collect();
        profile.keywords.extend(self.class_keywords.iter().cloned());
        profile.keywords.extend(self.function_keywords.iter().cloned());
        profile.class_keywords = self.class_keywords.into_iter().collect();
        profile.function_keywords = self.function_keywords.into_iter().collect();
        profile.host_callables = self.host_callables.into_iter().collect();
        profile.host_types = self.host_types.into_iter().collect();
        if let Some(c) = self.decorator {
            if !is_delimiter_char(c) {
                return Err(invalid(format!("{name}: {c:?} cannot be a decorator prefix")));
            }
        }
        profile.decorator = self.decorator;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AQUA: &str = r#"
name = "AquaScript"
extensions = [".aqua", "AQ"]
line-comment = "//"
block-comment = ["/*", "*/"]
quotes = ['"']
char-quote = "'"
keywords = ["let", "if", "else", "return"]
function-keywords = ["func"]
host-callables = ["print"]
host-types = ["string", "number", "boolean"]
literals = ["true", "false", "null"]
"#;

    #[test]
    fn test_from_toml() {
        let profile = LanguageProfile::from_toml(AQUA).unwrap();
        assert_eq!(profile.name, "AquaScript");
        assert_eq!(profile.extensions, vec!["aqua", "aq"]);
        assert_eq!(profile.line_comment.as_deref(), Some("//"));
        assert_eq!(profile.block_closer(), Some("*/"));
        assert_eq!(profile.quotes, vec!['"']);
        assert_eq!(profile.char_quote, Some('\''));
        assert!(profile.keywords.contains("func"));
        assert!(profile.function_keywords.contains("func"));
        assert!(profile.has_declarations());
        assert_eq!(profile.fence_len, 3);
        assert!(profile.hook.is_none());
    }

    #[test]
    fn test_from_toml_rejects_unknown_keys() {
        let err = LanguageProfile::from_toml("name = \"X\"\ncolour = 1\n").unwrap_err();
        assert!(matches!(err, EngineError::ProfileParse(_)));
    }

    #[test]
    fn test_from_toml_rejects_bad_values() {
        let err = LanguageProfile::from_toml("name = \"  \"").unwrap_err();
        assert!(matches!(err, EngineError::InvalidProfile(_)));

        let err = LanguageProfile::from_toml("name = \"X\"\nquotes = ['a']").unwrap_err();
        assert!(matches!(err, EngineError::InvalidProfile(_)));

        let err = LanguageProfile::from_toml("name = \"X\"\nchar-quote = \"c\"").unwrap_err();
        assert!(matches!(err, EngineError::InvalidProfile(_)));

        let err = LanguageProfile::from_toml("name = \"X\"\nfence-len = 1").unwrap_err();
        assert!(matches!(err, EngineError::InvalidProfile(_)));
    }

    #[test]
    fn test_declaration_keywords_are_keywords() {
        let mut profile = LanguageProfile::new("Test");
        profile.add_class_keywords(&["class"]);
        profile.add_function_keywords(&["def"]);
        assert!(profile.keywords.contains("class"));
        assert!(profile.keywords.contains("def"));
    }
}
