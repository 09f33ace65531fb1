//! Style classifier
//!
//! Assigns a style category to each token (or merged run of tokens) using
//! the active profile, the symbol index snapshot and a short lookahead.

use std::ops::Range;

use super::language::LanguageProfile;
use super::symbols::NameSnapshot;
use super::tokenizer::{Token, TokenKind};
use super::tokens::StyleCategory;

const BRACKETS: &[&str] = &["(", ")", "[", "]", "{", "}"];
const OPENING_BRACKETS: &[&str] = &["(", "[", "{"];

/// A category over a byte range, relative to the classified slice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    pub category: StyleCategory,
    pub range: Range<usize>,
}

impl StyledRun {
    pub fn new(category: StyleCategory, range: Range<usize>) -> Self {
        Self { category, range }
    }
}

/// Classifies the tokens of one slice
pub struct Classifier<'a> {
    profile: &'a LanguageProfile,
    names: &'a NameSnapshot,
}

impl<'a> Classifier<'a> {
    pub fn new(profile: &'a LanguageProfile, names: &'a NameSnapshot) -> Self {
        Self { profile, names }
    }

    /// Classify an identifier by membership, in fixed priority order
    ///
    /// Declared names outrank host names so a user class shadowing a host
    /// type resolves to the declaration.
    pub fn classify_identifier(&self, word: &str, followed_by_call: bool) -> StyleCategory {
        let p = self.profile;
        if self.names.types.contains(word) {
            StyleCategory::DeclaredType
        } else if self.names.callables.contains(word) {
            StyleCategory::DeclaredFunction
        } else if p.host_callables.contains(word) {
            StyleCategory::BuiltinCallable
        } else if p.host_types.contains(word) {
            StyleCategory::BuiltinType
        } else if p.keywords.contains(word) && !p.literals.contains(word) {
            StyleCategory::Keyword
        } else if p.literals.contains(word) || p.self_names.contains(word) {
            StyleCategory::BuiltinType
        } else if followed_by_call {
            StyleCategory::DeclaredFunction
        } else {
            StyleCategory::Default
        }
    }

    /// Classify a token sequence that starts in the `Clear` state
    ///
    /// The returned runs cover the whole slice, in order. The state left
    /// open at the end is the last token's `trailing` state.
    pub fn classify(&self, tokens: &[Token<'_>]) -> Vec<StyledRun> {
        let mut runs: Vec<StyledRun> = Vec::with_capacity(tokens.len());
        // Category of the last non-space token, for unary-minus context
        let mut last: Option<(StyleCategory, &str)> = None;
        let mut i = 0;

        while i < tokens.len() {
            let tok = tokens[i];
            let next = tokens.get(i + 1);

            // Literal bodies
            if tok.kind.is_literal() {
                let category = if matches!(tok.kind, TokenKind::LineComment | TokenKind::BlockComment) {
                    StyleCategory::Comment
                } else {
                    StyleCategory::String
                };
                let mut end = tok.end();
                if tok.kind == TokenKind::LineComment {
                    if let Some(nl) = next.filter(|t| t.kind == TokenKind::Newline) {
                        end = nl.end();
                        i += 1;
                    }
                }
                runs.push(StyledRun::new(category, tok.offset..end));
                last = Some((category, tok.text));
                i += 1;
                continue;
            }

            // Numeric literal, with a unary minus in operator context
            if tok.text == "-" && Self::unary_context(last) {
                if let Some(num) = next.filter(|t| t.kind == TokenKind::Number) {
                    runs.push(StyledRun::new(StyleCategory::Number, tok.offset..num.end()));
                    last = Some((StyleCategory::Number, num.text));
                    i += 2;
                    continue;
                }
            }
            if tok.kind == TokenKind::Number {
                runs.push(StyledRun::new(StyleCategory::Number, tok.offset..tok.end()));
                last = Some((StyleCategory::Number, tok.text));
                i += 1;
                continue;
            }

            // Declaration keyword followed by the declared name
            if tok.kind == TokenKind::Identifier {
                let def_category = if self.profile.class_keywords.contains(tok.text) {
                    Some(StyleCategory::ClassDef)
                } else if self.profile.function_keywords.contains(tok.text) {
                    Some(StyleCategory::FunctionDef)
                } else {
                    None
                };
                if let Some(def_category) = def_category {
                    runs.push(StyledRun::new(StyleCategory::Keyword, tok.offset..tok.end()));
                    last = Some((StyleCategory::Keyword, tok.text));
                    i += 1;
                    let mut j = i;
                    while j < tokens.len() && tokens[j].kind == TokenKind::Whitespace {
                        j += 1;
                    }
                    if let Some(name) = tokens.get(j).filter(|t| t.kind == TokenKind::Identifier) {
                        if j > i {
                            runs.push(StyledRun::new(
                                StyleCategory::Default,
                                tokens[i].offset..tokens[j - 1].end(),
                            ));
                        }
                        runs.push(StyledRun::new(def_category, name.offset..name.end()));
                        last = Some((def_category, name.text));
                        i = j + 1;
                    }
                    continue;
                }
            }

            // Decorator prefix and its name
            if let Some(prefix) = self.profile.decorator {
                if tok.kind == TokenKind::Other && tok.text.starts_with(prefix) {
                    if let Some(name) = next.filter(|t| t.kind == TokenKind::Identifier) {
                        runs.push(StyledRun::new(StyleCategory::DeclaredFunction, tok.offset..name.end()));
                        last = Some((StyleCategory::DeclaredFunction, name.text));
                        i += 2;
                        continue;
                    }
                }
            }

            let category = match tok.kind {
                TokenKind::Identifier => {
                    let call = next.is_some_and(|t| t.text == "(");
                    self.classify_identifier(tok.text, call)
                }
                TokenKind::Operator => StyleCategory::Operator,
                TokenKind::Other if BRACKETS.contains(&tok.text) => StyleCategory::Bracket,
                TokenKind::Other if tok.text.chars().all(|c| c.is_ascii_punctuation()) => {
                    StyleCategory::Operator
                }
                _ => StyleCategory::Default,
            };
            runs.push(StyledRun::new(category, tok.offset..tok.end()));
            if !tok.is_space() {
                last = Some((category, tok.text));
            }
            i += 1;
        }

        runs
    }

    fn unary_context(last: Option<(StyleCategory, &str)>) -> bool {
        match last {
            None => true,
            Some((StyleCategory::Operator | StyleCategory::Keyword, _)) => true,
            Some((StyleCategory::Bracket, text)) => OPENING_BRACKETS.contains(&text),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::tokenizer::tokenize;

    fn profile() -> LanguageProfile {
        let mut p = LanguageProfile::new("Test");
        p.set_line_comment("#");
        p.add_quote('\'');
        p.add_quote('"');
        p.add_fence('"');
        p.add_keywords(&["if", "return", "True", "False", "None"]);
        p.add_literals(&["True", "False", "None"]);
        p.add_self_names(&["self"]);
        p.add_class_keywords(&["class"]);
        p.add_function_keywords(&["def"]);
        p.add_host_callables(&["print", "len"]);
        p.add_host_types(&["int", "Path"]);
        p.decorator = Some('@');
        p
    }

    fn classify(text: &str, names: &NameSnapshot) -> Vec<StyledRun> {
        let p = profile();
        let tokens = tokenize(text, &p);
        Classifier::new(&p, names).classify(&tokens)
    }

    fn styles<'t>(text: &'t str, runs: &[StyledRun]) -> Vec<(&'t str, StyleCategory)> {
        runs.iter()
            .filter(|r| !text[r.range.clone()].trim().is_empty())
            .map(|r| (&text[r.range.clone()], r.category))
            .collect()
    }

    #[test]
    fn test_runs_cover_slice() {
        let text = "def f(x):  return -1.5 # neg\n";
        let result = classify(text, &NameSnapshot::default());
        let mut pos = 0;
        for run in &result {
            assert_eq!(run.range.start, pos);
            pos = run.range.end;
        }
        assert_eq!(pos, text.len());
    }

    #[test]
    fn test_definition_names() {
        let text = "class Foo: def  bar(self):";
        let result = classify(text, &NameSnapshot::default());
        let s = styles(text, &result);
        assert_eq!(s[0], ("class", StyleCategory::Keyword));
        assert_eq!(s[1], ("Foo", StyleCategory::ClassDef));
        assert_eq!(s[3], ("def", StyleCategory::Keyword));
        assert_eq!(s[4], ("bar", StyleCategory::FunctionDef));
        assert!(s.contains(&("self", StyleCategory::BuiltinType)));
    }

    #[test]
    fn test_declaration_keyword_without_name() {
        let text = "def (";
        let result = classify(text, &NameSnapshot::default());
        let s = styles(text, &result);
        assert_eq!(s[0], ("def", StyleCategory::Keyword));
        assert_eq!(s[1], ("(", StyleCategory::Bracket));
    }

    #[test]
    fn test_identifier_priority() {
        let mut names = NameSnapshot::default();
        names.types.insert("Path".to_string());
        names.callables.insert("helper".to_string());

        assert_eq!(
            classify("Path", &names)[0].category,
            StyleCategory::DeclaredType
        );
        assert_eq!(
            classify("Path", &NameSnapshot::default())[0].category,
            StyleCategory::BuiltinType
        );
        assert_eq!(
            classify("helper", &names)[0].category,
            StyleCategory::DeclaredFunction
        );
        assert_eq!(
            classify("print", &names)[0].category,
            StyleCategory::BuiltinCallable
        );
        assert_eq!(classify("if", &names)[0].category, StyleCategory::Keyword);
        assert_eq!(classify("None", &names)[0].category, StyleCategory::BuiltinType);
        assert_eq!(classify("unknown", &names)[0].category, StyleCategory::Default);
        assert_eq!(
            classify("unknown()", &names)[0].category,
            StyleCategory::DeclaredFunction
        );
    }

    #[test]
    fn test_unary_minus_merge() {
        let text = "x = -3";
        let result = classify(text, &NameSnapshot::default());
        assert!(styles(text, &result).contains(&("-3", StyleCategory::Number)));

        let text = "x -3";
        let result = classify(text, &NameSnapshot::default());
        let s = styles(text, &result);
        assert!(s.contains(&("-", StyleCategory::Operator)));
        assert!(s.contains(&("3", StyleCategory::Number)));

        let text = "(-2.5)";
        let result = classify(text, &NameSnapshot::default());
        assert!(styles(text, &result).contains(&("-2.5", StyleCategory::Number)));
    }

    #[test]
    fn test_comment_swallows_newline() {
        let text = "# hi\nx";
        let result = classify(text, &NameSnapshot::default());
        assert_eq!(result[0], StyledRun::new(StyleCategory::Comment, 0..5));
        assert_eq!(result[1], StyledRun::new(StyleCategory::Default, 5..6));

        let result = classify("# hi", &NameSnapshot::default());
        assert_eq!(result, vec![StyledRun::new(StyleCategory::Comment, 0..4)]);
    }

    #[test]
    fn test_open_string_runs_to_end() {
        let text = "x = 'abc";
        let result = classify(text, &NameSnapshot::default());
        assert!(styles(text, &result).contains(&("'abc", StyleCategory::String)));
        assert_eq!(result.last().map(|r| r.range.end), Some(text.len()));
    }

    #[test]
    fn test_decorator() {
        let text = "@cached\n";
        let result = classify(text, &NameSnapshot::default());
        assert_eq!(styles(text, &result)[0], ("@cached", StyleCategory::DeclaredFunction));
    }

    #[test]
    fn test_brackets_and_operators() {
        let text = "a[i] += {b}, c";
        let result = classify(text, &NameSnapshot::default());
        let s = styles(text, &result);
        assert!(s.contains(&("[", StyleCategory::Bracket)));
        assert!(s.contains(&("}", StyleCategory::Bracket)));
        assert!(s.contains(&("+=", StyleCategory::Operator)));
        assert!(s.contains(&(",", StyleCategory::Operator)));
    }
}
