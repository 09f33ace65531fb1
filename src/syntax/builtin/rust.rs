//! Rust language profile

use crate::syntax::language::LanguageProfile;

/// Create the Rust profile
///
/// `'` only delimits character literals; a lifetime tick stays punctuation.
pub fn rust_profile() -> LanguageProfile {
    let mut p = LanguageProfile::new("Rust");
    p.add_extension("rs");

    p.set_line_comment("//");
    p.set_block_comment("/*", "*/");
    p.add_quote('"');
    p.set_char_quote('\'');

    p.add_keywords(&[
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "extern",
        "false", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
        "ref", "return", "static", "super", "true", "unsafe", "use", "where", "while",
    ]);
    p.add_literals(&["true", "false"]);
    p.add_self_names(&["self", "Self"]);
    p.add_class_keywords(&["struct", "enum", "trait", "type", "union"]);
    p.add_function_keywords(&["fn"]);

    p.add_host_types(&[
        "bool", "char", "str", "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32",
        "i64", "i128", "isize", "f32", "f64", "String", "Vec", "Box", "Rc", "Arc", "Option",
        "Result", "HashMap", "HashSet",
    ]);
    p.add_host_callables(&["Some", "Ok", "Err", "drop"]);
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::classifier::Classifier;
    use crate::syntax::symbols::NameSnapshot;
    use crate::syntax::tokenizer::tokenize;
    use crate::syntax::tokens::StyleCategory;

    #[test]
    fn test_rust_declarations() {
        let profile = rust_profile();
        let names = NameSnapshot::default();
        let tokens = tokenize("pub struct Point;", &profile);
        let runs = Classifier::new(&profile, &names).classify(&tokens);
        let categories: Vec<_> = runs.iter().map(|r| r.category).collect();
        assert_eq!(
            categories,
            vec![
                StyleCategory::Keyword,
                StyleCategory::Default,
                StyleCategory::Keyword,
                StyleCategory::Default,
                StyleCategory::ClassDef,
                StyleCategory::Operator,
            ]
        );
    }

    #[test]
    fn test_lifetime_is_not_a_string() {
        let profile = rust_profile();
        let tokens = tokenize("fn f<'a>(x: &'a str)", &profile);
        assert!(tokens.iter().all(|t| !t.kind.is_literal()));
    }

    #[test]
    fn test_char_literal_quote_does_not_open_string() {
        let profile = rust_profile();
        let names = NameSnapshot::default();
        let text = "let q = '\"'; let n = 1;";
        let tokens = tokenize(text, &profile);
        let runs = Classifier::new(&profile, &names).classify(&tokens);
        let category_at = |pos: usize| {
            runs.iter()
                .find(|r| r.range.contains(&pos))
                .map(|r| r.category)
        };
        let literal = text.find('\'').unwrap();
        assert_eq!(category_at(literal), Some(StyleCategory::String));
        assert_eq!(category_at(literal + 2), Some(StyleCategory::String));
        assert_eq!(category_at(text.rfind("let").unwrap()), Some(StyleCategory::Keyword));
        assert_eq!(category_at(text.rfind('1').unwrap()), Some(StyleCategory::Number));
    }
}
