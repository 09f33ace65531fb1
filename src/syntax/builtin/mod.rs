//! Built-in language profiles
//!
//! Profiles for common languages. A profile loaded from a TOML file with
//! the same name replaces the built-in one.

mod c;
mod json;
mod markdown;
mod python;
mod rust;

use super::language::LanguageProfile;

pub use markdown::MarkdownHook;

/// Get all built-in language profiles
pub fn all_profiles() -> Vec<LanguageProfile> {
    vec![
        python::python_profile(),
        c::c_profile(),
        rust::rust_profile(),
        json::json_profile(),
        markdown::markdown_profile(),
    ]
}
