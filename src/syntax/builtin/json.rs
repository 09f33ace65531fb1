//! JSON language profile

use crate::syntax::language::LanguageProfile;

/// Create the JSON profile
pub fn json_profile() -> LanguageProfile {
    let mut p = LanguageProfile::new("JSON");
    p.add_extension("json");
    p.add_quote('"');
    p.add_keywords(&["true", "false", "null"]);
    p.add_literals(&["true", "false", "null"]);
    p
}
