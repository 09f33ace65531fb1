//! C/C++ language profile

use crate::syntax::language::LanguageProfile;

/// Create the C profile (also used for C++)
pub fn c_profile() -> LanguageProfile {
    let mut p = LanguageProfile::new("C");
    for ext in ["c", "h", "cpp", "hpp", "cc", "cxx"] {
        p.add_extension(ext);
    }

    p.set_line_comment("//");
    p.set_block_comment("/*", "*/");
    p.add_quote('"');
    p.add_quote('\'');

    p.add_keywords(&[
        "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
        "extern", "float", "for", "goto", "if", "inline", "int", "long", "register", "restrict",
        "return", "short", "signed", "sizeof", "static", "switch", "typedef", "unsigned", "void",
        "volatile", "while", "bool", "catch", "class", "constexpr", "delete", "namespace", "new",
        "nullptr", "private", "protected", "public", "template", "this", "throw", "try",
        "typename", "using", "virtual", "true", "false",
    ]);
    p.add_literals(&["true", "false", "nullptr", "NULL"]);
    p.add_self_names(&["this"]);
    p.add_class_keywords(&["struct", "union", "enum"]);

    p.add_host_types(&[
        "size_t", "ptrdiff_t", "intptr_t", "uintptr_t", "int8_t", "int16_t", "int32_t",
        "int64_t", "uint8_t", "uint16_t", "uint32_t", "uint64_t", "FILE",
    ]);
    p.add_host_callables(&[
        "printf", "fprintf", "sprintf", "snprintf", "scanf", "malloc", "calloc", "realloc",
        "free", "memcpy", "memset", "memmove", "strlen", "strcmp", "strncmp", "strcpy", "fopen",
        "fclose", "fread", "fwrite", "exit",
    ]);
    p
}
