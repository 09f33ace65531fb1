//! Python language profile

use crate::syntax::language::LanguageProfile;

/// Create the Python profile
pub fn python_profile() -> LanguageProfile {
    let mut p = LanguageProfile::new("Python");
    p.add_extension("py");
    p.add_extension("pyw");
    p.add_extension("pyi");

    p.set_line_comment("#");
    p.add_quote('\'');
    p.add_quote('"');
    p.add_fence('\'');
    p.add_fence('"');
    p.decorator = Some('@');

    p.add_keywords(&[
        "False", "None", "True", "and", "as", "assert", "async", "await", "break", "continue",
        "del", "elif", "else", "except", "finally", "for", "from", "global", "if", "import", "in",
        "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while",
        "with", "yield",
    ]);
    p.add_literals(&["False", "None", "True"]);
    p.add_self_names(&["self", "cls"]);
    p.add_class_keywords(&["class"]);
    p.add_function_keywords(&["def"]);

    p.add_host_types(&[
        "bool", "bytearray", "bytes", "complex", "dict", "float", "frozenset", "int", "list",
        "object", "set", "str", "tuple", "type", "BaseException", "Exception", "ValueError",
        "TypeError", "KeyError", "IndexError", "RuntimeError", "StopIteration",
    ]);
    p.add_host_callables(&[
        "abs", "all", "any", "ascii", "bin", "callable", "chr", "classmethod", "compile",
        "delattr", "dir", "divmod", "enumerate", "eval", "exec", "filter", "format", "getattr",
        "globals", "hasattr", "hash", "help", "hex", "id", "input", "isinstance", "issubclass",
        "iter", "len", "locals", "map", "max", "min", "next", "oct", "open", "ord", "pow",
        "print", "property", "range", "repr", "reversed", "round", "setattr", "sorted",
        "staticmethod", "sum", "super", "vars", "zip",
    ]);
    p
}
