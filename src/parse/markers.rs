use std::path::Path;

/// Per-language structural markers used by the line-oriented parser.
///
/// Keywords are matched at the start of a masked, trimmed line after any
/// leading modifiers have been stripped. `brace_scoped` selects how nesting
/// depth is tracked: brace counting or indentation.
pub struct StructuralMarkers {
    pub type_keywords: &'static [&'static str],
    pub function_keywords: &'static [&'static str],
    pub branch_keywords: &'static [&'static str],
    pub loop_keywords: &'static [&'static str],
    pub error_keywords: &'static [&'static str],
    pub return_keywords: &'static [&'static str],
    pub import_keywords: &'static [&'static str],
    /// Leading modifiers stripped before keyword matching.
    pub modifiers: &'static [&'static str],
    pub brace_scoped: bool,
}

static RUST: StructuralMarkers = StructuralMarkers {
    type_keywords: &["struct ", "enum ", "trait ", "impl ", "union "],
    function_keywords: &["fn "],
    branch_keywords: &["if ", "else", "match "],
    loop_keywords: &["for ", "while ", "loop"],
    error_keywords: &[],
    return_keywords: &["return"],
    import_keywords: &["use ", "mod ", "extern crate "],
    modifiers: &["pub(crate) ", "pub ", "async ", "unsafe ", "const "],
    brace_scoped: true,
};

static PYTHON: StructuralMarkers = StructuralMarkers {
    type_keywords: &["class "],
    function_keywords: &["def "],
    branch_keywords: &["if ", "elif ", "else:", "else "],
    loop_keywords: &["for ", "while "],
    error_keywords: &["try:", "try ", "except", "finally"],
    return_keywords: &["return", "yield"],
    import_keywords: &["import ", "from "],
    modifiers: &["async "],
    brace_scoped: false,
};

static JAVASCRIPT: StructuralMarkers = StructuralMarkers {
    type_keywords: &["class ", "interface ", "enum ", "type "],
    function_keywords: &["function ", "def "],
    branch_keywords: &["if ", "else", "switch ", "case "],
    loop_keywords: &["for ", "while ", "do "],
    error_keywords: &["try", "catch", "finally"],
    return_keywords: &["return"],
    import_keywords: &["import ", "export ", "require("],
    modifiers: &["export ", "async ", "static ", "public ", "private "],
    brace_scoped: true,
};

static GO: StructuralMarkers = StructuralMarkers {
    type_keywords: &["type "],
    function_keywords: &["func "],
    branch_keywords: &["if ", "else", "switch ", "case ", "select"],
    loop_keywords: &["for "],
    error_keywords: &["defer ", "recover("],
    return_keywords: &["return"],
    import_keywords: &["import ", "package "],
    modifiers: &[],
    brace_scoped: true,
};

static C_FAMILY: StructuralMarkers = StructuralMarkers {
    type_keywords: &[
        "class ", "struct ", "enum ", "interface ", "union ", "record ",
    ],
    function_keywords: &["void ", "int ", "fn ", "func "],
    branch_keywords: &["if ", "else", "switch ", "case "],
    loop_keywords: &["for ", "while ", "do "],
    error_keywords: &["try", "catch", "finally"],
    return_keywords: &["return"],
    import_keywords: &["#include", "import ", "using ", "package "],
    modifiers: &[
        "public ", "private ", "protected ", "static ", "final ", "abstract ", "virtual ",
    ],
    brace_scoped: true,
};

static RUBY: StructuralMarkers = StructuralMarkers {
    type_keywords: &["class ", "module "],
    function_keywords: &["def "],
    branch_keywords: &["if ", "elsif ", "else", "unless ", "case "],
    loop_keywords: &["for ", "while ", "until "],
    error_keywords: &["begin", "rescue", "ensure"],
    return_keywords: &["return"],
    import_keywords: &["require ", "require_relative "],
    modifiers: &[],
    brace_scoped: false,
};

/// Look up structural markers for a path by file extension.
pub fn markers_for_path(path: &Path) -> Option<&'static StructuralMarkers> {
    let ext = path.extension()?.to_str()?;
    match ext {
        "rs" => Some(&RUST),
        "py" => Some(&PYTHON),
        "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" => Some(&JAVASCRIPT),
        "go" => Some(&GO),
        "java" | "kt" | "cs" | "c" | "cc" | "cpp" | "h" | "hpp" | "php" | "swift" | "scala" => {
            Some(&C_FAMILY)
        }
        "rb" => Some(&RUBY),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_is_brace_scoped() {
        let m = markers_for_path(Path::new("lib.rs")).unwrap();
        assert!(m.brace_scoped);
        assert!(m.type_keywords.contains(&"struct "));
    }

    #[test]
    fn python_is_indent_scoped() {
        let m = markers_for_path(Path::new("app.py")).unwrap();
        assert!(!m.brace_scoped);
        assert!(m.function_keywords.contains(&"def "));
    }

    #[test]
    fn c_family_is_shared() {
        let java = markers_for_path(Path::new("A.java")).unwrap();
        let cs = markers_for_path(Path::new("A.cs")).unwrap();
        assert!(std::ptr::eq(java, cs));
    }

    #[test]
    fn unknown_extension_has_no_markers() {
        assert!(markers_for_path(Path::new("notes.txt")).is_none());
        assert!(markers_for_path(Path::new("Makefile")).is_none());
    }
}
