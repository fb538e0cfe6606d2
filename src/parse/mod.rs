pub mod markers;
pub mod node;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AnalyzerError, SkippedItem};
use crate::util::{fnv1a, is_binary, mask_strings, string_literals};
use markers::{StructuralMarkers, markers_for_path};
use node::{NodeKind, SyntaxNode};

/// One discovered file, loaded once per run and immutable afterwards.
/// `tree` is absent when the file could not be parsed; the raw content is
/// still available to every text-based detector.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
    pub hash: u64,
    pub size: usize,
    pub tree: Option<SyntaxNode>,
}

/// Read and parse one candidate file.
///
/// Unreadable, binary, or undecodable files are unusable and return `Err`.
/// A structural parse failure is not: the file is kept with `tree = None`
/// and the failure is returned as a skip record for report metadata.
pub fn load_source(path: &Path) -> Result<(SourceFile, Option<SkippedItem>), AnalyzerError> {
    let bytes = fs::read(path).map_err(|err| AnalyzerError::FileAccess {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    if is_binary(&bytes) {
        return Err(AnalyzerError::Parse {
            path: path.to_path_buf(),
            reason: "binary content".to_string(),
        });
    }
    let content = String::from_utf8(bytes).map_err(|_| AnalyzerError::Parse {
        path: path.to_path_buf(),
        reason: "not valid UTF-8".to_string(),
    })?;

    let hash = fnv1a(content.as_bytes());
    let size = content.len();
    let (tree, warning) = match parse_source(path, &content) {
        Ok(tree) => (Some(tree), None),
        Err(err) => (None, Some(err.to_skipped())),
    };

    Ok((
        SourceFile {
            path: path.to_path_buf(),
            content,
            hash,
            size,
            tree,
        },
        warning,
    ))
}

/// Parse file text into a tree of typed nodes.
///
/// The parser is line oriented and deterministic: identical input always
/// yields an identical tree. Nesting follows braces or indentation depending
/// on the language's markers.
pub fn parse_source(path: &Path, content: &str) -> Result<SyntaxNode, AnalyzerError> {
    let markers = markers_for_path(path).ok_or_else(|| AnalyzerError::Parse {
        path: path.to_path_buf(),
        reason: "unsupported language".to_string(),
    })?;

    let mut root = SyntaxNode::new(NodeKind::Module, None, 0);
    // Open scopes only; closing a scope attaches it to the next one down,
    // or to the root when the stack is empty.
    let mut stack: Vec<(usize, SyntaxNode)> = Vec::new();
    let mut brace_depth: usize = 0;

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let masked = mask_strings(trimmed);
        if is_comment(&masked) {
            continue;
        }

        let depth = if markers.brace_scoped {
            let leading_closes = masked
                .chars()
                .take_while(|c| matches!(c, '}' | ')' | ']' | ' ' | '\t' | ';'))
                .filter(|c| *c == '}')
                .count();
            let opens = masked.matches('{').count();
            let closes = masked.matches('}').count();
            let depth = (brace_depth.saturating_sub(leading_closes)) + 1;
            brace_depth = (brace_depth + opens).saturating_sub(closes);
            if is_only_closers(&masked) {
                continue;
            }
            depth
        } else {
            leading_whitespace(raw) + 1
        };

        // Close every scope at or below this depth before attaching.
        while stack.last().is_some_and(|(d, _)| *d >= depth) {
            close_scope(&mut stack, &mut root);
        }

        let (kind, name) = classify_line(&masked, markers);
        let mut node = SyntaxNode::new(kind, name, line_no);
        for lit in string_literals(trimmed) {
            if !lit.trim().is_empty() {
                node.children
                    .push(SyntaxNode::new(NodeKind::StringLiteral, None, line_no));
                break;
            }
        }
        if has_number_literal(&masked) {
            node.children
                .push(SyntaxNode::new(NodeKind::NumberLiteral, None, line_no));
        }

        if can_nest(kind) {
            stack.push((depth, node));
        } else if let Some((_, open)) = stack.last_mut() {
            open.children.push(node);
        } else {
            root.children.push(node);
        }
    }

    while !stack.is_empty() {
        close_scope(&mut stack, &mut root);
    }
    Ok(root)
}

/// Pop the innermost open scope and attach it to its parent.
fn close_scope(stack: &mut Vec<(usize, SyntaxNode)>, root: &mut SyntaxNode) {
    if let Some((_, done)) = stack.pop() {
        match stack.last_mut() {
            Some((_, parent)) => parent.children.push(done),
            None => root.children.push(done),
        }
    }
}

fn can_nest(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::TypeDecl
            | NodeKind::FunctionDecl
            | NodeKind::Branch
            | NodeKind::Loop
            | NodeKind::ErrorHandler
    )
}

fn is_comment(masked: &str) -> bool {
    if masked.starts_with("//") || masked.starts_with("/*") || masked.starts_with("--") {
        return true;
    }
    if masked.starts_with('*') && !masked.starts_with("*=") {
        return true;
    }
    // '#' opens a comment everywhere except C-preprocessor includes.
    masked.starts_with('#') && !masked.starts_with("#include")
}

fn is_only_closers(masked: &str) -> bool {
    masked
        .chars()
        .all(|c| matches!(c, '}' | ')' | ']' | ';' | ',' | ' ' | '\t'))
}

fn leading_whitespace(raw: &str) -> usize {
    raw.chars().take_while(|c| c.is_whitespace()).count()
}

fn strip_modifiers<'a>(mut line: &'a str, markers: &StructuralMarkers) -> &'a str {
    loop {
        let mut stripped = false;
        for modifier in markers.modifiers {
            if let Some(rest) = line.strip_prefix(modifier) {
                line = rest;
                stripped = true;
            }
        }
        if !stripped {
            return line;
        }
    }
}

/// Identifier immediately following a declaration keyword.
fn declared_name(rest: &str) -> Option<String> {
    let name: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if name.is_empty() { None } else { Some(name) }
}

fn match_keyword(line: &str, keywords: &[&'static str]) -> Option<&'static str> {
    keywords
        .iter()
        .find(|kw| {
            if kw.ends_with(' ') || kw.ends_with(':') || kw.ends_with('(') {
                return line.starts_with(*kw) || line == kw.trim_end();
            }
            match line.strip_prefix(*kw).and_then(|rest| rest.chars().next()) {
                None => line.starts_with(*kw),
                Some(c) => !c.is_alphanumeric() && c != '_',
            }
        })
        .copied()
}

fn has_assignment(masked: &str) -> bool {
    let bytes = masked.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b != b'=' {
            continue;
        }
        let prev = if i > 0 { bytes[i - 1] } else { b' ' };
        let next = bytes.get(i + 1).copied().unwrap_or(b' ');
        if prev != b'=' && prev != b'!' && prev != b'<' && prev != b'>' && next != b'=' && next != b'>' {
            return true;
        }
    }
    false
}

fn has_number_literal(masked: &str) -> bool {
    let mut prev = ' ';
    for c in masked.chars() {
        if c.is_ascii_digit() && !prev.is_alphanumeric() && prev != '_' && prev != '.' {
            return true;
        }
        prev = c;
    }
    false
}

/// Classify one masked, trimmed line into its primary node kind.
fn classify_line(masked: &str, markers: &StructuralMarkers) -> (NodeKind, Option<String>) {
    let line = strip_modifiers(masked, markers);

    if let Some(kw) = match_keyword(line, markers.type_keywords) {
        return (NodeKind::TypeDecl, declared_name(&line[kw.len().min(line.len())..]));
    }
    if let Some(kw) = match_keyword(line, markers.function_keywords) {
        return (
            NodeKind::FunctionDecl,
            declared_name(&line[kw.len().min(line.len())..]),
        );
    }
    if let Some(kw) = match_keyword(line, markers.branch_keywords) {
        return (NodeKind::Branch, Some(keyword_label(kw)));
    }
    if let Some(kw) = match_keyword(line, markers.loop_keywords) {
        return (NodeKind::Loop, Some(keyword_label(kw)));
    }
    if let Some(kw) = match_keyword(line, markers.error_keywords) {
        return (NodeKind::ErrorHandler, Some(keyword_label(kw)));
    }
    if match_keyword(line, markers.return_keywords).is_some() {
        return (NodeKind::Return, None);
    }
    if let Some(kw) = match_keyword(line, markers.import_keywords) {
        return (NodeKind::Import, Some(keyword_label(kw)));
    }
    if has_assignment(line) {
        return (NodeKind::Assignment, None);
    }
    if line.contains('(') {
        return (NodeKind::Call, None);
    }
    (NodeKind::Statement, None)
}

fn keyword_label(kw: &str) -> String {
    kw.trim().trim_end_matches(':').trim_end_matches('(').to_string()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
