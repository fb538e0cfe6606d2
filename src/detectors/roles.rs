use std::path::Path;

use crate::findings::{Severity, ViolationFinding, ViolationKind};
use crate::parse::SourceFile;
use crate::parse::node::NodeKind;
use crate::registry::{IdiomRule, RoleEntry};

/// A type declared in one file, with the names of its member functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredType {
    pub name: String,
    pub methods: Vec<String>,
    pub line: usize,
}

/// Collect the types a file declares from its parse tree. Declarations of
/// the same name (e.g. a Rust struct and its impl blocks) are merged.
pub fn declared_types(file: &SourceFile) -> Vec<DeclaredType> {
    let Some(tree) = &file.tree else {
        return Vec::new();
    };

    let mut types: Vec<DeclaredType> = Vec::new();
    tree.walk(&mut |node| {
        if node.kind != NodeKind::TypeDecl {
            return;
        }
        let Some(name) = node.name.clone() else {
            return;
        };
        let mut methods = Vec::new();
        for child in &node.children {
            child.walk(&mut |inner| {
                if inner.kind == NodeKind::FunctionDecl
                    && let Some(method) = &inner.name
                {
                    methods.push(method.clone());
                }
            });
        }
        if let Some(existing) = types.iter_mut().find(|t| t.name == name) {
            existing.methods.extend(methods);
        } else {
            types.push(DeclaredType {
                name,
                methods,
                line: node.line,
            });
        }
    });
    types
}

fn is_known_implementer(file: &Path, paths: &[std::path::PathBuf]) -> bool {
    paths.iter().any(|p| file.ends_with(p))
}

/// Idiom reimplementation: a known micro-pattern matched in a file outside
/// its known-implementer list.
pub fn detect_idioms(files: &[SourceFile], idioms: &[IdiomRule]) -> Vec<ViolationFinding> {
    let mut findings = Vec::new();
    for file in files {
        for idiom in idioms {
            if !file.content.contains(&idiom.matcher)
                || is_known_implementer(&file.path, &idiom.implementers)
            {
                continue;
            }
            let existing: Vec<String> = idiom
                .implementers
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            findings.push(ViolationFinding {
                file: file.path.clone(),
                kind: ViolationKind::FunctionalDuplication,
                description: format!(
                    "{} reimplements '{}' ({}) already implemented in: {}",
                    file.path.display(),
                    idiom.id,
                    idiom.description,
                    existing.join(", ")
                ),
                severity: Severity::High,
                principle: ViolationKind::FunctionalDuplication.principle().to_string(),
                existing_implementations: existing,
                recommendation: format!("reuse the existing '{}' implementation", idiom.id),
                debt_score: 0.7,
            });
        }
    }
    findings
}

fn type_matches_role(declared: &DeclaredType, role: &RoleEntry) -> bool {
    let lower_name = declared.name.to_lowercase();
    if role
        .class_indicators
        .iter()
        .any(|ind| lower_name.contains(&ind.to_lowercase()))
    {
        return true;
    }
    // Several matching method names are as telling as the type name.
    let hits = role
        .method_indicators
        .iter()
        .filter(|ind| {
            declared
                .methods
                .iter()
                .any(|m| m.to_lowercase().contains(&ind.to_lowercase()))
        })
        .count();
    hits >= 2
}

/// Architectural-role reimplementation: a newly declared type whose name or
/// methods indicate a responsibility that already has implementers elsewhere.
///
/// At most one violation per declared type — the first matching role wins —
/// so a type straddling two role definitions is not reported twice.
pub fn detect_role_reimplementations(
    files: &[SourceFile],
    roles: &[RoleEntry],
) -> Vec<ViolationFinding> {
    let mut findings = Vec::new();
    for file in files {
        for declared in declared_types(file) {
            let Some(role) = roles.iter().find(|r| type_matches_role(&declared, r)) else {
                continue;
            };
            let implementer_paths: Vec<_> =
                roles_implementer_paths(role);
            if is_known_implementer(&file.path, &implementer_paths) {
                continue;
            }
            let existing: Vec<String> = role
                .implementers
                .iter()
                .map(|i| format!("{} ({})", i.type_name, i.path.display()))
                .collect();
            findings.push(ViolationFinding {
                file: file.path.clone(),
                kind: ViolationKind::ArchitecturalReimplementation,
                description: format!(
                    "type {} reimplements the '{}' role already fulfilled by: {}",
                    declared.name,
                    role.role,
                    existing.join(", ")
                ),
                severity: Severity::Critical,
                principle: ViolationKind::ArchitecturalReimplementation
                    .principle()
                    .to_string(),
                existing_implementations: existing,
                recommendation: format!(
                    "extend or consolidate with the existing '{}' implementation instead of adding {}",
                    role.role, declared.name
                ),
                debt_score: 0.9,
            });
        }
    }
    findings
}

fn roles_implementer_paths(role: &RoleEntry) -> Vec<std::path::PathBuf> {
    role.implementers.iter().map(|i| i.path.clone()).collect()
}

#[cfg(test)]
#[path = "roles_test.rs"]
mod tests;
