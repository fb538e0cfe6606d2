use std::collections::HashMap;

use crate::config::AnalyzerConfig;
use crate::findings::{Severity, ViolationFinding, ViolationKind};
use crate::parse::SourceFile;
use crate::registry::RoleEntry;
use crate::util::string_literals;

use super::roles::{DeclaredType, declared_types};

/// Idioms that mark a file as configuration-driven: external config loads,
/// keyed lookups with defaults, environment and constant-table indexing.
const CONFIG_MARKERS: &[&str] = &[
    ".get(",
    "load_config",
    "getenv",
    "environ",
    "config[",
    "CONFIG[",
    "settings[",
    "env::var",
    "from_env",
];

/// Literals that are never worth flagging, wherever they repeat.
const ALLOWED_LITERALS: &[&str] = &["utf-8", "__main__", "default", "unknown", "none"];

/// A file is configuration-driven when it shows at least two distinct
/// configuration idioms. Counting distinct markers keeps one noisy idiom
/// from flipping the classification.
pub fn is_config_driven(content: &str) -> bool {
    CONFIG_MARKERS
        .iter()
        .filter(|marker| content.contains(*marker))
        .count()
        >= 2
}

/// Keys and documented defaults are allow-listed: anything without
/// whitespace reads as an identifier or lookup key, not embedded prose.
/// Business-logic-shaped text (URLs, queries) never qualifies.
fn is_allow_listed(literal: &str) -> bool {
    if looks_like_business_logic(literal) {
        return false;
    }
    !literal.contains(char::is_whitespace)
        || ALLOWED_LITERALS.contains(&literal.to_lowercase().as_str())
}

/// Long prose, query-shaped text, and URLs are business logic even inside a
/// configuration-driven file.
fn looks_like_business_logic(literal: &str) -> bool {
    if literal.contains("://") {
        return true;
    }
    let lowered = literal.trim_start().to_lowercase();
    if ["select ", "insert ", "update ", "delete ", "create table"]
        .iter()
        .any(|kw| lowered.starts_with(kw))
    {
        return true;
    }
    literal.len() >= 30 && literal.contains(' ')
}

/// Count string literals of at least the configured length, in first-seen
/// order so repeated runs report identically.
fn literal_counts(file: &SourceFile, cfg: &AnalyzerConfig) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for line in file.content.lines() {
        for literal in string_literals(line) {
            if literal.len() < cfg.dry_min_literal_len {
                continue;
            }
            let entry = counts.entry(literal.clone()).or_insert(0);
            if *entry == 0 {
                order.push(literal);
            }
            *entry += 1;
        }
    }
    order
        .into_iter()
        .map(|lit| {
            let count = counts[&lit];
            (lit, count)
        })
        .collect()
}

/// DRY check over repeated string literals.
///
/// Ordinary files flag any non-allow-listed literal repeated past the
/// ceiling. Configuration-driven files are held to a different bar: keys
/// and defaults are expected there, so only literals shaped like embedded
/// business logic are flagged.
pub fn detect_dry(files: &[SourceFile], cfg: &AnalyzerConfig) -> Vec<ViolationFinding> {
    let mut findings = Vec::new();
    for file in files {
        let config_driven = is_config_driven(&file.content);
        for (literal, count) in literal_counts(file, cfg) {
            let flagged = if config_driven {
                looks_like_business_logic(&literal) && !is_allow_listed(&literal)
            } else {
                count > cfg.dry_repeat_ceiling && !is_allow_listed(&literal)
            };
            if !flagged {
                continue;
            }
            let debt = ((count.saturating_sub(cfg.dry_repeat_ceiling)) as f64 * 0.2)
                .clamp(0.2, 1.0);
            findings.push(ViolationFinding {
                file: file.path.clone(),
                kind: ViolationKind::Dry,
                description: format!(
                    "literal \"{literal}\" repeated {count} times in {}",
                    file.path.display()
                ),
                severity: Severity::Moderate,
                principle: ViolationKind::Dry.principle().to_string(),
                existing_implementations: Vec::new(),
                recommendation: "extract the literal into a named constant or configuration entry"
                    .to_string(),
                debt_score: debt,
            });
        }
    }
    findings
}

/// SRP check: a type declaring more member functions than the ceiling has
/// accumulated too many responsibilities.
pub fn detect_srp(files: &[SourceFile], cfg: &AnalyzerConfig) -> Vec<ViolationFinding> {
    let mut findings = Vec::new();
    for file in files {
        for declared in declared_types(file) {
            let count = declared.methods.len();
            if count <= cfg.srp_method_ceiling {
                continue;
            }
            let debt = ((count - cfg.srp_method_ceiling) as f64 / cfg.srp_method_ceiling as f64)
                .clamp(0.1, 1.0);
            findings.push(ViolationFinding {
                file: file.path.clone(),
                kind: ViolationKind::Srp,
                description: format!(
                    "type {} declares {count} methods (ceiling {}), suggesting too many responsibilities",
                    declared.name, cfg.srp_method_ceiling
                ),
                severity: Severity::Moderate,
                principle: ViolationKind::Srp.principle().to_string(),
                existing_implementations: Vec::new(),
                recommendation: format!(
                    "split {} along its responsibility seams",
                    declared.name
                ),
                debt_score: debt,
            });
        }
    }
    findings
}

fn types_matching_role<'a>(types: &'a [DeclaredType], role: &RoleEntry) -> Vec<&'a DeclaredType> {
    types
        .iter()
        .filter(|t| {
            let lower = t.name.to_lowercase();
            role.class_indicators
                .iter()
                .any(|ind| lower.contains(&ind.to_lowercase()))
        })
        .collect()
}

/// Pattern duplication inside one file: two or more declared types matching
/// the same architectural-role pattern belong behind a single abstraction.
pub fn detect_same_file_pattern_duplication(
    files: &[SourceFile],
    roles: &[RoleEntry],
) -> Vec<ViolationFinding> {
    let mut findings = Vec::new();
    for file in files {
        let types = declared_types(file);
        for role in roles {
            let matching = types_matching_role(&types, role);
            if matching.len() < 2 {
                continue;
            }
            let severity = if matching.len() >= 3 {
                Severity::High
            } else {
                Severity::Moderate
            };
            let names: Vec<_> = matching.iter().map(|t| t.name.as_str()).collect();
            let target = role
                .implementers
                .first()
                .map(|i| i.path.display().to_string())
                .unwrap_or_else(|| role.role.clone());
            findings.push(ViolationFinding {
                file: file.path.clone(),
                kind: ViolationKind::PatternDuplication,
                description: format!(
                    "{} declares {} types matching the '{}' role: {}",
                    file.path.display(),
                    matching.len(),
                    role.role,
                    names.join(", ")
                ),
                severity,
                principle: ViolationKind::PatternDuplication.principle().to_string(),
                existing_implementations: vec![target.clone()],
                recommendation: format!("consolidate {} into {target}", names.join(", ")),
                debt_score: if matching.len() >= 3 { 0.8 } else { 0.6 },
            });
        }
    }
    findings
}

#[cfg(test)]
#[path = "violations_test.rs"]
mod tests;
