use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::AnalyzerConfig;
use crate::findings::{DuplicationCategory, DuplicationFinding};
use crate::parse::SourceFile;
use crate::recommend::{estimate_effort, strategy_for_duplication};
use crate::registry::PatternRule;

/// Semantic duplication via the pattern registry.
///
/// A file matching a rule's text matcher duplicates functionality that
/// already has a canonical home. The finding is only emitted when the
/// canonical target was itself discovered (so it exists and is not
/// excluded) and differs from the matching file. Confidence is fixed —
/// the match is textual, not computed from structure.
pub fn detect_patterns(
    root: &Path,
    files: &[SourceFile],
    discovered: &HashSet<PathBuf>,
    rules: &[PatternRule],
    cfg: &AnalyzerConfig,
) -> Vec<DuplicationFinding> {
    let mut findings = Vec::new();
    for file in files {
        for rule in rules {
            if !file.content.contains(&rule.matcher) {
                continue;
            }
            let target = root.join(&rule.target);
            if target == file.path || !discovered.contains(&target) {
                continue;
            }
            findings.push(DuplicationFinding {
                left: file.path.clone(),
                right: target.clone(),
                similarity: cfg.pattern_confidence,
                category: DuplicationCategory::Pattern,
                severity: rule.severity,
                evidence: Vec::new(),
                strategy: strategy_for_duplication(DuplicationCategory::Pattern).to_string(),
                target,
                effort_hours: estimate_effort(cfg, cfg.pattern_confidence, 0),
            });
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::Severity;
    use crate::registry::Registries;

    fn source(path: PathBuf, content: &str) -> SourceFile {
        SourceFile {
            hash: crate::util::fnv1a(content.as_bytes()),
            size: content.len(),
            content: content.to_string(),
            tree: None,
            path,
        }
    }

    fn rule(matcher: &str, target: &str) -> PatternRule {
        PatternRule {
            id: "test-rule".to_string(),
            matcher: matcher.to_string(),
            target: PathBuf::from(target),
            severity: Severity::High,
            description: "duplicated helper".to_string(),
        }
    }

    #[test]
    fn match_with_existing_target_emits_finding() {
        let root = Path::new("/proj");
        let files = vec![
            source(root.join("new_code.py"), "def calculate_confidence(x):\n    pass\n"),
            source(root.join("analysis/confidence.py"), "def calculate_confidence(x):\n    pass\n"),
        ];
        let discovered: HashSet<_> = files.iter().map(|f| f.path.clone()).collect();
        let rules = vec![rule("def calculate_confidence", "analysis/confidence.py")];

        let findings =
            detect_patterns(root, &files, &discovered, &rules, &AnalyzerConfig::default());
        // only the non-canonical file is flagged
        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert!(finding.left.ends_with("new_code.py"));
        assert!(finding.right.ends_with("analysis/confidence.py"));
        assert_eq!(finding.similarity, 0.8);
        assert_eq!(finding.category, DuplicationCategory::Pattern);
        assert_eq!(finding.severity, Severity::High);
    }

    #[test]
    fn canonical_file_does_not_flag_itself() {
        let root = Path::new("/proj");
        let files = vec![source(
            root.join("analysis/confidence.py"),
            "def calculate_confidence(x):\n    pass\n",
        )];
        let discovered: HashSet<_> = files.iter().map(|f| f.path.clone()).collect();
        let rules = vec![rule("def calculate_confidence", "analysis/confidence.py")];

        let findings =
            detect_patterns(root, &files, &discovered, &rules, &AnalyzerConfig::default());
        assert!(findings.is_empty());
    }

    #[test]
    fn missing_target_emits_nothing() {
        let root = Path::new("/proj");
        let files = vec![source(
            root.join("new_code.py"),
            "def calculate_confidence(x):\n    pass\n",
        )];
        let discovered: HashSet<_> = files.iter().map(|f| f.path.clone()).collect();
        let rules = vec![rule("def calculate_confidence", "analysis/confidence.py")];

        let findings =
            detect_patterns(root, &files, &discovered, &rules, &AnalyzerConfig::default());
        assert!(findings.is_empty());
    }

    #[test]
    fn excluded_target_emits_nothing() {
        let root = Path::new("/proj");
        let files = vec![source(
            root.join("new_code.py"),
            "def calculate_confidence(x):\n    pass\n",
        )];
        // target exists on disk in principle but was excluded from discovery
        let discovered: HashSet<_> = files.iter().map(|f| f.path.clone()).collect();
        let rules = vec![rule("def calculate_confidence", "vendor/confidence.py")];

        let findings =
            detect_patterns(root, &files, &discovered, &rules, &AnalyzerConfig::default());
        assert!(findings.is_empty());
    }

    #[test]
    fn builtin_rules_have_unique_ids() {
        let rules = Registries::builtin().patterns;
        let mut ids: Vec<_> = rules.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), rules.len());
    }
}
