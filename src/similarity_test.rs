use super::*;
use crate::findings::Severity;
use crate::parse::parse_source;
use std::path::{Path, PathBuf};

fn source(name: &str, content: &str) -> SourceFile {
    let path = PathBuf::from(name);
    let tree = parse_source(&path, content).ok();
    SourceFile {
        hash: crate::util::fnv1a(content.as_bytes()),
        size: content.len(),
        content: content.to_string(),
        path,
        tree,
    }
}

const PROCESS: &str = "\
import os

def process(items):
    for item in items:
        if item.ready:
            return item.value
    total = 0
    return total
";

const UNRELATED: &str = "\
class Config:
    def __init__(self):
        self.values = {}
";

fn set_of(words: &[&str]) -> std::collections::BTreeSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[test]
fn jaccard_identical_sets_is_one() {
    let a = set_of(&["module", "call", "branch:if"]);
    assert_eq!(jaccard(&a, &a), 1.0);
}

#[test]
fn jaccard_disjoint_sets_is_zero() {
    let a = set_of(&["module"]);
    let b = set_of(&["call"]);
    assert_eq!(jaccard(&a, &b), 0.0);
}

#[test]
fn jaccard_is_symmetric() {
    let a = set_of(&["module", "call", "loop:for"]);
    let b = set_of(&["module", "return"]);
    assert_eq!(jaccard(&a, &b), jaccard(&b, &a));
}

#[test]
fn jaccard_partial_overlap() {
    let a = set_of(&["module", "call"]);
    let b = set_of(&["module", "return"]);
    // 1 shared of 3 total
    assert!((jaccard(&a, &b) - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn jaccard_empty_sets_are_identical() {
    let empty = set_of(&[]);
    assert_eq!(jaccard(&empty, &empty), 1.0);
}

#[test]
fn self_similarity_is_one() {
    let file = source("a.py", PROCESS);
    let set = file.tree.as_ref().unwrap().kind_set();
    assert_eq!(jaccard(&set, &set), 1.0);
}

#[test]
fn identical_files_yield_critical_finding() {
    let cfg = AnalyzerConfig::default();
    let files = vec![source("a.py", PROCESS), source("b.py", PROCESS)];

    let findings = detect_structural(&files, &cfg);
    assert_eq!(findings.len(), 1);
    let finding = &findings[0];
    assert_eq!(finding.similarity, 1.0);
    assert_eq!(finding.category, DuplicationCategory::Structural);
    assert_eq!(finding.severity, Severity::Critical);
}

#[test]
fn unrelated_files_stay_below_threshold() {
    let cfg = AnalyzerConfig::default();
    let files = vec![source("a.py", PROCESS), source("b.py", UNRELATED)];

    let findings = detect_structural(&files, &cfg);
    assert!(findings.is_empty());
}

#[test]
fn unparsed_files_are_not_compared() {
    let cfg = AnalyzerConfig::default();
    let mut broken = source("a.py", PROCESS);
    broken.tree = None;
    let files = vec![broken, source("b.py", PROCESS)];

    assert!(detect_structural(&files, &cfg).is_empty());
}

#[test]
fn size_floor_skips_trivial_files() {
    let mut cfg = AnalyzerConfig::default();
    cfg.min_structural_nodes = 50;
    let files = vec![source("a.py", PROCESS), source("b.py", PROCESS)];

    assert!(detect_structural(&files, &cfg).is_empty());
}

#[test]
fn findings_are_in_discovery_order() {
    let cfg = AnalyzerConfig::default();
    let files = vec![
        source("a.py", PROCESS),
        source("b.py", PROCESS),
        source("c.py", PROCESS),
    ];

    let findings = detect_structural(&files, &cfg);
    assert_eq!(findings.len(), 3);
    assert!(findings[0].left.ends_with("a.py") && findings[0].right.ends_with("b.py"));
    assert!(findings[1].left.ends_with("a.py") && findings[1].right.ends_with("c.py"));
    assert!(findings[2].left.ends_with("b.py") && findings[2].right.ends_with("c.py"));
}

#[test]
fn evidence_pairs_match_identical_trimmed_lines() {
    let cfg = AnalyzerConfig::default();
    let left = source("a.py", "    total_count = compute_total()\nshort\n");
    let right = source("b.py", "total_count = compute_total()\n");

    let evidence = match_evidence(&left, &right, &cfg);
    assert_eq!(evidence.len(), 1);
    assert_eq!(evidence[0].left_line, 1);
    assert_eq!(evidence[0].right_line, 1);
    assert_eq!(evidence[0].text, "total_count = compute_total()");
}

#[test]
fn evidence_ignores_short_lines() {
    let cfg = AnalyzerConfig::default();
    let left = source("a.py", "x = 1\n");
    let right = source("b.py", "x = 1\n");

    assert!(match_evidence(&left, &right, &cfg).is_empty());
}

#[test]
fn evidence_capped_at_configured_maximum() {
    let cfg = AnalyzerConfig::default();
    let many: String = (0..40)
        .map(|i| format!("value_{i:02} = compute_step()\n"))
        .collect();
    let left = source("a.py", &many);
    let right = source("b.py", &many);

    let evidence = match_evidence(&left, &right, &cfg);
    assert_eq!(evidence.len(), cfg.evidence_cap);
}

#[test]
fn evidence_does_not_gate_similarity() {
    let cfg = AnalyzerConfig::default();
    // identical structure but no line long enough for evidence
    let files = vec![source("a.py", "x = 1\n"), source("b.py", "y = 2\n")];
    let mut cfg_low = cfg.clone();
    cfg_low.min_structural_nodes = 1;

    let findings = detect_structural(&files, &cfg_low);
    assert_eq!(findings.len(), 1);
    assert!(findings[0].evidence.is_empty());
    assert_eq!(findings[0].similarity, 1.0);
}

#[test]
fn severity_tracks_similarity_breakpoints() {
    let cfg = AnalyzerConfig::default();
    for (score, expected) in [
        (0.96, Severity::Critical),
        (0.86, Severity::High),
        (0.76, Severity::Moderate),
        (0.50, Severity::Low),
    ] {
        assert_eq!(cfg.severity_for_similarity(score), expected);
    }
}
