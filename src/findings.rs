use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Ordinal severity assigned to every finding. The derived order
/// (`Low < Moderate < High < Critical`) is what the synthesizer sorts on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Moderate => "MODERATE",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

/// How a duplication finding was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicationCategory {
    /// Near-identical parse trees (node-kind-set Jaccard).
    Structural,
    /// Registry matcher hit pointing at an existing canonical implementation.
    Pattern,
    /// Reimplementation of the same functionality with different code.
    Functional,
}

/// A pair of exactly matching trimmed lines, attached as corroborating
/// evidence to a structural finding. Does not gate the similarity score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidencePair {
    pub left_line: usize,
    pub right_line: usize,
    pub text: String,
}

/// Two files implementing overlapping functionality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicationFinding {
    pub left: PathBuf,
    pub right: PathBuf,
    /// Similarity or fixed confidence, always in [0, 1].
    pub similarity: f64,
    pub category: DuplicationCategory,
    pub severity: Severity,
    pub evidence: Vec<EvidencePair>,
    pub strategy: String,
    pub target: PathBuf,
    pub effort_hours: f64,
}

/// The principle a violation finding breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Dry,
    Srp,
    PatternDuplication,
    FunctionalDuplication,
    ArchitecturalReimplementation,
}

impl ViolationKind {
    /// Name of the violated principle, as reported to the user.
    pub fn principle(self) -> &'static str {
        match self {
            ViolationKind::Dry => "Don't Repeat Yourself",
            ViolationKind::Srp => "Single Responsibility Principle",
            ViolationKind::PatternDuplication => "Shared Pattern Abstraction",
            ViolationKind::FunctionalDuplication => "Single Source of Functionality",
            ViolationKind::ArchitecturalReimplementation => "Architectural Consistency",
        }
    }
}

/// A single-file architectural or principle violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationFinding {
    pub file: PathBuf,
    pub kind: ViolationKind,
    pub description: String,
    pub severity: Severity,
    pub principle: String,
    /// Existing implementations the new code should build on.
    pub existing_implementations: Vec<String>,
    pub recommendation: String,
    /// Technical-debt score in [0, 1].
    pub debt_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Low < Severity::Moderate);
        assert!(Severity::Moderate < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Severity::Critical).unwrap(),
            "\"critical\""
        );
    }

    #[test]
    fn violation_kind_principles() {
        assert_eq!(ViolationKind::Dry.principle(), "Don't Repeat Yourself");
        assert!(
            ViolationKind::ArchitecturalReimplementation
                .principle()
                .contains("Architectural")
        );
    }
}
