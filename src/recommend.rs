use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::AnalyzerConfig;
use crate::enhance::EnhancementResponse;
use crate::findings::{
    DuplicationCategory, DuplicationFinding, Severity, ViolationFinding, ViolationKind,
};

/// A ranked, effort-estimated consolidation suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationRecommendation {
    pub rank: usize,
    pub description: String,
    pub files: Vec<PathBuf>,
    /// Similarity for structural findings, confidence otherwise. In [0, 1].
    pub confidence: f64,
    pub severity: Severity,
    pub effort_hours: f64,
    pub strategy: String,
    pub target: PathBuf,
    pub benefits: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
}

/// Consolidation strategy text for a duplication category.
pub fn strategy_for_duplication(category: DuplicationCategory) -> &'static str {
    match category {
        DuplicationCategory::Structural | DuplicationCategory::Functional => {
            "merge identical functionality"
        }
        DuplicationCategory::Pattern => "extract common pattern to shared abstraction",
    }
}

/// Consolidation strategy text for a violation kind.
pub fn strategy_for_violation(kind: ViolationKind) -> &'static str {
    match kind {
        ViolationKind::Dry => "centralize into configuration",
        ViolationKind::Srp => "define common interface + variants",
        ViolationKind::PatternDuplication => "extract common pattern to shared abstraction",
        ViolationKind::FunctionalDuplication => "merge identical functionality",
        ViolationKind::ArchitecturalReimplementation => "refactor onto existing pattern",
    }
}

const LIBRARY_ROOTS: &[&str] = &["lib", "src", "core", "common", "shared"];
const TOOL_ROOTS: &[&str] = &["tools", "scripts", "bin", "cli", "examples"];

fn path_rank(path: &Path) -> u8 {
    for component in path.components() {
        let Some(name) = component.as_os_str().to_str() else {
            continue;
        };
        if LIBRARY_ROOTS.contains(&name) {
            return 0;
        }
        if TOOL_ROOTS.contains(&name) {
            return 2;
        }
    }
    1
}

/// Pick the consolidation target between two files: a library-rooted path
/// beats a tool- or script-rooted one, ties go to the shorter path string,
/// then to the first file.
pub fn preferred_target(left: &Path, right: &Path) -> PathBuf {
    let (lr, rr) = (path_rank(left), path_rank(right));
    if lr != rr {
        return if lr < rr { left } else { right }.to_path_buf();
    }
    let (ls, rs) = (left.as_os_str().len(), right.as_os_str().len());
    if rs < ls { right } else { left }.to_path_buf()
}

/// Effort estimate in hours: a fixed base, plus more for less-similar code,
/// plus more for each evidence line pair to untangle.
pub fn estimate_effort(cfg: &AnalyzerConfig, similarity: f64, evidence_len: usize) -> f64 {
    cfg.effort_base_hours
        + (1.0 - similarity.clamp(0.0, 1.0)) * cfg.effort_similarity_slope
        + evidence_len as f64 * cfg.effort_per_evidence
}

fn benefits_for_duplication(category: DuplicationCategory) -> Vec<String> {
    let items: &[&str] = match category {
        DuplicationCategory::Structural => &[
            "single source of truth for the shared logic",
            "smaller maintenance surface",
        ],
        DuplicationCategory::Pattern => &[
            "one canonical implementation to review and test",
            "new call sites reuse instead of reimplement",
        ],
        DuplicationCategory::Functional => &[
            "behavior changes land in one place",
            "removes divergent copies of the same feature",
        ],
    };
    items.iter().map(|s| s.to_string()).collect()
}

fn benefits_for_violation(kind: ViolationKind) -> Vec<String> {
    let items: &[&str] = match kind {
        ViolationKind::Dry => &[
            "literal values change in one place",
            "configuration becomes inspectable",
        ],
        ViolationKind::Srp => &[
            "smaller types are easier to test",
            "responsibilities become explicit",
        ],
        ViolationKind::PatternDuplication | ViolationKind::FunctionalDuplication => &[
            "one abstraction instead of parallel copies",
        ],
        ViolationKind::ArchitecturalReimplementation => &[
            "keeps one implementation per responsibility",
            "avoids divergence between parallel subsystems",
        ],
    };
    items.iter().map(|s| s.to_string()).collect()
}

fn from_duplication(finding: &DuplicationFinding) -> ConsolidationRecommendation {
    let category = match finding.category {
        DuplicationCategory::Structural => "structural",
        DuplicationCategory::Pattern => "pattern",
        DuplicationCategory::Functional => "functional",
    };
    ConsolidationRecommendation {
        rank: 0,
        description: format!(
            "Consolidate {} and {} ({category} duplication, similarity {:.2})",
            finding.left.display(),
            finding.right.display(),
            finding.similarity
        ),
        files: vec![finding.left.clone(), finding.right.clone()],
        confidence: finding.similarity,
        severity: finding.severity,
        effort_hours: finding.effort_hours,
        strategy: finding.strategy.clone(),
        target: finding.target.clone(),
        benefits: benefits_for_duplication(finding.category),
        insight: None,
    }
}

fn from_violation(cfg: &AnalyzerConfig, finding: &ViolationFinding) -> ConsolidationRecommendation {
    let target = finding
        .existing_implementations
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| finding.file.clone());
    ConsolidationRecommendation {
        rank: 0,
        description: finding.description.clone(),
        files: vec![finding.file.clone()],
        confidence: finding.debt_score,
        severity: finding.severity,
        effort_hours: estimate_effort(cfg, finding.debt_score, 0),
        strategy: strategy_for_violation(finding.kind).to_string(),
        target,
        benefits: benefits_for_violation(finding.kind),
        insight: None,
    }
}

/// Rank all findings into the top-N consolidation recommendations.
///
/// Ordering is total: severity descending, then confidence descending, with
/// ties left in discovery order (the sort is stable). When the external
/// enhancer produced insights, its top three are attached to every
/// recommendation.
pub fn synthesize(
    cfg: &AnalyzerConfig,
    duplications: &[DuplicationFinding],
    violations: &[ViolationFinding],
    enhancement: Option<&EnhancementResponse>,
) -> Vec<ConsolidationRecommendation> {
    let mut recommendations: Vec<ConsolidationRecommendation> = duplications
        .iter()
        .map(from_duplication)
        .chain(violations.iter().map(|v| from_violation(cfg, v)))
        .collect();

    recommendations.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| b.confidence.total_cmp(&a.confidence))
    });
    recommendations.truncate(cfg.top_recommendations);

    let insight = enhancement.and_then(|resp| {
        if resp.insights.is_empty() {
            None
        } else {
            Some(resp.insights.iter().take(3).cloned().collect::<Vec<_>>().join("; "))
        }
    });

    for (i, rec) in recommendations.iter_mut().enumerate() {
        rec.rank = i + 1;
        rec.insight = insight.clone();
    }
    recommendations
}

#[cfg(test)]
#[path = "recommend_test.rs"]
mod tests;
