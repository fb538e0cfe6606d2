use std::time::Duration;

use crate::findings::Severity;

/// All tunable thresholds for one analysis run, gathered in one place so
/// nothing in the pipeline carries its own magic numbers.
///
/// The defaults match the documented behavior of the analyzer; every field
/// can be overridden before constructing an [`crate::Analyzer`].
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Minimum Jaccard score for a pair of files to become a structural finding.
    pub similarity_threshold: f64,
    /// Similarity breakpoint for `Moderate` severity.
    pub severity_moderate: f64,
    /// Similarity breakpoint for `High` severity.
    pub severity_high: f64,
    /// Similarity breakpoint for `Critical` severity.
    pub severity_critical: f64,
    /// Files whose parse tree has fewer nodes than this are skipped by the
    /// pairwise comparison (the O(F²) size floor).
    pub min_structural_nodes: usize,
    /// Trimmed lines shorter than this never count as match evidence.
    pub evidence_min_line_len: usize,
    /// Maximum evidence line pairs attached to a structural finding.
    pub evidence_cap: usize,
    /// Fixed confidence for pattern-registry matches (not computed from structure).
    pub pattern_confidence: f64,
    /// String literals shorter than this are ignored by the DRY check.
    pub dry_min_literal_len: usize,
    /// Repetitions above this count flag a literal in a non-configuration file.
    pub dry_repeat_ceiling: usize,
    /// Method count above this flags a type as having too many responsibilities.
    pub srp_method_ceiling: usize,
    /// How many recommendations the synthesizer keeps.
    pub top_recommendations: usize,
    /// Base hours in the effort estimate.
    pub effort_base_hours: f64,
    /// Hours added per unit of dissimilarity.
    pub effort_similarity_slope: f64,
    /// Hours added per evidence line pair.
    pub effort_per_evidence: f64,
    /// Timeout for the optional external reasoning call.
    pub enhancer_timeout: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            similarity_threshold: 0.40,
            severity_moderate: 0.75,
            severity_high: 0.85,
            severity_critical: 0.95,
            min_structural_nodes: 3,
            evidence_min_line_len: 10,
            evidence_cap: 20,
            pattern_confidence: 0.8,
            dry_min_literal_len: 10,
            dry_repeat_ceiling: 2,
            srp_method_ceiling: 15,
            top_recommendations: 10,
            effort_base_hours: 2.0,
            effort_similarity_slope: 4.0,
            effort_per_evidence: 2.0,
            enhancer_timeout: Duration::from_secs(10),
        }
    }
}

impl AnalyzerConfig {
    /// Map a structural similarity score to a severity level.
    pub fn severity_for_similarity(&self, score: f64) -> Severity {
        if score >= self.severity_critical {
            Severity::Critical
        } else if score >= self.severity_high {
            Severity::High
        } else if score >= self.severity_moderate {
            Severity::Moderate
        } else {
            Severity::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_thresholds() {
        let cfg = AnalyzerConfig::default();
        assert_eq!(cfg.similarity_threshold, 0.40);
        assert_eq!(cfg.dry_repeat_ceiling, 2);
        assert_eq!(cfg.srp_method_ceiling, 15);
        assert_eq!(cfg.top_recommendations, 10);
        assert_eq!(cfg.effort_base_hours, 2.0);
    }

    #[test]
    fn severity_mapping_breakpoints() {
        let cfg = AnalyzerConfig::default();
        assert_eq!(cfg.severity_for_similarity(1.0), Severity::Critical);
        assert_eq!(cfg.severity_for_similarity(0.95), Severity::Critical);
        assert_eq!(cfg.severity_for_similarity(0.90), Severity::High);
        assert_eq!(cfg.severity_for_similarity(0.85), Severity::High);
        assert_eq!(cfg.severity_for_similarity(0.80), Severity::Moderate);
        assert_eq!(cfg.severity_for_similarity(0.75), Severity::Moderate);
        assert_eq!(cfg.severity_for_similarity(0.50), Severity::Low);
    }

    #[test]
    fn severity_monotone_in_similarity() {
        let cfg = AnalyzerConfig::default();
        let mut prev = Severity::Low;
        for step in 0..=100 {
            let score = step as f64 / 100.0;
            let sev = cfg.severity_for_similarity(score);
            assert!(sev >= prev, "severity dropped at score {score}");
            prev = sev;
        }
    }
}
