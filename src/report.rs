//! Final report assembly and output.
//!
//! Everything the pipeline computed ends up in one [`AnalysisReport`]: counts,
//! severity tallies, ranked recommendations, skipped-item metadata and the
//! fixed prevention-strategy catalog. The report serializes to JSON and has a
//! text printer for the CLI.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::SkippedItem;
use crate::findings::Severity;
use crate::recommend::ConsolidationRecommendation;

/// Duplication counts by category. Pattern and functional findings are
/// grouped under `semantic`; only tree-comparison findings are `structural`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicationCounts {
    pub structural: usize,
    pub semantic: usize,
    pub total: usize,
}

/// Tally of findings per severity level, across duplications and violations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBreakdown {
    pub low: usize,
    pub moderate: usize,
    pub high: usize,
    pub critical: usize,
}

impl SeverityBreakdown {
    pub fn tally(&mut self, severity: Severity) {
        match severity {
            Severity::Low => self.low += 1,
            Severity::Moderate => self.moderate += 1,
            Severity::High => self.high += 1,
            Severity::Critical => self.critical += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.moderate + self.high + self.critical
    }
}

/// One entry of the static prevention-strategy catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreventionStrategy {
    pub name: String,
    pub description: String,
}

/// The fixed catalog attached to every report. Informational only, never
/// computed from the run.
pub fn prevention_catalog() -> Vec<PreventionStrategy> {
    [
        (
            "pre-merge duplication gate",
            "run duplication analysis in CI and block merges that introduce high-severity findings",
        ),
        (
            "architecture decision records",
            "record where each responsibility lives so new code extends instead of reimplements",
        ),
        (
            "review checklist",
            "ask in review whether the change duplicates an existing implementation",
        ),
        (
            "automated refactor suggestions",
            "surface consolidation recommendations directly in the development workflow",
        ),
        (
            "shared pattern library",
            "keep canonical implementations of common patterns discoverable in one place",
        ),
    ]
    .iter()
    .map(|(name, description)| PreventionStrategy {
        name: name.to_string(),
        description: description.to_string(),
    })
    .collect()
}

/// Complete result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub timestamp: String,
    pub processing_time_seconds: f64,
    pub files_analyzed: usize,
    pub duplications_found: DuplicationCounts,
    pub architectural_violations: usize,
    pub severity_breakdown: SeverityBreakdown,
    pub consolidation_recommendations: Vec<ConsolidationRecommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_enhancement: Option<crate::enhance::EnhancementResponse>,
    pub prevention_strategies: Vec<PreventionStrategy>,
    pub skipped_items: Vec<SkippedItem>,
    /// True when a deadline expired before all stages ran.
    pub partial: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisReport {
    /// An empty report shell stamped with the current time.
    pub fn empty(elapsed: Duration) -> Self {
        AnalysisReport {
            timestamp: Utc::now().to_rfc3339(),
            processing_time_seconds: elapsed.as_secs_f64(),
            files_analyzed: 0,
            duplications_found: DuplicationCounts::default(),
            architectural_violations: 0,
            severity_breakdown: SeverityBreakdown::default(),
            consolidation_recommendations: Vec::new(),
            external_enhancement: None,
            prevention_strategies: prevention_catalog(),
            skipped_items: Vec::new(),
            partial: false,
            error: None,
        }
    }

    /// A report describing a run that could not start at all.
    pub fn failed(reason: String, elapsed: Duration) -> Self {
        let mut report = Self::empty(elapsed);
        report.error = Some(reason);
        report
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Format "top N of M" or just "N" when not truncated.
fn top_of(shown: usize, total: usize) -> String {
    if shown < total {
        format!("top {shown} of {total}")
    } else {
        format!("{total}")
    }
}

/// Print the human-readable summary and recommendation listing.
pub fn print_text(report: &AnalysisReport, top: usize) {
    println!("# Duplication Analysis Report");
    println!();
    println!("**Generated:** {}", report.timestamp);
    println!(
        "**Processing time:** {:.2}s over {} files",
        report.processing_time_seconds, report.files_analyzed
    );
    if report.partial {
        println!("**Partial:** deadline expired before all stages completed");
    }
    if let Some(error) = &report.error {
        println!("**Error:** {error}");
    }
    println!();
    println!("## Findings");
    println!();
    println!(
        "- duplications: {} ({} structural, {} semantic)",
        report.duplications_found.total,
        report.duplications_found.structural,
        report.duplications_found.semantic
    );
    println!("- architectural violations: {}", report.architectural_violations);
    let sev = &report.severity_breakdown;
    println!(
        "- severity: {} critical, {} high, {} moderate, {} low",
        sev.critical, sev.high, sev.moderate, sev.low
    );

    let total = report.consolidation_recommendations.len();
    let shown = total.min(top);
    println!();
    println!("## Recommendations ({})", top_of(shown, total));
    for rec in report.consolidation_recommendations.iter().take(top) {
        println!();
        println!(
            "{}. [{}] {}",
            rec.rank,
            rec.severity.label(),
            rec.description
        );
        println!(
            "   strategy: {} -> {} (confidence {:.2}, ~{:.1}h)",
            rec.strategy,
            rec.target.display(),
            rec.confidence,
            rec.effort_hours
        );
        if let Some(insight) = &rec.insight {
            println!("   insight: {insight}");
        }
    }

    if !report.skipped_items.is_empty() {
        println!();
        println!("## Skipped ({})", report.skipped_items.len());
        for item in &report.skipped_items {
            println!("- [{}] {}", item.kind, item.reason);
        }
    }
}
