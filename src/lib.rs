//! Source-code duplication and architectural-compliance analyzer.
//!
//! One [`Analyzer::analyze`] call runs the whole pipeline: discover candidate
//! files, parse each into a structural tree, compare every pair for
//! duplication, check registries for pattern and role reimplementation, flag
//! DRY and SRP violations, and rank everything into effort-estimated
//! consolidation recommendations. The result is a single serializable
//! [`report::AnalysisReport`].

pub mod cli;
pub mod config;
pub mod detectors;
pub mod enhance;
pub mod error;
pub mod findings;
pub mod parse;
pub mod recommend;
pub mod registry;
pub mod report;
pub mod similarity;
pub mod util;
pub mod walk;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use config::AnalyzerConfig;
use enhance::{EnhancementRequest, EnhancerConfig};
use findings::{DuplicationCategory, DuplicationFinding, ViolationFinding};
use parse::SourceFile;
use registry::Registries;
use report::{AnalysisReport, DuplicationCounts, SeverityBreakdown};

/// Per-run options, separate from the threshold configuration.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Explicit files or directories to analyze, relative to the root.
    /// Empty means the whole root.
    pub targets: Vec<PathBuf>,
    /// Extra exclusion globs merged after the baseline set.
    pub exclude: Vec<String>,
    /// Skip the external reasoning call even when an enhancer is configured.
    pub disable_enhancement: bool,
    /// Overall wall-clock budget. On expiry the stages still pending are
    /// skipped and the report is marked partial.
    pub deadline: Option<Duration>,
}

/// The analyzer: thresholds plus validated, immutable registries.
///
/// Holds no per-run state, so one instance can serve any number of
/// `analyze` calls.
pub struct Analyzer {
    config: AnalyzerConfig,
    registries: Registries,
    registry_warnings: Vec<error::SkippedItem>,
    enhancer: Option<EnhancerConfig>,
}

impl Analyzer {
    /// Analyzer with default thresholds and the builtin registries.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self::with_registries(config, Registries::builtin())
    }

    /// Analyzer with caller-supplied registries. Malformed entries are
    /// dropped here, once, and reported on every run.
    pub fn with_registries(config: AnalyzerConfig, registries: Registries) -> Self {
        let (registries, registry_warnings) = registries.validate();
        for warning in &registry_warnings {
            eprintln!("warning: {}", warning.reason);
        }
        Analyzer {
            config,
            registries,
            registry_warnings,
            enhancer: None,
        }
    }

    /// Attach an external reasoning endpoint.
    pub fn with_enhancer(mut self, enhancer: EnhancerConfig) -> Self {
        self.enhancer = Some(enhancer);
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Run the full pipeline. Never returns `Err` and never panics on bad
    /// input: an unusable root comes back as a report with `error` set, and
    /// everything smaller is contained in `skipped_items`.
    pub fn analyze(&self, root: &Path, options: &AnalyzeOptions) -> AnalysisReport {
        let started = Instant::now();
        let expired = || {
            options
                .deadline
                .is_some_and(|deadline| started.elapsed() >= deadline)
        };

        let discovery = match walk::discover(root, &options.targets, &options.exclude) {
            Ok(discovery) => discovery,
            Err(err) => {
                eprintln!("warning: {err}");
                return AnalysisReport::failed(err.to_string(), started.elapsed());
            }
        };

        let mut skipped = self.registry_warnings.clone();
        skipped.extend(discovery.skipped);

        let discovered: HashSet<PathBuf> = discovery.files.iter().cloned().collect();
        let files = load_files(&discovery.files, &mut skipped);

        let mut duplications: Vec<DuplicationFinding> = Vec::new();
        let mut violations: Vec<ViolationFinding> = Vec::new();
        let mut partial = false;

        // The deadline is checked between stages; findings already computed
        // when the budget runs out are kept and the report marked partial.
        if expired() {
            partial = true;
        } else {
            duplications.extend(similarity::detect_structural(&files, &self.config));
        }
        if !partial && expired() {
            partial = true;
        }
        if !partial {
            duplications.extend(detectors::pattern::detect_patterns(
                root,
                &files,
                &discovered,
                &self.registries.patterns,
                &self.config,
            ));
        }
        if !partial && expired() {
            partial = true;
        }
        if !partial {
            violations.extend(detectors::roles::detect_idioms(&files, &self.registries.idioms));
            violations.extend(detectors::roles::detect_role_reimplementations(
                &files,
                &self.registries.roles,
            ));
        }
        if !partial && expired() {
            partial = true;
        }
        if !partial {
            violations.extend(detectors::violations::detect_dry(&files, &self.config));
            violations.extend(detectors::violations::detect_srp(&files, &self.config));
            violations.extend(detectors::violations::detect_same_file_pattern_duplication(
                &files,
                &self.registries.roles,
            ));
        }

        let enhancement = if options.disable_enhancement || partial {
            None
        } else {
            self.run_enhancement(&duplications, &violations, &mut skipped)
        };

        let recommendations = recommend::synthesize(
            &self.config,
            &duplications,
            &violations,
            enhancement.as_ref(),
        );

        let mut counts = DuplicationCounts::default();
        let mut breakdown = SeverityBreakdown::default();
        for finding in &duplications {
            match finding.category {
                DuplicationCategory::Structural => counts.structural += 1,
                DuplicationCategory::Pattern | DuplicationCategory::Functional => {
                    counts.semantic += 1
                }
            }
            counts.total += 1;
            breakdown.tally(finding.severity);
        }
        for finding in &violations {
            breakdown.tally(finding.severity);
        }

        let mut result = AnalysisReport::empty(started.elapsed());
        result.files_analyzed = files.len();
        result.duplications_found = counts;
        result.architectural_violations = violations.len();
        result.severity_breakdown = breakdown;
        result.consolidation_recommendations = recommendations;
        result.external_enhancement = enhancement;
        result.skipped_items = skipped;
        result.partial = partial;
        result
    }

    fn run_enhancement(
        &self,
        duplications: &[DuplicationFinding],
        violations: &[ViolationFinding],
        skipped: &mut Vec<error::SkippedItem>,
    ) -> Option<enhance::EnhancementResponse> {
        let enhancer = self.enhancer.as_ref()?;
        let request = EnhancementRequest::summarize(duplications, violations);
        match enhance::request_enhancement(enhancer, &request) {
            Ok(response) => Some(response),
            Err(err) => {
                eprintln!("warning: {err}");
                skipped.push(err.to_skipped());
                None
            }
        }
    }
}

/// Load and parse every candidate in parallel, containing per-file failures.
/// The order-preserving collect keeps files in discovery order.
fn load_files(paths: &[PathBuf], skipped: &mut Vec<error::SkippedItem>) -> Vec<SourceFile> {
    let loaded: Vec<_> = paths.par_iter().map(|path| parse::load_source(path)).collect();

    let mut files = Vec::with_capacity(paths.len());
    for result in loaded {
        match result {
            Ok((file, warning)) => {
                skipped.extend(warning);
                files.push(file);
            }
            Err(err) => {
                eprintln!("warning: {err}");
                skipped.push(err.to_skipped());
            }
        }
    }
    files
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
