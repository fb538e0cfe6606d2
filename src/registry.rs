use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, SkippedItem};
use crate::findings::Severity;

/// A semantic duplication rule: a text matcher mapped to the canonical
/// implementation the matching code should be consolidated into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRule {
    pub id: String,
    /// Plain substring matcher applied to file text.
    pub matcher: String,
    /// Canonical consolidation target, relative to the project root.
    pub target: PathBuf,
    pub severity: Severity,
    pub description: String,
}

/// A known micro-pattern (idiom) with the files already implementing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdiomRule {
    pub id: String,
    pub matcher: String,
    pub description: String,
    /// Paths (relative suffixes) of the known implementations.
    pub implementers: Vec<PathBuf>,
}

/// A type already fulfilling an architectural role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleImplementer {
    pub type_name: String,
    pub path: PathBuf,
}

/// An architectural responsibility with name indicators and the types
/// already fulfilling it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleEntry {
    pub role: String,
    /// Substrings matched case-insensitively against declared type names.
    pub class_indicators: Vec<String>,
    /// Substrings matched against method names of a candidate type.
    pub method_indicators: Vec<String>,
    pub description: String,
    pub implementers: Vec<RoleImplementer>,
}

/// All rule registries for one engine instance. Loaded once at construction
/// and read-only for the run's lifetime, so they can be shared freely across
/// parallel workers.
#[derive(Debug, Clone, Default)]
pub struct Registries {
    pub patterns: Vec<PatternRule>,
    pub idioms: Vec<IdiomRule>,
    pub roles: Vec<RoleEntry>,
}

impl Registries {
    /// Drop malformed entries (empty id, matcher, or indicators), recording
    /// each one as a skipped item. A bad entry never aborts the run.
    pub fn validate(mut self) -> (Self, Vec<SkippedItem>) {
        let mut skipped = Vec::new();

        self.patterns.retain(|rule| {
            let ok = !rule.id.is_empty()
                && !rule.matcher.is_empty()
                && !rule.target.as_os_str().is_empty();
            if !ok {
                warn_entry(&rule.id, "pattern rule needs id, matcher, and target", &mut skipped);
            }
            ok
        });
        self.idioms.retain(|rule| {
            let ok = !rule.id.is_empty() && !rule.matcher.is_empty();
            if !ok {
                warn_entry(&rule.id, "idiom rule needs id and matcher", &mut skipped);
            }
            ok
        });
        self.roles.retain(|entry| {
            let ok = !entry.role.is_empty()
                && (!entry.class_indicators.is_empty() || !entry.method_indicators.is_empty());
            if !ok {
                warn_entry(&entry.role, "role entry needs a name and indicators", &mut skipped);
            }
            ok
        });

        (self, skipped)
    }

    /// Built-in registries covering responsibilities that are rebuilt over
    /// and over in analysis-oriented codebases.
    pub fn builtin() -> Self {
        Registries {
            patterns: builtin_patterns(),
            idioms: builtin_idioms(),
            roles: builtin_roles(),
        }
    }
}

fn warn_entry(id: &str, reason: &str, skipped: &mut Vec<SkippedItem>) {
    let err = AnalyzerError::Registry {
        id: id.to_string(),
        reason: reason.to_string(),
    };
    eprintln!("warning: {err}");
    skipped.push(err.to_skipped());
}

fn builtin_patterns() -> Vec<PatternRule> {
    vec![
        PatternRule {
            id: "framework-keyword-scan".to_string(),
            matcher: "framework_patterns".to_string(),
            target: PathBuf::from("analysis/framework_detector.py"),
            severity: Severity::High,
            description: "keyword-table framework detection already implemented centrally"
                .to_string(),
        },
        PatternRule {
            id: "confidence-scoring".to_string(),
            matcher: "def calculate_confidence".to_string(),
            target: PathBuf::from("analysis/confidence.py"),
            severity: Severity::High,
            description: "confidence scoring duplicates the central calculator".to_string(),
        },
        PatternRule {
            id: "json-report-writer".to_string(),
            matcher: "def generate_report".to_string(),
            target: PathBuf::from("reporting/report_builder.py"),
            severity: Severity::Moderate,
            description: "report generation duplicates the shared builder".to_string(),
        },
        PatternRule {
            id: "json-persistence".to_string(),
            matcher: "def save_results".to_string(),
            target: PathBuf::from("storage/json_store.py"),
            severity: Severity::Moderate,
            description: "result persistence duplicates the JSON store".to_string(),
        },
        PatternRule {
            id: "roi-arithmetic".to_string(),
            matcher: "def calculate_roi".to_string(),
            target: PathBuf::from("metrics/roi.py"),
            severity: Severity::Moderate,
            description: "ROI arithmetic duplicates the metrics module".to_string(),
        },
    ]
}

fn builtin_idioms() -> Vec<IdiomRule> {
    vec![
        IdiomRule {
            id: "keyword-table-matching".to_string(),
            matcher: "framework_keywords".to_string(),
            description: "keyword-table matching over source text".to_string(),
            implementers: vec![PathBuf::from("analysis/framework_detector.py")],
        },
        IdiomRule {
            id: "json-dump-persistence".to_string(),
            matcher: "json.dump(".to_string(),
            description: "writing analysis results as JSON documents".to_string(),
            implementers: vec![PathBuf::from("storage/json_store.py")],
        },
        IdiomRule {
            id: "file-watch-handler".to_string(),
            matcher: "def on_modified".to_string(),
            description: "filesystem watch event handling".to_string(),
            implementers: vec![PathBuf::from("watch/source_watcher.py")],
        },
        IdiomRule {
            id: "severity-bucketing".to_string(),
            matcher: "def classify_severity".to_string(),
            description: "mapping numeric scores onto severity buckets".to_string(),
            implementers: vec![PathBuf::from("analysis/severity.py")],
        },
    ]
}

fn builtin_roles() -> Vec<RoleEntry> {
    vec![
        RoleEntry {
            role: "framework detection and analysis".to_string(),
            class_indicators: vec![
                "FrameworkDetector".to_string(),
                "DetectionEngine".to_string(),
                "FrameworkAnalyzer".to_string(),
            ],
            method_indicators: vec![
                "detect_frameworks".to_string(),
                "calculate_confidence".to_string(),
            ],
            description: "scans source text for framework usage and scores confidence".to_string(),
            implementers: vec![RoleImplementer {
                type_name: "FrameworkDetector".to_string(),
                path: PathBuf::from("analysis/framework_detector.py"),
            }],
        },
        RoleEntry {
            role: "duplication analysis".to_string(),
            class_indicators: vec![
                "DuplicationAnalyzer".to_string(),
                "DuplicateDetector".to_string(),
            ],
            method_indicators: vec![
                "find_duplicates".to_string(),
                "compare_files".to_string(),
            ],
            description: "pairwise comparison of source files for duplicated code".to_string(),
            implementers: vec![RoleImplementer {
                type_name: "DuplicationAnalyzer".to_string(),
                path: PathBuf::from("analysis/duplication_analyzer.py"),
            }],
        },
        RoleEntry {
            role: "report generation".to_string(),
            class_indicators: vec![
                "ReportBuilder".to_string(),
                "ReportGenerator".to_string(),
                "DashboardGenerator".to_string(),
            ],
            method_indicators: vec!["generate_report".to_string(), "render_dashboard".to_string()],
            description: "turns analysis results into human-readable reports".to_string(),
            implementers: vec![RoleImplementer {
                type_name: "ReportBuilder".to_string(),
                path: PathBuf::from("reporting/report_builder.py"),
            }],
        },
        RoleEntry {
            role: "result persistence".to_string(),
            class_indicators: vec!["ResultStore".to_string(), "JsonStore".to_string()],
            method_indicators: vec!["save_results".to_string(), "load_results".to_string()],
            description: "stores and loads analysis results".to_string(),
            implementers: vec![RoleImplementer {
                type_name: "JsonStore".to_string(),
                path: PathBuf::from("storage/json_store.py"),
            }],
        },
        RoleEntry {
            role: "source watching".to_string(),
            class_indicators: vec!["SourceWatcher".to_string(), "FileWatcher".to_string()],
            method_indicators: vec!["on_modified".to_string(), "watch_tree".to_string()],
            description: "reacts to source tree changes".to_string(),
            implementers: vec![RoleImplementer {
                type_name: "SourceWatcher".to_string(),
                path: PathBuf::from("watch/source_watcher.py"),
            }],
        },
    ]
}
