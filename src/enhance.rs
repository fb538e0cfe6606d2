use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AnalyzerError;
use crate::findings::{DuplicationFinding, Severity, ViolationFinding};

/// Environment variable naming the external reasoning endpoint. Enhancement
/// is disabled when it is unset.
pub const ENDPOINT_ENV: &str = "DUPSCAN_ENHANCER_URL";

/// Where and how to reach the external reasoning service.
#[derive(Debug, Clone)]
pub struct EnhancerConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl EnhancerConfig {
    /// Build from the environment, or `None` when no endpoint is configured.
    pub fn from_env(timeout: Duration) -> Option<Self> {
        let endpoint = std::env::var(ENDPOINT_ENV).ok()?;
        if endpoint.is_empty() {
            return None;
        }
        Some(EnhancerConfig { endpoint, timeout })
    }
}

/// Compact summary sent to the reasoning service. Deliberately small: counts
/// and the top candidate descriptions, never file contents.
#[derive(Debug, Clone, Serialize)]
pub struct EnhancementRequest {
    pub duplication_count: usize,
    pub violation_count: usize,
    pub high_severity_count: usize,
    pub top_candidates: Vec<String>,
}

impl EnhancementRequest {
    pub fn summarize(duplications: &[DuplicationFinding], violations: &[ViolationFinding]) -> Self {
        let high_severity_count = duplications
            .iter()
            .map(|d| d.severity)
            .chain(violations.iter().map(|v| v.severity))
            .filter(|s| *s >= Severity::High)
            .count();
        let top_candidates = duplications
            .iter()
            .map(|d| format!("{} <-> {} ({:.2})", d.left.display(), d.right.display(), d.similarity))
            .chain(violations.iter().map(|v| v.description.clone()))
            .take(5)
            .collect();
        EnhancementRequest {
            duplication_count: duplications.len(),
            violation_count: violations.len(),
            high_severity_count,
            top_candidates,
        }
    }
}

/// What the reasoning service returns. Every field is optional on the wire;
/// missing fields default to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnhancementResponse {
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub priority_ranking: Vec<String>,
    #[serde(default)]
    pub effort_estimates: HashMap<String, f64>,
    #[serde(default)]
    pub risk_factors: Vec<String>,
}

/// Call the external reasoning service once, with an explicit timeout.
///
/// Any failure (connection, timeout, HTTP status, malformed body) comes back
/// as `AnalyzerError::Enhancement`; the caller degrades to no enhancement.
pub fn request_enhancement(
    config: &EnhancerConfig,
    request: &EnhancementRequest,
) -> Result<EnhancementResponse, AnalyzerError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|err| AnalyzerError::Enhancement(err.to_string()))?;

    let resp = client
        .post(&config.endpoint)
        .header("content-type", "application/json")
        .json(request)
        .send()
        .map_err(|err| AnalyzerError::Enhancement(err.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        return Err(AnalyzerError::Enhancement(format!(
            "service error ({status}): {body}"
        )));
    }

    resp.json()
        .map_err(|err| AnalyzerError::Enhancement(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::DuplicationCategory;
    use std::path::PathBuf;

    fn dup(severity: Severity) -> DuplicationFinding {
        DuplicationFinding {
            left: PathBuf::from("a.py"),
            right: PathBuf::from("b.py"),
            similarity: 0.9,
            category: DuplicationCategory::Structural,
            severity,
            evidence: vec![],
            strategy: String::new(),
            target: PathBuf::from("a.py"),
            effort_hours: 2.0,
        }
    }

    #[test]
    fn summary_counts_high_severity_across_finding_kinds() {
        let dups = vec![dup(Severity::Critical), dup(Severity::Low)];
        let viols = vec![ViolationFinding {
            file: PathBuf::from("c.py"),
            kind: crate::findings::ViolationKind::Srp,
            description: "too many methods".to_string(),
            severity: Severity::High,
            principle: "SRP".to_string(),
            existing_implementations: vec![],
            recommendation: String::new(),
            debt_score: 0.5,
        }];

        let summary = EnhancementRequest::summarize(&dups, &viols);
        assert_eq!(summary.duplication_count, 2);
        assert_eq!(summary.violation_count, 1);
        assert_eq!(summary.high_severity_count, 2);
        assert_eq!(summary.top_candidates.len(), 3);
    }

    #[test]
    fn unreachable_endpoint_is_an_enhancement_error() {
        // discard port, nothing listens there
        let config = EnhancerConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_millis(200),
        };
        let request = EnhancementRequest::summarize(&[], &[]);
        let err = request_enhancement(&config, &request).unwrap_err();
        assert!(matches!(err, AnalyzerError::Enhancement(_)));
    }

    #[test]
    fn response_fields_default_when_missing() {
        let resp: EnhancementResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.insights.is_empty());
        assert!(resp.risk_factors.is_empty());
        assert!(resp.effort_estimates.is_empty());
    }
}
