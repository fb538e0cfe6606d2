use std::collections::BTreeSet;
use std::collections::HashMap;

use rayon::prelude::*;

use crate::config::AnalyzerConfig;
use crate::findings::{DuplicationCategory, DuplicationFinding, EvidencePair};
use crate::parse::SourceFile;
use crate::recommend::{estimate_effort, preferred_target, strategy_for_duplication};

/// Jaccard similarity over node-type label sets. Two empty sets are
/// considered identical.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Scan two files for exactly matching trimmed lines as corroborating
/// evidence. Lines shorter than the configured minimum are ignored, each
/// right-hand line is consumed at most once, and only the first
/// `evidence_cap` matches are kept. This never gates the similarity score.
pub fn match_evidence(
    left: &SourceFile,
    right: &SourceFile,
    cfg: &AnalyzerConfig,
) -> Vec<EvidencePair> {
    let mut right_lines: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, line) in right.content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.len() >= cfg.evidence_min_line_len {
            right_lines.entry(trimmed).or_default().push(idx + 1);
        }
    }

    let mut evidence = Vec::new();
    for (idx, line) in left.content.lines().enumerate() {
        if evidence.len() >= cfg.evidence_cap {
            break;
        }
        let trimmed = line.trim();
        if trimmed.len() < cfg.evidence_min_line_len {
            continue;
        }
        if let Some(slots) = right_lines.get_mut(trimmed)
            && !slots.is_empty()
        {
            evidence.push(EvidencePair {
                left_line: idx + 1,
                right_line: slots.remove(0),
                text: trimmed.to_string(),
            });
        }
    }
    evidence
}

/// Pairwise structural comparison over every parsed file.
///
/// Each parsed tree is flattened once into its node-label set; files whose
/// trees fall under the size floor are skipped, which keeps the O(F²) pair
/// matrix away from trivially small files. Pairs are enumerated in discovery
/// order and evaluated in parallel; the order-preserving collect makes the
/// result deterministic regardless of worker scheduling.
pub fn detect_structural(files: &[SourceFile], cfg: &AnalyzerConfig) -> Vec<DuplicationFinding> {
    let eligible: Vec<(usize, BTreeSet<String>)> = files
        .iter()
        .enumerate()
        .filter_map(|(idx, file)| {
            let tree = file.tree.as_ref()?;
            if tree.node_count() < cfg.min_structural_nodes {
                return None;
            }
            Some((idx, tree.kind_set()))
        })
        .collect();

    let mut pairs = Vec::with_capacity(eligible.len().saturating_mul(eligible.len()) / 2);
    for i in 0..eligible.len() {
        for j in (i + 1)..eligible.len() {
            pairs.push((i, j));
        }
    }

    pairs
        .par_iter()
        .filter_map(|&(i, j)| {
            let (left_idx, left_set) = &eligible[i];
            let (right_idx, right_set) = &eligible[j];
            let score = jaccard(left_set, right_set);
            if score < cfg.similarity_threshold {
                return None;
            }
            let left = &files[*left_idx];
            let right = &files[*right_idx];
            let evidence = match_evidence(left, right, cfg);
            Some(DuplicationFinding {
                left: left.path.clone(),
                right: right.path.clone(),
                similarity: score,
                category: DuplicationCategory::Structural,
                severity: cfg.severity_for_similarity(score),
                effort_hours: estimate_effort(cfg, score, evidence.len()),
                strategy: strategy_for_duplication(DuplicationCategory::Structural).to_string(),
                target: preferred_target(&left.path, &right.path),
                evidence,
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "similarity_test.rs"]
mod tests;
