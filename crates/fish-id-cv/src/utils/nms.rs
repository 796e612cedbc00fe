//! Non-maximum suppression over raw model proposals

use crate::bbox::Detection;
use crate::detection::Proposal;
use fish_id_core::NmsConfig;

/// Turn raw proposals into a ranked list of detections.
///
/// A proposal's confidence is its objectness times its best class score;
/// proposals at or below `conf_threshold` on either value are dropped.
/// Survivors are sorted by confidence and greedily suppressed against
/// already kept boxes of the same class. At most `max_detections` are
/// returned, best first.
pub fn non_max_suppression(proposals: &[Proposal], config: &NmsConfig) -> Vec<Detection> {
    let mut candidates: Vec<Detection> = proposals
        .iter()
        .filter(|p| p.objectness > config.conf_threshold)
        .filter_map(|p| {
            let (class_id, confidence) = best_class(p);
            (confidence > config.conf_threshold)
                .then(|| Detection::from_center(p.cx, p.cy, p.w, p.h, confidence, class_id))
        })
        .collect();

    // Sort by confidence
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut keep: Vec<Detection> = Vec::new();
    for candidate in candidates {
        if keep.len() >= config.max_detections {
            break;
        }

        let suppressed = keep.iter().any(|kept| {
            kept.class_id == candidate.class_id && kept.overlaps(&candidate, config.iou_threshold)
        });
        if !suppressed {
            keep.push(candidate);
        }
    }

    keep
}

/// Best class and its combined confidence. Class-less outputs count as a
/// single class scored by objectness alone.
fn best_class(proposal: &Proposal) -> (usize, f32) {
    proposal
        .class_scores
        .iter()
        .enumerate()
        .map(|(class_id, score)| (class_id, score * proposal.objectness))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .unwrap_or((0, proposal.objectness))
}
