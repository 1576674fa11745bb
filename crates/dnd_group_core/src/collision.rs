use tracing::trace;

use crate::index::TreeIndex;
use crate::target::DropTarget;

/// An axis-aligned rectangle in window pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// A drop target and where it was last laid out.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionCandidate {
    pub target: DropTarget,
    pub rect: Rect,
}

impl CollisionCandidate {
    pub fn new(target: DropTarget, rect: Rect) -> Self {
        Self { target, rect }
    }
}

/// A candidate that overlaps the dragged rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct Collision {
    pub target: DropTarget,
    pub ratio: f32,
}

/// Vertical overlap of two rectangles: intersection height over union height.
///
/// Only the vertical extent is compared. Rectangles that are disjoint or only
/// share an edge yield `0.0`.
pub fn intersection_ratio(entry: &Rect, target: &Rect, decimals: u32) -> f32 {
    let top = target.top.max(entry.top);
    let bottom = target.bottom().min(entry.bottom());
    if top >= bottom {
        return 0.0;
    }

    let height = bottom - top;
    let ratio = height / (target.height + entry.height - height);
    round_to(ratio, decimals)
}

fn round_to(value: f32, decimals: u32) -> f32 {
    let scale = 10f64.powi(decimals.min(9) as i32);
    ((value as f64 * scale).round() / scale) as f32
}

/// Rank candidates by overlap with the dragged rectangle, best first.
///
/// Rows of leaves nested in a group are skipped, since the group's own row
/// already covers them. Once any drop slot overlaps, only slots are ranked.
/// Equal ratios keep candidate order.
pub fn rank_collisions(
    active: &Rect,
    candidates: &[CollisionCandidate],
    index: &TreeIndex,
    decimals: u32,
) -> Vec<Collision> {
    let mut slot_seen = false;
    let mut collisions = Vec::new();

    for candidate in candidates {
        if let DropTarget::Item(id) = &candidate.target
            && index.is_member(id)
        {
            continue;
        }

        let ratio = intersection_ratio(&candidate.rect, active, decimals);
        if ratio > 0.0 {
            slot_seen |= candidate.target.is_slot();
            collisions.push(Collision {
                target: candidate.target.clone(),
                ratio,
            });
        }
    }

    if slot_seen {
        collisions.retain(|collision| collision.target.is_slot());
    }
    collisions.sort_by(|a, b| b.ratio.total_cmp(&a.ratio));

    trace!(
        candidates = candidates.len(),
        hits = collisions.len(),
        best = ?collisions.first(),
        "ranked collisions"
    );
    collisions
}

/// The single best target for this frame, if anything overlaps.
pub fn best_collision(
    active: &Rect,
    candidates: &[CollisionCandidate],
    index: &TreeIndex,
    decimals: u32,
) -> Option<DropTarget> {
    rank_collisions(active, candidates, index, decimals)
        .into_iter()
        .next()
        .map(|collision| collision.target)
}
