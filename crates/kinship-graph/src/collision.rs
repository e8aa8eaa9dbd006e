use crate::Vec2;
use crate::position::PositionStore;
use kinship_core::IndividualId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Extra clearance required between two frames.
    pub min_gap: f32,
    pub max_iterations: usize,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            min_gap: 20.0,
            max_iterations: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Sweeps actually run.
    pub iterations: usize,
    /// Colliding pairs before the first sweep.
    pub initial: usize,
    /// Colliding pairs left in the store.
    pub remaining: usize,
    pub converged: bool,
}

/// Pairwise relaxation of overlapping node frames.
///
/// Frames are centered on their stored positions. Resolution is best effort:
/// the store never ends up with more collisions than it started with, but a
/// row where two pairs keep trading a shrinking overlap can end level.
#[derive(Debug, Clone, Copy)]
pub struct CollisionResolver {
    pub config: CollisionConfig,
    pub frame: Vec2,
}

impl CollisionResolver {
    pub fn new(config: CollisionConfig, frame: Vec2) -> Self {
        Self { config, frame }
    }

    pub fn resolve(&self, store: &mut PositionStore) -> CollisionReport {
        let initial = self.count_collisions(store);
        let mut report = CollisionReport {
            iterations: 0,
            initial,
            remaining: initial,
            converged: initial == 0,
        };
        if initial == 0 {
            return report;
        }

        let mut best = (initial, store.clone());
        for iteration in 1..=self.config.max_iterations {
            report.iterations = iteration;
            self.sweep(store);

            let count = self.count_collisions(store);
            tracing::debug!("Collision sweep {}: {} overlapping pairs", iteration, count);
            if count < best.0 {
                if count == 0 {
                    best.0 = 0;
                    break;
                }
                best = (count, store.clone());
            }
        }

        if self.count_collisions(store) > best.0 {
            *store = best.1;
        }
        report.remaining = best.0;
        report.converged = report.remaining == 0;

        if !report.converged {
            tracing::warn!(
                "Collision resolution stopped after {} sweeps with {} of {} overlaps left",
                report.iterations,
                report.remaining,
                report.initial
            );
        }
        report
    }

    /// Number of unordered pairs whose frames (plus gap) overlap.
    pub fn count_collisions(&self, store: &PositionStore) -> usize {
        let placed: Vec<Vec2> = store
            .sorted_ids()
            .into_iter()
            .filter_map(|id| store.get(id))
            .collect();

        let mut count = 0;
        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                if self.overlap(*a, *b).is_some() {
                    count += 1;
                }
            }
        }
        count
    }

    /// Required separation along x and y if `a` and `b` collide.
    fn overlap(&self, a: Vec2, b: Vec2) -> Option<(f32, f32)> {
        let need_x = self.frame.x + self.config.min_gap;
        let need_y = self.frame.y + self.config.min_gap;
        let dx = (b.x - a.x).abs();
        let dy = (b.y - a.y).abs();
        (dx < need_x && dy < need_y).then(|| (need_x - dx, need_y - dy))
    }

    fn sweep(&self, store: &mut PositionStore) {
        let ids: Vec<IndividualId> = store.sorted_ids();
        for (i, &first) in ids.iter().enumerate() {
            for &second in &ids[i + 1..] {
                let (Some(a), Some(b)) = (store.get(first), store.get(second)) else {
                    continue;
                };
                let Some((push_x, push_y)) = self.overlap(a, b) else {
                    continue;
                };

                // Coincident nodes separate by id order: the larger id moves right or down.
                if push_x <= push_y {
                    let dir = if b.x < a.x { -1.0 } else { 1.0 };
                    let half = dir * push_x / 2.0;
                    store.offset(first, -half, 0.0);
                    store.offset(second, half, 0.0);
                } else {
                    let dir = if b.y < a.y { -1.0 } else { 1.0 };
                    let half = dir * push_y / 2.0;
                    store.offset(first, 0.0, -half);
                    store.offset(second, 0.0, half);
                }
            }
        }
    }
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new(CollisionConfig::default(), Vec2::new(160.0, 120.0))
    }
}
