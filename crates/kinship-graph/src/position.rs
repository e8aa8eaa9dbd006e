use crate::Vec2;
use crate::scene::Rect;
use kinship_core::IndividualId;
use std::collections::HashMap;

/// The single authoritative position map for a rendered hierarchy.
///
/// The layout engine fills it, the collision resolver relaxes it in place and
/// drag handling edits it one key at a time. Nothing else keeps positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionStore {
    positions: HashMap<IndividualId, Vec2>,
}

impl PositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    pub fn get(&self, id: IndividualId) -> Option<Vec2> {
        self.positions.get(&id).copied()
    }

    pub fn contains(&self, id: IndividualId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Returns the previous position, if any.
    pub fn set(&mut self, id: IndividualId, position: Vec2) -> Option<Vec2> {
        self.positions.insert(id, position)
    }

    /// Inserts only when `id` has no position yet. Returns whether it inserted.
    pub fn set_if_absent(&mut self, id: IndividualId, position: Vec2) -> bool {
        if self.positions.contains_key(&id) {
            return false;
        }
        self.positions.insert(id, position);
        true
    }

    pub fn offset(&mut self, id: IndividualId, dx: f32, dy: f32) {
        if let Some(pos) = self.positions.get_mut(&id) {
            pos.x += dx;
            pos.y += dy;
        }
    }

    pub fn translate_all(&mut self, dx: f32, dy: f32) {
        for pos in self.positions.values_mut() {
            pos.x += dx;
            pos.y += dy;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (IndividualId, Vec2)> + '_ {
        self.positions.iter().map(|(&id, &pos)| (id, pos))
    }

    /// Ids sorted ascending, for passes that need a stable visiting order.
    pub fn sorted_ids(&self) -> Vec<IndividualId> {
        let mut ids: Vec<_> = self.positions.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Bounding box of all node centers, each grown by `frame`.
    pub fn bounds(&self, frame: Vec2) -> Option<Rect> {
        let mut iter = self.positions.values();
        let first = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for pos in iter {
            min_x = min_x.min(pos.x);
            min_y = min_y.min(pos.y);
            max_x = max_x.max(pos.x);
            max_y = max_y.max(pos.y);
        }
        Some(Rect::from_min_max(
            Vec2::new(min_x - frame.x / 2.0, min_y - frame.y / 2.0),
            Vec2::new(max_x + frame.x / 2.0, max_y + frame.y / 2.0),
        ))
    }
}
