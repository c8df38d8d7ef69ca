//! Seeded random order generator.

use wh_core::{ItemId, SimRng};
use wh_tasks::NewOrder;

/// Files orders of `1..=max_lines` random items drawn from the layout's
/// item zones.  Repeated items are merged by the order store.
pub struct OrderGenerator {
    rng:        SimRng,
    item_kinds: u32,
    max_lines:  u32,
    issued:     u32,
}

impl OrderGenerator {
    pub fn new(seed: u64, item_kinds: usize, max_lines: u32) -> Self {
        Self {
            rng: SimRng::new(seed),
            item_kinds: u32::try_from(item_kinds).unwrap_or(u32::MAX),
            max_lines: max_lines.max(1),
            issued: 0,
        }
    }

    /// Next order, or `None` when the layout has no item zones.
    pub fn next_order(&mut self, created: u64) -> Option<NewOrder> {
        if self.item_kinds == 0 {
            return None;
        }
        let lines = self.rng.gen_range(1..=self.max_lines);
        let items = (0..lines)
            .map(|_| (ItemId(self.rng.gen_range(0..self.item_kinds)), 1))
            .collect();
        self.issued += 1;
        Some(NewOrder {
            created_by: 0,
            created,
            description: format!("generated order #{}", self.issued),
            items,
        })
    }
}
