//! Start offsets for the parts of a grouped reveal.
//!
//! When a region fires at `T`, part `k` begins at `T + offset`, where the
//! offset comes from [`StaggerConfig::delay_for_index`]. Parts share the
//! region's observer.

/// Which part leads the cascade
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StaggerOrder {
    #[default]
    Forward,
    Reverse,
    /// The middle part starts first, neighbours follow by distance
    FromCenter,
}

/// Fixed interval between consecutive parts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaggerConfig {
    pub interval_ms: u32,
    pub order: StaggerOrder,
    /// Parts at or beyond this rank all share the last offset
    pub max_steps: Option<usize>,
}

impl StaggerConfig {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            order: StaggerOrder::Forward,
            max_steps: None,
        }
    }

    pub fn reverse(self) -> Self {
        Self {
            order: StaggerOrder::Reverse,
            ..self
        }
    }

    pub fn from_center(self) -> Self {
        Self {
            order: StaggerOrder::FromCenter,
            ..self
        }
    }

    pub fn limit(self, steps: usize) -> Self {
        Self {
            max_steps: Some(steps),
            ..self
        }
    }

    /// Position of `index` in the cascade, before capping
    fn rank(&self, index: usize, total: usize) -> usize {
        match self.order {
            StaggerOrder::Forward => index,
            StaggerOrder::Reverse => total.saturating_sub(index + 1),
            StaggerOrder::FromCenter => index.abs_diff(total / 2),
        }
    }

    /// Offset in milliseconds for part `index` out of `total`
    pub fn delay_for_index(&self, index: usize, total: usize) -> u32 {
        let rank = self.rank(index, total);
        let rank = self.max_steps.map_or(rank, |cap| rank.min(cap));
        u32::try_from(rank)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_offsets_are_index_times_interval() {
        let stagger = StaggerConfig::new(100);
        for k in 0..8 {
            assert_eq!(stagger.delay_for_index(k, 8), k as u32 * 100);
        }
    }

    #[test]
    fn reverse_starts_with_last() {
        let stagger = StaggerConfig::new(50).reverse();
        assert_eq!(stagger.delay_for_index(3, 4), 0);
        assert_eq!(stagger.delay_for_index(0, 4), 150);
    }

    #[test]
    fn from_center_spreads_outward() {
        let stagger = StaggerConfig::new(10).from_center();
        let delays: Vec<u32> = (0..5).map(|i| stagger.delay_for_index(i, 5)).collect();
        assert_eq!(delays, vec![20, 10, 0, 10, 20]);
    }

    #[test]
    fn capped_parts_share_the_last_offset() {
        let stagger = StaggerConfig::new(100).limit(2);
        assert_eq!(stagger.delay_for_index(5, 10), 200);
        assert_eq!(stagger.delay_for_index(9, 10), 200);
    }

    #[test]
    fn single_part_starts_immediately() {
        assert_eq!(StaggerConfig::new(80).reverse().delay_for_index(0, 1), 0);
    }
}
