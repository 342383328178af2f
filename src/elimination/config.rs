use std::num::NonZeroUsize;

use super::phase::max_task_count;

/// Largest system the engine accepts.
pub const MAX_DIMENSION: usize = 1 << 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Caps the pool size. `None` spawns one worker per sub-task of the
    /// densest phase, `(n - 1) * (n + 1)` workers for an `n`-row system.
    pub worker_limit: Option<NonZeroUsize>,
}

impl EngineConfig {
    pub fn with_worker_limit(worker_limit: NonZeroUsize) -> Self {
        Self {
            worker_limit: Some(worker_limit),
        }
    }

    pub fn pool_size(&self, size: usize) -> usize {
        let full = max_task_count(size);
        match self.worker_limit {
            Some(limit) => full.min(limit.get()),
            None => full,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_pool_matches_densest_phase() {
        let config = EngineConfig::default();
        assert_eq!(config.pool_size(1), 0);
        assert_eq!(config.pool_size(3), 8);
        assert_eq!(config.pool_size(10), 99);
    }

    #[test]
    fn worker_limit_caps_the_pool() {
        let config = EngineConfig::with_worker_limit(NonZeroUsize::new(4).unwrap());
        assert_eq!(config.pool_size(3), 4);
        assert_eq!(config.pool_size(2), 3);
    }
}
