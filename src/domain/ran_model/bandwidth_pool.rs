use serde::Serialize;
use std::fmt;

/// Relative slack for float round-off when bandwidth returns to a full pool.
const RELEASE_TOLERANCE: f64 = 1e-9;

/// Bounded, non-blocking bandwidth container.
///
/// `level` is the bandwidth still available and always stays within
/// `[0, capacity]`. Neither operation ever waits: a request that cannot be
/// served fails and leaves the pool untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandwidthPool {
    level: f64,
    capacity: f64,
}

impl BandwidthPool {
    /// A full pool.
    pub fn new(capacity: f64) -> Self {
        let capacity = capacity.max(0.0);
        BandwidthPool { level: capacity, capacity }
    }

    pub fn with_level(level: f64, capacity: f64) -> Self {
        let capacity = capacity.max(0.0);
        BandwidthPool { level: level.clamp(0.0, capacity), capacity }
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Bandwidth currently handed out.
    pub fn used(&self) -> f64 {
        self.capacity - self.level
    }

    /// Takes `amount` out of the pool.
    ///
    /// # Returns
    /// `true` if `amount <= level`; otherwise `false` and the level is unchanged.
    pub fn acquire(&mut self, amount: f64) -> bool {
        if !amount.is_finite() || amount < 0.0 || amount > self.level {
            return false;
        }

        self.level = (self.level - amount).max(0.0);
        true
    }

    /// Puts `amount` back into the pool.
    ///
    /// `level + amount` may exceed `capacity` by at most
    /// `RELEASE_TOLERANCE * max(capacity, 1)` to absorb float round-off; the
    /// level is then clamped to `capacity`.
    ///
    /// # Returns
    /// `true` if `level + amount` is within capacity up to that tolerance;
    /// otherwise `false` and the level is unchanged.
    pub fn release(&mut self, amount: f64) -> bool {
        if !amount.is_finite() || amount < 0.0 {
            return false;
        }

        let next_level = self.level + amount;
        if next_level > self.capacity + RELEASE_TOLERANCE * self.capacity.max(1.0) {
            return false;
        }

        self.level = next_level.min(self.capacity);
        true
    }
}

impl fmt::Display for BandwidthPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BandwidthPool(level={}, capacity={})", self.level, self.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_in_bounds(pool: &BandwidthPool) {
        assert!(pool.level() >= 0.0 && pool.level() <= pool.capacity(), "{} out of bounds", pool);
    }

    #[test]
    fn test_acquire_within_level() {
        let mut pool = BandwidthPool::new(100.0);

        assert!(pool.acquire(30.0));
        assert_eq!(pool.level(), 70.0);
        assert_eq!(pool.used(), 30.0);
        assert!(pool.acquire(70.0));
        assert_eq!(pool.level(), 0.0);
    }

    #[test]
    fn test_failed_acquire_leaves_level_unchanged() {
        let mut pool = BandwidthPool::with_level(20.0, 100.0);

        assert!(!pool.acquire(20.5));
        assert_eq!(pool.level(), 20.0);
        assert!(!pool.acquire(-1.0));
        assert!(!pool.acquire(f64::NAN));
        assert_eq!(pool.level(), 20.0);
    }

    #[test]
    fn test_release_beyond_capacity_fails() {
        let mut pool = BandwidthPool::with_level(90.0, 100.0);

        assert!(!pool.release(11.0));
        assert_eq!(pool.level(), 90.0);
        assert!(pool.release(10.0));
        assert_eq!(pool.level(), 100.0);
        assert!(!pool.release(1.0));
    }

    #[test]
    fn test_acquire_release_round_trip() {
        let mut pool = BandwidthPool::with_level(64.0, 100.0);

        for amount in [0.0, 1.0, 16.0, 64.0] {
            let before = pool.level();
            assert!(pool.acquire(amount));
            assert!(pool.release(amount));
            assert_eq!(pool.level(), before);
        }
    }

    #[test]
    fn test_round_off_on_release_is_absorbed() {
        let mut pool = BandwidthPool::new(0.3);

        assert!(pool.acquire(0.1));
        assert!(pool.acquire(0.05));
        assert!(pool.release(0.1));
        assert!(pool.release(0.05));
        assert!((pool.level() - 0.3).abs() < 1e-12);
        assert!(pool.level() <= pool.capacity());
    }

    #[test]
    fn test_release_tolerance_is_bounded() {
        let mut pool = BandwidthPool::new(100.0);

        assert!(pool.release(1e-8));
        assert_eq!(pool.level(), 100.0);
        assert!(!pool.release(1e-6));
        assert_eq!(pool.level(), 100.0);
    }

    #[test]
    fn test_level_stays_in_bounds_under_mixed_operations() {
        let mut pool = BandwidthPool::new(50.0);
        let amounts = [12.5, 40.0, 7.25, 50.0, 0.0, 3.0, 25.0, 60.0];

        for (i, amount) in amounts.iter().enumerate() {
            if i % 3 == 0 {
                pool.release(*amount);
            } else {
                pool.acquire(*amount);
            }
            assert_in_bounds(&pool);
        }
    }
}
