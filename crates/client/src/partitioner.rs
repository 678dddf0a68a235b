//! Least-loaded partition selection.

use std::sync::Mutex;

/// Routes each outgoing record to the partition currently holding the fewest
/// unacknowledged bytes. Ties resolve to the lowest partition index.
///
/// Load is charged when a partition is picked and released once the broker
/// acknowledges (or fails) the delivery, so a batch charges its own records
/// against each other.
#[derive(Debug, Default)]
pub(crate) struct LeastBytes {
    in_flight: Mutex<Vec<u64>>,
}

impl LeastBytes {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Grow the tracked partition set. Never shrinks: partition counts only
    /// ever increase on the broker side.
    pub(crate) fn ensure_partitions(&self, count: usize) {
        let mut in_flight = self.in_flight.lock().expect("partition load lock poisoned");
        if in_flight.len() < count {
            in_flight.resize(count, 0);
        }
    }

    /// Pick the least-loaded partition and charge `bytes` against it.
    pub(crate) fn acquire(&self, bytes: u64) -> usize {
        let mut in_flight = self.in_flight.lock().expect("partition load lock poisoned");
        let partition = in_flight
            .iter()
            .enumerate()
            .min_by_key(|(_, load)| **load)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        if let Some(load) = in_flight.get_mut(partition) {
            *load += bytes;
        }
        partition
    }

    /// Release a previously charged delivery.
    pub(crate) fn release(&self, partition: usize, bytes: u64) {
        let mut in_flight = self.in_flight.lock().expect("partition load lock poisoned");
        if let Some(load) = in_flight.get_mut(partition) {
            *load = load.saturating_sub(bytes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spreads_load_across_partitions() {
        let balancer = LeastBytes::new();
        balancer.ensure_partitions(3);

        assert_eq!(balancer.acquire(10), 0);
        assert_eq!(balancer.acquire(10), 1);
        assert_eq!(balancer.acquire(10), 2);
        // All equally loaded again; ties go to the lowest index.
        assert_eq!(balancer.acquire(10), 0);
    }

    #[test]
    fn test_prefers_lightest_partition() {
        let balancer = LeastBytes::new();
        balancer.ensure_partitions(2);

        assert_eq!(balancer.acquire(100), 0);
        assert_eq!(balancer.acquire(10), 1);
        // Partition 1 holds 10 in-flight bytes vs 100 on partition 0.
        assert_eq!(balancer.acquire(10), 1);
    }

    #[test]
    fn test_release_returns_capacity() {
        let balancer = LeastBytes::new();
        balancer.ensure_partitions(2);

        assert_eq!(balancer.acquire(50), 0);
        assert_eq!(balancer.acquire(50), 1);
        balancer.release(0, 50);
        assert_eq!(balancer.acquire(10), 0);
    }

    #[test]
    fn test_release_saturates_at_zero() {
        let balancer = LeastBytes::new();
        balancer.ensure_partitions(1);
        balancer.release(0, 1000);
        assert_eq!(balancer.acquire(1), 0);
    }

    #[test]
    fn test_ensure_partitions_never_shrinks() {
        let balancer = LeastBytes::new();
        balancer.ensure_partitions(4);
        balancer.ensure_partitions(2);
        assert_eq!(balancer.acquire(1), 0);
        assert_eq!(balancer.acquire(1), 1);
        assert_eq!(balancer.acquire(1), 2);
        assert_eq!(balancer.acquire(1), 3);
    }
}
