use std::collections::VecDeque;

use super::snapshot::CpuSample;

pub const DEFAULT_CAPACITY: usize = 40;

/// Fixed-length window of recent CPU usage values, oldest first.
///
/// The window starts filled with zeros so charts always get `capacity` points.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    values: VecDeque<f64>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: std::iter::repeat_n(0.0, capacity).collect(),
            capacity,
        }
    }

    pub fn push(&mut self, sample: CpuSample) {
        self.push_value(sample.usage_percentage);
    }

    pub fn push_value(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn values(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    pub fn latest(&self) -> f64 {
        self.values.back().copied().unwrap_or(0.0)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(v: f64) -> CpuSample {
        CpuSample {
            usage_percentage: v,
            core_count: 1,
        }
    }

    #[test]
    fn starts_full_of_zeros() {
        let history = HistoryBuffer::default();
        assert_eq!(history.values(), vec![0.0; DEFAULT_CAPACITY]);
    }

    #[test]
    fn ring_buffer_caps_at_capacity() {
        let mut history = HistoryBuffer::new(5);
        for i in 0..10 {
            history.push(sample(i as f64));
        }
        assert_eq!(history.values(), vec![5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(history.latest(), 9.0);
    }

    #[test]
    fn partial_fill_keeps_leading_zeros() {
        let mut history = HistoryBuffer::new(4);
        history.push(sample(12.5));
        assert_eq!(history.values(), vec![0.0, 0.0, 0.0, 12.5]);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut history = HistoryBuffer::new(0);
        history.push(sample(3.0));
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.values(), vec![3.0]);
    }
}
