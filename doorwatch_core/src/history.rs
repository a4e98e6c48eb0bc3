//! Bounded FIFO of recent valid distances.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct DistanceHistory {
    buf: VecDeque<f32>,
    cap: usize,
}

impl DistanceHistory {
    /// Capacity is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let cap = capacity.max(1);
        Self {
            buf: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Append a sample, returning the evicted oldest one when full.
    pub fn push(&mut self, cm: f32) -> Option<f32> {
        let evicted = if self.buf.len() == self.cap {
            self.buf.pop_front()
        } else {
            None
        };
        self.buf.push_back(cm);
        evicted
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.buf.iter().copied()
    }

    /// Sample standard deviation (n - 1 divisor); 0.0 below two samples.
    pub fn std_dev(&self) -> f32 {
        let n = self.buf.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.buf.iter().map(|&x| f64::from(x)).sum::<f64>() / n as f64;
        let ss = self
            .buf
            .iter()
            .map(|&x| (f64::from(x) - mean).powi(2))
            .sum::<f64>();
        (ss / (n as f64 - 1.0)).sqrt() as f32
    }
}
