//! Beam interruptions as a time-windowed "walked through recently" flag.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct BeamEventTracker {
    window: Duration,
    broken_now: bool,
    last_broken_at: Option<Instant>,
}

impl BeamEventTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            broken_now: false,
            last_broken_at: None,
        }
    }

    /// Record this tick's beam level. Returns true on a clear-to-broken edge.
    pub fn update(&mut self, broken: bool, now: Instant) -> bool {
        let edge = broken && !self.broken_now;
        self.broken_now = broken;
        if broken {
            self.last_broken_at = Some(now);
            if edge {
                tracing::info!("beam broken");
            }
        } else if let Some(at) = self.last_broken_at
            && now.saturating_duration_since(at) > self.window
        {
            // window expired; forget the break so it can't resurface
            self.last_broken_at = None;
        }
        edge
    }

    /// True while `now` is within the window of the latest break, whatever
    /// the beam reads right now.
    pub fn walked_recently(&self, now: Instant) -> bool {
        self.broken_now
            || self
                .last_broken_at
                .is_some_and(|at| now.saturating_duration_since(at) <= self.window)
    }

    #[inline]
    pub fn broken_now(&self) -> bool {
        self.broken_now
    }

    pub fn last_broken_at(&self) -> Option<Instant> {
        self.last_broken_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_edges_once() {
        let mut b = BeamEventTracker::new(Duration::from_secs(2));
        let t0 = Instant::now();
        assert!(b.update(true, t0));
        assert!(!b.update(true, t0 + Duration::from_millis(100)));
        assert!(!b.update(false, t0 + Duration::from_millis(200)));
        assert!(b.update(true, t0 + Duration::from_millis(300)));
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let mut b = BeamEventTracker::new(Duration::from_secs(2));
        let t0 = Instant::now();
        b.update(true, t0);
        b.update(false, t0 + Duration::from_millis(10));
        assert!(b.walked_recently(t0 + Duration::from_secs(2)));
        assert!(!b.walked_recently(t0 + Duration::from_millis(2001)));
    }

    #[test]
    fn expired_break_is_forgotten() {
        let mut b = BeamEventTracker::new(Duration::from_secs(1));
        let t0 = Instant::now();
        b.update(true, t0);
        b.update(false, t0 + Duration::from_secs(3));
        assert_eq!(b.last_broken_at(), None);
        assert!(!b.walked_recently(t0 + Duration::from_secs(3)));
    }
}
