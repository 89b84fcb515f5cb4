/// Reason a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationReason {
    /// The unchanged-centroid count reached the convergence threshold.
    Converged,
    /// The configured round budget ran out before convergence. This is a
    /// normal outcome carrying the last computed centroid set, not a failure.
    BudgetExhausted,
    /// The cancel flag was observed between rounds.
    Cancelled,
}

/// Per-round tally of centroids whose new mean equals the prior one within
/// epsilon. The round converges once the tally reaches the threshold, which
/// defaults to K (all centroids stable).
pub struct ConvergenceTracker {
    unchanged: usize,
    threshold: usize,
}
impl ConvergenceTracker {
    pub fn new(k: usize, threshold: Option<usize>) -> Self {
        Self { unchanged: 0, threshold: threshold.unwrap_or(k) }
    }

    pub fn record(&mut self, unchanged: bool) {
        if unchanged {
            self.unchanged += 1;
        }
    }

    pub fn unchanged(&self) -> usize { self.unchanged }

    pub fn converged(&self) -> bool { self.unchanged >= self.threshold }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_all_centroids_stable() {
        let mut tracker = ConvergenceTracker::new(3, None);
        tracker.record(true);
        tracker.record(false);
        tracker.record(true);
        assert_eq!(tracker.unchanged(), 2);
        assert!(!tracker.converged());

        let mut tracker = ConvergenceTracker::new(3, None);
        for _ in 0..3 {
            tracker.record(true);
        }
        assert!(tracker.converged());
    }

    #[test]
    fn threshold_is_configurable() {
        let mut tracker = ConvergenceTracker::new(5, Some(2));
        tracker.record(true);
        assert!(!tracker.converged());
        tracker.record(true);
        assert!(tracker.converged());
    }
}
