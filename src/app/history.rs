use heapless::Deque;

use super::config::{HISTORY_CAPACITY, HISTORY_MAX_RESET_DBM, HISTORY_MIN_RESET_DBM};

/// Probe produced no reading this cycle. Real RSSI values are always
/// negative, so zero is unambiguous.
pub const SAMPLE_LOST: i8 = 0;

/// Bounded FIFO of recent RSSI samples for the selected network, with
/// all-time bounds. The bounds outlive evicted samples and only reset on
/// `clear`; while `max < min` no real sample has been pushed yet.
pub struct SignalHistory {
    samples: Deque<i8, HISTORY_CAPACITY>,
    min_dbm: i8,
    max_dbm: i8,
}

impl SignalHistory {
    pub const fn new() -> Self {
        Self {
            samples: Deque::new(),
            min_dbm: HISTORY_MIN_RESET_DBM,
            max_dbm: HISTORY_MAX_RESET_DBM,
        }
    }

    pub fn push(&mut self, sample: i8) {
        if self.samples.is_full() {
            let _ = self.samples.pop_front();
        }
        let _ = self.samples.push_back(sample);
        if sample != SAMPLE_LOST {
            if sample < self.min_dbm {
                self.min_dbm = sample;
            }
            if sample > self.max_dbm {
                self.max_dbm = sample;
            }
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.min_dbm = HISTORY_MIN_RESET_DBM;
        self.max_dbm = HISTORY_MAX_RESET_DBM;
    }

    pub fn min_dbm(&self) -> i8 {
        self.min_dbm
    }

    pub fn max_dbm(&self) -> i8 {
        self.max_dbm
    }

    pub fn has_readings(&self) -> bool {
        self.max_dbm >= self.min_dbm
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = i8> + '_ {
        self.samples.iter().copied()
    }

    pub fn latest(&self) -> Option<i8> {
        self.samples.back().copied()
    }

    /// Average over real samples and the share of lost probes, for the
    /// chart status line.
    pub fn window_stats(&self) -> (i32, u32) {
        let mut sum = 0i32;
        let mut lost = 0u32;
        for sample in self.iter() {
            if sample == SAMPLE_LOST {
                lost += 1;
            } else {
                sum += i32::from(sample);
            }
        }
        let total = self.len() as u32;
        if total == 0 {
            return (0, 0);
        }
        let real = total - lost;
        let average = if real == 0 { 0 } else { sum / real as i32 };
        (average, lost * 100 / total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_eviction_at_capacity() {
        let mut history = SignalHistory::new();
        for i in 0..HISTORY_CAPACITY as i32 + 5 {
            history.push(-30 - (i % 60) as i8);
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        // oldest five evicted
        assert_eq!(history.iter().next(), Some(-35));
    }

    #[test]
    fn bounds_persist_past_eviction() {
        let mut history = SignalHistory::new();
        history.push(-50);
        history.push(-60);
        history.push(-70);
        // flush the window until the extremes are long gone
        for _ in 0..2 * HISTORY_CAPACITY {
            history.push(-55);
        }
        assert!(history.iter().all(|s| s == -55));
        assert_eq!(history.min_dbm(), -70);
        assert_eq!(history.max_dbm(), -50);
    }

    #[test]
    fn lost_samples_do_not_touch_bounds() {
        let mut history = SignalHistory::new();
        assert!(!history.has_readings());
        history.push(SAMPLE_LOST);
        assert!(!history.has_readings());
        history.push(-48);
        assert!(history.has_readings());
        assert_eq!(history.min_dbm(), -48);
        assert_eq!(history.max_dbm(), -48);
    }

    #[test]
    fn clear_resets_samples_and_bounds() {
        let mut history = SignalHistory::new();
        history.push(-40);
        history.push(-90);
        history.clear();
        assert!(history.is_empty());
        assert!(!history.has_readings());
        assert_eq!(history.min_dbm(), HISTORY_MIN_RESET_DBM);
        assert_eq!(history.max_dbm(), HISTORY_MAX_RESET_DBM);
    }

    #[test]
    fn window_stats_split_real_and_lost() {
        let mut history = SignalHistory::new();
        history.push(-40);
        history.push(SAMPLE_LOST);
        history.push(-60);
        history.push(SAMPLE_LOST);
        let (average, lost_percent) = history.window_stats();
        assert_eq!(average, -50);
        assert_eq!(lost_percent, 50);
    }
}
