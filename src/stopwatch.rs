use std::time::Instant;

use tdigest::TDigest;

/// Collects prediction latencies and reports their percentiles.
#[derive(Clone)]
pub struct Stopwatch {
    start_time: Instant,
    durations_in_micros: Vec<f64>,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Stopwatch {
        Stopwatch {
            start_time: Instant::now(),
            durations_in_micros: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        self.start_time = Instant::now();
    }

    pub fn stop(&mut self) {
        let duration = self.start_time.elapsed();
        self.record_micros(duration.as_micros() as f64);
    }

    pub fn record_micros(&mut self, micros: f64) {
        self.durations_in_micros.push(micros);
    }

    pub fn get_n(&self) -> usize {
        self.durations_in_micros.len()
    }

    /// `q` is a fraction in `0.0..=1.0`, `None` before anything was measured.
    pub fn get_percentile_in_micros(&self, q: f64) -> Option<f64> {
        if self.durations_in_micros.is_empty() {
            return None;
        }
        let t_digest = TDigest::new_with_size(100);
        let sorted_digest = t_digest.merge_unsorted(self.durations_in_micros.clone());
        Some(sorted_digest.estimate_quantile(q))
    }
}
