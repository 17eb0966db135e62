use std::time::Instant;

/// Delta and cumulative elapsed time reported by one [`Clock::tick`].
#[derive(Debug, Clone, Copy)]
pub struct ClockTick {
    pub delta_seconds: f32,
    pub elapsed_seconds: f64,
}

/// Monotonic per-frame clock. Starts on the first `tick`; elapsed time is the
/// running sum of reported deltas, so the two always agree exactly.
pub struct Clock {
    last: Option<Instant>,
    elapsed: f64,
    delta: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self { last: None, elapsed: 0.0, delta: 0.0 }
    }

    pub fn tick(&mut self) -> ClockTick {
        let now = Instant::now();
        self.delta = match self.last {
            Some(last) => now.saturating_duration_since(last).as_secs_f32(),
            None => 0.0,
        };
        self.last = Some(now);
        self.elapsed += self.delta as f64;
        ClockTick { delta_seconds: self.delta, elapsed_seconds: self.elapsed }
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed
    }

    /// Elapsed time in milliseconds, the timestamp space used by the
    /// flip-book frame gate.
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed * 1000.0
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
