/// Turns frame timestamps into elapsed seconds.
///
/// Timestamps are milliseconds on any monotonic scale (a `requestAnimationFrame`
/// time, `Instant` offsets, a simulated counter). The first tick reports zero.
pub struct FrameClock {
    previous_ms: Option<f64>,
    max_delta: f32,
    /// Seconds reported by the last tick.
    pub delta: f32,
    /// Sum of all reported deltas.
    pub elapsed: f64,
    /// Total number of ticks.
    pub frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(f32::INFINITY)
    }
}

impl FrameClock {
    /// `max_delta` caps a single step in seconds, so that a stalled or
    /// backgrounded window does not fast-forward the animation.
    #[must_use]
    pub fn new(max_delta: f32) -> Self {
        let max_delta = if max_delta.is_nan() || max_delta < 0.0 {
            log::warn!("Invalid max frame delta {max_delta}, using no limit");
            f32::INFINITY
        } else {
            max_delta
        };
        Self {
            previous_ms: None,
            max_delta,
            delta: 0.0,
            elapsed: 0.0,
            frame_count: 0,
        }
    }

    /// Records a frame at `timestamp_ms` and returns the seconds since the
    /// previous one. Non-finite or backwards timestamps yield zero.
    pub fn tick(&mut self, timestamp_ms: f64) -> f32 {
        self.frame_count += 1;

        if !timestamp_ms.is_finite() {
            self.delta = 0.0;
            return 0.0;
        }

        let previous = self.previous_ms.replace(timestamp_ms);
        let seconds = match previous {
            Some(prev) if timestamp_ms > prev => ((timestamp_ms - prev) * 0.001) as f32,
            _ => 0.0,
        };

        self.delta = seconds.min(self.max_delta);
        self.elapsed += f64::from(self.delta);
        self.delta
    }

    #[must_use]
    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }

    /// Forgets the previous timestamp; the next tick reports zero again.
    pub fn reset(&mut self) {
        self.previous_ms = None;
        self.delta = 0.0;
    }
}
