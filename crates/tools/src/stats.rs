use std::collections::VecDeque;
use std::fmt;

/// Frame time samples kept for averages and the overlay graph.
pub const FRAME_TIME_HISTORY_SIZE: usize = 120;

/// Reference frame time for the overlay (60 FPS).
pub const TARGET_FRAME_TIME_MS: f32 = 16.67;

/// Rolling frame timing statistics.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    frame_times: VecDeque<f32>,
    frames: u64,
    elapsed: f64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(FRAME_TIME_HISTORY_SIZE),
            ..Self::default()
        }
    }

    /// Record one frame that took `dt` seconds. Negative or non-finite
    /// deltas count as zero.
    pub fn record(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let frame_ms = dt * 1000.0;
        if frame_ms > TARGET_FRAME_TIME_MS * 4.0 {
            tracing::debug!(frame_ms, frame = self.frames, "slow frame");
        }
        self.frames += 1;
        self.elapsed += f64::from(dt);
        self.frame_times.push_back(frame_ms);
        while self.frame_times.len() > FRAME_TIME_HISTORY_SIZE {
            self.frame_times.pop_front();
        }
    }

    /// Frames recorded since creation or the last reset.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Total recorded time in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn last_frame_ms(&self) -> Option<f32> {
        self.frame_times.back().copied()
    }

    pub fn average_frame_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32
    }

    pub fn max_frame_ms(&self) -> f32 {
        self.frame_times.iter().copied().fold(0.0, f32::max)
    }

    /// Frames per second over the history window; 0 until time has passed.
    pub fn fps(&self) -> f32 {
        let avg = self.average_frame_ms();
        if avg > 0.0 { 1000.0 / avg } else { 0.0 }
    }

    /// Frame times in milliseconds, oldest first.
    pub fn history(&self) -> impl Iterator<Item = f32> + '_ {
        self.frame_times.iter().copied()
    }

    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.frames = 0;
        self.elapsed = 0.0;
    }
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fps={:.1} frame={:.2}ms max={:.2}ms frames={}",
            self.fps(),
            self.average_frame_ms(),
            self.max_frame_ms(),
            self.frames
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats() {
        let stats = FrameStats::new();
        assert_eq!(stats.frames(), 0);
        assert_eq!(stats.fps(), 0.0);
        assert!(stats.last_frame_ms().is_none());
    }

    #[test]
    fn steady_sixty_hz() {
        let mut stats = FrameStats::new();
        for _ in 0..30 {
            stats.record(1.0 / 60.0);
        }
        assert_eq!(stats.frames(), 30);
        assert!((stats.fps() - 60.0).abs() < 0.01);
        assert!((stats.elapsed() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn history_is_bounded() {
        let mut stats = FrameStats::new();
        for _ in 0..FRAME_TIME_HISTORY_SIZE * 2 {
            stats.record(0.01);
        }
        assert_eq!(stats.history().count(), FRAME_TIME_HISTORY_SIZE);
        assert_eq!(stats.frames(), FRAME_TIME_HISTORY_SIZE as u64 * 2);
    }

    #[test]
    fn spikes_show_in_max() {
        let mut stats = FrameStats::new();
        stats.record(0.016);
        stats.record(0.1);
        stats.record(0.016);
        assert!((stats.max_frame_ms() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn bad_deltas_count_as_zero() {
        let mut stats = FrameStats::new();
        stats.record(-1.0);
        stats.record(f32::NAN);
        assert_eq!(stats.frames(), 2);
        assert_eq!(stats.elapsed(), 0.0);
    }

    #[test]
    fn reset_clears_everything() {
        let mut stats = FrameStats::new();
        stats.record(0.02);
        stats.reset();
        assert_eq!(stats.frames(), 0);
        assert_eq!(stats.history().count(), 0);
        assert!(format!("{stats}").contains("frames=0"));
    }
}
