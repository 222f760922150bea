use std::time::{Duration, Instant};

use lego_render::Renderer;

use crate::composer::Lego;

/// Something an outside loop advances one frame at a time.
pub trait FrameDriver {
    type Output;

    /// Produce one frame, `dt` seconds after the previous one.
    fn advance(&mut self, dt: f32) -> Self::Output;
}

impl<R: Renderer> FrameDriver for Lego<R> {
    type Output = R::Output;

    fn advance(&mut self, dt: f32) -> R::Output {
        self.render(dt)
    }
}

/// Advance `driver` `count` times with a fixed step, collecting the frames.
pub fn run_frames<D: FrameDriver + ?Sized>(driver: &mut D, count: usize, dt: f32) -> Vec<D::Output> {
    (0..count).map(|_| driver.advance(dt)).collect()
}

/// Wall-clock frame timer for real-time hosts.
///
/// Long stalls (a dragged window, a breakpoint) are capped at `max_step` so
/// one frame never sees a huge delta.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    max_step: Duration,
}

impl FrameClock {
    pub fn new(max_step: Duration) -> Self {
        Self {
            last: Instant::now(),
            max_step,
        }
    }

    /// Seconds since the previous tick, capped.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> f32 {
        let dt = now.saturating_duration_since(self.last).min(self.max_step);
        self.last = now;
        dt.as_secs_f32()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}
