//! Scene clock driving the per-frame animation tick

use std::time::{Duration, Instant};

/// How the clock advances between ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClockMode {
    /// Wall-clock time since the clock was created.
    RealTime,
    /// Fixed step per tick, independent of the wall clock (headless runs, tests).
    FixedStep(Duration),
}

/// Tracks elapsed scene time and frame statistics.
///
/// `elapsed_secs` is monotonically non-decreasing from scene start and is the
/// value forwarded to every shader time uniform each frame.
pub struct SceneClock {
    mode: ClockMode,
    start: Instant,
    elapsed: Duration,
    delta: Duration,
    frame_count: u64,
    fps_timer: Duration,
    fps: f32,
    fps_frame_count: u32,
}

impl SceneClock {
    /// Create a clock in the given mode, starting at zero.
    pub fn new(mode: ClockMode) -> Self {
        Self {
            mode,
            start: Instant::now(),
            elapsed: Duration::ZERO,
            delta: Duration::ZERO,
            frame_count: 0,
            fps_timer: Duration::ZERO,
            fps: 0.0,
            fps_frame_count: 0,
        }
    }

    /// Real-time clock.
    pub fn real_time() -> Self {
        Self::new(ClockMode::RealTime)
    }

    /// Fixed-step clock ticking at `hz` frames per second.
    /// Rates whose step is not a representable, non-zero `Duration` fall back to 60 Hz.
    pub fn fixed(hz: f32) -> Self {
        let step = Some(hz)
            .filter(|hz| *hz > 0.0)
            .and_then(|hz| Duration::try_from_secs_f32(1.0 / hz).ok())
            .filter(|step| !step.is_zero())
            .unwrap_or(Duration::from_nanos(16_666_667));
        Self::new(ClockMode::FixedStep(step))
    }

    /// Advance one frame; returns elapsed seconds since scene start.
    pub fn tick(&mut self) -> f32 {
        let next = match self.mode {
            ClockMode::RealTime => self.start.elapsed(),
            ClockMode::FixedStep(step) => self.elapsed.saturating_add(step),
        };
        // Instant is monotonic, but keep the invariant explicit
        let next = next.max(self.elapsed);
        self.delta = next - self.elapsed;
        self.elapsed = next;
        self.frame_count += 1;
        self.fps_frame_count += 1;

        let fps_elapsed = self.elapsed - self.fps_timer;
        if fps_elapsed >= Duration::from_secs(1) {
            self.fps = self.fps_frame_count as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = 0;
            self.fps_timer = self.elapsed;
        }

        self.elapsed_secs()
    }

    /// Seconds since scene start.
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get delta time in seconds
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get current FPS (updated every second of scene time)
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Get total frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for SceneClock {
    fn default() -> Self {
        Self::real_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_step_advances() {
        let mut clock = SceneClock::fixed(10.0);
        assert_eq!(clock.elapsed_secs(), 0.0);
        let t1 = clock.tick();
        let t2 = clock.tick();
        assert!((t1 - 0.1).abs() < 1e-5);
        assert!((t2 - 0.2).abs() < 1e-5);
        assert!((clock.delta_secs() - 0.1).abs() < 1e-5);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_fps_after_one_second() {
        let mut clock = SceneClock::fixed(30.0);
        for _ in 0..31 {
            clock.tick();
        }
        assert!((clock.fps() - 30.0).abs() < 1.0);
    }

    #[test]
    fn test_real_time_monotonic() {
        let mut clock = SceneClock::real_time();
        let a = clock.tick();
        let b = clock.tick();
        assert!(b >= a);
    }

    #[test]
    fn test_invalid_rate_falls_back() {
        let mut clock = SceneClock::fixed(0.0);
        let t = clock.tick();
        assert!((t - 1.0 / 60.0).abs() < 1e-5);
    }

    #[test]
    fn test_unrepresentable_rates_fall_back() {
        for hz in [1e-40, 1e-30, f32::NAN, f32::INFINITY, -5.0] {
            let mut clock = SceneClock::fixed(hz);
            let t = clock.tick();
            assert!((t - 1.0 / 60.0).abs() < 1e-5, "hz {hz} gave {t}");
        }
    }
}
