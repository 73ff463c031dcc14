//! Frame clock and rolling frame-rate statistics.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const MAX_SAMPLES: usize = 120;

/// Monotonic frame clock.
///
/// `begin_frame` samples the clock once per frame; the returned elapsed
/// time is what effects animate with, and never goes backwards.
pub struct FrameTimer {
    started: Instant,
    last_frame: Instant,
    last_report: Instant,
    frame_times: VecDeque<Duration>,
}

impl FrameTimer {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_frame: now,
            last_report: now,
            frame_times: VecDeque::with_capacity(MAX_SAMPLES),
        }
    }

    /// Record a frame boundary and return seconds since the timer started.
    pub fn begin_frame(&mut self) -> f32 {
        let now = Instant::now();
        self.frame_times.push_back(now - self.last_frame);
        if self.frame_times.len() > MAX_SAMPLES {
            self.frame_times.pop_front();
        }
        self.last_frame = now;
        (now - self.started).as_secs_f32()
    }

    /// Average frames per second over the sample window.
    pub fn fps(&self) -> f64 {
        let total: f64 = self.frame_times.iter().map(Duration::as_secs_f64).sum();
        if total <= 0.0 {
            return 0.0;
        }
        self.frame_times.len() as f64 / total
    }

    /// Average frame time in milliseconds.
    pub fn frame_time_ms(&self) -> f64 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let total: f64 = self.frame_times.iter().map(Duration::as_secs_f64).sum();
        total / self.frame_times.len() as f64 * 1000.0
    }

    pub fn sample_count(&self) -> usize {
        self.frame_times.len()
    }

    /// True at most once per `interval`; used to throttle fps logging.
    pub fn report_due(&mut self, interval: Duration) -> bool {
        let now = Instant::now();
        if now - self.last_report >= interval {
            self.last_report = now;
            true
        } else {
            false
        }
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_timer_reports_zero() {
        let timer = FrameTimer::new();
        assert_eq!(timer.fps(), 0.0);
        assert_eq!(timer.frame_time_ms(), 0.0);
        assert_eq!(timer.sample_count(), 0);
    }

    #[test]
    fn elapsed_time_is_monotonic() {
        let mut timer = FrameTimer::new();
        let mut last = 0.0;
        for _ in 0..5 {
            std::thread::sleep(Duration::from_millis(1));
            let t = timer.begin_frame();
            assert!(t >= last);
            last = t;
        }
        assert!(last > 0.0);
        assert!(timer.fps() > 0.0);
    }

    #[test]
    fn sample_window_is_bounded() {
        let mut timer = FrameTimer::new();
        for _ in 0..(MAX_SAMPLES * 2) {
            timer.begin_frame();
        }
        assert_eq!(timer.sample_count(), MAX_SAMPLES);
    }

    #[test]
    fn report_due_throttles() {
        let mut timer = FrameTimer::new();
        assert!(timer.report_due(Duration::ZERO));
        assert!(!timer.report_due(Duration::from_secs(3600)));
    }
}
