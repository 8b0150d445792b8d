use std::{collections::VecDeque, time::Duration};
use tokio::time::Instant;

// ticks kept for the moving average
const WINDOW: usize = 30;

// how often the measured rate is logged
const REPORT_EVERY: Duration = Duration::from_secs(5);

/// Moving-average tick rate of the render loop.
#[derive(Debug, Default)]
pub struct FrameStats {
    ticks: VecDeque<Instant>,
    total: u64,
    last_report: Option<Instant>,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one rendered tick.
    pub fn record(&mut self, now: Instant) {
        self.ticks.push_back(now);
        while self.ticks.len() > WINDOW {
            self.ticks.pop_front();
        }
        self.total += 1;

        let due = match self.last_report {
            Some(last) => now.duration_since(last) >= REPORT_EVERY,
            None => true,
        };
        if due {
            self.last_report = Some(now);
            if let Some(fps) = self.fps() {
                log::debug!("render loop at {:.1} fps ({} frames)", fps, self.total);
            }
        }
    }

    /// Rendered ticks per second over the recent window, once two ticks
    /// have been recorded.
    pub fn fps(&self) -> Option<f32> {
        let (first, last) = (self.ticks.front()?, self.ticks.back()?);
        let span = last.duration_since(*first).as_secs_f32();
        if span <= 0.0 {
            return None;
        }
        Some((self.ticks.len() - 1) as f32 / span)
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_needs_two_ticks() {
        let mut stats = FrameStats::new();
        assert_eq!(stats.fps(), None);
        stats.record(Instant::now());
        assert_eq!(stats.fps(), None);
    }

    #[test]
    fn test_fps_from_even_spacing() {
        let mut stats = FrameStats::new();
        let start = Instant::now();
        for i in 0..11 {
            stats.record(start + Duration::from_millis(100 * i));
        }
        let fps = stats.fps().unwrap();
        assert!((fps - 10.0).abs() < 0.01, "fps was {fps}");
        assert_eq!(stats.total(), 11);
    }

    #[test]
    fn test_window_is_bounded() {
        let mut stats = FrameStats::new();
        let start = Instant::now();
        for i in 0..100 {
            stats.record(start + Duration::from_millis(50 * i));
        }
        assert_eq!(stats.ticks.len(), WINDOW);
        assert!((stats.fps().unwrap() - 20.0).abs() < 0.01);
    }
}
