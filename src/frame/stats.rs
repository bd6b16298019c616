use chrono::{DateTime, Duration, Local};
use tracing::{debug, info};

/// Averages over one logging window.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsWindow {
    pub frames: u64,
    pub seconds: f64,
    pub average_frame_ms: f64,
    pub fps: f64,
    pub slowest_frame_ms: f64,
}

/// Counts frames and their durations, reporting every `interval`.
#[derive(Debug, Clone)]
pub struct FrameStats {
    interval: Duration,
    window_start: DateTime<Local>,
    frames: u64,
    busy: Duration,
    slowest: Duration,
    total_frames: u64,
}

impl FrameStats {
    pub fn new(interval_seconds: u64, now: DateTime<Local>) -> Self {
        let seconds = i64::try_from(interval_seconds.max(1)).unwrap_or(i64::MAX);
        Self {
            interval: Duration::try_seconds(seconds).unwrap_or(Duration::MAX),
            window_start: now,
            frames: 0,
            busy: Duration::zero(),
            slowest: Duration::zero(),
            total_frames: 0,
        }
    }

    /// Adds one frame that took `frame_time`. Returns the closed window once `interval` has passed.
    pub fn record(&mut self, frame_time: Duration, now: DateTime<Local>) -> Option<StatsWindow> {
        self.frames += 1;
        self.total_frames += 1;
        self.busy = self.busy + frame_time;
        if frame_time > self.slowest {
            self.slowest = frame_time;
        }

        let elapsed = now - self.window_start;
        if elapsed < self.interval {
            return None;
        }

        let seconds = elapsed.num_milliseconds() as f64 / 1000.0;
        let window = StatsWindow {
            frames: self.frames,
            seconds,
            average_frame_ms: millis(self.busy) / self.frames as f64,
            fps: if seconds > 0.0 {
                self.frames as f64 / seconds
            } else {
                0.0
            },
            slowest_frame_ms: millis(self.slowest),
        };
        info!(
            "Frame stats: {} frames in {:.1} seconds",
            window.frames, window.seconds
        );
        info!(
            "Average: {:.2} ms/frame, {:.1} fps, slowest {:.2} ms",
            window.average_frame_ms, window.fps, window.slowest_frame_ms
        );

        self.window_start = now;
        self.frames = 0;
        self.busy = Duration::zero();
        self.slowest = Duration::zero();
        Some(window)
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn reset(&mut self, now: DateTime<Local>) {
        debug!("Resetting frame stats after {} frames", self.total_frames);
        self.window_start = now;
        self.frames = 0;
        self.busy = Duration::zero();
        self.slowest = Duration::zero();
    }
}

fn millis(duration: Duration) -> f64 {
    match duration.num_microseconds() {
        Some(micros) => micros as f64 / 1000.0,
        None => duration.num_milliseconds() as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_interval() {
        let start = Local::now();
        let mut stats = FrameStats::new(1, start);
        let frame = Duration::milliseconds(10);

        for i in 1..=9 {
            assert!(stats
                .record(frame, start + Duration::milliseconds(100 * i))
                .is_none());
        }
        let window = stats
            .record(Duration::milliseconds(20), start + Duration::seconds(1))
            .unwrap();
        assert_eq!(window.frames, 10);
        assert!((window.seconds - 1.0).abs() < 1e-9);
        assert!((window.fps - 10.0).abs() < 1e-9);
        assert!((window.average_frame_ms - 11.0).abs() < 1e-9);
        assert!((window.slowest_frame_ms - 20.0).abs() < 1e-9);

        // Counters start over, the running total does not
        assert!(stats
            .record(frame, start + Duration::milliseconds(1500))
            .is_none());
        assert_eq!(stats.total_frames(), 11);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let start = Local::now();
        let mut stats = FrameStats::new(0, start);
        assert!(stats
            .record(Duration::milliseconds(1), start + Duration::milliseconds(500))
            .is_none());
        assert!(stats
            .record(Duration::milliseconds(1), start + Duration::seconds(1))
            .is_some());
    }
}
