//! Frame rate sampling for the window title.

/// A frame rate measurement over one sample window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FpsSample {
    pub fps: f64,
    /// Infinite when no frame was counted in the window.
    pub ms_per_frame: f64,
}

/// Counts frames and produces an [`FpsSample`] once per `interval` seconds.
#[derive(Clone, Debug)]
pub struct FpsCounter {
    last_sample: f64,
    frame_count: u32,
    interval: f64,
}

impl FpsCounter {
    /// Creates a counter whose first window starts at `now` (seconds).
    pub fn new(now: f64, interval: f64) -> Self {
        Self {
            last_sample: now,
            frame_count: 0,
            interval,
        }
    }

    /// Registers one frame at time `now`.
    ///
    /// Returns a sample when more than `interval` seconds passed since the previous one. The
    /// counter is reset when sampling and the current frame is then counted towards the next
    /// window.
    pub fn tick(&mut self, now: f64) -> Option<FpsSample> {
        let elapsed = now - self.last_sample;
        let sample = if elapsed > self.interval {
            self.last_sample = now;
            let fps = self.frame_count as f64 / elapsed;
            self.frame_count = 0;
            Some(FpsSample {
                fps,
                ms_per_frame: 1000.0 / fps,
            })
        } else {
            None
        };

        self.frame_count += 1;
        sample
    }

    /// Frames counted in the current window.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn last_sample(&self) -> f64 {
        self.last_sample
    }
}

/// Formats the window title shown while running.
pub fn format_title(title: &str, sample: &FpsSample) -> String {
    format!(
        "{title} @ fps: {:.2}, ms/frame: {:.2}",
        sample.fps, sample.ms_per_frame
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_sample_within_interval() {
        let mut counter = FpsCounter::new(0.0, 0.25);
        for i in 0..10 {
            assert_eq!(counter.tick(i as f64 * 0.02), None);
        }
        assert_eq!(counter.frame_count(), 10);
        assert_eq!(counter.last_sample(), 0.0);
    }

    #[test]
    fn test_sample_once_per_window() {
        let mut counter = FpsCounter::new(0.0, 0.25);
        let mut samples = Vec::new();
        // 64 frames of 1/64s each, one second in total.
        for i in 1..=64 {
            if let Some(sample) = counter.tick(i as f64 / 64.0) {
                samples.push((i, sample));
            }
        }
        let frames: Vec<i32> = samples.iter().map(|(i, _)| *i).collect();
        assert_eq!(frames, vec![17, 34, 51]);
        // Frames 1..=16 counted over 17/64s.
        let elapsed = 17.0 / 64.0;
        assert!((samples[0].1.fps - 16.0 / elapsed).abs() < 1e-9);
        assert!((samples[0].1.ms_per_frame - 1000.0 / (16.0 / elapsed)).abs() < 1e-9);
        // Later windows include the frame that triggered the previous sample.
        assert!((samples[1].1.fps - 17.0 / elapsed).abs() < 1e-9);
    }

    #[test]
    fn test_counter_resets_after_sample() {
        let mut counter = FpsCounter::new(0.0, 0.25);
        counter.tick(0.1);
        counter.tick(0.2);
        assert_eq!(counter.frame_count(), 2);

        let sample = counter.tick(0.5).unwrap();
        assert!((sample.fps - 4.0).abs() < 1e-9);
        assert_eq!(counter.last_sample(), 0.5);
        // The sampling frame is the first of the next window.
        assert_eq!(counter.frame_count(), 1);
    }

    #[test]
    fn test_exact_interval_does_not_sample() {
        let mut counter = FpsCounter::new(0.0, 0.25);
        assert_eq!(counter.tick(0.25), None);
    }

    #[test]
    fn test_empty_window_yields_infinite_frame_time() {
        let mut counter = FpsCounter::new(10.0, 0.25);
        let sample = counter.tick(11.0).unwrap();
        assert_eq!(sample.fps, 0.0);
        assert!(sample.ms_per_frame.is_infinite());
        assert_eq!(
            format_title("Demo", &sample),
            "Demo @ fps: 0.00, ms/frame: inf"
        );
    }

    #[test]
    fn test_format_title() {
        let sample = FpsSample {
            fps: 60.0,
            ms_per_frame: 1000.0 / 60.0,
        };
        assert_eq!(
            format_title("OpenGL Learning", &sample),
            "OpenGL Learning @ fps: 60.00, ms/frame: 16.67"
        );
    }
}
