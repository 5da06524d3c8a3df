use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

/// Wall-clock frame timing with a smoothed FPS estimate.
///
/// The sample hands `smoothed_fps` to the frame controller each frame, so the
/// value must never be zero: the controller divides by it to scale movement.
pub struct TimeState {
    /// Longest frame delta accepted before clamping (seconds).
    pub max_frame_dt: f64,
    pub total_time: f64,
    pub frame_count: u64,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self {
            max_frame_dt: 0.25,
            total_time: 0.0,
            frame_count: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [1.0 / 30.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 30.0,
            smoothed_frame_time_ms: 33.333,
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.record_frame(dt);
    }

    /// Feeds one frame delta. Split from `begin_frame` so timing can be driven
    /// without a real clock.
    pub fn record_frame(&mut self, dt: f64) {
        self.real_dt = dt;
        // Hitches (window drag, breakpoint) would otherwise tank the average.
        if self.real_dt > self.max_frame_dt {
            log::warn!(
                "Frame took {:.1}ms, clamping to {}ms",
                self.real_dt * 1000.0,
                self.max_frame_dt * 1000.0
            );
            self.real_dt = self.max_frame_dt;
        }

        self.total_time += self.real_dt;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        if avg_dt > 0.0 {
            self.smoothed_fps = 1.0 / avg_dt;
        }
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_thirty_fps() {
        let time = TimeState::new();
        assert!((time.smoothed_fps - 30.0).abs() < 1e-9);
        assert_eq!(time.frame_count, 0);
    }

    #[test]
    fn steady_frames_converge_to_their_rate() {
        let mut time = TimeState::new();
        for _ in 0..FPS_SAMPLE_COUNT {
            time.record_frame(1.0 / 60.0);
        }
        assert!((time.smoothed_fps - 60.0).abs() < 1e-6);
        assert!((time.smoothed_frame_time_ms - 16.6667).abs() < 1e-3);
        assert_eq!(time.frame_count, FPS_SAMPLE_COUNT as u64);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut time = TimeState::new();
        time.record_frame(3.0);
        assert!((time.real_dt - time.max_frame_dt).abs() < 1e-12);
        assert!((time.total_time - time.max_frame_dt).abs() < 1e-12);
    }

    #[test]
    fn zero_length_frames_keep_previous_fps() {
        let mut time = TimeState::new();
        for _ in 0..FPS_SAMPLE_COUNT {
            time.record_frame(0.0);
        }
        assert!(time.smoothed_fps > 0.0);
    }
}
