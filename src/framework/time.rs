use std::time::{Duration, Instant};

/// Longest step handed to the app; keeps the camera from jumping after a stall.
const MAX_DT: f32 = 0.25;
const FPS_WINDOW: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous update.
    pub dt: f32,
    /// Seconds since the clock started.
    pub elapsed: f32,
    pub frame: u64,
    /// Frames per second averaged over the last half second.
    pub fps: f32,
}

pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame: u64,
    window_start: Instant,
    window_frames: u32,
    fps: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            start: now,
            last: now,
            frame: 0,
            window_start: now,
            window_frames: 0,
            fps: 0.0,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now.saturating_duration_since(self.last).as_secs_f32().min(MAX_DT);
        self.last = now;
        self.frame += 1;

        self.window_frames += 1;
        let window = now.saturating_duration_since(self.window_start);
        if window >= FPS_WINDOW {
            self.fps = self.window_frames as f32 / window.as_secs_f32();
            self.window_frames = 0;
            self.window_start = now;
        }

        FrameTime {
            dt,
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            frame: self.frame,
            fps: self.fps,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dt_and_frame_count_advance() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        let a = clock.tick_at(t0 + Duration::from_millis(16));
        let b = clock.tick_at(t0 + Duration::from_millis(48));
        assert_eq!(a.frame, 1);
        assert_eq!(b.frame, 2);
        assert!((b.dt - 0.032).abs() < 1e-4);
        assert!((b.elapsed - 0.048).abs() < 1e-4);
    }

    #[test]
    fn long_stall_is_clamped() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        let t = clock.tick_at(t0 + Duration::from_secs(3));
        assert_eq!(t.dt, MAX_DT);
    }

    #[test]
    fn fps_is_measured_over_half_second_windows() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        let mut last = FrameTime::default();
        for i in 1..=30 {
            last = clock.tick_at(t0 + Duration::from_millis(i * 20));
        }
        // 25 frames landed in the first 500 ms window.
        assert!((last.fps - 50.0).abs() < 0.5, "fps was {}", last.fps);
    }
}
