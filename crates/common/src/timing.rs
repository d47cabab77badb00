use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Caps the frame rate by computing how long the loop should sleep.
///
/// Also measures elapsed time since startup and the delta between
/// consecutive frames, which are the two time inputs the camera and the
/// instance composer consume.
#[derive(Debug)]
pub struct FramePacer {
    frame_budget: Duration,
    started: Instant,
    last_frame: Instant,
}

impl FramePacer {
    pub fn new(target_fps: u32) -> Self {
        let now = Instant::now();
        Self {
            frame_budget: Duration::from_secs(1) / target_fps.max(1),
            started: now,
            last_frame: now,
        }
    }

    pub fn frame_budget(&self) -> Duration {
        self.frame_budget
    }

    /// Seconds since the pacer was created.
    pub fn elapsed(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    /// Marks the start of a new frame and returns the delta (seconds) since
    /// the previous one. Clamped so a stalled window does not teleport the camera.
    pub fn begin_frame(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;
        dt
    }

    /// How long to sleep after doing `work` so the frame lasts one budget.
    pub fn remaining(&self, work: Duration) -> Option<Duration> {
        self.frame_budget.checked_sub(work).filter(|d| !d.is_zero())
    }

    /// Sleeps out the rest of the frame that started at `frame_start`.
    pub fn sleep_remaining(&self, frame_start: Instant) {
        if let Some(delay) = self.remaining(frame_start.elapsed()) {
            std::thread::sleep(delay);
        }
    }
}

/// Frame deltas the HUD shows, averaged over a sliding window.
#[derive(Debug)]
pub struct FrameStats {
    window: usize,
    deltas: VecDeque<f32>,
    sum: f32,
}

impl FrameStats {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            deltas: VecDeque::with_capacity(window),
            sum: 0.0,
        }
    }

    /// Adds one frame delta in seconds, evicting the oldest once the window is full.
    pub fn push(&mut self, dt: f32) {
        if self.deltas.len() == self.window {
            if let Some(old) = self.deltas.pop_front() {
                self.sum -= old;
            }
        }
        self.deltas.push_back(dt);
        self.sum += dt;
    }

    pub fn samples(&self) -> usize {
        self.deltas.len()
    }

    pub fn mean_ms(&self) -> f32 {
        if self.deltas.is_empty() {
            return 0.0;
        }
        self.sum.max(0.0) / self.deltas.len() as f32 * 1000.0
    }

    pub fn fps(&self) -> f32 {
        let ms = self.mean_ms();
        if ms > 0.0 { 1000.0 / ms } else { 0.0 }
    }
}
