//! Frame timebase
//!
//! Converts host timestamps (milliseconds, as handed to an animation frame
//! callback) into the per-frame elapsed time consumed by the simulation.

/// Tracks the last frame stamp and whether the loop is suspended
#[derive(Debug, Clone)]
pub struct Timebase {
    last_time: Option<f64>,
    running: bool,
    max_dt: f32,
}

impl Timebase {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_time: None,
            running: true,
            max_dt,
        }
    }

    /// Elapsed seconds since the previous frame, clamped to `max_dt`.
    ///
    /// Returns 0 while suspended and on the very first frame.
    pub fn frame(&mut self, now_ms: f64) -> f32 {
        if !self.running {
            return 0.0;
        }
        let elapsed = match self.last_time {
            Some(last) => ((now_ms - last) / 1000.0).max(0.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(now_ms);
        elapsed.min(self.max_dt)
    }

    /// Stop advancing time while the page is hidden
    pub fn suspend(&mut self) {
        if self.running {
            log::debug!("Timebase suspended");
        }
        self.running = false;
    }

    /// Resume, re-stamping so the paused interval is never counted
    pub fn resume(&mut self, now_ms: f64) {
        if !self.running {
            log::debug!("Timebase resumed");
        }
        self.running = true;
        self.last_time = Some(now_ms);
    }
}
