use crate::foundation::core::Fps;

/// Turns host timestamps into frame deltas.
///
/// Deltas are clamped to `[0, max_delta_ms]` so a stalled host (debugger, suspended window)
/// does not make every transition jump to its end on the next frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameClock {
    fps: Fps,
    max_delta_ms: f64,
    last_ms: Option<f64>,
    frames: u64,
}

impl FrameClock {
    /// A clock for `fps` that never reports more than `max_delta_ms` per frame.
    pub fn new(fps: Fps, max_delta_ms: f64) -> Self {
        Self {
            fps,
            max_delta_ms: max_delta_ms.max(0.0),
            last_ms: None,
            frames: 0,
        }
    }

    /// Time since the previous tick. The first tick, and any tick going backwards, is 0.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let dt = match self.last_ms {
            Some(last) if now_ms.is_finite() => (now_ms - last).max(0.0),
            _ => 0.0,
        };
        if now_ms.is_finite() {
            self.last_ms = Some(now_ms);
        }
        self.clamp(dt)
    }

    /// Clamp a caller-provided delta the same way [`FrameClock::tick`] does.
    pub fn clamp(&self, dt_ms: f64) -> f64 {
        if dt_ms.is_finite() {
            dt_ms.clamp(0.0, self.max_delta_ms)
        } else {
            0.0
        }
    }

    /// Delta for driving the stage at exactly the configured rate.
    pub fn fixed_step_ms(&self) -> f64 {
        self.fps.frame_duration_ms()
    }

    /// Configured frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Forget the last timestamp; the next tick starts from zero again.
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    pub(crate) fn count_frame(&mut self) -> u64 {
        self.frames += 1;
        self.frames
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/clock.rs"]
mod tests;
