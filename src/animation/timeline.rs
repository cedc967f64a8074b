use crate::animation::ease::EasingMode;
use crate::foundation::error::{StageError, StageResult};

/// Playback state of a [`Timeline`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineState {
    /// Not started, or stopped (rewound).
    #[default]
    Stopped,
    /// Advancing with every frame.
    Running,
    /// Holding its position until resumed.
    Paused,
    /// Played every iteration to the end.
    Completed,
}

/// Direction in which elapsed time maps onto progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineDirection {
    /// Progress goes from 0 to 1.
    #[default]
    Forward,
    /// Progress goes from 1 to 0.
    Backward,
}

impl TimelineDirection {
    fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Marker {
    name: String,
    msecs: f64,
}

/// What happened during one [`Timeline::advance`] call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimelineTick {
    /// The timeline moved (it was running and past its delay).
    pub moved: bool,
    /// An iteration boundary was crossed and playback wrapped.
    pub wrapped: bool,
    /// The last iteration finished on this tick.
    pub completed: bool,
    /// Markers crossed on this tick, in playback order.
    pub markers: Vec<String>,
}

/// Elapsed-time to progress mapping with delay, repeats and markers.
///
/// `repeat_count` follows the toolkit convention: `0` plays once, `n` plays `n + 1` times and
/// `-1` loops forever.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    duration_ms: f64,
    delay_ms: f64,
    repeat_count: i32,
    direction: TimelineDirection,
    auto_reverse: bool,
    progress_mode: EasingMode,
    markers: Vec<Marker>,

    state: TimelineState,
    elapsed_ms: f64,
    delay_elapsed_ms: f64,
    current_repeat: i32,
    current_direction: TimelineDirection,
}

impl Timeline {
    /// A stopped timeline of `duration_ms`.
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms: duration_ms.max(0.0),
            delay_ms: 0.0,
            repeat_count: 0,
            direction: TimelineDirection::Forward,
            auto_reverse: false,
            progress_mode: EasingMode::Linear,
            markers: Vec::new(),
            state: TimelineState::Stopped,
            elapsed_ms: 0.0,
            delay_elapsed_ms: 0.0,
            current_repeat: 0,
            current_direction: TimelineDirection::Forward,
        }
    }

    /// Length of one iteration in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Change the iteration length; the position is clamped into the new range.
    pub fn set_duration_ms(&mut self, duration_ms: f64) {
        self.duration_ms = duration_ms.max(0.0);
        self.elapsed_ms = self.elapsed_ms.min(self.duration_ms);
    }

    /// Delay before the first iteration.
    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    /// Set the delay before the first iteration.
    pub fn set_delay_ms(&mut self, delay_ms: f64) {
        self.delay_ms = delay_ms.max(0.0);
    }

    /// Configured repeat count.
    pub fn repeat_count(&self) -> i32 {
        self.repeat_count
    }

    /// Set the repeat count (`-1` loops forever, `0` plays once).
    pub fn set_repeat_count(&mut self, repeat_count: i32) -> StageResult<()> {
        if repeat_count < -1 {
            return Err(StageError::config(format!(
                "repeat count must be >= -1, got {repeat_count}"
            )));
        }
        self.repeat_count = repeat_count;
        Ok(())
    }

    /// Iterations completed so far.
    pub fn current_repeat(&self) -> i32 {
        self.current_repeat
    }

    /// Configured direction.
    pub fn direction(&self) -> TimelineDirection {
        self.direction
    }

    /// Set the playback direction.
    pub fn set_direction(&mut self, direction: TimelineDirection) {
        self.direction = direction;
        self.current_direction = direction;
    }

    /// Whether the direction flips after every iteration.
    pub fn auto_reverse(&self) -> bool {
        self.auto_reverse
    }

    /// Flip direction after each iteration.
    pub fn set_auto_reverse(&mut self, auto_reverse: bool) {
        self.auto_reverse = auto_reverse;
    }

    /// Easing applied to [`Timeline::progress`].
    pub fn progress_mode(&self) -> EasingMode {
        self.progress_mode
    }

    /// Set the easing applied to [`Timeline::progress`].
    pub fn set_progress_mode(&mut self, mode: EasingMode) {
        self.progress_mode = mode;
    }

    /// Current state.
    pub fn state(&self) -> TimelineState {
        self.state
    }

    /// Whether the timeline is advancing.
    pub fn is_playing(&self) -> bool {
        self.state == TimelineState::Running
    }

    /// Elapsed time within the current iteration.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Start or resume playback. A completed timeline restarts from the beginning.
    pub fn start(&mut self) {
        if self.state == TimelineState::Completed {
            self.rewind();
        }
        self.state = TimelineState::Running;
    }

    /// Hold the current position.
    pub fn pause(&mut self) {
        if self.state == TimelineState::Running {
            self.state = TimelineState::Paused;
        }
    }

    /// Halt playback and rewind.
    pub fn stop(&mut self) {
        self.state = TimelineState::Stopped;
        self.rewind();
    }

    /// Jump back to the beginning of the first iteration without changing the state.
    pub fn rewind(&mut self) {
        self.elapsed_ms = 0.0;
        self.delay_elapsed_ms = 0.0;
        self.current_repeat = 0;
        self.current_direction = self.direction;
        if self.state == TimelineState::Completed {
            self.state = TimelineState::Stopped;
        }
    }

    /// Move the position by `msecs` without emitting markers or completing.
    pub fn skip(&mut self, msecs: f64) {
        if self.duration_ms <= 0.0 {
            return;
        }
        let target = self.elapsed_ms + msecs.max(0.0);
        self.elapsed_ms = target.rem_euclid(self.duration_ms);
        if target >= self.duration_ms && self.elapsed_ms == 0.0 {
            self.elapsed_ms = self.duration_ms;
        }
    }

    /// Set the position within the current iteration, without emitting markers.
    pub fn advance_to(&mut self, msecs: f64) {
        self.elapsed_ms = msecs.clamp(0.0, self.duration_ms);
    }

    /// Linear position in `[0, 1]`, honoring the current direction.
    pub fn raw_progress(&self) -> f64 {
        let p = if self.duration_ms <= 0.0 {
            if self.elapsed_ms > 0.0 || self.state == TimelineState::Completed {
                1.0
            } else {
                0.0
            }
        } else {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        };
        match self.current_direction {
            TimelineDirection::Forward => p,
            TimelineDirection::Backward => 1.0 - p,
        }
    }

    /// Eased progress, see [`Timeline::set_progress_mode`].
    pub fn progress(&self) -> f64 {
        self.progress_mode.apply(self.raw_progress())
    }

    /// Total length including the delay; `None` when looping forever.
    pub fn total_duration_ms(&self) -> Option<f64> {
        if self.repeat_count < 0 {
            return None;
        }
        Some(self.delay_ms + self.duration_ms * f64::from(self.repeat_count + 1))
    }

    /// Add a marker at `msecs` into each iteration. Existing markers keep their name.
    pub fn add_marker_at_time(&mut self, name: &str, msecs: f64) -> StageResult<()> {
        if self.has_marker(name) {
            return Err(StageError::config(format!("marker \"{name}\" already exists")));
        }
        if !(0.0..=self.duration_ms).contains(&msecs) {
            return Err(StageError::config(format!(
                "marker \"{name}\" at {msecs}ms is outside the {}ms timeline",
                self.duration_ms
            )));
        }
        self.markers.push(Marker {
            name: name.to_owned(),
            msecs,
        });
        Ok(())
    }

    /// Add a marker at a fraction of the duration.
    pub fn add_marker_at_progress(&mut self, name: &str, progress: f64) -> StageResult<()> {
        if !(0.0..=1.0).contains(&progress) {
            return Err(StageError::config(format!(
                "marker progress must be within [0, 1], got {progress}"
            )));
        }
        self.add_marker_at_time(name, progress * self.duration_ms)
    }

    /// Remove a marker; returns whether it existed.
    pub fn remove_marker(&mut self, name: &str) -> bool {
        let before = self.markers.len();
        self.markers.retain(|m| m.name != name);
        self.markers.len() != before
    }

    /// Whether a marker with `name` exists.
    pub fn has_marker(&self, name: &str) -> bool {
        self.markers.iter().any(|m| m.name == name)
    }

    /// Marker names, all of them or only those at `msecs`.
    pub fn list_markers(&self, msecs: Option<f64>) -> Vec<&str> {
        self.markers
            .iter()
            .filter(|m| msecs.is_none_or(|t| (m.msecs - t).abs() < 1e-9))
            .map(|m| m.name.as_str())
            .collect()
    }

    /// Advance by `dt_ms` of wall time.
    pub fn advance(&mut self, dt_ms: f64) -> TimelineTick {
        let mut tick = TimelineTick::default();
        if self.state != TimelineState::Running {
            return tick;
        }

        let mut dt = dt_ms.max(0.0);
        if self.delay_elapsed_ms < self.delay_ms {
            let left = self.delay_ms - self.delay_elapsed_ms;
            if dt < left {
                self.delay_elapsed_ms += dt;
                return tick;
            }
            self.delay_elapsed_ms = self.delay_ms;
            dt -= left;
        }

        tick.moved = true;

        if self.duration_ms <= 0.0 {
            self.elapsed_ms = 0.0;
            self.complete(&mut tick);
            return tick;
        }

        let d = self.duration_ms;
        loop {
            let start = self.elapsed_ms;
            let end = start + dt;
            if end < d {
                self.collect_markers(start, end, &mut tick);
                self.elapsed_ms = end;
                return tick;
            }

            self.collect_markers(start, d, &mut tick);
            dt = end - d;

            if !self.wrap(&mut tick) {
                self.elapsed_ms = d;
                self.complete(&mut tick);
                return tick;
            }
            if dt <= 0.0 {
                return tick;
            }

            // Whole iterations before the last one are skipped without replaying markers.
            let skipped = (dt / d).floor() - 1.0;
            if skipped >= 1.0 {
                if self.repeat_count >= 0 {
                    let left = self.repeat_count - self.current_repeat;
                    if skipped > f64::from(left) {
                        self.jump_iterations(f64::from(left));
                        self.collect_markers(0.0, d, &mut tick);
                        self.elapsed_ms = d;
                        self.complete(&mut tick);
                        return tick;
                    }
                }
                self.jump_iterations(skipped);
                dt = d + dt % d;
            }
        }
    }

    // Starts the next iteration if one is left.
    fn wrap(&mut self, tick: &mut TimelineTick) -> bool {
        let looping = self.repeat_count < 0 || self.current_repeat < self.repeat_count;
        if !looping {
            return false;
        }
        self.current_repeat = self.current_repeat.saturating_add(1);
        if self.auto_reverse {
            self.current_direction = self.current_direction.flipped();
        }
        self.elapsed_ms = 0.0;
        tick.wrapped = true;
        true
    }

    fn jump_iterations(&mut self, count: f64) {
        let step = if count >= f64::from(i32::MAX) {
            i32::MAX
        } else {
            count as i32
        };
        self.current_repeat = self.current_repeat.saturating_add(step);
        if self.auto_reverse && count % 2.0 == 1.0 {
            self.current_direction = self.current_direction.flipped();
        }
    }

    fn complete(&mut self, tick: &mut TimelineTick) {
        self.state = TimelineState::Completed;
        tick.completed = true;
    }

    // Markers are placed in timeline time; a backward iteration walks that time in reverse.
    fn collect_markers(&self, from: f64, to: f64, tick: &mut TimelineTick) {
        let d = self.duration_ms;
        let mut hits: Vec<&Marker> = match self.current_direction {
            TimelineDirection::Forward => self
                .markers
                .iter()
                .filter(|m| {
                    (m.msecs > from || (from == 0.0 && m.msecs == 0.0 && to > 0.0))
                        && m.msecs <= to
                })
                .collect(),
            TimelineDirection::Backward => self
                .markers
                .iter()
                .filter(|m| {
                    let pos = d - m.msecs;
                    (pos > from || (from == 0.0 && pos == 0.0 && to > 0.0)) && pos <= to
                })
                .collect(),
        };
        match self.current_direction {
            TimelineDirection::Forward => hits.sort_by(|a, b| a.msecs.total_cmp(&b.msecs)),
            TimelineDirection::Backward => hits.sort_by(|a, b| b.msecs.total_cmp(&a.msecs)),
        }
        tick.markers.extend(hits.into_iter().map(|m| m.name.clone()));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
