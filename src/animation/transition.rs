use crate::animation::ease::EasingMode;
use crate::animation::timeline::Timeline;
use crate::foundation::error::{StageError, StageResult};
use crate::foundation::ids::ActorId;
use crate::scene::actor::{PropertyId, PropertyValue};
use crate::scene::graph::SceneGraph;

/// Intermediate value of a property transition.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    /// Position in `[0, 1]` of the transition progress.
    pub key: f64,
    /// Value reached at `key`.
    pub value: PropertyValue,
    /// Easing of the segment that ends at this keyframe.
    #[serde(default)]
    pub easing: EasingMode,
}

impl Keyframe {
    /// A keyframe with linear easing into it.
    pub fn new(key: f64, value: impl Into<PropertyValue>) -> Self {
        Self {
            key,
            value: value.into(),
            easing: EasingMode::Linear,
        }
    }

    /// Use `easing` for the segment ending here.
    pub fn with_easing(mut self, easing: EasingMode) -> Self {
        self.easing = easing;
        self
    }
}

/// Interpolates one actor property from a start value to a target value.
///
/// Without an explicit `from` the start value is read from the actor when the transition
/// starts.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyTransition {
    property: PropertyId,
    from: Option<PropertyValue>,
    to: PropertyValue,
    keyframes: Vec<Keyframe>,
    resolved_from: Option<PropertyValue>,
}

impl PropertyTransition {
    /// Animate `property` towards `to`.
    pub fn new(property: PropertyId, to: impl Into<PropertyValue>) -> Self {
        Self {
            property,
            from: None,
            to: to.into(),
            keyframes: Vec::new(),
            resolved_from: None,
        }
    }

    /// Start from `from` instead of the current value.
    pub fn from_value(mut self, from: impl Into<PropertyValue>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Pass through intermediate keyframes, sorted by key.
    pub fn with_keyframes(mut self, keyframes: Vec<Keyframe>) -> StageResult<Self> {
        self.keyframes = keyframes;
        self.validate()?;
        Ok(self)
    }

    /// Animated property.
    pub fn property(&self) -> PropertyId {
        self.property
    }

    /// Explicit start value.
    pub fn from(&self) -> Option<PropertyValue> {
        self.from
    }

    /// Target value.
    pub fn to(&self) -> PropertyValue {
        self.to
    }

    /// Intermediate keyframes.
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub(crate) fn validate(&self) -> StageResult<()> {
        let kind = self.property.kind();
        let values = self
            .from
            .iter()
            .chain(std::iter::once(&self.to))
            .chain(self.keyframes.iter().map(|k| &k.value));
        for v in values {
            if v.kind() != kind {
                return Err(StageError::config(format!(
                    "transition of \"{}\" expects {kind:?} values, got {:?}",
                    self.property,
                    v.kind()
                )));
            }
        }
        for k in &self.keyframes {
            if !(0.0..=1.0).contains(&k.key) {
                return Err(StageError::config(format!(
                    "keyframe key must be within [0, 1], got {}",
                    k.key
                )));
            }
        }
        if !self.keyframes.windows(2).all(|w| w[0].key <= w[1].key) {
            return Err(StageError::config("keyframes must be sorted by key"));
        }
        Ok(())
    }

    fn begin(&mut self, graph: &SceneGraph, actor: ActorId) -> StageResult<()> {
        self.resolved_from = Some(match self.from {
            Some(v) => v,
            None => graph.property(actor, self.property)?,
        });
        Ok(())
    }

    /// Value at eased progress `t`.
    pub(crate) fn sample(&self, t: f64) -> StageResult<PropertyValue> {
        let from = self.resolved_from.or(self.from).unwrap_or(self.to);
        if self.keyframes.is_empty() {
            return from.interpolate(self.to, t);
        }

        let idx = self.keyframes.partition_point(|k| k.key <= t);
        let (k0, v0) = match idx.checked_sub(1).map(|i| &self.keyframes[i]) {
            Some(k) => (k.key, k.value),
            None => (0.0, from),
        };
        let (k1, v1, easing) = match self.keyframes.get(idx) {
            Some(k) => (k.key, k.value, k.easing),
            None => (1.0, self.to, EasingMode::Linear),
        };
        let span = k1 - k0;
        if span <= 0.0 {
            return Ok(v0);
        }
        v0.interpolate(v1, easing.apply((t - k0) / span))
    }
}

/// One member of a transition group, with its own window inside the group.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupMember {
    /// What the member animates.
    pub transition: PropertyTransition,
    /// Offset from the group start.
    pub delay_ms: f64,
    /// Length of the member's own run.
    pub duration_ms: f64,
    /// Member easing.
    pub easing: EasingMode,
}

impl GroupMember {
    /// A linear member running for `duration_ms` from the group start.
    pub fn new(transition: PropertyTransition, duration_ms: f64) -> Self {
        Self {
            transition,
            delay_ms: 0.0,
            duration_ms: duration_ms.max(0.0),
            easing: EasingMode::Linear,
        }
    }

    /// Start `delay_ms` after the group.
    pub fn with_delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms.max(0.0);
        self
    }

    /// Use `easing` for this member.
    pub fn with_easing(mut self, easing: EasingMode) -> Self {
        self.easing = easing;
        self
    }

    fn end_ms(&self) -> f64 {
        self.delay_ms + self.duration_ms
    }

    fn local_progress(&self, elapsed_ms: f64) -> Option<f64> {
        if elapsed_ms < self.delay_ms {
            return None;
        }
        if self.duration_ms <= 0.0 {
            return Some(1.0);
        }
        Some(((elapsed_ms - self.delay_ms) / self.duration_ms).clamp(0.0, 1.0))
    }
}

/// What a transition drives.
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionKind {
    /// A single property.
    Property(PropertyTransition),
    /// Several properties sharing one timeline.
    Group(Vec<GroupMember>),
}

/// A timeline bound to what it animates.
///
/// Transitions are attached to an actor under a name and advanced once per frame. On
/// natural completion they are detached unless marked persistent.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub(crate) timeline: Timeline,
    pub(crate) kind: TransitionKind,
    pub(crate) remove_on_complete: bool,
}

impl Transition {
    /// A property transition lasting `duration_ms`.
    pub fn property(transition: PropertyTransition, duration_ms: f64) -> StageResult<Self> {
        transition.validate()?;
        Ok(Self {
            timeline: Timeline::new(duration_ms),
            kind: TransitionKind::Property(transition),
            remove_on_complete: true,
        })
    }

    /// A group whose timeline covers its last member. Completion fires once every member
    /// has finished.
    pub fn group(members: Vec<GroupMember>) -> StageResult<Self> {
        if members.is_empty() {
            return Err(StageError::config("a transition group needs at least one member"));
        }
        for m in &members {
            m.transition.validate()?;
        }
        let duration = members.iter().map(GroupMember::end_ms).fold(0.0, f64::max);
        Ok(Self {
            timeline: Timeline::new(duration),
            kind: TransitionKind::Group(members),
            remove_on_complete: true,
        })
    }

    /// Ease the overall progress (property transitions only; group members ease themselves).
    pub fn with_easing(mut self, mode: EasingMode) -> Self {
        self.timeline.set_progress_mode(mode);
        self
    }

    /// Wait `delay_ms` before starting.
    pub fn with_delay(mut self, delay_ms: f64) -> Self {
        self.timeline.set_delay_ms(delay_ms);
        self
    }

    /// Repeat `count` extra times (`-1` forever).
    pub fn with_repeat_count(mut self, count: i32) -> StageResult<Self> {
        self.timeline.set_repeat_count(count)?;
        Ok(self)
    }

    /// Flip direction on every repeat.
    pub fn with_auto_reverse(mut self, auto_reverse: bool) -> Self {
        self.timeline.set_auto_reverse(auto_reverse);
        self
    }

    /// Keep the transition attached after it completes.
    pub fn persistent(mut self) -> Self {
        self.remove_on_complete = false;
        self
    }

    /// Driving timeline.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Mutable access to the driving timeline (markers, direction).
    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    /// What the transition animates.
    pub fn kind(&self) -> &TransitionKind {
        &self.kind
    }

    /// Whether the transition is detached when it completes.
    pub fn remove_on_complete(&self) -> bool {
        self.remove_on_complete
    }

    /// Resolve implicit start values from the actor's current state.
    pub(crate) fn begin(&mut self, graph: &SceneGraph, actor: ActorId) -> StageResult<()> {
        match &mut self.kind {
            TransitionKind::Property(p) => p.begin(graph, actor),
            TransitionKind::Group(members) => members
                .iter_mut()
                .try_for_each(|m| m.transition.begin(graph, actor)),
        }
    }

    /// Write the interpolated values for the current timeline position.
    pub(crate) fn write(&self, graph: &mut SceneGraph, actor: ActorId) -> StageResult<()> {
        match &self.kind {
            TransitionKind::Property(p) => {
                let value = p.sample(self.timeline.progress())?;
                graph.set_property(actor, p.property, value)
            }
            TransitionKind::Group(members) => {
                let elapsed = self.timeline.raw_progress() * self.timeline.duration_ms();
                for m in members {
                    let Some(t) = m.local_progress(elapsed) else {
                        continue;
                    };
                    let value = m.transition.sample(m.easing.apply(t))?;
                    graph.set_property(actor, m.transition.property, value)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/transition.rs"]
mod tests;
