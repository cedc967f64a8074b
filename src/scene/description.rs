use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::animation::ease::EasingMode;
use crate::animation::transition::{Keyframe, PropertyTransition, Transition};
use crate::constraint::{Constraint, ConstraintKind};
use crate::foundation::color::Color;
use crate::foundation::core::Margin;
use crate::foundation::error::{StageError, StageResult};
use crate::foundation::ids::ActorId;
use crate::layout::layout_from_name;
use crate::scene::actor::{ChildLayoutProps, PropertyId, PropertyValue, ScrollMode};
use crate::scene::content::ContentKind;
use crate::stage::config::StageConfig;
use crate::stage::engine::Stage;

/// Name a constraint source uses to refer to the stage actor.
pub const STAGE_NAME: &str = "stage";

/// A declarative scene: stage settings plus an actor tree.
///
/// ```json
/// {
///   "stage": { "width": 640, "height": 480 },
///   "layout": { "type": "box", "orientation": "vertical", "spacing": 4 },
///   "actors": [
///     { "name": "title", "width": 200, "height": 40, "background": "#336699ff" }
///   ],
///   "key_focus": "title"
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneDescription {
    /// Stage configuration.
    pub stage: StageConfig,
    /// Layout manager of the stage actor.
    pub layout: Option<LayoutSpec>,
    /// Children of the stage actor, bottom to top.
    pub actors: Vec<ActorSpec>,
    /// Name of the actor that starts with the key focus.
    pub key_focus: Option<String>,
}

/// Layout manager by scene-file name plus its properties.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutSpec {
    /// `fixed`, `box`, `flow`, `bin`, `grid` or `circle`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Layout properties, as accepted by the layout's `set_property`.
    #[serde(flatten)]
    pub props: serde_json::Map<String, serde_json::Value>,
}

/// Border of an actor.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BorderSpec {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f64,
}

/// One actor and its subtree.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActorSpec {
    /// Unique name, used for constraint sources, key focus and lookups.
    pub name: Option<String>,
    /// Fixed x position.
    pub x: Option<f64>,
    /// Fixed y position.
    pub y: Option<f64>,
    /// Fixed width; unset means the preferred width.
    pub width: Option<f64>,
    /// Fixed height; unset means the preferred height.
    pub height: Option<f64>,
    /// Extra space around the actor inside its parent's layout.
    pub margin: Option<Margin>,
    /// Pivot point, normalized to the actor size.
    pub pivot: Option<[f64; 2]>,
    /// Scale factors.
    pub scale: Option<[f64; 2]>,
    /// Rotation around the z axis in degrees.
    pub rotation: Option<f64>,
    /// Depth offset.
    pub depth: Option<f64>,
    /// Opacity, 0 to 255.
    pub opacity: Option<u8>,
    /// Background fill.
    pub background: Option<Color>,
    /// Border stroke.
    pub border: Option<BorderSpec>,
    /// Whether the actor is shown.
    pub visible: bool,
    /// Whether the actor receives pointer events.
    pub reactive: bool,
    /// Clip painting and picking of children to the allocation.
    pub clip_to_allocation: bool,
    /// Scroll axes of a container.
    pub scroll_mode: ScrollMode,
    /// Content object painted by the actor.
    pub content: Option<ContentKind>,
    /// Layout manager for the actor's children.
    pub layout: Option<LayoutSpec>,
    /// Properties read by the parent's layout manager.
    pub child_layout: ChildLayoutProps,
    /// Any other animatable property, by name.
    pub properties: BTreeMap<String, PropertyValue>,
    /// Constraints, in attachment order.
    pub constraints: Vec<ConstraintSpec>,
    /// Transitions started when the scene loads.
    pub transitions: Vec<TransitionSpec>,
    /// Children, bottom to top.
    pub children: Vec<ActorSpec>,
}

impl Default for ActorSpec {
    fn default() -> Self {
        Self {
            name: None,
            x: None,
            y: None,
            width: None,
            height: None,
            margin: None,
            pivot: None,
            scale: None,
            rotation: None,
            depth: None,
            opacity: None,
            background: None,
            border: None,
            visible: true,
            reactive: false,
            clip_to_allocation: false,
            scroll_mode: ScrollMode::None,
            content: None,
            layout: None,
            child_layout: ChildLayoutProps::default(),
            properties: BTreeMap::new(),
            constraints: Vec::new(),
            transitions: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// A constraint whose source is named rather than referenced.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConstraintSpec {
    /// Constraint name; generated when unset.
    #[serde(default)]
    pub name: Option<String>,
    /// Name of the source actor, or `"stage"`.
    pub source: String,
    /// What the constraint computes.
    #[serde(flatten)]
    pub kind: ConstraintKind,
}

/// A property transition started when the scene loads.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionSpec {
    /// Transition name; defaults to the property name.
    #[serde(default)]
    pub name: Option<String>,
    /// Animated property, by name (`x`, `opacity`, `rotation-angle-z`, ...).
    pub property: String,
    /// Start value; the current value when unset.
    #[serde(default)]
    pub from: Option<PropertyValue>,
    /// Target value.
    pub to: PropertyValue,
    /// Length of one iteration.
    pub duration_ms: f64,
    /// Wait before the first iteration.
    #[serde(default)]
    pub delay_ms: f64,
    /// Progress easing.
    #[serde(default)]
    pub easing: EasingMode,
    /// Extra iterations; `-1` repeats forever.
    #[serde(default)]
    pub repeat_count: i32,
    /// Reverse direction on every iteration.
    #[serde(default)]
    pub auto_reverse: bool,
    /// Intermediate values.
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
    /// Keep the transition attached after it completes.
    #[serde(default)]
    pub persistent: bool,
}

impl TransitionSpec {
    fn to_transition(&self) -> StageResult<Transition> {
        let property = PropertyId::from_name(&self.property)?;
        let mut pt = PropertyTransition::new(property, self.to);
        if let Some(from) = self.from {
            pt = pt.from_value(from);
        }
        if !self.keyframes.is_empty() {
            pt = pt.with_keyframes(self.keyframes.clone())?;
        }
        let mut t = Transition::property(pt, self.duration_ms)?
            .with_easing(self.easing)
            .with_delay(self.delay_ms)
            .with_repeat_count(self.repeat_count)?
            .with_auto_reverse(self.auto_reverse);
        if self.persistent {
            t = t.persistent();
        }
        Ok(t)
    }

    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.property)
    }
}

/// A built scene: the stage plus the ids of its named actors.
#[derive(Debug)]
pub struct LoadedScene {
    /// The running stage.
    pub stage: Stage,
    /// Named actors, including `"stage"` for the stage actor.
    pub names: BTreeMap<String, ActorId>,
}

impl LoadedScene {
    /// Look up a named actor.
    pub fn actor(&self, name: &str) -> Option<ActorId> {
        self.names.get(name).copied()
    }

    /// Look up a named actor, failing with a validation error when it is missing.
    pub fn require(&self, name: &str) -> StageResult<ActorId> {
        self.actor(name)
            .ok_or_else(|| StageError::validation(format!("scene has no actor named '{name}'")))
    }
}

impl SceneDescription {
    /// Parse a scene from JSON and validate it.
    pub fn from_reader<R: Read>(r: R) -> StageResult<Self> {
        let scene: Self = serde_json::from_reader(r)
            .map_err(|e| StageError::serde(format!("parse scene JSON: {e}")))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Parse a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> StageResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .map_err(|e| StageError::validation(format!("open scene '{}': {e}", path.display())))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check names and references without building anything.
    pub fn validate(&self) -> StageResult<()> {
        self.stage.validate()?;

        let mut names = vec![STAGE_NAME];
        let mut stack: Vec<&ActorSpec> = self.actors.iter().collect();
        let mut all = Vec::new();
        while let Some(spec) = stack.pop() {
            if let Some(name) = spec.name.as_deref() {
                if names.contains(&name) {
                    return Err(StageError::validation(format!(
                        "actor name '{name}' is used more than once"
                    )));
                }
                names.push(name);
            }
            all.push(spec);
            stack.extend(spec.children.iter());
        }

        for spec in all {
            let who = spec.name.as_deref().unwrap_or("<unnamed>");
            for c in &spec.constraints {
                if !names.contains(&c.source.as_str()) {
                    return Err(StageError::validation(format!(
                        "actor '{who}' has a constraint on unknown source '{}'",
                        c.source
                    )));
                }
            }
            for t in &spec.transitions {
                if !(t.duration_ms.is_finite() && t.duration_ms > 0.0) {
                    return Err(StageError::validation(format!(
                        "transition '{}' on actor '{who}' must have duration_ms > 0",
                        t.name()
                    )));
                }
            }
        }
        if let Some(focus) = self.key_focus.as_deref()
            && !names.contains(&focus)
        {
            return Err(StageError::validation(format!(
                "key_focus names unknown actor '{focus}'"
            )));
        }
        Ok(())
    }

    /// Create the stage and its actors, then attach constraints and start transitions.
    ///
    /// Constraints are attached after every actor exists, so a source may appear later in
    /// the file than the actor it constrains.
    #[tracing::instrument(skip(self), fields(actors = self.actors.len()))]
    pub fn build(&self) -> StageResult<LoadedScene> {
        self.validate()?;
        let mut stage = Stage::new(self.stage.clone())?;
        let root = stage.root();
        let mut names = BTreeMap::from([(STAGE_NAME.to_owned(), root)]);

        if let Some(layout) = &self.layout {
            stage
                .scene_mut()
                .set_layout_manager(root, layout_from_name(&layout.kind, &layout.props)?)?;
        }

        let mut built = Vec::new();
        for spec in &self.actors {
            create(&mut stage, root, spec, &mut names, &mut built)?;
        }

        for (id, spec) in &built {
            for c in &spec.constraints {
                let source = names.get(&c.source).copied().ok_or_else(|| {
                    StageError::validation(format!("unknown constraint source '{}'", c.source))
                })?;
                let constraint = Constraint {
                    source,
                    kind: c.kind,
                };
                match &c.name {
                    Some(name) => stage.scene_mut().add_constraint_with_name(*id, name, constraint)?,
                    None => {
                        stage.scene_mut().add_constraint(*id, constraint)?;
                    }
                }
            }
        }
        for (id, spec) in &built {
            for t in &spec.transitions {
                stage.add_transition(*id, t.name(), t.to_transition()?)?;
            }
        }

        if let Some(focus) = self.key_focus.as_deref() {
            stage.set_key_focus(names.get(focus).copied())?;
        }
        stage.scene_mut().take_notifications();
        tracing::debug!(named = names.len(), "scene built");
        Ok(LoadedScene { stage, names })
    }
}

fn create<'a>(
    stage: &mut Stage,
    parent: ActorId,
    spec: &'a ActorSpec,
    names: &mut BTreeMap<String, ActorId>,
    built: &mut Vec<(ActorId, &'a ActorSpec)>,
) -> StageResult<()> {
    let scene = stage.scene_mut();
    let id = match spec.name.as_deref() {
        Some(name) => scene.create_named(name),
        None => scene.create_actor(),
    };
    if let Some(name) = &spec.name {
        names.insert(name.clone(), id);
    }

    if spec.x.is_some() || spec.y.is_some() {
        scene.set_position(id, spec.x.unwrap_or(0.0), spec.y.unwrap_or(0.0))?;
    }
    if let Some(w) = spec.width {
        scene.set_property(id, PropertyId::Width, w.into())?;
    }
    if let Some(h) = spec.height {
        scene.set_property(id, PropertyId::Height, h.into())?;
    }
    if let Some(margin) = spec.margin {
        scene.set_margin(id, margin)?;
    }
    if let Some([px, py]) = spec.pivot {
        scene.set_pivot_point(id, px, py)?;
    }
    if let Some([sx, sy]) = spec.scale {
        scene.set_scale(id, sx, sy)?;
    }
    if let Some(r) = spec.rotation {
        scene.set_rotation(id, r)?;
    }
    if let Some(d) = spec.depth {
        scene.set_depth(id, d)?;
    }
    if let Some(o) = spec.opacity {
        scene.set_opacity(id, o)?;
    }
    scene.set_background_color(id, spec.background)?;
    if let Some(border) = spec.border {
        scene.set_border(id, Some(border.color), border.width)?;
    }
    scene.set_visible(id, spec.visible)?;
    scene.set_reactive(id, spec.reactive)?;
    scene.set_clip_to_allocation(id, spec.clip_to_allocation)?;
    scene.set_scroll_mode(id, spec.scroll_mode)?;
    if let Some(kind) = spec.content {
        let content = match kind {
            ContentKind::Canvas { width, height } => scene.content_mut().create_canvas(width, height),
            ContentKind::Image { width, height } => scene.content_mut().create_image(width, height),
        };
        scene.set_content(id, Some(content))?;
    }
    if let Some(layout) = &spec.layout {
        scene.set_layout_manager(id, layout_from_name(&layout.kind, &layout.props)?)?;
    }
    scene.set_child_layout(id, spec.child_layout)?;
    for (name, value) in &spec.properties {
        scene.set_property_by_name(id, name, *value)?;
    }
    scene.add_child(parent, id)?;

    built.push((id, spec));
    for child in &spec.children {
        create(stage, id, child, names, built)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/description.rs"]
mod tests;
