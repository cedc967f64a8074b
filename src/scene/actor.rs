use std::fmt;

use crate::animation::ease::EasingMode;
use crate::constraint::AttachedConstraint;
use crate::foundation::color::Color;
use crate::foundation::core::{ActorBox, Margin, Rect};
use crate::foundation::error::{StageError, StageResult};
use crate::foundation::ids::{ActorId, ContentId};
use crate::layout::LayoutManager;
use crate::layout::fixed::FixedLayout;

/// Enumerated observable actor properties.
///
/// Transitions, implicit animations and change notifications address actor state through
/// these ids instead of string lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum PropertyId {
    X,
    Y,
    Width,
    Height,
    Opacity,
    ScaleX,
    ScaleY,
    RotationZ,
    PivotX,
    PivotY,
    Depth,
    BackgroundColor,
    BorderColor,
    BorderWidth,
    ScrollX,
    ScrollY,
    MarginLeft,
    MarginRight,
    MarginTop,
    MarginBottom,
}

/// Type of value a property holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// A float.
    Float,
    /// A color.
    Color,
}

impl PropertyId {
    /// Every property, in declaration order.
    pub const ALL: [Self; 20] = [
        Self::X,
        Self::Y,
        Self::Width,
        Self::Height,
        Self::Opacity,
        Self::ScaleX,
        Self::ScaleY,
        Self::RotationZ,
        Self::PivotX,
        Self::PivotY,
        Self::Depth,
        Self::BackgroundColor,
        Self::BorderColor,
        Self::BorderWidth,
        Self::ScrollX,
        Self::ScrollY,
        Self::MarginLeft,
        Self::MarginRight,
        Self::MarginTop,
        Self::MarginBottom,
    ];

    /// Kebab-case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Width => "width",
            Self::Height => "height",
            Self::Opacity => "opacity",
            Self::ScaleX => "scale-x",
            Self::ScaleY => "scale-y",
            Self::RotationZ => "rotation-angle-z",
            Self::PivotX => "pivot-x",
            Self::PivotY => "pivot-y",
            Self::Depth => "z-position",
            Self::BackgroundColor => "background-color",
            Self::BorderColor => "border-color",
            Self::BorderWidth => "border-width",
            Self::ScrollX => "scroll-x",
            Self::ScrollY => "scroll-y",
            Self::MarginLeft => "margin-left",
            Self::MarginRight => "margin-right",
            Self::MarginTop => "margin-top",
            Self::MarginBottom => "margin-bottom",
        }
    }

    /// Look up a property by name; `_` and `-` are interchangeable.
    pub fn from_name(name: &str) -> StageResult<Self> {
        let wanted = name.trim().replace('_', "-");
        let alias = match wanted.as_str() {
            "rotation" | "rotation-z" => "rotation-angle-z",
            "depth" => "z-position",
            other => other,
        };
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name() == alias)
            .ok_or_else(|| StageError::config(format!("unknown actor property \"{name}\"")))
    }

    /// Kind of value this property accepts.
    pub fn kind(self) -> ValueKind {
        match self {
            Self::BackgroundColor | Self::BorderColor => ValueKind::Color,
            _ => ValueKind::Float,
        }
    }

    /// Whether a change must invalidate the parent's layout.
    pub fn affects_layout(self) -> bool {
        matches!(
            self,
            Self::X
                | Self::Y
                | Self::Width
                | Self::Height
                | Self::MarginLeft
                | Self::MarginRight
                | Self::MarginTop
                | Self::MarginBottom
        )
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value read from or written to an actor property.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Numeric value.
    Float(f64),
    /// Color value.
    Color(Color),
}

impl PropertyValue {
    /// Kind of this value.
    pub fn kind(self) -> ValueKind {
        match self {
            Self::Float(_) => ValueKind::Float,
            Self::Color(_) => ValueKind::Color,
        }
    }

    /// The number, if this is a float.
    pub fn as_float(self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(v),
            Self::Color(_) => None,
        }
    }

    /// The color, if this is a color.
    pub fn as_color(self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(c),
            Self::Float(_) => None,
        }
    }

    /// Interpolate numerically or channel-wise; `t` may overshoot `[0, 1]`.
    pub fn interpolate(self, to: Self, t: f64) -> StageResult<Self> {
        match (self, to) {
            (Self::Float(a), Self::Float(b)) => Ok(Self::Float(a + (b - a) * t)),
            (Self::Color(a), Self::Color(b)) => Ok(Self::Color(a.interpolate(b, t))),
            (a, b) => Err(StageError::config(format!(
                "cannot interpolate {:?} to {:?}",
                a.kind(),
                b.kind()
            ))),
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<Color> for PropertyValue {
    fn from(c: Color) -> Self {
        Self::Color(c)
    }
}

/// Placement of a child inside the cell a layout gives it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutAlign {
    /// Stretch over the whole cell.
    Fill,
    /// Natural size at the start of the cell.
    Start,
    /// Natural size centered in the cell.
    Center,
    /// Natural size at the end of the cell.
    End,
}

impl LayoutAlign {
    /// Parse `fill`, `start`, `center` or `end`.
    pub fn parse(s: &str) -> StageResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fill" => Ok(Self::Fill),
            "start" => Ok(Self::Start),
            "center" => Ok(Self::Center),
            "end" => Ok(Self::End),
            other => Err(StageError::config(format!("unknown alignment \"{other}\""))),
        }
    }
}

/// Per-child properties read by the parent's layout manager.
///
/// `None` alignment means "use the layout's default".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ChildLayoutProps {
    /// Receive a share of leftover space along the layout's primary axis.
    pub expand: bool,
    /// Horizontal placement inside the cell.
    pub x_align: Option<LayoutAlign>,
    /// Vertical placement inside the cell.
    pub y_align: Option<LayoutAlign>,
}

/// Axes along which a container scrolls its children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollMode {
    /// Not scrollable.
    #[default]
    None,
    /// Horizontal only.
    Horizontal,
    /// Vertical only.
    Vertical,
    /// Both axes.
    Both,
}

/// Parameters used for implicit property animations.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EasingState {
    /// Transition length; zero means "set immediately".
    pub duration_ms: f64,
    /// Delay before the implicit transition starts.
    pub delay_ms: f64,
    /// Easing applied to implicit transitions.
    pub mode: EasingMode,
}

impl Default for EasingState {
    fn default() -> Self {
        Self {
            duration_ms: 0.0,
            delay_ms: 0.0,
            mode: EasingMode::EaseOutCubic,
        }
    }
}

/// Storage for one actor inside the scene graph arena.
#[derive(Debug)]
pub(crate) struct ActorNode {
    pub(crate) name: Option<String>,
    pub(crate) parent: Option<ActorId>,
    pub(crate) children: Vec<ActorId>,

    pub(crate) fixed_x: f64,
    pub(crate) fixed_y: f64,
    pub(crate) request_width: Option<f64>,
    pub(crate) request_height: Option<f64>,
    pub(crate) margin: Margin,

    pub(crate) allocation: ActorBox,
    pub(crate) prev_allocation: ActorBox,
    pub(crate) layout_box: ActorBox,
    pub(crate) allocated_frame: u64,
    pub(crate) has_allocation: bool,

    pub(crate) pivot_x: f64,
    pub(crate) pivot_y: f64,
    pub(crate) scale_x: f64,
    pub(crate) scale_y: f64,
    pub(crate) rotation_z: f64,
    pub(crate) depth: f64,

    pub(crate) opacity: u8,
    pub(crate) background: Option<Color>,
    pub(crate) border_color: Option<Color>,
    pub(crate) border_width: f64,
    pub(crate) visible: bool,
    pub(crate) reactive: bool,
    pub(crate) clip_to_allocation: bool,

    pub(crate) content: Option<ContentId>,
    pub(crate) layout: Box<dyn LayoutManager>,
    pub(crate) layout_props: ChildLayoutProps,
    pub(crate) constraints: Vec<AttachedConstraint>,

    pub(crate) easing_stack: Vec<EasingState>,
    pub(crate) scroll_mode: ScrollMode,
    pub(crate) scroll_x: f64,
    pub(crate) scroll_y: f64,
}

impl ActorNode {
    pub(crate) fn new(name: Option<String>) -> Self {
        Self {
            name,
            parent: None,
            children: Vec::new(),
            fixed_x: 0.0,
            fixed_y: 0.0,
            request_width: None,
            request_height: None,
            margin: Margin::default(),
            allocation: Rect::ZERO,
            prev_allocation: Rect::ZERO,
            layout_box: Rect::ZERO,
            allocated_frame: 0,
            has_allocation: false,
            pivot_x: 0.0,
            pivot_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation_z: 0.0,
            depth: 0.0,
            opacity: 255,
            background: None,
            border_color: None,
            border_width: 0.0,
            visible: true,
            reactive: false,
            clip_to_allocation: false,
            content: None,
            layout: Box::new(FixedLayout),
            layout_props: ChildLayoutProps::default(),
            constraints: Vec::new(),
            easing_stack: vec![EasingState::default()],
            scroll_mode: ScrollMode::None,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    pub(crate) fn easing(&self) -> EasingState {
        self.easing_stack.last().copied().unwrap_or_default()
    }

    pub(crate) fn easing_mut(&mut self) -> &mut EasingState {
        if self.easing_stack.is_empty() {
            self.easing_stack.push(EasingState::default());
        }
        let last = self.easing_stack.len() - 1;
        &mut self.easing_stack[last]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/actor.rs"]
mod tests;
