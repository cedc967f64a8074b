use std::fmt;
use std::str::FromStr;

use crate::foundation::core::Point;
use crate::foundation::error::{StageError, StageResult};
use crate::foundation::ids::ActorId;

bitflags::bitflags! {
    /// Modifier keys and pointer buttons held while an event was generated.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        /// Shift key.
        const SHIFT   = 1 << 0;
        /// Control key.
        const CONTROL = 1 << 1;
        /// Alt key.
        const ALT     = 1 << 2;
        /// Super (logo) key.
        const SUPER   = 1 << 3;
        /// Primary pointer button.
        const BUTTON1 = 1 << 8;
        /// Middle pointer button.
        const BUTTON2 = 1 << 9;
        /// Secondary pointer button.
        const BUTTON3 = 1 << 10;
    }
}

/// Logical key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Tab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// A printable character.
    Char(char),
    /// Function key `F1`..`F24`.
    F(u8),
}

impl Key {
    /// Parse a key name (`"escape"`, `"q"`, `"f5"`, `"page-up"`).
    pub fn parse(s: &str) -> StageResult<Self> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Self::Char(c));
        }
        let lower = trimmed.to_ascii_lowercase().replace('_', "-");
        let key = match lower.as_str() {
            "escape" | "esc" => Self::Escape,
            "enter" | "return" => Self::Enter,
            "space" => Self::Space,
            "tab" => Self::Tab,
            "backspace" => Self::Backspace,
            "delete" => Self::Delete,
            "up" => Self::Up,
            "down" => Self::Down,
            "left" => Self::Left,
            "right" => Self::Right,
            "home" => Self::Home,
            "end" => Self::End,
            "page-up" | "pageup" => Self::PageUp,
            "page-down" | "pagedown" => Self::PageDown,
            other => match other.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                Some(n) if (1..=24).contains(&n) => Self::F(n),
                _ => return Err(StageError::config(format!("unknown key \"{s}\""))),
            },
        };
        Ok(key)
    }

    /// Text produced by the key, if any.
    pub fn unicode(self) -> Option<char> {
        match self {
            Self::Char(c) => Some(c),
            Self::Space => Some(' '),
            Self::Enter => Some('\n'),
            Self::Tab => Some('\t'),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{c}"),
            Self::F(n) => write!(f, "f{n}"),
            Self::Escape => f.write_str("escape"),
            Self::Enter => f.write_str("enter"),
            Self::Space => f.write_str("space"),
            Self::Tab => f.write_str("tab"),
            Self::Backspace => f.write_str("backspace"),
            Self::Delete => f.write_str("delete"),
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
            Self::Home => f.write_str("home"),
            Self::End => f.write_str("end"),
            Self::PageUp => f.write_str("page-up"),
            Self::PageDown => f.write_str("page-down"),
        }
    }
}

impl FromStr for Key {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Pointer button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    /// Primary button.
    Primary,
    /// Middle button.
    Middle,
    /// Secondary button.
    Secondary,
}

/// Payload of an input event.
#[derive(Clone, Debug, PartialEq)]
pub enum EventKind {
    /// A pointer button went down.
    ButtonPress {
        /// Stage position.
        position: Point,
        /// Which button.
        button: MouseButton,
        /// 1 for a single click, 2 for a double click.
        click_count: u32,
    },
    /// A pointer button went up.
    ButtonRelease {
        /// Stage position.
        position: Point,
        /// Which button.
        button: MouseButton,
    },
    /// The pointer moved.
    Motion {
        /// Stage position.
        position: Point,
    },
    /// The pointer entered the source actor; `related` is the actor it left.
    Enter {
        /// Stage position.
        position: Point,
    },
    /// The pointer left the source actor; `related` is the actor it entered.
    Leave {
        /// Stage position.
        position: Point,
    },
    /// Scroll wheel or touchpad delta.
    Scroll {
        /// Stage position.
        position: Point,
        /// Horizontal delta.
        dx: f64,
        /// Vertical delta.
        dy: f64,
    },
    /// A key went down.
    KeyPress {
        /// Logical key.
        key: Key,
    },
    /// A key went up.
    KeyRelease {
        /// Logical key.
        key: Key,
    },
}

/// Event category used when connecting handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum EventType {
    ButtonPress,
    ButtonRelease,
    Motion,
    Enter,
    Leave,
    Scroll,
    KeyPress,
    KeyRelease,
}

/// An input event as delivered to handlers.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// Payload.
    pub kind: EventKind,
    /// Host timestamp.
    pub time_ms: u64,
    /// Modifier state.
    pub modifiers: Modifiers,
    /// Actor the event is delivered to; filled in by the dispatcher.
    pub source: Option<ActorId>,
    /// Counterpart of a crossing event (the actor left or entered).
    pub related: Option<ActorId>,
}

impl Event {
    /// A new event with no modifiers and no source yet.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            time_ms: 0,
            modifiers: Modifiers::empty(),
            source: None,
            related: None,
        }
    }

    /// Primary button press at `(x, y)`.
    pub fn button_press(x: f64, y: f64) -> Self {
        Self::new(EventKind::ButtonPress {
            position: Point::new(x, y),
            button: MouseButton::Primary,
            click_count: 1,
        })
    }

    /// Primary button release at `(x, y)`.
    pub fn button_release(x: f64, y: f64) -> Self {
        Self::new(EventKind::ButtonRelease {
            position: Point::new(x, y),
            button: MouseButton::Primary,
        })
    }

    /// Pointer motion to `(x, y)`.
    pub fn motion(x: f64, y: f64) -> Self {
        Self::new(EventKind::Motion {
            position: Point::new(x, y),
        })
    }

    /// Scroll at `(x, y)`.
    pub fn scroll(x: f64, y: f64, dx: f64, dy: f64) -> Self {
        Self::new(EventKind::Scroll {
            position: Point::new(x, y),
            dx,
            dy,
        })
    }

    /// Key press.
    pub fn key_press(key: Key) -> Self {
        Self::new(EventKind::KeyPress { key })
    }

    /// Key release.
    pub fn key_release(key: Key) -> Self {
        Self::new(EventKind::KeyRelease { key })
    }

    /// Set the modifier state.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the timestamp.
    pub fn at(mut self, time_ms: u64) -> Self {
        self.time_ms = time_ms;
        self
    }

    /// Category of this event.
    pub fn event_type(&self) -> EventType {
        match self.kind {
            EventKind::ButtonPress { .. } => EventType::ButtonPress,
            EventKind::ButtonRelease { .. } => EventType::ButtonRelease,
            EventKind::Motion { .. } => EventType::Motion,
            EventKind::Enter { .. } => EventType::Enter,
            EventKind::Leave { .. } => EventType::Leave,
            EventKind::Scroll { .. } => EventType::Scroll,
            EventKind::KeyPress { .. } => EventType::KeyPress,
            EventKind::KeyRelease { .. } => EventType::KeyRelease,
        }
    }

    /// Stage position of pointer events.
    pub fn position(&self) -> Option<Point> {
        match self.kind {
            EventKind::ButtonPress { position, .. }
            | EventKind::ButtonRelease { position, .. }
            | EventKind::Motion { position }
            | EventKind::Enter { position }
            | EventKind::Leave { position }
            | EventKind::Scroll { position, .. } => Some(position),
            EventKind::KeyPress { .. } | EventKind::KeyRelease { .. } => None,
        }
    }

    /// Key of keyboard events.
    pub fn key(&self) -> Option<Key> {
        match self.kind {
            EventKind::KeyPress { key } | EventKind::KeyRelease { key } => Some(key),
            _ => None,
        }
    }

    /// Whether this event is routed by pointer position (and subject to grabs).
    pub fn is_pointer(&self) -> bool {
        self.position().is_some()
    }
}

/// Handler verdict: whether the event continues to the next actor on its path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EventFlow {
    /// Not handled; keep propagating.
    #[default]
    Propagate,
    /// Consumed; stop here.
    Stop,
}

/// Dispatch phase a handler is connected to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Stage to target, before bubbling.
    Capture,
    /// Target to stage.
    #[default]
    Bubble,
}

#[cfg(test)]
#[path = "../../tests/unit/event/input.rs"]
mod tests;
