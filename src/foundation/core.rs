use crate::foundation::error::{StageError, StageResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Final box assigned to an actor for one frame, in its parent's coordinate space.
///
/// `x0/y0` is the top-left corner and `x1/y1` the bottom-right corner.
pub type ActorBox = Rect;

/// Build a box from an origin and a size.
pub fn box_from_origin_size(x: f64, y: f64, width: f64, height: f64) -> ActorBox {
    Rect::new(x, y, x + width, y + height)
}

/// Interpolate every corner of two boxes with factor `t`.
pub fn interpolate_box(a: ActorBox, b: ActorBox, t: f64) -> ActorBox {
    Rect::new(
        a.x0 + (b.x0 - a.x0) * t,
        a.y0 + (b.y0 - a.y0) * t,
        a.x1 + (b.x1 - a.x1) * t,
        a.y1 + (b.y1 - a.y1) * t,
    )
}

/// Snap a box outwards to whole pixels.
pub fn clamp_box_to_pixel(b: ActorBox) -> ActorBox {
    Rect::new(b.x0.floor(), b.y0.floor(), b.x1.ceil(), b.y1.ceil())
}

/// Half-open containment test: the left/top edges are inside, the right/bottom edges are not.
pub fn box_contains(b: ActorBox, p: Point) -> bool {
    p.x >= b.x0 && p.x < b.x1 && p.y >= b.y0 && p.y < b.y1
}

/// Margins around an actor in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Margin {
    /// Left margin.
    #[serde(default)]
    pub left: f64,
    /// Right margin.
    #[serde(default)]
    pub right: f64,
    /// Top margin.
    #[serde(default)]
    pub top: f64,
    /// Bottom margin.
    #[serde(default)]
    pub bottom: f64,
}

impl Margin {
    /// Same margin on every side.
    pub fn uniform(v: f64) -> Self {
        Self {
            left: v,
            right: v,
            top: v,
            bottom: v,
        }
    }

    /// Sum of left and right.
    pub fn horizontal(self) -> f64 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    pub fn vertical(self) -> f64 {
        self.top + self.bottom
    }

    /// Shrink `b` by this margin, never producing a negative extent.
    pub fn shrink(self, b: ActorBox) -> ActorBox {
        let x0 = b.x0 + self.left;
        let y0 = b.y0 + self.top;
        let x1 = (b.x1 - self.right).max(x0);
        let y1 = (b.y1 - self.bottom).max(y0);
        Rect::new(x0, y0, x1, y1)
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated frame rate.
    pub fn new(num: u32, den: u32) -> StageResult<Self> {
        let fps = Self { num, den };
        fps.validate()?;
        Ok(fps)
    }

    /// Check both terms are non-zero.
    pub fn validate(self) -> StageResult<()> {
        if self.den == 0 {
            return Err(StageError::validation("Fps den must be > 0"));
        }
        if self.num == 0 {
            return Err(StageError::validation("Fps num must be > 0"));
        }
        Ok(())
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of a single frame in milliseconds.
    pub fn frame_duration_ms(self) -> f64 {
        1000.0 * f64::from(self.den) / f64::from(self.num)
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 60, den: 1 }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
