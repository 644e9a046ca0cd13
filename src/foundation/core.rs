use std::fmt;

pub use kurbo::Point;

/// Travel axis of a wave: horizontal waves run left-to-right along the top or bottom edge,
/// vertical waves run top-to-bottom along the left or right edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Wide canvas, wave varies along y.
    Horizontal,
    /// Tall canvas, wave varies along x.
    Vertical,
}

impl Axis {
    /// `true` for [`Axis::Vertical`].
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Vertical)
    }

    /// Axis from the boolean flag used by the generator and interpolator.
    pub fn from_vertical(vertical: bool) -> Self {
        if vertical {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }

    /// Stable lowercase name, as carried by completion events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

/// Logical drawing surface in SVG user units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in user units.
    pub width: u32,
    /// Height in user units.
    pub height: u32,
}

impl Canvas {
    /// Canvas used by horizontal (top/bottom) waves.
    pub const WIDE: Self = Self {
        width: 1440,
        height: 160,
    };

    /// Canvas used by vertical (left/right) waves.
    pub const TALL: Self = Self {
        width: 160,
        height: 1440,
    };

    /// Fixed canvas for a travel axis.
    pub fn for_axis(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Self::WIDE,
            Axis::Vertical => Self::TALL,
        }
    }

    /// `viewBox` attribute value covering the whole canvas.
    pub fn view_box(self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }
}

/// One quadratic segment of a wave outline: its control point and its end point.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurvePoint {
    /// Quadratic control point.
    pub control: Point,
    /// Segment end point.
    pub end: Point,
}

impl CurvePoint {
    /// Build a curve point from raw coordinates in path order (`cx cy, x y`).
    pub fn new(cx: f64, cy: f64, x: f64, y: f64) -> Self {
        Self {
            control: Point::new(cx, cy),
            end: Point::new(x, y),
        }
    }
}

/// Path-number formatter: shortest round-trip decimal, no trailing `.0`, no negative zero.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Num(pub(crate) f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 {
            f.write_str("0")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
