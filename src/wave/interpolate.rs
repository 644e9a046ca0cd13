use std::fmt::Write as _;

use crate::foundation::core::{CurvePoint, Num, Point};
use crate::foundation::error::{DynawaveError, DynawaveResult};

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    if t >= 1.0 { b } else { a + (b - a) * t }
}

/// Blend one segment. The coordinate across the canvas edge stays put so the silhouette's
/// baseline never drifts: horizontal waves keep `end.x`, vertical waves keep both `y`s.
fn blend(a: &CurvePoint, b: &CurvePoint, t: f64, vertical: bool) -> CurvePoint {
    let control = Point::new(
        lerp(a.control.x, b.control.x, t),
        if vertical {
            a.control.y
        } else {
            lerp(a.control.y, b.control.y, t)
        },
    );
    let end = if vertical {
        Point::new(lerp(a.end.x, b.end.x, t), a.end.y)
    } else {
        Point::new(a.end.x, lerp(a.end.y, b.end.y, t))
    };
    CurvePoint { control, end }
}

/// Blend two parsed waves at `progress` and render the result as path data.
///
/// `progress` is clamped to `[0, 1]`. Both sides must carry the same non-zero number of
/// points; the output re-parses to that same count.
pub fn interpolate(
    from: &[CurvePoint],
    to: &[CurvePoint],
    progress: f64,
    vertical: bool,
    height: f64,
    width: f64,
) -> DynawaveResult<String> {
    if from.len() != to.len() || from.is_empty() {
        return Err(DynawaveError::PointMismatch {
            from: from.len(),
            to: to.len(),
        });
    }

    let t = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let points: Vec<CurvePoint> = from
        .iter()
        .zip(to)
        .map(|(a, b)| blend(a, b, t, vertical))
        .collect();

    Ok(render_points(&points, vertical, height, width))
}

/// Render curve points with the same move/line/curve/close grammar the generator uses.
pub fn render_points(points: &[CurvePoint], vertical: bool, height: f64, width: f64) -> String {
    let (w, h) = (Num(width), Num(height));
    let mut d = String::with_capacity(points.len() * 32 + 48);

    let _ = match points.first() {
        Some(first) if vertical => write!(d, "M {w} {h} L {} {h}", Num(first.end.x)),
        Some(first) => write!(d, "M 0 {h} L 0 {}", Num(first.end.y)),
        None if vertical => write!(d, "M {w} {h} L {w} {h}"),
        None => write!(d, "M 0 {h} L 0 {h}"),
    };

    for p in points {
        let _ = write!(
            d,
            " Q {} {}, {} {}",
            Num(p.control.x),
            Num(p.control.y),
            Num(p.end.x),
            Num(p.end.y)
        );
    }

    let _ = if vertical {
        write!(d, " L 0 0 L {w} 0 L {w} {h} Z")
    } else {
        write!(d, " L {w} {h} Z")
    };
    d
}

#[cfg(test)]
#[path = "../../tests/unit/wave/interpolate.rs"]
mod tests;
