use std::fmt::Write as _;

use crate::foundation::core::{Axis, Canvas, Num, Point};
use crate::foundation::random::WaveRandom;

/// Inputs for one wave generation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveConfig {
    /// Canvas width in user units.
    pub width: f64,
    /// Canvas height in user units.
    pub height: f64,
    /// Number of anchors; values below 2 are raised to 2.
    pub point_count: usize,
    /// Amplitude multiplier; each unit pulls the wave up to a quarter of the edge inward.
    pub variance: f64,
    /// Run the wave down the canvas instead of across it.
    pub vertical: bool,
    /// Pin the first and last anchors to the baseline edge.
    pub start_end_zero: bool,
}

impl WaveConfig {
    /// Config sized to the fixed canvas for `axis`.
    pub fn for_canvas(canvas: Canvas, axis: Axis, point_count: usize, variance: f64) -> Self {
        Self {
            width: f64::from(canvas.width),
            height: f64::from(canvas.height),
            point_count,
            variance,
            vertical: axis.is_vertical(),
            start_end_zero: false,
        }
    }

    /// Builder-style toggle for [`WaveConfig::start_end_zero`].
    pub fn with_start_end_zero(mut self, start_end_zero: bool) -> Self {
        self.start_end_zero = start_end_zero;
        self
    }

    /// Travel axis of the generated wave.
    pub fn axis(&self) -> Axis {
        Axis::from_vertical(self.vertical)
    }

    /// Anchor count actually used by [`generate`].
    pub fn effective_point_count(&self) -> usize {
        self.point_count.max(2)
    }
}

/// Sample the anchors of a wave before smoothing.
fn anchors(config: &WaveConfig, rng: &mut dyn WaveRandom) -> Vec<Point> {
    let n = config.effective_point_count();
    let (width, height) = (config.width, config.height);
    let extent = if config.vertical { height } else { width };
    let edge = if config.vertical { width } else { height };
    let step = extent / (n - 1) as f64;

    let mut out: Vec<Point> = (0..n)
        .map(|i| {
            let along = if config.vertical {
                height - step * i as f64
            } else {
                step * i as f64
            };
            let across = edge - edge * 0.1 - rng.next_f64() * (config.variance * edge * 0.25);
            if config.vertical {
                Point::new(across, along)
            } else {
                Point::new(along, across)
            }
        })
        .collect();

    if config.start_end_zero {
        let last = out.len() - 1;
        if config.vertical {
            out[0].x = width;
            out[last].x = width;
        } else {
            out[0].y = height;
            out[last].y = height;
        }
    }

    out
}

/// Generate a closed wave outline as SVG path data.
///
/// The outline starts at a fixed corner, runs one quadratic segment per anchor (control point
/// on the anchor, end point halfway to the next anchor) and closes back along the canvas edge.
/// The result always contains exactly `max(point_count, 2)` `Q` commands.
pub fn generate(config: &WaveConfig, rng: &mut dyn WaveRandom) -> String {
    let anchors = anchors(config, rng);
    let (w, h) = (Num(config.width), Num(config.height));
    let first = anchors[0];

    let mut d = String::with_capacity(anchors.len() * 32 + 48);
    // Writing into a String never fails.
    let _ = if config.vertical {
        write!(d, "M {w} {h} L {} {h}", Num(first.x))
    } else {
        write!(d, "M 0 {h} L 0 {}", Num(first.y))
    };

    for pair in anchors.windows(2) {
        let (curr, next) = (pair[0], pair[1]);
        let mid = curr.midpoint(next);
        let _ = write!(
            d,
            " Q {} {}, {} {}",
            Num(curr.x),
            Num(curr.y),
            Num(mid.x),
            Num(mid.y)
        );
    }

    let last = anchors[anchors.len() - 1];
    let _ = if config.vertical {
        write!(
            d,
            " Q {} {}, 0 0 L {w} 0 L {w} {h} Z",
            Num(last.x),
            Num(last.y)
        )
    } else {
        write!(
            d,
            " Q {} {}, {w} {} L {w} {h} Z",
            Num(last.x),
            Num(last.y),
            Num(last.y)
        )
    };

    d
}

#[cfg(test)]
#[path = "../../tests/unit/wave/generate.rs"]
mod tests;
