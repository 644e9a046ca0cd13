use std::fmt::Write as _;

use crate::foundation::core::Canvas;
use crate::foundation::error::{DynawaveError, DynawaveResult};
use crate::widget::settings::{Direction, WaveSettings};

/// Presentation attributes carried over from the host element onto the `<svg>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostElement {
    pub class: Option<String>,
    pub id: Option<String>,
    pub style: Option<String>,
}

impl HostElement {
    pub fn from_attributes<'a, F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let owned = |name: &str| get(name).filter(|v| !v.is_empty()).map(str::to_string);
        Self {
            class: owned("class"),
            id: owned("id"),
            style: owned("style"),
        }
    }
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn flip_style(direction: Direction) -> &'static str {
    if direction.flip_x() {
        "transform:scaleX(-1);"
    } else if direction.flip_y() {
        "transform:scaleY(-1);"
    } else {
        ""
    }
}

/// Markup for the widget: one stretched `<svg>` holding one `<path>` that inherits the host's
/// stroke and fill. Hidden from assistive technology.
pub fn svg_markup(settings: &WaveSettings, host: &HostElement, d: &str) -> String {
    let canvas = settings.canvas();
    let mut out = String::with_capacity(d.len() + 320);
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{}" preserveAspectRatio="none" class="{}" style="{}{}""#,
        canvas.view_box(),
        escape_attr(host.class.as_deref().unwrap_or("")),
        flip_style(settings.direction),
        escape_attr(host.style.as_deref().unwrap_or("")),
    );
    if let Some(id) = &host.id {
        let _ = write!(out, r#" id="{}""#, escape_attr(id));
    }
    let _ = write!(
        out,
        r#" aria-hidden="true" role="presentation"><path d="{}" style="stroke:inherit; fill: inherit"></path></svg>"#,
        escape_attr(d)
    );
    out
}

/// Self-contained document for rasterizing: explicit fill, flip baked into a transform.
pub fn standalone_svg(canvas: Canvas, direction: Direction, d: &str, fill: &str) -> String {
    let transform = if direction.flip_x() {
        format!(r#" transform="translate({} 0) scale(-1 1)""#, canvas.width)
    } else if direction.flip_y() {
        format!(r#" transform="translate(0 {}) scale(1 -1)""#, canvas.height)
    } else {
        String::new()
    };
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="{vb}"><path d="{d}" fill="{fill}"{transform}/></svg>"#,
        w = canvas.width,
        h = canvas.height,
        vb = canvas.view_box(),
        d = escape_attr(d),
        fill = escape_attr(fill),
    )
}

/// Straight-alpha RGBA8 raster of an SVG document.
#[derive(Clone, Debug)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Rasterize an SVG document to `width`×`height` straight-alpha RGBA8 (stretched to fit).
pub fn rasterize(svg: &str, width: u32, height: u32) -> DynawaveResult<RasterImage> {
    const MAX_DIM: u32 = 16_384;
    if width == 0 || height == 0 || width > MAX_DIM || height > MAX_DIM {
        return Err(DynawaveError::validation(format!(
            "raster size {width}x{height} out of range (1..={MAX_DIM})"
        )));
    }

    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &opts)
        .map_err(|e| DynawaveError::render(format!("parse svg: {e}")))?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| DynawaveError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    let mut data = pixmap.take();
    demultiply_rgba8_in_place(&mut data);
    Ok(RasterImage {
        width,
        height,
        data,
    })
}

fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/svg.rs"]
mod tests;
