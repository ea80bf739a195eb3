use resvg::tiny_skia::{Color, FillRule, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

use crate::error::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn with_alpha(self, alpha: f32) -> Color {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color::from_rgba8(self.0, self.1, self.2, a)
    }

    /// `#rrggbb`, for SVG attributes.
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

pub const BACKGROUND: Rgb = Rgb(0x31, 0x33, 0x32);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const GREY: Rgb = Rgb(128, 128, 128);
pub const SKY: Rgb = Rgb(135, 206, 250);

/// Arc segments per radian when flattening wedges.
const ARC_STEPS_PER_RADIAN: f64 = 64.0;

pub fn blank(width: u32, height: u32) -> Result<Pixmap, RenderError> {
    Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })
}

pub fn filled(width: u32, height: u32, color: Rgb) -> Result<Pixmap, RenderError> {
    let mut pixmap = blank(width, height)?;
    pixmap.fill(color.with_alpha(1.0));
    Ok(pixmap)
}

fn paint(color: Rgb, alpha: f32) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.with_alpha(alpha));
    paint.anti_alias = true;
    paint
}

pub fn fill_path(pixmap: &mut Pixmap, path: &Path, color: Rgb, alpha: f32) {
    pixmap.fill_path(
        path,
        &paint(color, alpha),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
}

fn stroke_path(pixmap: &mut Pixmap, path: &Path, width: f32, color: Rgb, alpha: f32) {
    let stroke = Stroke {
        width,
        ..Stroke::default()
    };
    pixmap.stroke_path(path, &paint(color, alpha), &stroke, Transform::identity(), None);
}

pub fn fill_circle(pixmap: &mut Pixmap, center: (f32, f32), radius: f32, color: Rgb, alpha: f32) {
    if let Some(path) = PathBuilder::from_circle(center.0, center.1, radius) {
        fill_path(pixmap, &path, color, alpha);
    }
}

pub fn stroke_ring(
    pixmap: &mut Pixmap,
    center: (f32, f32),
    radius: f32,
    width: f32,
    color: Rgb,
    alpha: f32,
) {
    if let Some(path) = PathBuilder::from_circle(center.0, center.1, radius) {
        stroke_path(pixmap, &path, width, color, alpha);
    }
}

pub fn stroke_line(
    pixmap: &mut Pixmap,
    from: (f32, f32),
    to: (f32, f32),
    width: f32,
    color: Rgb,
    alpha: f32,
) {
    let mut pb = PathBuilder::new();
    pb.move_to(from.0, from.1);
    pb.line_to(to.0, to.1);
    if let Some(path) = pb.finish() {
        stroke_path(pixmap, &path, width, color, alpha);
    }
}

/// Annular wedge between `start` and `end` (radians, counter-clockwise,
/// y up) around `center` in pixel space. Each side is pulled in by
/// `gap / 2` pixels so neighbouring wedges stay apart by `gap`.
pub fn wedge(
    center: (f64, f64),
    inner: f64,
    outer: f64,
    start: f64,
    end: f64,
    gap: f64,
) -> Option<Path> {
    if outer <= inner || end <= start {
        return None;
    }
    let point = |radius: f64, angle: f64| {
        (
            (center.0 + radius * angle.cos()) as f32,
            (center.1 - radius * angle.sin()) as f32,
        )
    };
    let inset = |radius: f64| (gap / 2.0 / radius).min((end - start) / 2.0);
    let steps = (((end - start) * ARC_STEPS_PER_RADIAN).ceil() as usize).max(2);

    let mut pb = PathBuilder::new();
    let (a0, a1) = (start + inset(outer), end - inset(outer));
    for i in 0..=steps {
        let (x, y) = point(outer, a0 + (a1 - a0) * i as f64 / steps as f64);
        if i == 0 {
            pb.move_to(x, y);
        } else {
            pb.line_to(x, y);
        }
    }
    let (b0, b1) = (start + inset(inner), end - inset(inner));
    for i in (0..=steps).rev() {
        let (x, y) = point(inner, b0 + (b1 - b0) * i as f64 / steps as f64);
        pb.line_to(x, y);
    }
    pb.close();
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wedge_fill_stays_opaque_over_background() {
        let mut pixmap = filled(64, 64, BACKGROUND).unwrap();
        let path = wedge((32.0, 32.0), 4.0, 30.0, 0.0, 1.5, 1.0).unwrap();
        fill_path(&mut pixmap, &path, SKY, 0.3);
        let p = pixmap.pixel(50, 20).unwrap();
        assert_eq!(p.alpha(), 255);
        assert!(p.blue() > BACKGROUND.2);
    }

    #[test]
    fn degenerate_wedge_is_skipped() {
        assert!(wedge((0.0, 0.0), 10.0, 10.0, 0.0, 1.0, 1.0).is_none());
        assert!(wedge((0.0, 0.0), 5.0, 10.0, 1.0, 1.0, 1.0).is_none());
    }

    #[test]
    fn hex_is_lowercase_rrggbb() {
        assert_eq!(SKY.hex(), "#87cefa");
    }
}
