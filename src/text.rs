use std::fmt::Write as _;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, fontdb};

use crate::canvas::{Rgb, WHITE};
use crate::error::RenderError;

pub const FONT_FAMILY: &str = "DejaVu Sans";

static REGULAR: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");
static BOLD: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

static FONTS: OnceCell<Arc<fontdb::Database>> = OnceCell::new();

fn fonts() -> Arc<fontdb::Database> {
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_font_data(REGULAR.to_vec());
            db.load_font_data(BOLD.to_vec());
            db.set_sans_serif_family(FONT_FAMILY);
            Arc::new(db)
        })
        .clone()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_svg(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// One line of text. `(x, y)` is the anchor point on the vertical middle of
/// the line; `rotate` turns the line about that point, clockwise on screen.
#[derive(Debug, Clone)]
pub struct TextSpan {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub bold: bool,
    pub color: Rgb,
    pub anchor: Anchor,
    pub rotate: f32,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, x: f32, y: f32, size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            size,
            bold: false,
            color: WHITE,
            anchor: Anchor::Start,
            rotate: 0.0,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn rotate(mut self, degrees: f32) -> Self {
        self.rotate = degrees;
        self
    }
}

/// Text collected into one SVG document and composited over a pixmap.
#[derive(Debug, Clone)]
pub struct TextLayer {
    width: u32,
    height: u32,
    body: String,
}

impl TextLayer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn push(&mut self, span: &TextSpan) {
        if span.text.trim().is_empty() {
            return;
        }
        // Middle of the x-height sits about 0.35em above the baseline.
        let baseline = span.size * 0.35;
        let _ = write!(
            self.body,
            r#"<text x="0" y="{baseline:.2}" transform="translate({:.2} {:.2}) rotate({:.2})" font-family="{FONT_FAMILY}" font-size="{:.1}" font-weight="{}" fill="{}" text-anchor="{}">{}</text>"#,
            span.x,
            span.y,
            span.rotate,
            span.size,
            if span.bold { "bold" } else { "normal" },
            span.color.hex(),
            span.anchor.as_svg(),
            escape_xml(&span.text),
        );
    }

    pub fn to_svg(&self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">{}</svg>"#,
            self.body,
            w = self.width,
            h = self.height,
        )
    }

    pub fn draw(&self, pixmap: &mut Pixmap) -> Result<(), RenderError> {
        if self.is_empty() {
            return Ok(());
        }
        let mut options = usvg::Options::default();
        options.font_family = FONT_FAMILY.to_string();
        options.fontdb = fonts();
        let tree = usvg::Tree::from_str(&self.to_svg(), &options)
            .map_err(|err| RenderError::Text(err.to_string()))?;
        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
        Ok(())
    }
}

fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_is_escaped() {
        let mut layer = TextLayer::new(10, 10);
        layer.push(&TextSpan::new("Goals & <Assists>", 0.0, 5.0, 10.0));
        let svg = layer.to_svg();
        assert!(svg.contains("Goals &amp; &lt;Assists&gt;"));
    }

    #[test]
    fn blank_spans_are_skipped() {
        let mut layer = TextLayer::new(10, 10);
        layer.push(&TextSpan::new("   ", 0.0, 5.0, 10.0));
        assert!(layer.is_empty());
    }
}
