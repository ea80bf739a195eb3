use std::time::Instant;

use resvg::tiny_skia::{Pixmap, PixmapPaint, Point, Transform};
use tracing::debug;

use crate::canvas::{self, BACKGROUND, GREY, SKY, WHITE};
use crate::error::RenderError;
use crate::layout::{self, RadarLayout, Sector};
use crate::metrics::{self, LABEL_WRAP_WIDTH, MetricSpec};
use crate::selection::Selection;
use crate::strip::{self, STRIP_HEIGHT, STRIP_WIDTH};
use crate::text::{Anchor, TextLayer, TextSpan};

pub const CANVAS_WIDTH: u32 = 900;
pub const CANVAS_HEIGHT: u32 = 1020;
pub const CENTER: (f64, f64) = (450.0, 545.0);
pub const INNER_RADIUS: f64 = 60.0;
pub const OUTER_RADIUS: f64 = INNER_RADIUS + STRIP_WIDTH as f64;
const LABEL_RADIUS: f64 = OUTER_RADIUS + 44.0;
const GUIDE_RINGS: [f64; 5] = [0.17, 0.3425, 0.515, 0.6875, 0.86];
const PIZZA_ALPHA: f32 = 0.3;
const LABEL_SIZE: f32 = 13.0;
const FOOTER: &str = "Comparative visualisation | Data: players.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartHeader {
    pub player: String,
    pub team: String,
    pub competition: String,
    pub position: String,
    pub cohort_size: usize,
}

#[derive(Debug, Clone)]
pub struct RadarInput {
    pub header: ChartHeader,
    pub metrics: Vec<MetricSpec>,
    /// Cohort values per metric, aligned with `metrics`.
    pub cohort_values: Vec<Vec<f64>>,
    pub focal_values: Vec<Option<f64>>,
    pub seed: u64,
}

impl RadarInput {
    pub fn from_selection(selection: &Selection<'_>, seed: u64) -> Self {
        let focal = selection.focal;
        Self {
            header: ChartHeader {
                player: focal.player.clone(),
                team: focal.team.clone(),
                competition: focal.competition.clone(),
                position: focal.position.clone(),
                cohort_size: selection.cohort.len(),
            },
            metrics: selection.metrics.clone(),
            cohort_values: selection
                .metrics
                .iter()
                .map(|m| selection.cohort.values(&m.id))
                .collect(),
            focal_values: selection
                .metrics
                .iter()
                .map(|m| focal.value(&m.id))
                .collect(),
            seed,
        }
    }
}

/// A finished chart. Immutable; display and export both read from it.
#[derive(Debug, Clone)]
pub struct RadarChart {
    pub header: ChartHeader,
    pub layout: RadarLayout,
    pub image: Pixmap,
}

pub fn compose(input: &RadarInput) -> Result<RadarChart, RenderError> {
    let started = Instant::now();
    let layout = layout::compute_layout(
        &input.header.player,
        &input.metrics,
        &input.cohort_values,
        &input.focal_values,
    )?;

    let strips = layout
        .sectors
        .iter()
        .map(|sector| {
            let values = input
                .cohort_values
                .get(sector.index)
                .map(Vec::as_slice)
                .unwrap_or_default();
            strip::render_strip(sector, values, strip::strip_seed(input.seed, sector.index))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut image = canvas::filled(CANVAS_WIDTH, CANVAS_HEIGHT, BACKGROUND)?;
    let center = (CENTER.0 as f32, CENTER.1 as f32);
    for fraction in GUIDE_RINGS {
        let radius = OUTER_RADIUS * fraction / GUIDE_RINGS[4];
        canvas::stroke_ring(&mut image, center, radius as f32, 1.0, GREY, 0.3);
    }
    place_strips(&mut image, &layout, &strips)?;
    draw_pizza(&mut image, &layout);

    let mut text = TextLayer::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    sector_labels(&mut text, &layout);
    header_text(&mut text, &input.header);
    text.draw(&mut image)?;

    debug!(
        player = %input.header.player,
        sectors = layout.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "radar composed"
    );
    Ok(RadarChart {
        header: input.header.clone(),
        layout,
        image,
    })
}

/// Canvas pixel -> sector-local frame: origin at the chart centre, y up,
/// x along the sector's centre ray.
pub fn sector_frame(sector: &Sector) -> Transform {
    Transform::from_translate(-CENTER.0 as f32, -CENTER.1 as f32)
        .post_scale(1.0, -1.0)
        .post_rotate(-sector.angle.to_degrees() as f32)
}

pub fn polar_to_canvas(radius: f64, angle: f64) -> (f64, f64) {
    (
        CENTER.0 + radius * angle.cos(),
        CENTER.1 - radius * angle.sin(),
    )
}

fn polar_point(radius: f64, angle: f64) -> (f32, f32) {
    let (x, y) = polar_to_canvas(radius, angle);
    (x as f32, y as f32)
}

/// Index of the sector containing canvas angle `angle`.
fn sector_at(layout: &RadarLayout, angle: f64) -> Option<&Sector> {
    let first = layout.sectors.first()?;
    let offset = layout::normalize_angle(angle - first.angle + layout.sector_width / 2.0);
    let idx = (offset / layout.sector_width) as usize % layout.len();
    layout.sectors.get(idx)
}

/// Bend each flat strip into its sector: every annulus pixel is pulled back
/// through `sector_frame` to a strip coordinate, radius along the strip and
/// angular offset across it.
fn place_strips(
    image: &mut Pixmap,
    layout: &RadarLayout,
    strips: &[Pixmap],
) -> Result<(), RenderError> {
    let mut bent = canvas::blank(CANVAS_WIDTH, CANVAS_HEIGHT)?;
    let frames: Vec<Transform> = layout.sectors.iter().map(sector_frame).collect();
    let half = layout.sector_width / 2.0;
    let span = OUTER_RADIUS - INNER_RADIUS;
    let row = CANVAS_WIDTH as usize;

    let x0 = (CENTER.0 - OUTER_RADIUS).floor().max(0.0) as u32;
    let x1 = ((CENTER.0 + OUTER_RADIUS).ceil() as u32).min(CANVAS_WIDTH - 1);
    let y0 = (CENTER.1 - OUTER_RADIUS).floor().max(0.0) as u32;
    let y1 = ((CENTER.1 + OUTER_RADIUS).ceil() as u32).min(CANVAS_HEIGHT - 1);
    let pixels = bent.pixels_mut();
    for y in y0..=y1 {
        for x in x0..=x1 {
            let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
            let (dx, dy) = (px - CENTER.0, CENTER.1 - py);
            if !(INNER_RADIUS..OUTER_RADIUS).contains(&dx.hypot(dy)) {
                continue;
            }
            let Some(sector) = sector_at(layout, dy.atan2(dx)) else {
                continue;
            };
            let mut local = Point::from_xy(px as f32, py as f32);
            frames[sector.index].map_point(&mut local);
            let (lx, ly) = (local.x as f64, local.y as f64);
            let u = (lx.hypot(ly) - INNER_RADIUS) / span * STRIP_WIDTH as f64;
            let v = (1.0 - ly.atan2(lx) / half) * STRIP_HEIGHT as f64 / 2.0;
            if u < 0.0 || v < 0.0 || u >= STRIP_WIDTH as f64 || v >= STRIP_HEIGHT as f64 {
                continue;
            }
            if let Some(sample) = strips[sector.index].pixel(u as u32, v as u32)
                && sample.alpha() > 0
            {
                pixels[y as usize * row + x as usize] = sample;
            }
        }
    }
    image.draw_pixmap(
        0,
        0,
        bent.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
    Ok(())
}

fn draw_pizza(image: &mut Pixmap, layout: &RadarLayout) {
    let half = layout.sector_width / 2.0;
    let span = OUTER_RADIUS - INNER_RADIUS;
    for sector in &layout.sectors {
        let reach = INNER_RADIUS + sector.normalized() * span;
        // One pixel of background between neighbouring slices.
        if let Some(path) = canvas::wedge(
            CENTER,
            INNER_RADIUS,
            reach,
            sector.angle - half,
            sector.angle + half,
            1.0,
        ) {
            canvas::fill_path(image, &path, SKY, PIZZA_ALPHA);
        }
    }

    for sector in &layout.sectors {
        let edge = sector.angle - half;
        canvas::stroke_line(
            image,
            polar_point(INNER_RADIUS, edge),
            polar_point(OUTER_RADIUS, edge),
            1.0,
            WHITE,
            0.6,
        );
    }
    let center = (CENTER.0 as f32, CENTER.1 as f32);
    canvas::stroke_ring(image, center, INNER_RADIUS as f32, 1.0, WHITE, 0.8);
    canvas::stroke_ring(image, center, OUTER_RADIUS as f32, 1.0, WHITE, 0.8);
}

/// Visual counter-clockwise rotation (degrees) for a sector label so it runs
/// along the rim and never reads upside down.
pub fn label_rotation_deg(angle: f64) -> f64 {
    let deg = angle.to_degrees();
    if angle < std::f64::consts::PI {
        deg - 90.0
    } else {
        deg + 90.0
    }
}

fn sector_labels(text: &mut TextLayer, layout: &RadarLayout) {
    let line_height = LABEL_SIZE * 1.2;
    for sector in &layout.sectors {
        let lines = metrics::wrap_label(&sector.label, LABEL_WRAP_WIDTH);
        let (px, py) = polar_point(LABEL_RADIUS, sector.angle);
        // Pixel rows grow downwards, so a visual CCW turn is clockwise in SVG.
        let rotate = -label_rotation_deg(sector.angle) as f32;
        let (sin, cos) = rotate.to_radians().sin_cos();
        let middle = (lines.len() as f32 - 1.0) / 2.0;
        for (i, line) in lines.iter().enumerate() {
            let offset = (i as f32 - middle) * line_height;
            text.push(
                &TextSpan::new(line.as_str(), px - offset * sin, py + offset * cos, LABEL_SIZE)
                    .anchor(Anchor::Middle)
                    .rotate(rotate),
            );
        }
    }
}

fn header_text(text: &mut TextLayer, header: &ChartHeader) {
    text.push(
        &TextSpan::new(header.player.as_str(), 90.0, 46.0, 34.0)
            .bold()
            .color(SKY),
    );
    text.push(&TextSpan::new(header.team.as_str(), 90.0, 80.0, 18.0));
    text.push(&TextSpan::new(header.competition.as_str(), 90.0, 104.0, 18.0));

    let right = CANVAS_WIDTH as f32 - 25.0;
    text.push(
        &TextSpan::new(format!("Position: {}", header.position), right, 40.0, 18.0)
            .anchor(Anchor::End),
    );
    text.push(
        &TextSpan::new(format!("{} comparables", header.cohort_size), right, 66.0, 14.0)
            .anchor(Anchor::End),
    );
    text.push(
        &TextSpan::new(
            FOOTER,
            CANVAS_WIDTH as f32 / 2.0,
            CANVAS_HEIGHT as f32 - 24.0,
            13.0,
        )
        .anchor(Anchor::Middle),
    );
}
