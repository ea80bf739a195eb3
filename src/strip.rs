use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use resvg::tiny_skia::Pixmap;

use crate::canvas::{self, GREY, Rgb, SKY, WHITE};
use crate::error::RenderError;
use crate::layout::Sector;
use crate::text::{Anchor, TextLayer, TextSpan};

pub const STRIP_WIDTH: u32 = 280;
pub const STRIP_HEIGHT: u32 = 96;

const DOT_RADIUS: f32 = 3.5;
const FOCAL_RADIUS: f32 = 5.0;
const JITTER: f64 = 16.0;
const TICK_TARGET: usize = 4;
const TICK_LEN: f32 = 4.0;
const TICK_LABEL_SIZE: f32 = 10.0;

pub fn strip_seed(base: u64, index: usize) -> u64 {
    base ^ (index as u64 + 1).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

/// Horizontal pixel position of `value` on a strip spanning `[lower, upper]`.
pub fn value_to_x(value: f64, lower: f64, upper: f64) -> f64 {
    crate::layout::normalize(value, lower, upper) * STRIP_WIDTH as f64
}

/// The cohort's values for one metric as a jittered scatter along a floor
/// axis, drawn flat on a transparent pixmap.
pub fn render_strip(
    sector: &Sector,
    cohort_values: &[f64],
    seed: u64,
) -> Result<Pixmap, RenderError> {
    let mut strip = canvas::blank(STRIP_WIDTH, STRIP_HEIGHT)?;
    let width = STRIP_WIDTH as f32;
    let axis_y = (STRIP_HEIGHT / 2) as f32;

    canvas::stroke_line(&mut strip, (0.0, axis_y), (width, axis_y), 1.0, WHITE, 1.0);

    let mut labels = TextLayer::new(STRIP_WIDTH, STRIP_HEIGHT);
    // Flipped sectors are read upside down once bent into place.
    let rotate = if sector.flips_labels() { 180.0 } else { 0.0 };
    let (ticks, step) = nice_ticks(sector.lower, sector.upper, TICK_TARGET);
    for tick in ticks {
        let x = (value_to_x(tick, sector.lower, sector.upper) as f32).clamp(0.5, width - 0.5);
        canvas::stroke_line(&mut strip, (x, axis_y), (x, axis_y + TICK_LEN), 1.0, WHITE, 1.0);

        let label = format_tick(tick, step);
        let half = label.chars().count() as f32 * TICK_LABEL_SIZE * 0.32;
        let lx = x.clamp(half.min(width / 2.0), (width - half).max(width / 2.0));
        let ly = axis_y + TICK_LEN + 3.0 + TICK_LABEL_SIZE / 2.0;
        labels.push(
            &TextSpan::new(label, lx, ly, TICK_LABEL_SIZE)
                .anchor(Anchor::Middle)
                .rotate(rotate),
        );
    }
    labels.draw(&mut strip)?;

    let mut rng = StdRng::seed_from_u64(seed);
    for value in cohort_values {
        let x = value_to_x(*value, sector.lower, sector.upper);
        let y = axis_y as f64 - rng.gen_range(-JITTER..=JITTER);
        dot(&mut strip, (x as f32, y as f32), DOT_RADIUS, GREY);
    }
    let fx = value_to_x(sector.value, sector.lower, sector.upper);
    dot(&mut strip, (fx as f32, axis_y), FOCAL_RADIUS, SKY);

    Ok(strip)
}

fn dot(strip: &mut Pixmap, center: (f32, f32), radius: f32, fill: Rgb) {
    canvas::fill_circle(strip, center, radius + 1.0, WHITE, 1.0);
    canvas::fill_circle(strip, center, radius, fill, 1.0);
}

/// Round-number ticks inside `[lower, upper]` and their spacing.
pub fn nice_ticks(lower: f64, upper: f64, target: usize) -> (Vec<f64>, f64) {
    let span = upper - lower;
    if !(span > 0.0) || !span.is_finite() {
        return (vec![lower], 1.0);
    }
    let raw = span / target.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let norm = raw / magnitude;
    let step = magnitude
        * if norm < 1.5 {
            1.0
        } else if norm < 3.0 {
            2.0
        } else if norm < 7.0 {
            5.0
        } else {
            10.0
        };
    let first = (lower / step).ceil() as i64;
    let last = (upper / step + 1e-9).floor() as i64;
    let ticks = (first..=last).map(|i| i as f64 * step).collect();
    (ticks, step)
}

pub fn format_tick(value: f64, step: f64) -> String {
    let value = if value.abs() < step * 1e-6 { 0.0 } else { value };
    let decimals = if step >= 1.0 {
        0
    } else {
        (-step.log10() - 1e-9).ceil().clamp(0.0, 3.0) as usize
    };
    format!("{value:.decimals$}")
}
