use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::error::RenderError;
use crate::metrics::MetricSpec;

/// First sector is centred a quarter turn from zero (straight up).
pub const BASE_OFFSET: f64 = FRAC_PI_2;
/// Multiplicative margin on the observed maximum.
pub const HEADROOM: f64 = 0.05;
pub const MIN_AXIS_SPAN: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    pub index: usize,
    pub metric: String,
    pub label: String,
    /// Sector-centre angle in `[0, 2π)`, counter-clockwise from the +x axis.
    pub angle: f64,
    pub lower: f64,
    pub upper: f64,
    pub value: f64,
}

impl Sector {
    /// Focal value as a fraction of the sector's axis, clamped to `[0, 1]`.
    pub fn normalized(&self) -> f64 {
        normalize(self.value, self.lower, self.upper)
    }

    /// Left-half sectors get their tick labels flipped so they read upright.
    pub fn flips_labels(&self) -> bool {
        flips_labels(self.angle)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarLayout {
    pub sectors: Vec<Sector>,
    pub sector_width: f64,
}

impl RadarLayout {
    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}

pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

pub fn sector_angles(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let step = TAU / n as f64;
    (0..n)
        .map(|i| normalize_angle(BASE_OFFSET + step * i as f64))
        .collect()
}

pub fn flips_labels(angle: f64) -> bool {
    (FRAC_PI_2..=PI + FRAC_PI_2).contains(&angle)
}

/// `(min, max + |max| * HEADROOM)` over finite values, widened so the span is
/// never zero. `None` when there is nothing finite to bound.
pub fn axis_bounds(values: &[f64]) -> Option<(f64, f64)> {
    let mut finite = values.iter().copied().filter(|v| v.is_finite());
    let first = finite.next()?;
    let (min, max) = finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let lower = min;
    let mut upper = max + max.abs() * HEADROOM;
    if upper <= lower {
        upper = lower + (lower.abs() * HEADROOM).max(MIN_AXIS_SPAN);
    }
    Some((lower, upper))
}

pub fn normalize(value: f64, lower: f64, upper: f64) -> f64 {
    let span = upper - lower;
    if span <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    ((value - lower) / span).clamp(0.0, 1.0)
}

/// Lay out one sector per metric. `cohort_values[i]` are the cohort's values
/// for `metrics[i]`; `focal_values[i]` is the focal player's value. The focal
/// value is folded into the bounds so it always plots inside its sector.
pub fn compute_layout(
    player: &str,
    metrics: &[MetricSpec],
    cohort_values: &[Vec<f64>],
    focal_values: &[Option<f64>],
) -> Result<RadarLayout, RenderError> {
    if metrics.is_empty() {
        return Err(RenderError::NoMetrics);
    }
    if cohort_values.iter().all(|v| v.is_empty()) {
        return Err(RenderError::EmptyCohort);
    }

    let angles = sector_angles(metrics.len());
    let mut sectors = Vec::with_capacity(metrics.len());
    for (index, metric) in metrics.iter().enumerate() {
        let value = focal_values
            .get(index)
            .copied()
            .flatten()
            .filter(|v| v.is_finite())
            .ok_or_else(|| RenderError::MissingValue {
                player: player.to_string(),
                metric: metric.id.clone(),
            })?;
        let mut values = cohort_values.get(index).cloned().unwrap_or_default();
        if values.is_empty() {
            return Err(RenderError::NoCohortValues {
                metric: metric.id.clone(),
            });
        }
        values.push(value);
        let (lower, upper) = axis_bounds(&values).ok_or_else(|| RenderError::NoCohortValues {
            metric: metric.id.clone(),
        })?;
        sectors.push(Sector {
            index,
            metric: metric.id.clone(),
            label: metric.label.clone(),
            angle: angles[index],
            lower,
            upper,
            value,
        });
    }

    Ok(RadarLayout {
        sectors,
        sector_width: TAU / metrics.len() as f64,
    })
}
