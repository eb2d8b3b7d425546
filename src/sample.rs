// SPDX: CC0-1.0

//! Sampling a function across the viewport into screen-space polylines.
//!
//! One sample is taken every `1 / detail` pixels from the left edge of the
//! canvas to the right edge inclusive. A sample whose value (or its screen
//! position) is not finite is a discontinuity: the current polyline ends
//! there and the next finite sample starts a fresh one, so asymptotes never
//! turn into long connecting strokes.

use crate::{
    registry::{Color, Detail, PlottedFunction},
    surface::Surface,
    viewport::Viewport,
    Number, Point,
};
use log::warn;

/// Most samples taken for one function in one pass.
pub const MAX_SAMPLES: usize = 1 << 22;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sample {
    Finite(Point<Number>),
    /// Screen x of a sample with no usable value.
    Discontinuity(Number),
}

impl Sample {
    pub const fn screen_x(&self) -> Number {
        match self {
            Self::Finite(p) => p.x,
            Self::Discontinuity(x) => *x,
        }
    }
}

/// A connected run of screen points.
pub type SubPath = Vec<Point<Number>>;

/// Everything needed to stroke one function.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    pub color: Color,
    pub width: Number,
    pub paths: Vec<SubPath>,
}

impl Trace {
    pub fn segment_count(&self) -> usize {
        self.paths.iter().map(|p| p.len().saturating_sub(1)).sum()
    }
}

pub fn sample<F>(mut f: F, detail: Detail, viewport: &Viewport) -> Vec<Sample>
where
    F: FnMut(Number) -> Number,
{
    let detail = Number::from(detail.get());
    let width = viewport.canvas().width.max(0.0);
    // index based so the step does not accumulate rounding error
    let last = (width * detail).floor();
    // negated so NaN is caught too
    if !(last < MAX_SAMPLES as Number) {
        warn!("{width} px at detail {detail} needs too many samples, skipping");
        return Vec::new();
    }
    let count = last as usize + 1;

    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let px = i as Number / detail;
        let x = viewport.screen_to_math(Point::new(px, 0.0)).x;
        let y = f(x);
        let sample = if y.is_finite() {
            let screen = viewport.math_to_screen(Point::new(x, y));
            if screen.y.is_finite() {
                Sample::Finite(Point::new(px, screen.y))
            } else {
                Sample::Discontinuity(px)
            }
        } else {
            Sample::Discontinuity(px)
        };
        out.push(sample);
    }
    out
}

/// Splits samples into sub-paths at every discontinuity. Leading
/// discontinuities produce nothing; a sub-path begins at the first finite
/// sample after one.
pub fn build_paths(samples: &[Sample]) -> Vec<SubPath> {
    let mut paths = Vec::new();
    let mut cur: SubPath = Vec::new();
    for sample in samples {
        match sample {
            Sample::Finite(p) => cur.push(*p),
            Sample::Discontinuity(_) => {
                if !cur.is_empty() {
                    paths.push(core::mem::take(&mut cur));
                }
            }
        }
    }
    if !cur.is_empty() {
        paths.push(cur);
    }
    paths
}

pub fn trace(func: &PlottedFunction, viewport: &Viewport) -> Trace {
    let samples = sample(func.evaluator().as_fn(), func.detail(), viewport);
    Trace {
        color: func.color(),
        width: viewport.curve_width(),
        paths: build_paths(&samples),
    }
}

/// Commits a trace as a single stroke.
pub fn draw<S: Surface>(surface: &mut S, trace: &Trace) -> Result<(), S::Err> {
    surface.set_stroke_color(trace.color)?;
    surface.set_stroke_width(trace.width)?;
    surface.begin_path()?;
    for path in &trace.paths {
        let mut points = path.iter();
        if let Some(first) = points.next() {
            surface.move_to(*first)?;
        }
        for p in points {
            surface.line_to(*p)?;
        }
    }
    surface.stroke()
}
