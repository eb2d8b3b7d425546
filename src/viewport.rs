// SPDX: CC0-1.0

use crate::{Canvas, Number, Point, UNIT_SCALE};
use core::{fmt, ops::RangeInclusive};
use log::warn;

pub const DEFAULT_ZOOM_FACTOR: Number = 1.05;
pub const DEFAULT_GRIDLINE_SPACING: Number = 5.0;
pub const DEFAULT_LINE_WIDTH: Number = 1.0;
/// At the lower bound a gridline spacing of 1 unit is still 1 px wide.
pub const ZOOM_LIMITS: RangeInclusive<Number> = (1.0 / UNIT_SCALE)..=1e6;

/// Curves are drawn this many times wider than gridlines.
pub const CURVE_WIDTH: Number = 3.0;
pub const AXIS_WIDTH: Number = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDir {
    In,
    Out,
}

impl ZoomDir {
    /// Scrolling up zooms in. A zero delta carries no direction.
    pub fn from_wheel(delta_y: Number) -> Option<Self> {
        if delta_y < 0.0 {
            Some(Self::In)
        } else if delta_y > 0.0 {
            Some(Self::Out)
        } else {
            None
        }
    }
}

/// Mapping between screen pixels and math coordinates.
///
/// `offset` is where the math origin sits relative to the canvas centre, in
/// pixels, with screen y growing downward. `preview` is an uncommitted drag
/// delta layered on top of it; every transform sees `offset + preview`.
#[derive(Clone, Debug)]
pub struct Viewport {
    canvas: Canvas,
    offset: Point<Number>,
    preview: Point<Number>,
    zoom: Number,
    zoom_factor: Number,
    gridline_spacing: Number,
    line_width: Number,
}

impl Viewport {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            offset: Point::ZERO,
            preview: Point::ZERO,
            zoom: 1.0,
            zoom_factor: DEFAULT_ZOOM_FACTOR,
            gridline_spacing: DEFAULT_GRIDLINE_SPACING,
            line_width: DEFAULT_LINE_WIDTH,
        }
    }

    pub fn with_zoom_factor(mut self, factor: Number) -> Self {
        if factor.is_finite() && factor > 1.0 {
            self.zoom_factor = factor;
        } else {
            warn!("ignoring zoom factor {factor}, keeping {}", self.zoom_factor);
        }
        self
    }

    pub const fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub const fn offset(&self) -> Point<Number> {
        self.offset
    }

    pub const fn preview(&self) -> Point<Number> {
        self.preview
    }

    /// Offset including any live drag.
    pub fn effective_offset(&self) -> Point<Number> {
        self.offset + self.preview
    }

    pub const fn zoom(&self) -> Number {
        self.zoom
    }

    pub const fn zoom_factor(&self) -> Number {
        self.zoom_factor
    }

    /// Pixels per math unit.
    pub fn scale(&self) -> Number {
        UNIT_SCALE * self.zoom
    }

    pub const fn gridline_spacing(&self) -> Number {
        self.gridline_spacing
    }

    pub const fn line_width(&self) -> Number {
        self.line_width
    }

    /// Values below 1 are raised to 1; non-finite values are ignored.
    pub fn set_gridline_spacing(&mut self, spacing: Number) {
        if spacing.is_finite() {
            self.gridline_spacing = spacing.max(1.0);
        }
    }

    /// Values below 1 are raised to 1; non-finite values are ignored.
    pub fn set_line_width(&mut self, width: Number) {
        if width.is_finite() {
            self.line_width = width.max(1.0);
        }
    }

    // stroke widths all scale with zoom

    pub fn curve_width(&self) -> Number {
        CURVE_WIDTH * self.zoom * self.line_width
    }

    pub fn grid_width(&self) -> Number {
        self.zoom * self.line_width
    }

    pub fn axis_width(&self) -> Number {
        AXIS_WIDTH * self.zoom * self.line_width
    }

    pub fn pan_preview(&mut self, delta: Point<Number>) {
        self.preview = delta;
    }

    pub fn pan_commit(&mut self) {
        self.offset = self.offset + self.preview;
        self.preview = Point::ZERO;
    }

    /// Zooms one step keeping the math point under `anchor` (screen pixels)
    /// fixed on screen. Returns false if the step would leave
    /// [`ZOOM_LIMITS`], in which case nothing changes.
    pub fn zoom_step(&mut self, dir: ZoomDir, anchor: Point<Number>) -> bool {
        let factor = match dir {
            ZoomDir::In => self.zoom_factor,
            ZoomDir::Out => self.zoom_factor.recip(),
        };
        let zoom = self.zoom * factor;
        if !zoom.is_finite() || !ZOOM_LIMITS.contains(&zoom) {
            warn!("zoom level {zoom} out of range, ignoring {dir:?} step");
            return false;
        }

        // anchor relative to canvas centre
        let c = Point::new(
            anchor.x - self.canvas.width / 2.0,
            anchor.y - self.canvas.height / 2.0,
        );
        let eff = self.effective_offset();
        let new_eff = Point::new(c.x - (c.x - eff.x) * factor, c.y - (c.y - eff.y) * factor);
        self.offset = Point::new(new_eff.x - self.preview.x, new_eff.y - self.preview.y);
        self.zoom = zoom;
        true
    }

    pub fn reset(&mut self) {
        self.offset = Point::ZERO;
        self.preview = Point::ZERO;
        self.zoom = 1.0;
    }

    pub fn screen_to_math(&self, p: Point<Number>) -> Point<Number> {
        let off = self.effective_offset();
        let scale = self.scale();
        Point::new(
            (p.x - self.canvas.width / 2.0 - off.x) / scale,
            (self.canvas.height / 2.0 + off.y - p.y) / scale,
        )
    }

    pub fn math_to_screen(&self, p: Point<Number>) -> Point<Number> {
        let off = self.effective_offset();
        let scale = self.scale();
        Point::new(
            self.canvas.width / 2.0 + off.x + p.x * scale,
            self.canvas.height / 2.0 + off.y - p.y * scale,
        )
    }

    /// Screen position of the math origin, i.e. where the axes cross.
    pub fn origin(&self) -> Point<Number> {
        self.canvas.center() + self.effective_offset()
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewport")
            .field("canvas", &self.canvas.to_string())
            .field("offset", &(self.offset.x, self.offset.y))
            .field("zoom", &self.zoom)
            .field("gridline spacing", &self.gridline_spacing)
            .field("line width", &self.line_width)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(Canvas::new(800.0, 600.0))
    }

    fn assert_close(a: Point<Number>, b: Point<Number>) {
        let tol = 1e-9 * (1.0 + b.x.abs().max(b.y.abs()));
        assert!(
            (a.x - b.x).abs() < tol && (a.y - b.y).abs() < tol,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn centre_is_origin() {
        let vp = viewport();
        assert_close(vp.screen_to_math(Point::new(400.0, 300.0)), Point::ZERO);
        // one unit is eight pixels, y flipped
        assert_close(vp.math_to_screen(Point::new(1.0, 1.0)), Point::new(408.0, 292.0));
    }

    #[test]
    fn round_trip() {
        let mut vp = viewport();
        for (zoom_steps, offset) in [(0, (0.0, 0.0)), (13, (-250.5, 77.0)), (-40, (1e4, -3e3))] {
            vp.reset();
            vp.pan_preview(Point::new(offset.0, offset.1));
            vp.pan_commit();
            let dir = if zoom_steps < 0 { ZoomDir::Out } else { ZoomDir::In };
            for _ in 0..i32::abs(zoom_steps) {
                vp.zoom_step(dir, Point::new(123.0, 456.0));
            }
            for p in [Point::new(0.0, 0.0), Point::new(-3.5, 12.25), Point::new(1e3, -1e-3)] {
                assert_close(vp.screen_to_math(vp.math_to_screen(p)), p);
            }
        }
    }

    #[test]
    fn preview_is_committed_once() {
        let mut vp = viewport();
        vp.pan_preview(Point::new(5.0, 5.0));
        vp.pan_preview(Point::new(10.0, -4.0));
        assert_eq!(vp.offset(), Point::ZERO);
        assert_eq!(vp.origin(), Point::new(410.0, 296.0));
        vp.pan_commit();
        assert_eq!(vp.offset(), Point::new(10.0, -4.0));
        assert_eq!(vp.preview(), Point::ZERO);
        assert_eq!(vp.origin(), Point::new(410.0, 296.0));
    }

    #[test]
    fn zoom_keeps_point_under_cursor() {
        let mut vp = viewport();
        vp.pan_preview(Point::new(-37.0, 12.0));
        vp.pan_commit();
        let cursor = Point::new(600.0, 100.0);
        let before = vp.screen_to_math(cursor);
        assert!(vp.zoom_step(ZoomDir::In, cursor));
        assert!((vp.zoom() - 1.05).abs() < 1e-12);
        assert_close(vp.math_to_screen(before), cursor);
        assert!(vp.zoom_step(ZoomDir::Out, cursor));
        assert!((vp.zoom() - 1.0).abs() < 1e-12);
        assert_close(vp.math_to_screen(before), cursor);
    }

    #[test]
    fn zoom_during_drag_is_anchored_too() {
        let mut vp = viewport();
        vp.pan_preview(Point::new(40.0, 40.0));
        let cursor = Point::new(10.0, 20.0);
        let before = vp.screen_to_math(cursor);
        vp.zoom_step(ZoomDir::In, cursor);
        assert_close(vp.math_to_screen(before), cursor);
    }

    #[test]
    fn zoom_stays_in_range() {
        let mut vp = viewport().with_zoom_factor(10.0);
        let centre = vp.canvas().center();
        let mut steps = 0;
        while vp.zoom_step(ZoomDir::In, centre) {
            steps += 1;
        }
        assert_eq!(steps, 6);
        assert!(vp.zoom().is_finite() && vp.zoom() > 0.0);
        assert!(ZOOM_LIMITS.contains(&vp.zoom()));
    }

    #[test]
    fn gridlines_stay_sparse_when_fully_zoomed_out() {
        let mut vp = viewport();
        vp.set_gridline_spacing(1.0);
        let centre = vp.canvas().center();
        let mut steps = 0;
        while vp.zoom_step(ZoomDir::Out, centre) {
            steps += 1;
        }
        assert_eq!(steps, 42);
        assert!(vp.zoom() >= *ZOOM_LIMITS.start());
        assert!(vp.gridline_spacing() * vp.scale() >= 1.0);

        let grid = crate::grid::Grid::new(&vp);
        assert!(grid.vertical.len() <= 801);
        assert!(grid.horizontal.len() <= 601);
    }

    #[test]
    fn bad_zoom_factor_is_ignored() {
        let vp = viewport().with_zoom_factor(0.5);
        assert_eq!(vp.zoom_factor(), DEFAULT_ZOOM_FACTOR);
        let vp = viewport().with_zoom_factor(Number::NAN);
        assert_eq!(vp.zoom_factor(), DEFAULT_ZOOM_FACTOR);
    }

    #[test]
    fn reset_restores_identity() {
        let mut vp = viewport();
        vp.pan_preview(Point::new(3.0, 4.0));
        vp.pan_commit();
        vp.zoom_step(ZoomDir::In, Point::new(0.0, 0.0));
        vp.reset();
        assert_eq!(vp.offset(), Point::ZERO);
        assert_eq!(vp.zoom(), 1.0);
    }

    #[test]
    fn widths_are_clamped_and_scale_with_zoom() {
        let mut vp = viewport();
        vp.set_line_width(0.2);
        vp.set_gridline_spacing(-3.0);
        assert_eq!(vp.line_width(), 1.0);
        assert_eq!(vp.gridline_spacing(), 1.0);
        vp.set_line_width(2.0);
        vp.zoom_step(ZoomDir::In, vp.canvas().center());
        assert!((vp.curve_width() - 3.0 * 1.05 * 2.0).abs() < 1e-12);
        assert!((vp.axis_width() - 5.0 * 1.05 * 2.0).abs() < 1e-12);
        assert!((vp.grid_width() - 1.05 * 2.0).abs() < 1e-12);
    }

    #[test]
    fn wheel_direction() {
        assert_eq!(ZoomDir::from_wheel(-120.0), Some(ZoomDir::In));
        assert_eq!(ZoomDir::from_wheel(3.0), Some(ZoomDir::Out));
        assert_eq!(ZoomDir::from_wheel(0.0), None);
    }
}
