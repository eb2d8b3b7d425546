// SPDX: CC0-1.0

use crate::{
    registry::Color,
    surface::Surface,
    viewport::Viewport,
    Canvas, Number, Point,
};

pub const GRID_COLOR: Color = Color("lightgray");
pub const AXIS_COLOR: Color = Color("gray");

/// Screen positions of the axes and of every gridline visible on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    /// Screen y of the horizontal axis.
    pub x_axis: Number,
    /// Screen x of the vertical axis.
    pub y_axis: Number,
    pub vertical: Vec<Number>,
    pub horizontal: Vec<Number>,
}

impl Grid {
    pub fn new(viewport: &Viewport) -> Self {
        let Canvas { width, height } = viewport.canvas();
        let origin = viewport.origin();
        let spacing = viewport.gridline_spacing() * viewport.scale();
        Self {
            x_axis: origin.y,
            y_axis: origin.x,
            vertical: lines(origin.x, spacing, width),
            horizontal: lines(origin.y, spacing, height),
        }
    }
}

/// Positions `axis + k * spacing` that fall within `0..=extent`.
fn lines(axis: Number, spacing: Number, extent: Number) -> Vec<Number> {
    if !(spacing.is_finite() && spacing > 0.0 && axis.is_finite()) {
        return Vec::new();
    }
    let first = ((0.0 - axis) / spacing).ceil();
    let last = ((extent - axis) / spacing).floor();
    if first > last {
        return Vec::new();
    }
    let count = (last - first) as usize + 1;
    (0..count)
        .map(|k| axis + (first + k as Number) * spacing)
        .collect()
}

pub fn draw<S: Surface>(surface: &mut S, viewport: &Viewport) -> Result<(), S::Err> {
    let grid = Grid::new(viewport);
    let Canvas { width, height } = viewport.canvas();

    surface.set_stroke_color(GRID_COLOR)?;
    surface.set_stroke_width(viewport.grid_width())?;
    surface.begin_path()?;
    for x in &grid.vertical {
        surface.move_to(Point::new(*x, 0.0))?;
        surface.line_to(Point::new(*x, height))?;
    }
    for y in &grid.horizontal {
        surface.move_to(Point::new(0.0, *y))?;
        surface.line_to(Point::new(width, *y))?;
    }
    surface.stroke()?;

    surface.set_stroke_color(AXIS_COLOR)?;
    surface.set_stroke_width(viewport.axis_width())?;
    surface.begin_path()?;
    surface.move_to(Point::new(0.0, grid.x_axis))?;
    surface.line_to(Point::new(width, grid.x_axis))?;
    surface.move_to(Point::new(grid.y_axis, 0.0))?;
    surface.line_to(Point::new(grid.y_axis, height))?;
    surface.stroke()
}
