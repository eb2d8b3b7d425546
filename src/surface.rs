// SPDX: CC0-1.0

use crate::{registry::Color, Canvas, Number, Point};
use core::fmt::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Point<Number>,
    pub max: Point<Number>,
}

impl Rect {
    pub fn of(canvas: Canvas) -> Self {
        Self {
            min: Point::ZERO,
            max: Point::new(canvas.width, canvas.height),
        }
    }

    pub fn width(&self) -> Number {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> Number {
        self.max.y - self.min.y
    }
}

/// What a drawing backend must offer. Calls between `begin_path` and
/// `stroke` accumulate into one path which `stroke` commits using the
/// current color and width.
pub trait Surface {
    type Err;

    fn clear(&mut self, rect: Rect) -> Result<(), Self::Err>;
    fn set_stroke_color(&mut self, color: Color) -> Result<(), Self::Err>;
    fn set_stroke_width(&mut self, width: Number) -> Result<(), Self::Err>;
    fn begin_path(&mut self) -> Result<(), Self::Err>;
    fn move_to(&mut self, p: Point<Number>) -> Result<(), Self::Err>;
    fn line_to(&mut self, p: Point<Number>) -> Result<(), Self::Err>;
    fn stroke(&mut self) -> Result<(), Self::Err>;
}

/// Renders into an in-memory SVG document.
#[derive(Clone, Debug)]
pub struct SvgSurface {
    canvas: Canvas,
    body: String,
    path: String,
    color: Color,
    width: Number,
}

impl SvgSurface {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            body: String::new(),
            path: String::new(),
            color: Color("black"),
            width: 1.0,
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Number of committed strokes and fills.
    pub fn element_count(&self) -> usize {
        self.body.lines().count()
    }

    pub fn document(&self) -> String {
        let Canvas { width, height } = self.canvas;
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
                "\n",
                r#"<rect x="0" y="0" width="{w}" height="{h}" fill="white"/>"#,
                "\n{body}</svg>\n"
            ),
            w = width,
            h = height,
            body = self.body,
        )
    }
}

impl Surface for SvgSurface {
    type Err = fmt::Error;

    fn clear(&mut self, rect: Rect) -> fmt::Result {
        if rect == Rect::of(self.canvas) {
            self.body.clear();
            Ok(())
        } else {
            writeln!(
                self.body,
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="white"/>"#,
                rect.min.x,
                rect.min.y,
                rect.width(),
                rect.height()
            )
        }
    }

    fn set_stroke_color(&mut self, color: Color) -> fmt::Result {
        self.color = color;
        Ok(())
    }

    fn set_stroke_width(&mut self, width: Number) -> fmt::Result {
        self.width = width;
        Ok(())
    }

    fn begin_path(&mut self) -> fmt::Result {
        self.path.clear();
        Ok(())
    }

    fn move_to(&mut self, p: Point<Number>) -> fmt::Result {
        write!(self.path, "M{:.2} {:.2} ", p.x, p.y)
    }

    fn line_to(&mut self, p: Point<Number>) -> fmt::Result {
        write!(self.path, "L{:.2} {:.2} ", p.x, p.y)
    }

    fn stroke(&mut self) -> fmt::Result {
        if self.path.is_empty() {
            return Ok(());
        }
        writeln!(
            self.body,
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round"/>"#,
            self.path.trim_end(),
            self.color,
            self.width
        )?;
        self.path.clear();
        Ok(())
    }
}
