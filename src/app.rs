// SPDX: CC0-1.0

use crate::{
    config::Settings,
    grid,
    registry::{AddErr, Detail, FunctionKey, Registry},
    sample,
    surface::{Rect, Surface},
    viewport::{Viewport, ZoomDir},
    Number, Point,
};
use log::{debug, info};

/// Input the host forwards to the plotter.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    PointerDown(Point<Number>),
    PointerMove(Point<Number>),
    PointerUp,
    Wheel {
        delta_y: Number,
        cursor: Point<Number>,
    },
    TextSubmit(String),
    DetailChange(Detail),
    GridSpacingChange(Number),
    LineWidthChange(Number),
    VisibilityToggle {
        key: FunctionKey,
        visible: bool,
    },
    ClearAll,
    ResetView,
}

/// One row of the function list shown next to the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegendEntry {
    pub key: FunctionKey,
    pub visible: bool,
}

/// Owns all mutable state: the viewport, the registry, the current detail
/// setting and any drag in progress. Every change goes through [`handle`].
///
/// Redraws always start from a cleared canvas, so running one twice is
/// harmless and a superseded one can be dropped.
///
/// [`handle`]: Plotter::handle
#[derive(Debug)]
pub struct Plotter {
    viewport: Viewport,
    registry: Registry,
    detail: Detail,
    drag_start: Option<Point<Number>>,
    redraw_pending: bool,
}

impl Plotter {
    pub fn new(settings: &Settings) -> Self {
        let mut viewport = Viewport::new(settings.canvas()).with_zoom_factor(settings.zoom_factor);
        viewport.set_gridline_spacing(settings.gridline_spacing);
        viewport.set_line_width(settings.line_width);
        Self {
            viewport,
            registry: Registry::new(),
            detail: settings.detail,
            drag_start: None,
            redraw_pending: false,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Detail given to functions added from now on.
    pub fn detail(&self) -> Detail {
        self.detail
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    pub fn redraw_pending(&self) -> bool {
        self.redraw_pending
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        self.registry
            .iter()
            .map(|func| LegendEntry {
                key: func.key(),
                visible: func.is_visible(),
            })
            .collect()
    }

    /// The outer error is the surface failing; the inner one is a rejected
    /// expression, to be shown to the user.
    pub fn handle<S: Surface>(
        &mut self,
        event: Event,
        surface: &mut S,
    ) -> Result<Result<(), AddErr>, S::Err> {
        match event {
            Event::PointerDown(p) => {
                self.drag_start = Some(p);
            }

            Event::PointerMove(p) => {
                if let Some(start) = self.drag_start {
                    self.viewport
                        .pan_preview(Point::new(p.x - start.x, p.y - start.y));
                    self.redraw_pending = true;
                }
            }

            Event::PointerUp => {
                if self.drag_start.take().is_some() {
                    self.viewport.pan_commit();
                    debug!("pan committed, offset {:?}", self.viewport.offset());
                    self.redraw_pending = true;
                }
            }

            Event::Wheel { delta_y, cursor } => {
                if let Some(dir) = ZoomDir::from_wheel(delta_y) {
                    if self.viewport.zoom_step(dir, cursor) {
                        self.redraw(surface)?;
                    }
                }
            }

            Event::TextSubmit(raw) => return self.add(&raw, surface),

            Event::DetailChange(detail) => {
                debug!("detail for new functions set to {detail}");
                self.detail = detail;
            }

            Event::GridSpacingChange(spacing) => {
                self.viewport.set_gridline_spacing(spacing);
                self.redraw(surface)?;
            }

            Event::LineWidthChange(width) => {
                self.viewport.set_line_width(width);
                self.redraw(surface)?;
            }

            Event::VisibilityToggle { key, visible } => {
                if self.registry.set_visibility(&key, visible) > 0 {
                    info!("'{}' ({}) visible: {visible}", key.text, key.color);
                    self.redraw(surface)?;
                }
            }

            Event::ClearAll => {
                self.registry.clear();
                self.redraw(surface)?;
            }

            Event::ResetView => {
                self.viewport.reset();
                self.drag_start = None;
                self.redraw(surface)?;
            }
        }
        Ok(Ok(()))
    }

    /// Performs the pending redraw, if any. Returns whether one ran.
    pub fn frame<S: Surface>(&mut self, surface: &mut S) -> Result<bool, S::Err> {
        if !self.redraw_pending {
            return Ok(false);
        }
        self.redraw(surface)?;
        Ok(true)
    }

    /// Clears the canvas, then draws the grid and every visible function in
    /// insertion order.
    pub fn redraw<S: Surface>(&mut self, surface: &mut S) -> Result<(), S::Err> {
        self.redraw_pending = false;
        surface.clear(Rect::of(self.viewport.canvas()))?;
        grid::draw(surface, &self.viewport)?;
        for func in self.registry.visible() {
            sample::draw(surface, &sample::trace(func, &self.viewport))?;
        }
        Ok(())
    }

    /// Draws only the new function on top of what is already there.
    fn add<S: Surface>(&mut self, raw: &str, surface: &mut S) -> Result<Result<(), AddErr>, S::Err> {
        let func = match self.registry.add(raw, self.detail) {
            Ok(func) => func,
            Err(err) => return Ok(Err(err)),
        };
        info!("plotting '{}' in {}", func.raw(), func.color());
        sample::draw(surface, &sample::trace(func, &self.viewport))?;
        Ok(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Color, PALETTE};
    use core::convert::Infallible;

    /// Records every surface call.
    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum Call {
        Clear,
        Color(Color),
        Width(Number),
        Begin,
        Move(Point<Number>),
        Line(Point<Number>),
        Stroke,
    }

    impl Recorder {
        fn strokes_in(&self, color: Color) -> usize {
            let mut cur = None;
            let mut n = 0;
            for call in &self.calls {
                match call {
                    Call::Color(c) => cur = Some(*c),
                    Call::Stroke if cur == Some(color) => n += 1,
                    _ => {}
                }
            }
            n
        }

        fn clears(&self) -> usize {
            self.calls.iter().filter(|c| **c == Call::Clear).count()
        }
    }

    impl Surface for Recorder {
        type Err = Infallible;

        fn clear(&mut self, _: Rect) -> Result<(), Infallible> {
            self.calls.push(Call::Clear);
            Ok(())
        }
        fn set_stroke_color(&mut self, color: Color) -> Result<(), Infallible> {
            self.calls.push(Call::Color(color));
            Ok(())
        }
        fn set_stroke_width(&mut self, width: Number) -> Result<(), Infallible> {
            self.calls.push(Call::Width(width));
            Ok(())
        }
        fn begin_path(&mut self) -> Result<(), Infallible> {
            self.calls.push(Call::Begin);
            Ok(())
        }
        fn move_to(&mut self, p: Point<Number>) -> Result<(), Infallible> {
            self.calls.push(Call::Move(p));
            Ok(())
        }
        fn line_to(&mut self, p: Point<Number>) -> Result<(), Infallible> {
            self.calls.push(Call::Line(p));
            Ok(())
        }
        fn stroke(&mut self) -> Result<(), Infallible> {
            self.calls.push(Call::Stroke);
            Ok(())
        }
    }

    fn ok<T>(res: Result<T, Infallible>) -> T {
        match res {
            Ok(val) => val,
            Err(never) => match never {},
        }
    }

    fn submit(plotter: &mut Plotter, surface: &mut Recorder, raw: &str) -> Result<(), AddErr> {
        ok(plotter.handle(Event::TextSubmit(raw.into()), surface))
    }

    fn send(plotter: &mut Plotter, surface: &mut Recorder, event: Event) {
        ok(plotter.handle(event, surface)).unwrap();
    }

    #[test]
    fn add_draws_only_the_new_function() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut plotter = Plotter::new(&Settings::default());
        let mut surface = Recorder::default();
        submit(&mut plotter, &mut surface, "x").unwrap();
        submit(&mut plotter, &mut surface, "x^2").unwrap();
        assert_eq!(surface.clears(), 0);
        assert_eq!(surface.strokes_in(PALETTE[0]), 1);
        assert_eq!(surface.strokes_in(PALETTE[1]), 1);
    }

    #[test]
    fn rejected_input_draws_nothing() {
        let mut plotter = Plotter::new(&Settings::default());
        let mut surface = Recorder::default();
        assert!(submit(&mut plotter, &mut surface, "(x").is_err());
        assert!(surface.calls.is_empty());
        assert!(plotter.registry().is_empty());
    }

    #[test]
    fn hiding_redraws_without_the_function() {
        let mut plotter = Plotter::new(&Settings::default());
        let mut surface = Recorder::default();
        submit(&mut plotter, &mut surface, "x").unwrap();
        submit(&mut plotter, &mut surface, "sin(x)").unwrap();
        let key = plotter.legend()[0].key.clone();

        surface.calls.clear();
        send(
            &mut plotter,
            &mut surface,
            Event::VisibilityToggle { key, visible: false },
        );
        assert_eq!(surface.calls[0], Call::Clear);
        assert_eq!(surface.strokes_in(PALETTE[0]), 0);
        assert_eq!(surface.strokes_in(PALETTE[1]), 1);
        assert_eq!(surface.strokes_in(grid::AXIS_COLOR), 1);
        assert!(!plotter.legend()[0].visible);
    }

    #[test]
    fn drag_redraws_once_per_frame() {
        let mut plotter = Plotter::new(&Settings::default());
        let mut surface = Recorder::default();
        send(&mut plotter, &mut surface, Event::PointerDown(Point::new(10.0, 10.0)));
        for i in 0..5 {
            let p = Point::new(10.0 + Number::from(i), 10.0);
            send(&mut plotter, &mut surface, Event::PointerMove(p));
        }
        assert!(surface.calls.is_empty());
        assert!(plotter.redraw_pending());
        assert_eq!(plotter.viewport().preview(), Point::new(4.0, 0.0));

        assert!(ok(plotter.frame(&mut surface)));
        assert!(!ok(plotter.frame(&mut surface)));
        assert_eq!(surface.clears(), 1);

        send(&mut plotter, &mut surface, Event::PointerUp);
        assert!(!plotter.is_dragging());
        assert_eq!(plotter.viewport().offset(), Point::new(4.0, 0.0));
        assert_eq!(plotter.viewport().preview(), Point::ZERO);
    }

    #[test]
    fn move_without_press_does_nothing() {
        let mut plotter = Plotter::new(&Settings::default());
        let mut surface = Recorder::default();
        send(&mut plotter, &mut surface, Event::PointerMove(Point::new(50.0, 50.0)));
        send(&mut plotter, &mut surface, Event::PointerUp);
        assert!(!plotter.redraw_pending());
        assert_eq!(plotter.viewport().offset(), Point::ZERO);
    }

    #[test]
    fn detail_change_applies_to_new_functions_only() {
        let mut plotter = Plotter::new(&Settings::default());
        let mut surface = Recorder::default();
        submit(&mut plotter, &mut surface, "x").unwrap();
        let four = Detail::new(4).unwrap();
        send(&mut plotter, &mut surface, Event::DetailChange(four));
        submit(&mut plotter, &mut surface, "x").unwrap();
        let details: Vec<u16> = plotter.registry().iter().map(|f| f.detail().get()).collect();
        assert_eq!(details, [1, 4]);
    }

    #[test]
    fn clear_all_leaves_axes() {
        let mut plotter = Plotter::new(&Settings::default());
        let mut surface = Recorder::default();
        submit(&mut plotter, &mut surface, "x").unwrap();
        surface.calls.clear();
        send(&mut plotter, &mut surface, Event::ClearAll);
        assert!(plotter.registry().is_empty());
        assert_eq!(surface.clears(), 1);
        assert_eq!(surface.strokes_in(grid::AXIS_COLOR), 1);
        assert_eq!(surface.strokes_in(PALETTE[0]), 0);
        assert_eq!(plotter.registry().next_color(), PALETTE[0]);
    }

    #[test]
    fn line_width_redraws_with_wider_strokes() {
        let mut plotter = Plotter::new(&Settings::default());
        let mut surface = Recorder::default();
        submit(&mut plotter, &mut surface, "x").unwrap();
        surface.calls.clear();
        send(&mut plotter, &mut surface, Event::LineWidthChange(2.0));
        assert!(surface.calls.contains(&Call::Width(6.0)));
        send(&mut plotter, &mut surface, Event::GridSpacingChange(0.0));
        assert_eq!(plotter.viewport().gridline_spacing(), 1.0);
    }
}
