// SPDX: CC0-1.0

pub mod app;
pub mod config;
pub mod eval;
pub mod grid;
pub mod lex;
pub mod parse;
pub mod registry;
pub mod sample;
pub mod sanitize;
pub mod shell;
pub mod stdlib;
pub mod surface;
pub mod viewport;

use core::fmt;

pub type Number = f64;

/// Pixels per math unit at zoom level 1.
pub const UNIT_SCALE: Number = 8.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    #[inline]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl Point<Number> {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl core::ops::Add for Point<Number> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Pixel dimensions of the drawing surface, supplied by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    pub width: Number,
    pub height: Number,
}

impl Canvas {
    /// Largest width or height a canvas may have, in pixels.
    pub const MAX_SIDE: Number = 16384.0;

    #[inline]
    pub const fn new(width: Number, height: Number) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point<Number> {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
