// SPDX: CC0-1.0

use crate::{
    eval::Evaluator,
    parse::{self, CompileErr},
    sanitize::{self, Canonical, SanitizeErr},
};
use core::{fmt, num::NonZeroU16};
use log::{debug, info, warn};

/// Samples per horizontal pixel.
pub type Detail = NonZeroU16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub &'static str);

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

pub const PALETTE: [Color; 7] = [
    Color("red"),
    Color("orange"),
    Color("gold"),
    Color("green"),
    Color("blue"),
    Color("indigo"),
    Color("violet"),
];

#[derive(Debug)]
pub enum AddErr {
    Sanitize(SanitizeErr),
    Compile(CompileErr),
}

impl From<SanitizeErr> for AddErr {
    fn from(err: SanitizeErr) -> Self {
        Self::Sanitize(err)
    }
}

impl From<CompileErr> for AddErr {
    fn from(err: CompileErr) -> Self {
        Self::Compile(err)
    }
}

impl fmt::Display for AddErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sanitize(err) => write!(f, "invalid function: {err}"),
            Self::Compile(err) => write!(f, "compile error: {err}"),
        }
    }
}

impl std::error::Error for AddErr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sanitize(err) => Some(err),
            Self::Compile(err) => Some(err),
        }
    }
}

/// Legend identity of a plotted function.
///
/// Text and color together are not unique: once the palette wraps, adding
/// the same text again reuses a key that is already taken.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionKey {
    pub text: String,
    pub color: Color,
}

impl fmt::Display for FunctionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.text, self.color)
    }
}

#[derive(Clone, Debug)]
pub struct PlottedFunction {
    raw: String,
    canonical: Canonical,
    evaluator: Evaluator,
    color: Color,
    detail: Detail,
    visible: bool,
}

impl PlottedFunction {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn canonical(&self) -> &Canonical {
        &self.canonical
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub const fn color(&self) -> Color {
        self.color
    }

    pub const fn detail(&self) -> Detail {
        self.detail
    }

    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn key(&self) -> FunctionKey {
        FunctionKey {
            text: self.raw.clone(),
            color: self.color,
        }
    }
}

/// Plotted functions in insertion order, which is also drawing order.
#[derive(Clone, Debug)]
pub struct Registry {
    funcs: Vec<PlottedFunction>,
    palette: &'static [Color],
    cursor: usize,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::with_palette(&PALETTE)
    }

    /// # Panics
    ///
    /// Panics if `palette` is empty.
    pub fn with_palette(palette: &'static [Color]) -> Self {
        assert!(!palette.is_empty(), "palette must have at least one color");
        Self {
            funcs: Vec::new(),
            palette,
            cursor: 0,
        }
    }

    pub fn palette(&self) -> &'static [Color] {
        self.palette
    }

    /// Color the next successful add will receive.
    pub fn next_color(&self) -> Color {
        self.palette[self.cursor % self.palette.len()]
    }

    /// Validates and compiles `raw`. Nothing changes on failure.
    pub fn add(&mut self, raw: &str, detail: Detail) -> Result<&PlottedFunction, AddErr> {
        let canonical = sanitize::validate(raw).map_err(|err| {
            info!("rejected {raw:?}: {err}");
            err
        })?;
        let evaluator = parse::compile(&canonical).map_err(|err| {
            info!("rejected {raw:?}: {err}");
            err
        })?;

        let color = self.next_color();
        self.cursor = (self.cursor + 1) % self.palette.len();
        debug!("{raw:?} compiled to {canonical}, color {color}, detail {detail}");

        self.funcs.push(PlottedFunction {
            raw: raw.to_string(),
            canonical,
            evaluator,
            color,
            detail,
            visible: true,
        });
        Ok(&self.funcs[self.funcs.len() - 1])
    }

    pub fn clear(&mut self) {
        info!("clearing {} function(s)", self.funcs.len());
        self.funcs.clear();
        self.cursor = 0;
    }

    /// Updates every function matching `key`, returning how many matched.
    pub fn set_visibility(&mut self, key: &FunctionKey, visible: bool) -> usize {
        let mut matched = 0;
        for func in self.funcs.iter_mut().filter(|func| func.key() == *key) {
            func.visible = visible;
            matched += 1;
        }
        match matched {
            0 => warn!("no function with key '{key}'"),
            1 => {}
            n => warn!("key '{key}' is shared by {n} functions, all of them updated"),
        }
        matched
    }

    pub fn get(&self, idx: usize) -> Option<&PlottedFunction> {
        self.funcs.get(idx)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, PlottedFunction> {
        self.funcs.iter()
    }

    pub fn visible(&self) -> impl Iterator<Item = &PlottedFunction> {
        self.funcs.iter().filter(|func| func.visible)
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::{ParenMismatch, SanitizeErrTyp};

    fn detail(n: u16) -> Detail {
        Detail::new(n).unwrap()
    }

    #[test]
    fn colors_follow_palette_and_wrap() {
        let mut reg = Registry::new();
        for k in 0..(PALETTE.len() * 2 + 3) {
            let color = reg.add("sin(x)", detail(1)).unwrap().color();
            assert_eq!(color, PALETTE[k % PALETTE.len()]);
        }
    }

    #[test]
    fn same_text_gets_successive_colors() {
        let mut reg = Registry::new();
        assert_eq!(reg.add("sin(x)", detail(1)).unwrap().color(), PALETTE[0]);
        assert_eq!(reg.add("sin(x)", detail(1)).unwrap().color(), PALETTE[1]);
    }

    #[test]
    fn failed_add_changes_nothing() {
        let mut reg = Registry::new();
        reg.add("x", detail(1)).unwrap();

        let err = reg.add("(2+3", detail(1)).unwrap_err();
        assert!(matches!(
            err,
            AddErr::Sanitize(SanitizeErr {
                typ: SanitizeErrTyp::UnbalancedParens(ParenMismatch::UnmatchedOpening),
                ..
            })
        ));
        assert!(matches!(reg.add("2+", detail(1)), Err(AddErr::Compile(_))));
        assert!(matches!(reg.add("y", detail(1)), Err(AddErr::Sanitize(_))));

        assert_eq!(reg.len(), 1);
        assert_eq!(reg.next_color(), PALETTE[1]);
    }

    #[test]
    fn clear_resets_color_cursor() {
        let mut reg = Registry::new();
        reg.add("x", detail(1)).unwrap();
        reg.add("x^2", detail(1)).unwrap();
        reg.clear();
        assert!(reg.is_empty());
        assert_eq!(reg.add("x^3", detail(1)).unwrap().color(), PALETTE[0]);
    }

    #[test]
    fn detail_is_frozen_per_function() {
        let mut reg = Registry::new();
        reg.add("x", detail(1)).unwrap();
        reg.add("x", detail(4)).unwrap();
        let details: Vec<u16> = reg.iter().map(|f| f.detail().get()).collect();
        assert_eq!(details, [1, 4]);
    }

    #[test]
    fn visibility_by_key() {
        let mut reg = Registry::new();
        reg.add("x", detail(1)).unwrap();
        reg.add("1/x", detail(1)).unwrap();
        let key = reg.get(1).unwrap().key();
        assert_eq!(key.to_string(), "1/xorange");

        assert_eq!(reg.set_visibility(&key, false), 1);
        let visible: Vec<&str> = reg.visible().map(|f| f.raw()).collect();
        assert_eq!(visible, ["x"]);

        let missing = FunctionKey {
            text: "x".into(),
            color: PALETTE[3],
        };
        assert_eq!(reg.set_visibility(&missing, false), 0);
    }

    #[test]
    fn wrapped_palette_collides_keys() {
        static TWO: [Color; 2] = [Color("red"), Color("blue")];
        let mut reg = Registry::with_palette(&TWO);
        for _ in 0..3 {
            reg.add("x", detail(1)).unwrap();
        }
        let key = reg.get(0).unwrap().key();
        assert_eq!(reg.set_visibility(&key, false), 2);
        assert!(!reg.get(2).unwrap().is_visible());
        assert!(reg.get(1).unwrap().is_visible());
    }
}
