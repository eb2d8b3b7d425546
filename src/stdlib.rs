// SPDX: CC0-1.0

use crate::Number;
use core::{f64::consts, fmt, str::FromStr}; // assumes Number = f64

pub const X: &str = "x";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Log,
    Exp,
}

impl Func {
    pub const fn exhaustive() -> &'static [Func] {
        &[
            Self::Sin,
            Self::Cos,
            Self::Tan,
            Self::Sqrt,
            Self::Log,
            Self::Exp,
        ]
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Sqrt => "sqrt",
            Self::Log => "log",
            Self::Exp => "exp",
        }
    }

    pub const fn qualified(&self) -> &'static str {
        match self {
            Self::Sin => "f64::sin",
            Self::Cos => "f64::cos",
            Self::Tan => "f64::tan",
            Self::Sqrt => "f64::sqrt",
            Self::Log => "f64::ln",
            Self::Exp => "f64::exp",
        }
    }

    pub fn apply(&self, x: Number) -> Number {
        match self {
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tan => x.tan(),
            Self::Sqrt => x.sqrt(),
            // natural logarithm
            Self::Log => x.ln(),
            Self::Exp => x.exp(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub const fn exhaustive() -> &'static [Constant] {
        &[Self::Pi, Self::E]
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::E => "e",
        }
    }

    pub const fn qualified(&self) -> &'static str {
        match self {
            Self::Pi => "f64::consts::PI",
            Self::E => "f64::consts::E",
        }
    }

    pub const fn value(&self) -> Number {
        match self {
            Self::Pi => consts::PI,
            Self::E => consts::E,
        }
    }
}

/// Every alphabetic word the input may contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Word {
    Var,
    Func(Func),
    Const(Constant),
}

impl Word {
    pub fn exhaustive() -> impl Iterator<Item = Word> {
        core::iter::once(Self::Var)
            .chain(Func::exhaustive().iter().copied().map(Self::Func))
            .chain(Constant::exhaustive().iter().copied().map(Self::Const))
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Var => X,
            Self::Func(fun) => fun.name(),
            Self::Const(c) => c.name(),
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Var => "variable",
            Self::Func(_) => "function",
            Self::Const(_) => "constant",
        }
    }
}

impl FromStr for Word {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::exhaustive().find(|w| w.name() == s).ok_or(())
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
