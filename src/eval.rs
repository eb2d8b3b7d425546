// SPDX: CC0-1.0

use crate::{
    stdlib::{Constant, Func},
    Number,
};
use core::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperatorTyp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

impl OperatorTyp {
    pub const fn precedence(&self) -> i8 {
        match self {
            Self::Add => 2,
            Self::Sub => 2,
            Self::Mul => 3,
            Self::Div => 3,
            Self::Pow => 5,
        }
    }

    pub const fn associativity(&self) -> Associativity {
        use Associativity::{Left, Right};
        match self {
            Self::Add => Left,
            Self::Sub => Left,
            Self::Mul => Left,
            Self::Div => Left,
            Self::Pow => Right,
        }
    }

    /// Symbol as typed by the user.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
        }
    }

    /// Symbol in canonical form.
    pub const fn canonical(&self) -> &'static str {
        match self {
            Self::Pow => "**",
            _ => self.symbol(),
        }
    }

    pub fn apply(&self, l: Number, r: Number) -> Number {
        match self {
            Self::Add => l + r,
            Self::Sub => l - r,
            Self::Mul => l * r,
            Self::Div => l / r,
            Self::Pow => l.powf(r),
        }
    }
}

/// Unary minus binds tighter than `* /` but looser than `^`.
pub const NEG_PRECEDENCE: i8 = 4;

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(Number),
    Var,
    Const(Constant),
    Neg(Box<Expr>),
    Binary(OperatorTyp, Box<Expr>, Box<Expr>),
    Call(Func, Box<Expr>),
}

impl Expr {
    pub fn binary(op: OperatorTyp, l: Expr, r: Expr) -> Self {
        Self::Binary(op, Box::new(l), Box::new(r))
    }

    pub fn eval(&self, x: Number) -> Number {
        match self {
            Self::Num(val) => *val,
            Self::Var => x,
            Self::Const(c) => c.value(),
            Self::Neg(inner) => -inner.eval(x),
            Self::Binary(op, l, r) => op.apply(l.eval(x), r.eval(x)),
            Self::Call(fun, arg) => fun.apply(arg.eval(x)),
        }
    }

    fn dump(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}", "", indent = depth * 2)?;
        match self {
            Self::Num(val) => writeln!(f, "num {val}"),
            Self::Var => writeln!(f, "var x"),
            Self::Const(c) => writeln!(f, "const {}", c.name()),
            Self::Neg(inner) => {
                writeln!(f, "neg")?;
                inner.dump(f, depth + 1)
            }
            Self::Binary(op, l, r) => {
                writeln!(f, "op '{}'", op.symbol())?;
                l.dump(f, depth + 1)?;
                r.dump(f, depth + 1)
            }
            Self::Call(fun, arg) => {
                writeln!(f, "call '{}'", fun.name())?;
                arg.dump(f, depth + 1)
            }
        }
    }
}

impl fmt::Display for Expr {
    /// Prints the tree one node per line, children indented.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.dump(f, 0)
    }
}

/// A compiled expression of one variable. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Evaluator {
    expr: Arc<Expr>,
}

impl Evaluator {
    pub fn new(expr: Expr) -> Self {
        Self {
            expr: Arc::new(expr),
        }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Never fails: undefined results come back as NaN or an infinity.
    #[inline]
    pub fn eval(&self, x: Number) -> Number {
        self.expr.eval(x)
    }

    pub fn as_fn(&self) -> impl Fn(Number) -> Number + '_ {
        move |x| self.eval(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_tree() {
        // -(x^2) + sin(pi)
        let expr = Expr::binary(
            OperatorTyp::Add,
            Expr::Neg(Box::new(Expr::binary(
                OperatorTyp::Pow,
                Expr::Var,
                Expr::Num(2.0),
            ))),
            Expr::Call(Func::Sin, Box::new(Expr::Const(Constant::Pi))),
        );
        let eval = Evaluator::new(expr);
        assert!((eval.eval(3.0) + 9.0).abs() < 1e-12);
        let f = eval.as_fn();
        assert!((f(-2.0) + 4.0).abs() < 1e-12);
    }

    #[test]
    fn division_by_zero_is_not_finite() {
        let eval = Evaluator::new(Expr::binary(OperatorTyp::Div, Expr::Num(1.0), Expr::Var));
        assert_eq!(eval.eval(0.0), Number::INFINITY);
        let eval = Evaluator::new(Expr::binary(OperatorTyp::Div, Expr::Var, Expr::Var));
        assert!(eval.eval(0.0).is_nan());
    }

    #[test]
    fn dump_indents_children() {
        let expr = Expr::Call(Func::Cos, Box::new(Expr::Var));
        assert_eq!(expr.to_string(), "call 'cos'\n  var x\n");
    }
}
