// SPDX: CC0-1.0

// precedence climbing over the canonical token stream (see
// https://eli.thegreenplace.net/2012/08/02/parsing-expressions-by-precedence-climbing)

use crate::{
    eval::{Associativity, Evaluator, Expr, OperatorTyp, NEG_PRECEDENCE},
    lex::{SubStr, Tok, TokTyp},
    sanitize::Canonical,
    stdlib::{Func, Word},
    Number,
};
use core::{fmt, iter::Peekable, num::ParseFloatError, slice::Iter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompileErrTyp {
    Empty,
    UnexpectedTok,
    UnexpectedEnd,
    ExpectedCall(Func),
    ParseNum(ParseFloatError),
    TooDeep,
}

impl fmt::Display for CompileErrTyp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty expression"),
            Self::UnexpectedTok => write!(f, "unexpected token"),
            Self::UnexpectedEnd => write!(f, "expression ends unexpectedly"),
            Self::ExpectedCall(fun) => {
                write!(f, "function '{}' must be followed by '('", fun.name())
            }
            Self::ParseNum(err) => write!(f, "invalid number: {err}"),
            Self::TooDeep => write!(f, "expression nested too deeply"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileErr {
    pub typ: CompileErrTyp,
    pub loc: SubStr,
}

impl fmt::Display for CompileErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at column {}", self.typ, self.loc.start() + 1)
    }
}

impl std::error::Error for CompileErr {}

/// Deepest expression accepted, counting both parenthesis nesting and
/// tree height. Evaluating and dropping a tree recurse once per level.
pub const MAX_DEPTH: usize = 256;

pub fn compile(canon: &Canonical) -> Result<Evaluator, CompileErr> {
    parse(canon).map(Evaluator::new)
}

pub fn parse(canon: &Canonical) -> Result<Expr, CompileErr> {
    let mut parser = Parser {
        toks: canon.toks().iter().peekable(),
        end: SubStr::end_of(canon.src()),
        nesting: 0,
    };
    if parser.toks.peek().is_none() {
        return Err(CompileErr {
            typ: CompileErrTyp::Empty,
            loc: parser.end,
        });
    }
    let node = parser.expr(0)?;
    match parser.toks.next() {
        Some(tok) => Err(parser.unexpected(tok)),
        None => Ok(node.expr),
    }
}

/// A subtree together with its height.
struct Node {
    expr: Expr,
    height: usize,
}

impl Node {
    const fn leaf(expr: Expr) -> Self {
        Self { expr, height: 1 }
    }
}

struct Parser<'a> {
    toks: Peekable<Iter<'a, Tok>>,
    end: SubStr,
    nesting: usize,
}

impl<'a> Parser<'a> {
    fn expr(&mut self, min_precedence: i8) -> Result<Node, CompileErr> {
        if self.nesting >= MAX_DEPTH {
            let loc = match self.toks.peek() {
                Some(tok) => tok.loc.clone(),
                None => self.end.clone(),
            };
            return Err(CompileErr {
                typ: CompileErrTyp::TooDeep,
                loc,
            });
        }
        self.nesting += 1;
        let res = self.climb(min_precedence);
        self.nesting -= 1;
        res
    }

    fn climb(&mut self, min_precedence: i8) -> Result<Node, CompileErr> {
        let mut lhs = self.prefix()?;
        while let Some(&tok) = self.toks.peek() {
            let TokTyp::Op(op) = tok.typ else {
                break;
            };
            if op.precedence() < min_precedence {
                break;
            }
            self.toks.next();
            let next_min = match op.associativity() {
                Associativity::Left => op.precedence() + 1,
                Associativity::Right => op.precedence(),
            };
            let rhs = self.expr(next_min)?;
            let height = lhs.height.max(rhs.height) + 1;
            lhs = self.wrap(tok, height, Expr::binary(op, lhs.expr, rhs.expr))?;
        }
        Ok(lhs)
    }

    fn prefix(&mut self) -> Result<Node, CompileErr> {
        let tok = self.next()?;
        match tok.typ {
            TokTyp::Number => match tok.loc.get().parse::<Number>() {
                Ok(val) => Ok(Node::leaf(Expr::Num(val))),
                Err(err) => Err(CompileErr {
                    typ: CompileErrTyp::ParseNum(err),
                    loc: tok.loc.clone(),
                }),
            },
            TokTyp::Word(Word::Var) => Ok(Node::leaf(Expr::Var)),
            TokTyp::Word(Word::Const(c)) => Ok(Node::leaf(Expr::Const(c))),
            TokTyp::Word(Word::Func(fun)) => match self.toks.peek() {
                Some(next) if next.typ == TokTyp::OpenParen => {
                    self.toks.next();
                    let arg = self.group()?;
                    self.wrap(tok, arg.height + 1, Expr::Call(fun, Box::new(arg.expr)))
                }
                _ => Err(CompileErr {
                    typ: CompileErrTyp::ExpectedCall(fun),
                    loc: tok.loc.clone(),
                }),
            },
            TokTyp::Op(OperatorTyp::Sub) => {
                let inner = self.expr(NEG_PRECEDENCE)?;
                self.wrap(tok, inner.height + 1, Expr::Neg(Box::new(inner.expr)))
            }
            // unary plus is a no-op
            TokTyp::Op(OperatorTyp::Add) => self.expr(NEG_PRECEDENCE),
            TokTyp::OpenParen => self.group(),
            TokTyp::Op(_) | TokTyp::CloseParen => Err(self.unexpected(tok)),
        }
    }

    /// Rest of a parenthesized group, the `(` already consumed.
    fn group(&mut self) -> Result<Node, CompileErr> {
        let inner = self.expr(0)?;
        let tok = self.next()?;
        if tok.typ == TokTyp::CloseParen {
            Ok(inner)
        } else {
            Err(self.unexpected(tok))
        }
    }

    /// Rejects a new node at `tok` that would make the tree too tall.
    fn wrap(&self, tok: &Tok, height: usize, expr: Expr) -> Result<Node, CompileErr> {
        if height > MAX_DEPTH {
            Err(CompileErr {
                typ: CompileErrTyp::TooDeep,
                loc: tok.loc.clone(),
            })
        } else {
            Ok(Node { expr, height })
        }
    }

    fn next(&mut self) -> Result<&'a Tok, CompileErr> {
        self.toks.next().ok_or_else(|| CompileErr {
            typ: CompileErrTyp::UnexpectedEnd,
            loc: self.end.clone(),
        })
    }

    fn unexpected(&self, tok: &Tok) -> CompileErr {
        CompileErr {
            typ: CompileErrTyp::UnexpectedTok,
            loc: tok.loc.clone(),
        }
    }
}
