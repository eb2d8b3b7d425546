// SPDX: CC0-1.0

//! Validation of raw user text and its rewrite into canonical form.
//!
//! Validation runs in a fixed order: every character must belong to the
//! whitelist (digits, `.`, `+ - * / ^ ( )`, whitespace, `x` and the
//! vocabulary words), then parentheses must balance, then the token stream
//! is rewritten with explicit multiplication so the compiler never has to
//! guess what juxtaposition means.

use crate::{
    eval::OperatorTyp,
    lex::{LexErr, LexErrTyp, Lexer, SubStr, Tok, TokTyp},
    stdlib::Word,
};
use core::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParenMismatch {
    UnmatchedOpening,
    UnmatchedClosing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SanitizeErrTyp {
    InvalidCharacter(LexErrTyp),
    UnbalancedParens(ParenMismatch),
}

impl fmt::Display for SanitizeErrTyp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCharacter(typ) => write!(f, "{typ}"),
            Self::UnbalancedParens(ParenMismatch::UnmatchedOpening) => {
                write!(f, "unmatched opening parenthesis")
            }
            Self::UnbalancedParens(ParenMismatch::UnmatchedClosing) => {
                write!(f, "unmatched closing parenthesis")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SanitizeErr {
    pub typ: SanitizeErrTyp,
    pub loc: SubStr,
}

impl From<LexErr> for SanitizeErr {
    fn from(err: LexErr) -> Self {
        Self {
            typ: SanitizeErrTyp::InvalidCharacter(err.typ),
            loc: err.loc,
        }
    }
}

impl fmt::Display for SanitizeErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at column {}", self.typ, self.loc.start() + 1)
    }
}

impl std::error::Error for SanitizeErr {}

/// Validated input with implicit multiplication made explicit.
#[derive(Clone, Debug)]
pub struct Canonical {
    src: Arc<String>,
    toks: Vec<Tok>,
}

impl Canonical {
    pub fn src(&self) -> Arc<String> {
        Arc::clone(&self.src)
    }

    pub fn toks(&self) -> &[Tok] {
        &self.toks
    }
}

impl fmt::Display for Canonical {
    /// Tokens that would run together (`2 3`, `sin x`, `* *`) keep a space
    /// between them.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut prev: Option<char> = None;
        for tok in &self.toks {
            let text = match tok.typ {
                TokTyp::Number => tok.loc.get(),
                TokTyp::Word(Word::Var) => Word::Var.name(),
                TokTyp::Word(Word::Func(fun)) => fun.qualified(),
                TokTyp::Word(Word::Const(c)) => c.qualified(),
                TokTyp::Op(op) => op.canonical(),
                TokTyp::OpenParen => "(",
                TokTyp::CloseParen => ")",
            };
            if let (Some(last), Some(first)) = (prev, text.chars().next()) {
                if runs_together(last, first) {
                    f.write_str(" ")?;
                }
            }
            f.write_str(text)?;
            prev = text.chars().last().or(prev);
        }
        Ok(())
    }
}

fn runs_together(last: char, first: char) -> bool {
    let word = |c: char| c.is_ascii_alphanumeric() || c == '.' || c == '_';
    (word(last) && word(first)) || (last == '*' && first == '*')
}

pub fn validate(raw: &str) -> Result<Canonical, SanitizeErr> {
    let src = Arc::new(raw.to_string());
    let toks = Lexer::new(&src).collect::<Result<Vec<Tok>, LexErr>>()?;
    check_parens(&toks)?;
    let toks = insert_multiplication(toks);
    Ok(Canonical { src, toks })
}

fn check_parens(toks: &[Tok]) -> Result<(), SanitizeErr> {
    let mut open: Vec<&Tok> = Vec::new();
    for tok in toks {
        match tok.typ {
            TokTyp::OpenParen => open.push(tok),
            TokTyp::CloseParen => {
                if open.pop().is_none() {
                    return Err(SanitizeErr {
                        typ: SanitizeErrTyp::UnbalancedParens(ParenMismatch::UnmatchedClosing),
                        loc: tok.loc.clone(),
                    });
                }
            }
            _ => {}
        }
    }
    match open.pop() {
        Some(tok) => Err(SanitizeErr {
            typ: SanitizeErrTyp::UnbalancedParens(ParenMismatch::UnmatchedOpening),
            loc: tok.loc.clone(),
        }),
        None => Ok(()),
    }
}

const fn ends_operand(typ: TokTyp) -> bool {
    matches!(
        typ,
        TokTyp::Number | TokTyp::Word(Word::Var) | TokTyp::Word(Word::Const(_)) | TokTyp::CloseParen
    )
}

const fn starts_operand(typ: TokTyp) -> bool {
    matches!(typ, TokTyp::Number | TokTyp::Word(_) | TokTyp::OpenParen)
}

/// `2x`, `x(`, `)x`, `2(`, `)2`, `)(`, `x2`, `2pi`, `2sin(` all become
/// products. Two bare numbers in a row are left alone for the compiler to
/// reject.
fn insert_multiplication(toks: Vec<Tok>) -> Vec<Tok> {
    let mut out: Vec<Tok> = Vec::with_capacity(toks.len() * 2);
    for tok in toks {
        if let Some(prev) = out.last() {
            let both_numbers = prev.typ == TokTyp::Number && tok.typ == TokTyp::Number;
            if ends_operand(prev.typ) && starts_operand(tok.typ) && !both_numbers {
                out.push(Tok {
                    typ: TokTyp::Op(OperatorTyp::Mul),
                    loc: SubStr::new(tok.loc.src(), tok.loc.start(), 0),
                });
            }
        }
        out.push(tok);
    }
    out
}
