// SPDX: CC0-1.0

use crate::{app::LegendEntry, lex::SubStr, registry::PlottedFunction};
use anyhow::Context;
use core::fmt;
use std::{
    io::{self, stdin, BufRead, Write},
    sync::Arc,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Plot,
    List,
    Toggle,
    Clear,
    Pan,
    Zoom,
    Reset,
    Detail,
    Grid,
    Width,
    View,
    Tree,
    Export,
}

impl Command {
    pub const fn exhaustive() -> &'static [Command] {
        &[
            Self::Help,
            Self::Quit,
            Self::Plot,
            Self::List,
            Self::Toggle,
            Self::Clear,
            Self::Pan,
            Self::Zoom,
            Self::Reset,
            Self::Detail,
            Self::Grid,
            Self::Width,
            Self::View,
            Self::Tree,
            Self::Export,
        ]
    }

    pub const fn help(&self) -> &'static str {
        match self {
            Self::Help => "display help for each command",
            Self::Quit => "quit the shell",
            Self::Plot => "add a function of x to the canvas",
            Self::List => "list plotted functions with their colors",
            Self::Toggle => "show or hide a plotted function",
            Self::Clear => "remove every function",
            Self::Pan => "drag the canvas by a number of pixels",
            Self::Zoom => "scroll the wheel over a point of the canvas",
            Self::Reset => "reset pan and zoom",
            Self::Detail => "set samples per pixel for functions added from now on",
            Self::Grid => "set gridline spacing",
            Self::Width => "set line width",
            Self::View => "print viewport parameters",
            Self::Tree => "print the expression tree of a function (for debugging)",
            Self::Export => "write the canvas to an svg file",
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Quit => "quit",
            Self::Plot => "plot",
            Self::List => "list",
            Self::Toggle => "toggle",
            Self::Clear => "clear",
            Self::Pan => "pan",
            Self::Zoom => "zoom",
            Self::Reset => "reset",
            Self::Detail => "detail",
            Self::Grid => "grid",
            Self::Width => "width",
            Self::View => "view",
            Self::Tree => "tree",
            Self::Export => "export",
        }
    }
}

impl core::str::FromStr for Command {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for c in Self::exhaustive() {
            if s == c.name() {
                return Ok(*c);
            }
        }
        Err(())
    }
}

/// Prompts and reads one trimmed line. `None` means standard input is
/// exhausted.
pub fn input<W: Write>(out: W, prompt: impl fmt::Display) -> anyhow::Result<Option<String>> {
    let line = read_line(stdin().lock(), out, prompt).context("read from standard input failed")?;
    Ok(line)
}

fn read_line<R: BufRead, W: Write>(
    mut src: R,
    mut out: W,
    prompt: impl fmt::Display,
) -> io::Result<Option<String>> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut s = String::new();
    if src.read_line(&mut s)? == 0 {
        return Ok(None);
    }
    Ok(Some(s.trim().to_string()))
}

/// Reads a value, printing any parse error under the input. Blank input
/// gives `Ok(None)` when `ignore_empty` is set, as does end of input.
pub fn read_fromstr<W: Write, T: core::str::FromStr>(
    mut out: W,
    prompt: impl fmt::Display,
    ignore_empty: bool,
) -> anyhow::Result<Result<Option<T>, <T as core::str::FromStr>::Err>>
where
    <T as core::str::FromStr>::Err: fmt::Display,
{
    let Some(input) = input(&mut out, prompt)? else {
        return Ok(Ok(None));
    };
    let input = Arc::new(input);
    if ignore_empty && input.is_empty() {
        return Ok(Ok(None));
    }
    match input.parse::<T>() {
        Ok(new) => Ok(Ok(Some(new))),
        Err(err) => {
            writeln!(out)?;
            underline(&mut out, &SubStr::all(input))?;
            writeln!(out, "parse error: {err}")?;
            Ok(Err(err))
        }
    }
}

pub fn underline<W: Write>(mut out: W, span: &SubStr) -> io::Result<()> {
    writeln!(out, "{}", span.src())?;
    let src = span.src();
    // columns count chars, not bytes
    let col = src[..span.start()].chars().count();
    let width = span.get().chars().count().max(1);
    writeln!(out, "{}{}", " ".repeat(col), "^".repeat(width))?;
    Ok(())
}

pub fn list_functions<W: Write>(mut out: W, legend: &[LegendEntry]) -> io::Result<()> {
    if legend.is_empty() {
        writeln!(out, "  (no functions)")?;
    }
    for (idx, entry) in legend.iter().enumerate() {
        writeln!(
            out,
            "  [{idx}] {text}   color: {color}   visible: {visible}",
            text = entry.key.text,
            color = entry.key.color,
            visible = if entry.visible { "yes" } else { "no" },
        )?;
    }
    Ok(())
}

pub fn dump_tree<W: Write>(mut out: W, func: &PlottedFunction) -> io::Result<()> {
    writeln!(out, "input: {}", func.raw())?;
    writeln!(out, "canonical: {}", func.canonical())?;
    writeln!(out, "tree: ")?;
    for line in func.evaluator().expr().to_string().lines() {
        writeln!(out, "  {line}")?;
    }
    Ok(())
}

pub fn no_such_function<W: Write>(mut out: W, idx: usize) -> io::Result<()> {
    writeln!(out, "error: there is no function [{idx}], see \"list\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Detail, Registry};

    #[test]
    fn every_command_parses_from_its_name() {
        for c in Command::exhaustive() {
            assert_eq!(c.name().parse::<Command>(), Ok(*c));
        }
        assert!("plo".parse::<Command>().is_err());
    }

    #[test]
    fn end_of_input_is_not_an_empty_line() {
        let mut prompt = Vec::new();
        assert_eq!(read_line(&b""[..], &mut prompt, "> ").unwrap(), None);
        assert_eq!(prompt, b"> ");
        assert_eq!(
            read_line(&b"\n"[..], io::sink(), "> ").unwrap(),
            Some(String::new())
        );
        assert_eq!(
            read_line(&b"  plot \nquit\n"[..], io::sink(), "> ").unwrap(),
            Some("plot".to_string())
        );
    }

    #[test]
    fn underline_marks_span() {
        let src = Arc::new(String::from("2 + $"));
        let mut buf = Vec::new();
        underline(&mut buf, &SubStr::new(src, 4, 1)).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "2 + $\n    ^\n");
    }

    #[test]
    fn zero_width_span_still_points() {
        let src = Arc::new(String::from("2+"));
        let mut buf = Vec::new();
        underline(&mut buf, &SubStr::end_of(src)).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "2+\n  ^\n");
    }

    #[test]
    fn tree_dump_shows_canonical_form() {
        let mut reg = Registry::new();
        let func = reg.add("2x", Detail::MIN).unwrap();
        let mut buf = Vec::new();
        dump_tree(&mut buf, func).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("canonical: 2*x"));
        assert!(text.contains("  op '*'\n    num 2\n    var x\n"));
    }
}
