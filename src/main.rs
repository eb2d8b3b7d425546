// SPDX: CC0-1.0

use anyhow::Context;
use chrono::{DateTime, Local};
use curve_plot::{
    app::{Event, Plotter},
    config::Settings,
    lex::{LexErrTyp, SubStr},
    parse::{self, CompileErrTyp},
    registry::{AddErr, Detail},
    sanitize::{ParenMismatch, SanitizeErrTyp},
    shell::{self, Command},
    stdlib::Word,
    surface::SvgSurface,
    Number, Point,
};
use std::{
    env,
    fs::OpenOptions,
    io::{stdout, BufWriter, Write},
    process::ExitCode,
};

fn output_svg_filename(now: DateTime<Local>) -> String {
    format!(
        "{}_output-{}.{}",
        env!("CARGO_PKG_NAME"),
        now.format("%Y-%m-%d_%H-%M-%S"),
        "svg"
    )
}

fn main() -> ExitCode {
    env_logger::init();
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("unexpected error: {err}");
            let chain = err.chain();
            if chain.len() > 1 {
                eprintln!();
                eprintln!("context:");
                for it in chain.skip(1) {
                    eprintln!("  {it}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug)]
struct State {
    plotter: Plotter,
    svg: SvgSurface,
}

fn try_main() -> anyhow::Result<()> {
    let settings = match env::args_os().nth(1) {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    let mut state = State {
        plotter: Plotter::new(&settings),
        svg: SvgSurface::new(settings.canvas()),
    };
    state
        .plotter
        .redraw(&mut state.svg)
        .context("failed to draw empty canvas")?;

    let mut stdout = BufWriter::new(stdout());
    writeln!(stdout, r#"canvas is {}, try "help" for help"#, settings.canvas())?;
    loop {
        let Some(mut try_cmd) = shell::input(&mut stdout, "> ")? else {
            writeln!(stdout)?;
            break;
        };
        try_cmd.make_ascii_lowercase();
        writeln!(stdout)?;

        if let Ok(cmd) = try_cmd.parse::<Command>() {
            match cmd {
                Command::Help => {
                    for c in Command::exhaustive() {
                        writeln!(stdout, "{name}: {help}", name = c.name(), help = c.help())?;
                    }
                }

                Command::Quit => break,

                Command::Plot => plot(&mut stdout, &mut state)?,

                Command::List => shell::list_functions(&mut stdout, &state.plotter.legend())?,

                Command::Toggle => toggle(&mut stdout, &mut state)?,

                Command::Clear => send(&mut state, Event::ClearAll)?,

                Command::Pan => pan(&mut stdout, &mut state)?,

                Command::Zoom => zoom(&mut stdout, &mut state)?,

                Command::Reset => send(&mut state, Event::ResetView)?,

                Command::Detail => {
                    writeln!(stdout, "note: detail must be a nonzero integer")?;
                    let cur = state.plotter.detail();
                    if let Ok(Some(detail)) = shell::read_fromstr::<_, Detail>(
                        &mut stdout,
                        format_args!("?detail (is {cur}) = "),
                        true,
                    )? {
                        send(&mut state, Event::DetailChange(detail))?;
                    }
                }

                Command::Grid => {
                    let cur = state.plotter.viewport().gridline_spacing();
                    if let Ok(Some(spacing)) = shell::read_fromstr::<_, Number>(
                        &mut stdout,
                        format_args!("?gridline spacing (is {cur}) = "),
                        true,
                    )? {
                        send(&mut state, Event::GridSpacingChange(spacing))?;
                    }
                }

                Command::Width => {
                    let cur = state.plotter.viewport().line_width();
                    if let Ok(Some(width)) = shell::read_fromstr::<_, Number>(
                        &mut stdout,
                        format_args!("?line width (is {cur}) = "),
                        true,
                    )? {
                        send(&mut state, Event::LineWidthChange(width))?;
                    }
                }

                Command::View => writeln!(stdout, "{:#}", state.plotter.viewport())?,

                Command::Tree => {
                    if let Some(idx) = read_index(&mut stdout, &state)? {
                        match state.plotter.registry().get(idx) {
                            Some(func) => shell::dump_tree(&mut stdout, func)?,
                            None => shell::no_such_function(&mut stdout, idx)?,
                        }
                    }
                }

                Command::Export => export(&mut stdout, &mut state)?,
            }
        } else {
            writeln!(stdout, r#"Unknown command, try "help" for help"#)?;
        }

        writeln!(stdout)?;
    }
    stdout.flush()?;
    Ok(())
}

/// Forwards an event that cannot be rejected, then flushes any redraw it
/// scheduled.
fn send(state: &mut State, event: Event) -> anyhow::Result<()> {
    state
        .plotter
        .handle(event, &mut state.svg)
        .context("failed to draw")?
        .context("event rejected")?;
    state.plotter.frame(&mut state.svg).context("failed to draw")?;
    Ok(())
}

fn read_index<W: Write>(mut out: W, state: &State) -> anyhow::Result<Option<usize>> {
    shell::list_functions(&mut out, &state.plotter.legend())?;
    if state.plotter.registry().is_empty() {
        return Ok(None);
    }
    Ok(shell::read_fromstr::<_, usize>(&mut out, "?function = ", true)?.unwrap_or(None))
}

fn toggle<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    let Some(idx) = read_index(&mut out, state)? else {
        return Ok(());
    };
    let Some(entry) = state.plotter.legend().into_iter().nth(idx) else {
        shell::no_such_function(&mut out, idx)?;
        return Ok(());
    };
    send(
        state,
        Event::VisibilityToggle {
            key: entry.key,
            visible: !entry.visible,
        },
    )
}

fn pan<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    let mut delta = Point::ZERO;
    for (name, dst) in [("dx", &mut delta.x), ("dy", &mut delta.y)] {
        match shell::read_fromstr::<_, Number>(&mut out, format_args!("?{name} (px) = "), true)? {
            Ok(Some(new)) => *dst = new,
            Ok(None) => {}
            Err(_) => return Ok(()),
        }
    }
    let start = state.plotter.viewport().canvas().center();
    send(state, Event::PointerDown(start))?;
    send(state, Event::PointerMove(Point::new(start.x + delta.x, start.y + delta.y)))?;
    send(state, Event::PointerUp)
}

fn zoom<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    writeln!(out, "note: positive steps zoom in, negative zoom out")?;
    let steps = match shell::read_fromstr::<_, i32>(&mut out, "?steps = ", false)? {
        Ok(Some(steps)) => steps,
        _ => return Ok(()),
    };
    let mut cursor = state.plotter.viewport().canvas().center();
    writeln!(out, "note: leave blank to zoom about the centre")?;
    for (name, dst) in [("cursor x", &mut cursor.x), ("cursor y", &mut cursor.y)] {
        match shell::read_fromstr::<_, Number>(
            &mut out,
            format_args!("?{name} (is {cur}) = ", cur = *dst),
            true,
        )? {
            Ok(Some(new)) => *dst = new,
            Ok(None) => {}
            Err(_) => return Ok(()),
        }
    }
    let delta_y = -Number::from(steps.signum());
    for _ in 0..steps.unsigned_abs() {
        send(state, Event::Wheel { delta_y, cursor })?;
    }
    writeln!(out, "zoom = {}", state.plotter.viewport().zoom())?;
    Ok(())
}

fn export<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    let path = output_svg_filename(Local::now());
    let mut file = BufWriter::new(
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .context("failed to open output svg file")?,
    );
    file.write_all(state.svg.document().as_bytes())
        .context("failed to write to output svg file")?;
    file.flush()?;
    writeln!(out, "wrote {path}")?;
    Ok(())
}

fn plot<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    let input = match shell::input(&mut out, "y = ")? {
        Some(input) if !input.is_empty() => input,
        _ => return Ok(()),
    };

    let res = state
        .plotter
        .handle(Event::TextSubmit(input), &mut state.svg)
        .context("failed to draw")?;
    match res {
        Ok(()) => {
            let legend = state.plotter.legend();
            if let Some(entry) = legend.last() {
                writeln!(out, "plotted {} in {}", entry.key.text, entry.key.color)?;
            }
        }
        Err(err) => report_add_err(&mut out, &err)?,
    }
    Ok(())
}

fn report_add_err<W: Write>(mut out: W, err: &AddErr) -> anyhow::Result<()> {
    writeln!(out)?;
    match err {
        AddErr::Sanitize(err) => {
            shell::underline(&mut out, &err.loc)?;
            writeln!(out, "invalid function: {}", err.typ)?;
            match err.typ {
                SanitizeErrTyp::InvalidCharacter(LexErrTyp::InvalidChar) => writeln!(
                    out,
                    "note: available symbols are digits, '.', x, whitespace and +-*/^()"
                )?,
                SanitizeErrTyp::InvalidCharacter(LexErrTyp::UnknownWord) => {
                    suggest_word(&mut out, &err.loc)?
                }
                SanitizeErrTyp::UnbalancedParens(ParenMismatch::UnmatchedOpening) => {
                    writeln!(out, "note: this parenthesis is never closed")?
                }
                SanitizeErrTyp::UnbalancedParens(ParenMismatch::UnmatchedClosing) => {
                    writeln!(out, "note: this parenthesis closes nothing")?
                }
            }
        }
        AddErr::Compile(err) => {
            shell::underline(&mut out, &err.loc)?;
            writeln!(out, "compile error: {}", err.typ)?;
            match &err.typ {
                CompileErrTyp::ExpectedCall(fun) => {
                    writeln!(out, "note: write {name}(x) rather than {name} x", name = fun.name())?
                }
                CompileErrTyp::ParseNum(_) => {
                    writeln!(out, "note: parsing as floating point number")?
                }
                CompileErrTyp::TooDeep => writeln!(
                    out,
                    "note: at most {} levels of nesting are supported",
                    parse::MAX_DEPTH
                )?,
                CompileErrTyp::Empty
                | CompileErrTyp::UnexpectedTok
                | CompileErrTyp::UnexpectedEnd => {}
            }
        }
    }
    Ok(())
}

fn suggest_word<W: Write>(mut out: W, text: &SubStr) -> anyhow::Result<()> {
    let most_similar = Word::exhaustive()
        .map(|word| {
            (
                strsim::normalized_damerau_levenshtein(
                    &text.get().to_ascii_lowercase(),
                    word.name(),
                ),
                word,
            )
        })
        .reduce(|(acc_sim, acc_word), (elem_sim, elem_word)| {
            if elem_sim > acc_sim {
                (elem_sim, elem_word)
            } else {
                (acc_sim, acc_word)
            }
        });
    if let Some((sim, word)) = most_similar {
        if sim > 0.3 {
            writeln!(out, "note: {} '{word}' has a similar name", word.kind())?;
            return Ok(());
        }
    }
    let names: Vec<&str> = Word::exhaustive().map(|w| w.name()).collect();
    writeln!(out, "note: known names are {}", names.join(", "))?;
    Ok(())
}
