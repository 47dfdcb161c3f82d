//! Line-oriented command language for `nearstars session`.
//!
//! One command per line; blank lines and lines starting with `#` are ignored.
//! Commands taking two star names separate them with ` to `, e.g.
//! `measure Sun to Sirius A`.

use std::io::{BufRead, Write};

use anyhow::{anyhow, bail, Context, Result};

use nearstars_lib::measure::format_distance;
use nearstars_lib::{Command, DisplayToggle, Outcome, Session, ViewDelta};

use crate::output::{render_route, OutputFormat};
use crate::terminal::ColorPalette;

/// Reference printed by the `help` command.
pub const HELP: &str = "\
select NAME | deselect NAME | clear | highlight NAME
pick X Y [center]
pan DX DY | rotate X Y Z (degrees) | zoom in|out|FACTOR
center NAME | center-focus | reset-view | toggle names|grid|projections|plane|inset
render DELTA | save | restore INDEX
measure A to B | measure-focus NAME | measure-center | clear-measurements
hop NAME | unhop INDEX | reset-route
plan A to B | plan-center | clear-plans
route | plans | selection | view | help | quit";

/// A parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptLine {
    Command(Command),
    ShowRoute,
    ShowPlans,
    ShowSelection,
    ShowView,
    Help,
    Quit,
}

/// Parse one line. Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<ScriptLine>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (keyword, rest) = line
        .split_once(char::is_whitespace)
        .map(|(keyword, rest)| (keyword, rest.trim()))
        .unwrap_or((line, ""));

    let parsed = match keyword.to_ascii_lowercase().as_str() {
        "select" => ScriptLine::Command(Command::Select(name(rest)?)),
        "deselect" => ScriptLine::Command(Command::Deselect(name(rest)?)),
        "clear" | "clear-selection" => ScriptLine::Command(Command::ClearSelection),
        "highlight" => ScriptLine::Command(Command::ToggleHighlight(name(rest)?)),
        "pick" => {
            let args: Vec<&str> = rest.split_whitespace().collect();
            let center = match args.get(2).copied() {
                None => false,
                Some("center") => true,
                Some(other) => bail!("unexpected pick argument '{other}'"),
            };
            let [x, y] = numbers::<2>(args.get(..2).unwrap_or(&args))?;
            ScriptLine::Command(Command::Pick { x, y, center })
        }
        "pan" => {
            let [dx, dy] = numbers::<2>(&words(rest))?;
            ScriptLine::Command(Command::UpdateView(ViewDelta::pan(dx, dy)))
        }
        "rotate" => {
            let [x, y, z] = numbers::<3>(&words(rest))?;
            ScriptLine::Command(Command::UpdateView(ViewDelta::rotate(
                x.to_radians(),
                y.to_radians(),
                z.to_radians(),
            )))
        }
        "zoom" => {
            let delta = match rest {
                "in" => ViewDelta::zoom_in(),
                "out" => ViewDelta::zoom_out(),
                factor => ViewDelta::zoom(number(factor)?),
            };
            ScriptLine::Command(Command::UpdateView(delta))
        }
        "center" => ScriptLine::Command(Command::CenterOn(name(rest)?)),
        "center-focus" => ScriptLine::Command(Command::CenterOnFocus),
        "reset-view" => ScriptLine::Command(Command::ResetView),
        "toggle" => {
            let toggle: DisplayToggle = rest.parse().map_err(|err: String| anyhow!(err))?;
            ScriptLine::Command(Command::Toggle(toggle))
        }
        "render" => ScriptLine::Command(Command::AdjustRenderDistance(number(rest)?)),
        "save" => ScriptLine::Command(Command::SaveView),
        "restore" => ScriptLine::Command(Command::RestoreView(index(rest)?)),
        "measure" => {
            let (from, to) = pair(rest)?;
            ScriptLine::Command(Command::Measure { from, to })
        }
        "measure-focus" => ScriptLine::Command(Command::MeasureFocus(name(rest)?)),
        "measure-center" => ScriptLine::Command(Command::MeasureFromCenter),
        "clear-measurements" => ScriptLine::Command(Command::ClearMeasurements),
        "hop" => ScriptLine::Command(Command::AppendHop(name(rest)?)),
        "unhop" => ScriptLine::Command(Command::RemoveHop(index(rest)?)),
        "reset-route" => ScriptLine::Command(Command::ResetRoute),
        "plan" => {
            let (from, to) = pair(rest)?;
            ScriptLine::Command(Command::PlanRoute { from, to })
        }
        "plan-center" => ScriptLine::Command(Command::PlanFromCenter),
        "clear-plans" => ScriptLine::Command(Command::ClearPlannedRoutes),
        "route" => ScriptLine::ShowRoute,
        "plans" => ScriptLine::ShowPlans,
        "selection" => ScriptLine::ShowSelection,
        "view" => ScriptLine::ShowView,
        "help" => ScriptLine::Help,
        "quit" | "exit" => ScriptLine::Quit,
        other => bail!("unknown command '{other}'; try 'help'"),
    };
    Ok(Some(parsed))
}

/// Counts reported after a script finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptStats {
    pub executed: usize,
    pub failed: usize,
}

/// Feed every line of `input` to `session`.
///
/// Results go to `out`; parse errors and failed commands go to `err` and the
/// script carries on with the next line.
pub fn run_script<R, W, E>(
    session: &mut Session,
    input: R,
    out: &mut W,
    err: &mut E,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<ScriptStats>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut stats = ScriptStats::default();
    for (offset, line) in input.lines().enumerate() {
        let line = line.context("failed to read session input")?;
        let line_number = offset + 1;
        let parsed = match parse_line(&line) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => continue,
            Err(error) => {
                stats.failed += 1;
                report(err, palette, line_number, &error)?;
                continue;
            }
        };

        stats.executed += 1;
        let result: Result<()> = match parsed {
            ScriptLine::Quit => break,
            ScriptLine::Help => writeln!(out, "{HELP}").map_err(Into::into),
            ScriptLine::ShowView => {
                writeln!(out, "{}", Outcome::View(session.view().current())).map_err(Into::into)
            }
            ScriptLine::ShowPlans => show_plans(session, out, format, palette),
            ScriptLine::ShowSelection => show_selection(session, out),
            ScriptLine::ShowRoute => session
                .route_summary()
                .map_err(Into::into)
                .and_then(|summary| render_route(&summary, format, palette))
                .and_then(|text| write!(out, "{text}").map_err(Into::into)),
            ScriptLine::Command(command) => session
                .apply(command)
                .map_err(Into::into)
                .and_then(|outcome| writeln!(out, "{outcome}").map_err(Into::into)),
        };
        if let Err(error) = result {
            stats.failed += 1;
            report(err, palette, line_number, &error)?;
        }
    }
    Ok(stats)
}

fn show_selection<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    let selection = session.selection();
    if selection.is_empty() {
        writeln!(out, "nothing selected")?;
        return Ok(());
    }
    let focus = selection.focus().unwrap_or("-");
    writeln!(out, "selected: {} (focus: {focus})", selection.sorted().join(", "))?;
    for line in session.selection_distances()? {
        writeln!(
            out,
            "  {} - {}: {}",
            line.from,
            line.to,
            format_distance(line.distance)
        )?;
    }
    Ok(())
}

fn show_plans<W: Write>(
    session: &Session,
    out: &mut W,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<()> {
    let summaries = session.planned_summaries()?;
    if summaries.is_empty() {
        writeln!(out, "no planned routes")?;
        return Ok(());
    }
    for summary in &summaries {
        write!(out, "{}", render_route(summary, format, palette)?)?;
    }
    Ok(())
}

fn report<E: Write>(
    err: &mut E,
    palette: &ColorPalette,
    line_number: usize,
    error: &anyhow::Error,
) -> Result<()> {
    writeln!(
        err,
        "{}error{} (line {line_number}): {error:#}",
        palette.red, palette.reset
    )?;
    Ok(())
}

fn name(rest: &str) -> Result<String> {
    if rest.is_empty() {
        bail!("expected a star name");
    }
    Ok(rest.to_string())
}

fn pair(rest: &str) -> Result<(String, String)> {
    let (from, to) = rest
        .split_once(" to ")
        .ok_or_else(|| anyhow!("expected 'A to B', got '{rest}'"))?;
    Ok((name(from.trim())?, name(to.trim())?))
}

fn words(rest: &str) -> Vec<&str> {
    rest.split_whitespace().collect()
}

fn number(raw: &str) -> Result<f64> {
    let value = raw
        .parse::<f64>()
        .with_context(|| format!("expected a number, got '{raw}'"))?;
    if !value.is_finite() {
        bail!("expected a finite number, got '{raw}'");
    }
    Ok(value)
}

fn numbers<const N: usize>(raw: &[&str]) -> Result<[f64; N]> {
    if raw.len() != N {
        bail!("expected {N} numbers, got {}", raw.len());
    }
    let mut values = [0.0; N];
    for (value, raw) in values.iter_mut().zip(raw) {
        *value = number(raw)?;
    }
    Ok(values)
}

fn index(raw: &str) -> Result<usize> {
    raw.parse::<usize>()
        .with_context(|| format!("expected an index, got '{raw}'"))
}
