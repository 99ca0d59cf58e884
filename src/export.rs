//! Trail export: one `x, y` line per pellet, in the order they were laid.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::simulation::config::is_plain_name;
use crate::simulation::grid::Cell;

/// Writes `cells` as `x, y` lines.
///
/// # Errors
/// Propagates any write error from `writer`.
pub fn write_trail<'a, W, I>(writer: &mut W, cells: I) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a Cell>,
{
    let mut count = 0;
    for cell in cells {
        writeln!(writer, "{}, {}", cell.x, cell.y)?;
        count += 1;
    }
    Ok(count)
}

/// Renders `cells` into a string of `x, y` lines.
#[must_use]
pub fn format_trail<'a, I>(cells: I) -> String
where
    I: IntoIterator<Item = &'a Cell>,
{
    cells
        .into_iter()
        .map(|cell| format!("{}, {}\n", cell.x, cell.y))
        .collect()
}

/// Output path for a trail called `name` inside `dir`.
///
/// # Errors
/// Returns `InvalidInput` if `name` would resolve outside `dir`.
pub fn trail_path(dir: &Path, name: &str) -> io::Result<PathBuf> {
    if !is_plain_name(name) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("trail name {name:?} must be a plain file name"),
        ));
    }
    Ok(dir.join(format!("{name}.txt")))
}

/// Saves a trail to `<dir>/<name>.txt`, creating `dir` if needed.
///
/// Returns the written path and the number of lines.
///
/// # Errors
/// Fails if `name` is not a plain file name, or if the directory cannot be
/// created or the file cannot be written.
pub fn save_trail<'a, I>(dir: &Path, name: &str, cells: I) -> io::Result<(PathBuf, usize)>
where
    I: IntoIterator<Item = &'a Cell>,
{
    let path = trail_path(dir, name)?;
    std::fs::create_dir_all(dir)?;
    let mut writer = BufWriter::new(File::create(&path)?);
    let count = write_trail(&mut writer, cells)?;
    writer.flush()?;
    Ok((path, count))
}

/// Parses `x, y` lines back into cells. Blank lines are skipped; a
/// parenthesised `(x, y)` form is accepted as well.
///
/// # Errors
/// Returns `InvalidData` naming the first malformed line.
pub fn parse_trail(text: &str) -> io::Result<Vec<Cell>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            parse_line(line).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("line {}: expected `x, y`, got {line:?}", idx + 1),
                )
            })
        })
        .collect()
}

fn parse_line(line: &str) -> Option<Cell> {
    let inner = line
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')');
    let (x, y) = inner.split_once(',')?;
    Some(Cell::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}
