//! Split the puzzle database into per-preset pools
//!
//! Matching rows are copied through byte-for-byte (same header, same
//! columns), so a pool file is itself a valid database export.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::error::PuzzleError;
use super::puzzle::{Puzzle, PuzzleFilter};

/// Presets in the order pools are written
pub const PRESET_NAMES: [&str; 4] = ["opening", "middlegame", "endgame", "opening_tag"];

const PROGRESS_EVERY: usize = 1000;

/// Outcome of one filtering run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterReport {
    /// Data rows read
    pub rows: usize,
    /// Rows that could not be read as puzzles
    pub skipped: usize,
    /// Matches per filter, in filter order
    pub matches: Vec<(String, usize)>,
}

impl FilterReport {
    pub fn matches_for(&self, name: &str) -> Option<usize> {
        self.matches
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, count)| *count)
    }
}

/// Resolve preset names, all presets when `names` is empty
pub fn presets(names: &[String]) -> Result<Vec<(String, PuzzleFilter)>, PuzzleError> {
    if names.is_empty() {
        return Ok(PRESET_NAMES
            .iter()
            .filter_map(|name| PuzzleFilter::preset(name).map(|f| (name.to_string(), f)))
            .collect());
    }

    names
        .iter()
        .map(|name| {
            PuzzleFilter::preset(name)
                .map(|f| (name.clone(), f))
                .ok_or_else(|| PuzzleError::UnknownPreset(name.clone()))
        })
        .collect()
}

/// Stream `input` once, copying each row to the output of every filter it matches
///
/// `outputs` pairs up with `filters` by index. Every output gets the input
/// header, even when nothing matches.
pub fn filter_puzzles<R, W>(
    input: R,
    filters: &[(String, PuzzleFilter)],
    outputs: Vec<W>,
) -> Result<FilterReport, PuzzleError>
where
    R: Read,
    W: Write,
{
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers()?.clone();

    let mut writers = outputs
        .into_iter()
        .map(csv::Writer::from_writer)
        .collect::<Vec<_>>();
    for writer in &mut writers {
        writer.write_record(&headers)?;
    }

    let mut report = FilterReport {
        matches: filters.iter().map(|(name, _)| (name.clone(), 0)).collect(),
        ..Default::default()
    };

    for (index, result) in reader.records().enumerate() {
        if index % PROGRESS_EVERY == 0 {
            debug!(rows = index, "filtering");
        }
        report.rows += 1;

        let row = result?;
        let puzzle: Puzzle = match row.deserialize(Some(&headers)) {
            Ok(puzzle) => puzzle,
            Err(e) => {
                warn!(row = index + 1, error = %e, "skipping unreadable puzzle");
                report.skipped += 1;
                continue;
            }
        };

        for ((filter_index, (_, filter)), writer) in
            filters.iter().enumerate().zip(writers.iter_mut())
        {
            if puzzle.matches(filter) {
                writer.write_record(&row)?;
                report.matches[filter_index].1 += 1;
            }
        }
    }

    for writer in &mut writers {
        writer.flush().map_err(csv::Error::from)?;
    }

    info!(rows = report.rows, skipped = report.skipped, "filtering done");
    Ok(report)
}

/// Filter a database file into `<out_dir>/<preset>.csv` pools
pub fn filter_file(
    input: &Path,
    out_dir: &Path,
    filters: &[(String, PuzzleFilter)],
) -> Result<(FilterReport, Vec<PathBuf>), PuzzleError> {
    let file = File::open(input).map_err(|source| PuzzleError::Io {
        path: input.display().to_string(),
        source,
    })?;

    fs::create_dir_all(out_dir).map_err(|source| PuzzleError::Io {
        path: out_dir.display().to_string(),
        source,
    })?;

    let paths = filters
        .iter()
        .map(|(name, _)| out_dir.join(format!("{}.csv", name)))
        .collect::<Vec<_>>();
    let outputs = paths
        .iter()
        .map(|path| {
            File::create(path).map_err(|source| PuzzleError::Io {
                path: path.display().to_string(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let report = filter_puzzles(file, filters, outputs)?;
    Ok((report, paths))
}
