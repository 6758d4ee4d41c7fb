//! Sample puzzle pools into packs
//!
//! A pack is what the navigator steps through: `fen,analysis_url` rows, one
//! per puzzle. The same sample can also be written as PGN, one game per
//! puzzle with just a start position, for import into a study.

use rand::seq::index;
use rand::{Rng, RngExt};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, warn};

use super::error::PuzzleError;
use super::puzzle::{analysis_url, pgn_entry, Puzzle};

/// Pools a pack can be drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackKind {
    Opening,
    Middlegame,
    Endgame,
    /// All three theme pools together
    Mixed,
}

impl PackKind {
    pub const ALL: [PackKind; 4] = [Self::Mixed, Self::Opening, Self::Middlegame, Self::Endgame];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "opening" => Some(Self::Opening),
            "middlegame" => Some(Self::Middlegame),
            "endgame" => Some(Self::Endgame),
            "mixed" | "random" => Some(Self::Mixed),
            _ => None,
        }
    }

    /// Label used in pack file names
    pub fn label(&self) -> &'static str {
        match self {
            Self::Opening => "Opening",
            Self::Middlegame => "Middlegame",
            Self::Endgame => "Endgame",
            Self::Mixed => "Random",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Opening => "Opening Tactics",
            Self::Middlegame => "Middlegame Tactics",
            Self::Endgame => "Endgame Tactics",
            Self::Mixed => "Random Tactics",
        }
    }

    /// Pool files (stems under the pools directory) this pack draws from
    pub fn pools(&self) -> &'static [&'static str] {
        match self {
            Self::Opening => &["opening"],
            Self::Middlegame => &["middlegame"],
            Self::Endgame => &["endgame"],
            Self::Mixed => &["opening", "middlegame", "endgame"],
        }
    }
}

/// Output format for a pack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackFormat {
    /// `fen,analysis_url`, readable by the navigator
    Csv,
    Pgn,
}

impl PackFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "pgn" => Some(Self::Pgn),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pgn => "pgn",
        }
    }
}

/// Inclusive rating range a pack is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingWindow {
    pub min: u32,
    pub max: u32,
}

impl Default for RatingWindow {
    fn default() -> Self {
        Self { min: 800, max: 1600 }
    }
}

impl RatingWindow {
    pub fn contains(&self, rating: u32) -> bool {
        (self.min..=self.max).contains(&rating)
    }
}

/// Conventional pack file name, e.g. `puzzles_Endgame_n50_elo800-1600.csv`
pub fn pack_file_name(kind: PackKind, count: usize, window: RatingWindow, format: PackFormat) -> String {
    format!(
        "puzzles_{}_n{}_elo{}-{}.{}",
        kind.label(),
        count,
        window.min,
        window.max,
        format.extension()
    )
}

/// One sampled puzzle, ready to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackEntry {
    pub id: String,
    pub fen: String,
}

impl PackEntry {
    pub fn analysis_url(&self) -> String {
        analysis_url(&self.fen)
    }
}

/// Read every puzzle in a pool
pub fn read_puzzles<R: Read>(input: R) -> Result<Vec<Puzzle>, PuzzleError> {
    let mut reader = csv::Reader::from_reader(input);
    let puzzles = reader.deserialize().collect::<Result<Vec<Puzzle>, _>>()?;
    Ok(puzzles)
}

/// Read the pools behind a pack kind from `pools_dir`
pub fn load_pool(pools_dir: &Path, kind: PackKind) -> Result<Vec<Puzzle>, PuzzleError> {
    let mut pool = Vec::new();
    for stem in kind.pools() {
        let path = pools_dir.join(format!("{}.csv", stem));
        let file = File::open(&path).map_err(|source| PuzzleError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let puzzles = read_puzzles(file)?;
        debug!(pool = %path.display(), puzzles = puzzles.len(), "pool loaded");
        pool.extend(puzzles);
    }
    Ok(pool)
}

/// Draw up to `count` distinct puzzles within `window`, in random order
///
/// A pool smaller than `count` yields all of its puzzles.
pub fn sample<'a, R>(
    pool: &'a [Puzzle],
    count: usize,
    window: RatingWindow,
    rng: &mut R,
) -> Vec<&'a Puzzle>
where
    R: Rng + ?Sized,
{
    let eligible: Vec<&Puzzle> = pool.iter().filter(|p| window.contains(p.rating)).collect();
    if eligible.len() < count {
        warn!(
            requested = count,
            available = eligible.len(),
            "pool is smaller than the requested pack"
        );
    }

    let amount = count.min(eligible.len());
    index::sample(rng, eligible.len(), amount)
        .into_iter()
        .map(|i| eligible[i])
        .collect()
}

/// Pick each puzzle's start position, defensive or not by coin flip
pub fn build_entries<R>(puzzles: &[&Puzzle], rng: &mut R) -> Result<Vec<PackEntry>, PuzzleError>
where
    R: Rng + ?Sized,
{
    puzzles
        .iter()
        .map(|puzzle| {
            let defensive = rng.random_bool(0.5);
            Ok(PackEntry {
                id: puzzle.id.clone(),
                fen: puzzle.position(defensive)?,
            })
        })
        .collect()
}

/// Write entries as `fen,analysis_url` CSV
pub fn write_csv<W: Write>(entries: &[PackEntry], output: W) -> Result<(), PuzzleError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(["fen", "analysis_url"])?;
    for entry in entries {
        writer.write_record([entry.fen.as_str(), entry.analysis_url().as_str()])?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write entries as a PGN collection
pub fn write_pgn<W: Write>(entries: &[PackEntry], mut output: W) -> Result<(), PuzzleError> {
    let io_error = |source| PuzzleError::Io {
        path: "PGN output".to_string(),
        source,
    };
    for entry in entries {
        output
            .write_all(pgn_entry(&entry.fen, &entry.id).as_bytes())
            .map_err(io_error)?;
    }
    output.flush().map_err(io_error)
}

pub fn write<W: Write>(entries: &[PackEntry], format: PackFormat, output: W) -> Result<(), PuzzleError> {
    match format {
        PackFormat::Csv => write_csv(entries, output),
        PackFormat::Pgn => write_pgn(entries, output),
    }
}
