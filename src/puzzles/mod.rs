//! Building packs from the Lichess puzzle database
//!
//! The pipeline has three stages, each usable on its own:
//!
//! 1. [`filter`] splits the full database export into per-theme pools using
//!    named [`PuzzleFilter`] presets.
//! 2. [`pack`] samples a pool into a pack, either as `fen,analysis_url` CSV
//!    (what the navigator reads) or as PGN.
//! 3. [`stats`] counts opening tags across a pool.

pub mod error;
pub mod filter;
pub mod pack;
pub mod puzzle;
pub mod stats;

pub use error::PuzzleError;
pub use filter::{filter_puzzles, FilterReport, PRESET_NAMES};
pub use pack::{PackEntry, PackFormat, PackKind, RatingWindow};
pub use puzzle::{analysis_url, pgn_entry, Puzzle, PuzzleFilter};
pub use stats::opening_tag_counts;
