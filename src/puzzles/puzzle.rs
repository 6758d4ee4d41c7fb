//! One Lichess puzzle and the thresholds used to select puzzles
//!
//! Rows come from the Lichess puzzle database export, whose header is
//! `PuzzleId,FEN,Moves,Rating,RatingDeviation,Popularity,NbPlays,Themes,GameUrl,OpeningTags`.
//! Extra columns are ignored.

use serde::Deserialize;
use shakmaty::fen::Fen;
use shakmaty::uci::Uci;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Position};

use super::error::PuzzleError;

/// Base for the analysis board links stored in packs
pub const ANALYSIS_BASE: &str = "https://lichess.org/analysis/";

/// Base for puzzle links in PGN output
pub const TRAINING_BASE: &str = "https://lichess.org/training/";

#[derive(Debug, Deserialize)]
struct PuzzleRow {
    #[serde(rename = "PuzzleId")]
    id: String,
    #[serde(rename = "FEN")]
    fen: String,
    #[serde(rename = "Moves")]
    moves: String,
    #[serde(rename = "Rating")]
    rating: u32,
    #[serde(rename = "RatingDeviation")]
    rating_deviation: u32,
    #[serde(rename = "Popularity")]
    popularity: i32,
    #[serde(rename = "NbPlays")]
    plays: u64,
    #[serde(rename = "Themes", default)]
    themes: String,
    #[serde(rename = "GameUrl", default)]
    game_url: String,
    #[serde(rename = "OpeningTags", default)]
    opening_tags: String,
}

/// A puzzle: a position, the solution line, and its Lichess metadata
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "PuzzleRow")]
pub struct Puzzle {
    pub id: String,
    /// Position before the opponent's first move
    pub fen: String,
    /// UCI moves; the first is the opponent's move that sets up the puzzle
    pub moves: Vec<String>,
    pub rating: u32,
    pub rating_deviation: u32,
    /// Net upvotes in percent, -100 to 100
    pub popularity: i32,
    pub plays: u64,
    /// Space-separated, lowercased
    pub themes: String,
    pub game_url: String,
    /// Space-separated, lowercased
    pub opening_tags: String,
}

impl From<PuzzleRow> for Puzzle {
    fn from(row: PuzzleRow) -> Self {
        Self {
            id: row.id,
            fen: row.fen,
            moves: row.moves.split_whitespace().map(str::to_string).collect(),
            rating: row.rating,
            rating_deviation: row.rating_deviation,
            popularity: row.popularity,
            plays: row.plays,
            themes: row.themes.to_lowercase(),
            game_url: row.game_url,
            opening_tags: row.opening_tags.to_lowercase(),
        }
    }
}

impl Puzzle {
    pub fn matches(&self, filter: &PuzzleFilter) -> bool {
        filter.matches(self)
    }

    /// The position a solver starts from
    ///
    /// Defensive puzzles start before the opponent's move, so the solver has
    /// to see the threat coming; otherwise the first move is played and the
    /// solver is to move.
    pub fn position(&self, defensive: bool) -> Result<String, PuzzleError> {
        if defensive {
            return Ok(self.fen.clone());
        }

        let first = self.moves.first().ok_or_else(|| PuzzleError::NoMoves {
            id: self.id.clone(),
        })?;

        let fen = self.fen.parse::<Fen>().map_err(|e| PuzzleError::Fen {
            id: self.id.clone(),
            message: e.to_string(),
        })?;
        let mut pos = fen
            .into_position::<Chess>(CastlingMode::Standard)
            .map_err(|e| PuzzleError::Fen {
                id: self.id.clone(),
                message: e.to_string(),
            })?;

        let move_error = |message: String| PuzzleError::Move {
            id: self.id.clone(),
            uci: first.clone(),
            message,
        };
        let uci = first
            .parse::<Uci>()
            .map_err(|e| move_error(e.to_string()))?;
        let mv = uci.to_move(&pos).map_err(|e| move_error(e.to_string()))?;
        pos.play_unchecked(&mv);

        Ok(Fen::from_position(pos, EnPassantMode::Legal).to_string())
    }

    pub fn training_url(&self) -> String {
        format!("{}{}", TRAINING_BASE, self.id)
    }
}

/// Analysis board link for a position
pub fn analysis_url(fen: &str) -> String {
    format!("{}{}", ANALYSIS_BASE, fen.replace(' ', "_"))
}

/// One PGN game holding only a start position and a link back to the puzzle
pub fn pgn_entry(fen: &str, id: &str) -> String {
    format!(
        "[FEN \"{}\"]\n[SITE \"{}{}\"]\n\n*\n\n",
        fen, TRAINING_BASE, id
    )
}

/// Selection thresholds, all inclusive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleFilter {
    pub min_rating: u32,
    pub max_rating: u32,
    pub min_popularity: i32,
    pub min_plays: u64,
    /// Must occur in the lowercased themes (substring match)
    pub theme: Option<String>,
    /// Must occur in the lowercased opening tags (substring match)
    pub opening_tag: Option<String>,
}

impl PuzzleFilter {
    /// Named presets used to build the theme pools
    pub fn preset(name: &str) -> Option<Self> {
        let (min_rating, max_rating, min_popularity, min_plays, theme) = match name {
            "opening" => (750, 2000, 75, 1_000, "opening"),
            "middlegame" => (750, 2000, 75, 10_000, "middlegame"),
            "endgame" => (750, 2000, 75, 10_000, "endgame"),
            "opening_tag" => (500, 2500, 25, 10, "opening"),
            _ => return None,
        };
        Some(Self {
            min_rating,
            max_rating,
            min_popularity,
            min_plays,
            theme: Some(theme.to_string()),
            opening_tag: None,
        })
    }

    pub fn matches(&self, puzzle: &Puzzle) -> bool {
        (self.min_rating..=self.max_rating).contains(&puzzle.rating)
            && puzzle.popularity >= self.min_popularity
            && puzzle.plays >= self.min_plays
            && self
                .theme
                .as_deref()
                .map_or(true, |tag| puzzle.themes.contains(tag))
            && self
                .opening_tag
                .as_deref()
                .map_or(true, |tag| puzzle.opening_tags.contains(tag))
    }
}
