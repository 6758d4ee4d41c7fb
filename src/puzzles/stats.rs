//! Opening tag counts across a pool

use std::collections::HashMap;
use std::io::Read;

use super::error::PuzzleError;
use super::pack::read_puzzles;

/// Count each opening tag, rarest first
///
/// Ties are ordered by tag name. Puzzles without opening tags add nothing.
pub fn opening_tag_counts<R: Read>(input: R) -> Result<(usize, Vec<(String, usize)>), PuzzleError> {
    let puzzles = read_puzzles(input)?;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for puzzle in &puzzles {
        for tag in puzzle.opening_tags.split_whitespace() {
            *counts.entry(tag).or_default() += 1;
        }
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(tag, count)| (tag.to_string(), count))
        .collect();
    counts.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

    Ok((puzzles.len(), counts))
}
