//! Stats command - Count opening tags in a puzzle pool

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

use super::utils::OutputFormat;
use packnav::puzzles::opening_tag_counts;

/// Opening tag statistics for one pool
#[derive(Debug, Default, Serialize)]
pub struct Stats {
    /// Pool file
    pub pool: PathBuf,

    /// Puzzles in the pool
    pub puzzles: usize,

    /// Tag counts, rarest first
    pub tags: Vec<TagCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Get opening tag statistics for a pool
pub fn stats(pool: &Path) -> Result<Stats> {
    let file =
        File::open(pool).with_context(|| format!("Failed to open pool: {}", pool.display()))?;
    let (puzzles, counts) = opening_tag_counts(file)
        .with_context(|| format!("Failed to read pool: {}", pool.display()))?;

    Ok(Stats {
        pool: pool.to_path_buf(),
        puzzles,
        tags: counts
            .into_iter()
            .map(|(tag, count)| TagCount { tag, count })
            .collect(),
    })
}

/// Format stats for display
pub fn format_stats(stats: &Stats) -> String {
    let mut lines = vec![];

    for entry in &stats.tags {
        lines.push(format!("{}: {}", entry.tag, entry.count));
    }

    if !stats.tags.is_empty() {
        lines.push(String::new()); // blank line
    }

    lines.push(format!("Pool: {}", stats.pool.display()));
    lines.push(format!("Puzzles: {}", stats.puzzles));
    lines.push(format!("Distinct Opening Tags: {}", stats.tags.len()));

    lines.join("\n")
}

/// Execute the stats command
pub fn execute(pool: &Path, format: OutputFormat) -> Result<()> {
    let stats = stats(pool)?;

    match format {
        OutputFormat::Text => println!("{}", format_stats(&stats)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_stats_default() {
        let stats = Stats::default();
        assert_eq!(stats.puzzles, 0);
        assert!(stats.tags.is_empty());
        assert!(format_stats(&stats).contains("Distinct Opening Tags: 0"));
    }

    #[test]
    fn test_format_stats_rarest_first() {
        let stats = Stats {
            pool: PathBuf::from("puzzles/opening_tag.csv"),
            puzzles: 3,
            tags: vec![
                TagCount {
                    tag: "french_defense".to_string(),
                    count: 1,
                },
                TagCount {
                    tag: "sicilian_defense".to_string(),
                    count: 2,
                },
            ],
        };
        let text = format_stats(&stats);

        let french = text.find("french_defense: 1").unwrap();
        let sicilian = text.find("sicilian_defense: 2").unwrap();
        assert!(french < sicilian);
        assert!(text.contains("Distinct Opening Tags: 2"));
    }

    #[test]
    fn test_stats_from_pool_file() {
        let dir = TempDir::new().unwrap();
        let pool = dir.path().join("opening_tag.csv");
        fs::write(
            &pool,
            "PuzzleId,FEN,Moves,Rating,RatingDeviation,Popularity,NbPlays,Themes,GameUrl,OpeningTags\n\
             a,8/8/8/8/8/8/8/K6k w - - 0 1,a1a2,1000,80,90,100,opening,u,Italian_Game\n",
        )
        .unwrap();

        let stats = stats(&pool).unwrap();
        assert_eq!(stats.puzzles, 1);
        assert_eq!(
            stats.tags,
            [TagCount {
                tag: "italian_game".to_string(),
                count: 1
            }]
        );
    }

    #[test]
    fn test_missing_pool() {
        let dir = TempDir::new().unwrap();
        assert!(stats(&dir.path().join("absent.csv")).is_err());
    }
}
