//! Export command - Sample a puzzle pool into a pack

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use packnav::puzzles::pack::{self, pack_file_name};
use packnav::puzzles::{PackEntry, PackFormat, PackKind, RatingWindow};

/// What to sample and where to write it
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub kind: PackKind,
    /// Directory holding the pools written by `filter`
    pub pools_dir: PathBuf,
    pub count: usize,
    pub window: RatingWindow,
    /// Fixed seed for a reproducible pack
    pub seed: Option<u64>,
    pub format: PackFormat,
    /// Output file (None = conventional name in the current directory)
    pub output: Option<PathBuf>,
}

impl ExportOptions {
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            PathBuf::from(pack_file_name(self.kind, self.count, self.window, self.format))
        })
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }
}

/// Load the pool and draw the pack entries
pub fn build<R: Rng + ?Sized>(options: &ExportOptions, rng: &mut R) -> Result<Vec<PackEntry>> {
    let pool = pack::load_pool(&options.pools_dir, options.kind)
        .with_context(|| format!("Failed to load the {} pool", options.kind.label()))?;

    let picked = pack::sample(&pool, options.count, options.window, rng);
    let entries = pack::build_entries(&picked, rng).context("Failed to set up puzzle positions")?;
    Ok(entries)
}

/// Execute the export command
pub fn execute(options: &ExportOptions) -> Result<()> {
    let mut rng = options.rng();
    let entries = build(options, &mut rng)?;

    let path = options.output_path();
    let file = File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    pack::write(&entries, options.format, BufWriter::new(file))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{} {} ({} puzzles) -> {}",
        "Exported:".green(),
        options.kind.display_name(),
        entries.len(),
        path.display()
    );
    if entries.len() < options.count {
        println!(
            "{}",
            format!(
                "Only {} puzzles rated {}-{} were available",
                entries.len(),
                options.window.min,
                options.window.max
            )
            .yellow()
        );
    }

    Ok(())
}
