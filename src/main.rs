//! packnav: step through CSV record packs one record at a time
//!
//! The position in each pack is saved after every move, so the next session
//! picks up where the last one stopped. Packs themselves are built from the
//! Lichess puzzle database with `filter` and `export`.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use packnav::logging;
use packnav::navigator::Direction;
use packnav::puzzles::{PackFormat, PackKind, RatingWindow};

mod commands;

use commands::export::ExportOptions;
use commands::utils::{NavOptions, OutputFormat};

#[derive(Parser)]
#[command(name = "packnav")]
#[command(about = "Step through CSV record packs, resuming where you left off", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Directory or http(s) URL packs are loaded from [env: PACKNAV_BASE]
    #[arg(long, global = true)]
    base: Option<String>,

    /// Position store database [env: PACKNAV_STORE]
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Parse packs as RFC 4180 CSV (quoted values may contain commas)
    #[arg(long, global = true)]
    quoted: bool,

    /// Clamp a saved position that lies past the end of the pack
    #[arg(long, global = true)]
    clamp: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Step through a pack interactively
    View {
        /// Pack resource (file name relative to the base)
        pack: String,
    },

    /// Print the record at the saved position
    Show {
        /// Pack resource (file name relative to the base)
        pack: String,

        /// Output format: text or json (default: text)
        #[arg(long, short, default_value = "text")]
        format: String,
    },

    /// Move to the next record
    Next {
        /// Pack resource (file name relative to the base)
        pack: String,
    },

    /// Move to the previous record
    Prev {
        /// Pack resource (file name relative to the base)
        pack: String,
    },

    /// List saved positions
    Positions {
        /// Output format: text or json (default: text)
        #[arg(long, short, default_value = "text")]
        format: String,
    },

    /// Forget the saved position of a pack
    Reset {
        /// Pack resource (file name relative to the base)
        pack: String,
    },

    /// Split the Lichess puzzle database into theme pools
    Filter {
        /// Lichess puzzle database export
        #[arg(long, short, default_value = "lichess_db_puzzle.csv")]
        input: PathBuf,

        /// Directory the pools are written to
        #[arg(long, short, default_value = "puzzles")]
        output: PathBuf,

        /// Presets to apply: opening, middlegame, endgame, opening_tag (default: all)
        #[arg(long = "preset")]
        presets: Vec<String>,
    },

    /// Sample a pool into a pack
    Export {
        /// Pack: opening, middlegame, endgame or mixed
        #[arg(long, short, default_value = "mixed")]
        pack: String,

        /// Directory holding the pools written by `filter`
        #[arg(long, default_value = "puzzles")]
        pools: PathBuf,

        /// Number of puzzles
        #[arg(long, short = 'n', default_value_t = 50)]
        count: usize,

        /// Lowest puzzle rating
        #[arg(long, default_value_t = 800)]
        min_rating: u32,

        /// Highest puzzle rating
        #[arg(long, default_value_t = 1600)]
        max_rating: u32,

        /// Seed for a reproducible pack
        #[arg(long)]
        seed: Option<u64>,

        /// Output format: csv or pgn (default: csv)
        #[arg(long, short, default_value = "csv")]
        format: String,

        /// Output file (default: puzzles_<Pack>_n<N>_elo<MIN>-<MAX>.<ext>)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Count opening tags in a pool
    Stats {
        /// Pool file
        #[arg(default_value = "puzzles/opening_tag.csv")]
        pool: PathBuf,

        /// Output format: text or json (default: text)
        #[arg(long, short, default_value = "text")]
        format: String,
    },

    /// List the published packs
    Packs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.global.verbose);

    let options = NavOptions {
        base: cli.global.base,
        store: cli.global.store,
        quoted: cli.global.quoted,
        clamp: cli.global.clamp,
    };

    match cli.command {
        Commands::View { pack } => {
            commands::view::execute(&options, &pack).await?;
        }

        Commands::Show { pack, format } => {
            let format =
                OutputFormat::from_str(&format).context("Invalid format. Use 'text' or 'json'")?;
            commands::show::execute(&options, &pack, format).await?;
        }

        Commands::Next { pack } => {
            commands::step::execute(&options, &pack, Direction::Forward).await?;
        }

        Commands::Prev { pack } => {
            commands::step::execute(&options, &pack, Direction::Backward).await?;
        }

        Commands::Positions { format } => {
            let format =
                OutputFormat::from_str(&format).context("Invalid format. Use 'text' or 'json'")?;
            commands::positions::execute(&options, format)?;
        }

        Commands::Reset { pack } => {
            commands::positions::execute_reset(&options, &pack)?;
        }

        Commands::Filter {
            input,
            output,
            presets,
        } => {
            commands::filter::execute(&input, &output, &presets)?;
        }

        Commands::Export {
            pack,
            pools,
            count,
            min_rating,
            max_rating,
            seed,
            format,
            output,
        } => {
            let kind = PackKind::from_str(&pack)
                .context("Invalid pack. Use 'opening', 'middlegame', 'endgame' or 'mixed'")?;
            let format =
                PackFormat::from_str(&format).context("Invalid format. Use 'csv' or 'pgn'")?;
            if min_rating > max_rating {
                anyhow::bail!("--min-rating must not exceed --max-rating");
            }
            commands::export::execute(&ExportOptions {
                kind,
                pools_dir: pools,
                count,
                window: RatingWindow {
                    min: min_rating,
                    max: max_rating,
                },
                seed,
                format,
                output,
            })?;
        }

        Commands::Stats { pool, format } => {
            let format =
                OutputFormat::from_str(&format).context("Invalid format. Use 'text' or 'json'")?;
            commands::stats::execute(&pool, format)?;
        }

        Commands::Packs => {
            commands::packs::execute();
        }
    }

    Ok(())
}
