//! Positions commands - List and reset saved positions

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;

use super::utils::{self, NavOptions, OutputFormat};
use packnav::navigator::storage::{saved_positions, SavedPosition};
use packnav::navigator::{storage_key, PositionStore};

/// Render saved positions as a table; positions are shown 1-based
pub fn format_table(positions: &[SavedPosition]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Pack", "Record"]);

    for entry in positions {
        table.add_row(vec![
            Cell::new(&entry.pack),
            Cell::new(entry.position + 1),
        ]);
    }

    table.to_string()
}

/// Execute the positions command
pub fn execute(options: &NavOptions, format: OutputFormat) -> Result<()> {
    let store = utils::open_store(options)?;
    let positions = saved_positions(&store).context("Failed to read saved positions")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&positions)?),
        OutputFormat::Text if positions.is_empty() => println!("No saved positions."),
        OutputFormat::Text => println!("{}", format_table(&positions)),
    }

    Ok(())
}

/// Forget the saved position of a pack
pub fn reset<S: PositionStore>(store: &mut S, pack: &str) -> Result<bool> {
    store
        .remove(&storage_key(pack))
        .with_context(|| format!("Failed to reset position for '{}'", pack))
}

/// Execute the reset command
pub fn execute_reset(options: &NavOptions, pack: &str) -> Result<()> {
    let mut store = utils::open_store(options)?;

    if reset(&mut store, pack)? {
        println!("{} {}", "Reset:".green(), pack);
    } else {
        println!("No saved position for '{}'.", pack);
    }

    Ok(())
}
