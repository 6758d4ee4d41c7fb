//! Packs command - List the published packs

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};

use packnav::puzzles::pack::pack_file_name;
use packnav::puzzles::{PackFormat, PackKind, RatingWindow};

/// Puzzles per published pack
pub const PUBLISHED_COUNT: usize = 50;

/// Display name and file name of each published pack
pub fn published() -> Vec<(&'static str, String)> {
    PackKind::ALL
        .iter()
        .map(|kind| {
            (
                kind.display_name(),
                pack_file_name(*kind, PUBLISHED_COUNT, RatingWindow::default(), PackFormat::Csv),
            )
        })
        .collect()
}

pub fn format_table(packs: &[(&str, String)]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Pack", "File"]);

    for (name, file) in packs {
        table.add_row(vec![Cell::new(name), Cell::new(file)]);
    }

    table.to_string()
}

/// Execute the packs command
pub fn execute() {
    println!("{}", format_table(&published()));
}
