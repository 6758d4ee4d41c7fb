//! Next/prev commands - Move one record and save the new position

use anyhow::Result;
use owo_colors::OwoColorize;

use super::utils::{self, NavOptions};
use packnav::navigator::Direction;

/// Execute a single step in the given direction
pub async fn execute(options: &NavOptions, pack: &str, direction: Direction) -> Result<()> {
    let mut nav = utils::load_navigator(options, pack).await?;

    let before = nav.cursor();
    let after = nav.advance(direction);

    if after == before {
        let edge = match direction {
            Direction::Forward => "Already at the last record.",
            Direction::Backward => "Already at the first record.",
        };
        println!("{}", edge.yellow());
    }

    println!("{}", utils::format_view(pack, nav.view()));
    Ok(())
}
