//! View command - Step through a pack interactively
//!
//! Reads one key name per line: `n`/`ArrowRight` moves forward, `p`/`ArrowLeft`
//! moves back, `q` quits. Other input is ignored.

use anyhow::Result;
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};

use super::utils::{self, NavOptions};
use packnav::navigator::{Navigator, PositionStore, ResourceSource};

/// Execute the view command
pub async fn execute(options: &NavOptions, pack: &str) -> Result<()> {
    let mut nav = utils::load_navigator(options, pack).await?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&mut nav, pack, stdin.lock(), stdout.lock())
}

/// Drive a loaded navigator from line-based key input until `q` or EOF
pub fn run_session<Src, St, R, W>(
    nav: &mut Navigator<Src, St>,
    pack: &str,
    input: R,
    mut out: W,
) -> Result<()>
where
    Src: ResourceSource,
    St: PositionStore,
    R: BufRead,
    W: Write,
{
    writeln!(out, "{}", utils::format_view(pack, nav.view()))?;
    writeln!(out, "{}", "Keys: n/ArrowRight, p/ArrowLeft, q to quit".dimmed())?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        let key = line.trim();

        if key == "q" {
            break;
        }

        let before = nav.cursor();
        let after = nav.handle_key(key);
        if after != before {
            writeln!(out, "\n{}", utils::format_view(pack, nav.view()))?;
        }
        out.flush()?;
    }

    Ok(())
}
