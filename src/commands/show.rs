//! Show command - Print the record at the saved position

use anyhow::Result;
use serde::Serialize;

use super::utils::{self, NavOptions, OutputFormat};
use packnav::navigator::{Navigator, PositionStore, Record, ResourceSource, View};

/// The record under the cursor, with its place in the pack
#[derive(Debug, Serialize)]
pub struct CurrentRecord<'a> {
    pub pack: &'a str,
    /// 1-based position
    pub position: usize,
    pub total: usize,
    pub record: Option<&'a Record>,
}

/// Collect the current record from a loaded navigator
pub fn current<'a, Src, St>(nav: &'a Navigator<Src, St>, pack: &'a str) -> Option<CurrentRecord<'a>>
where
    Src: ResourceSource,
    St: PositionStore,
{
    let records = nav.records()?;
    let cursor = nav.cursor()?;
    Some(CurrentRecord {
        pack,
        position: cursor.saturating_add(1),
        total: records.len(),
        record: records.get(cursor),
    })
}

/// Format the current record with all its fields
pub fn format_current(current: &CurrentRecord<'_>, view: &View) -> String {
    let mut lines = vec![utils::format_view(current.pack, view)];

    match current.record {
        Some(record) => {
            lines.push(String::new());
            let width = record.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
            for (name, value) in record.iter() {
                lines.push(format!("  {:width$}  {}", name, value, width = width));
            }
        }
        None if current.total > 0 => {
            lines.push(format!(
                "Saved position {} is past the end of the pack ({} records)",
                current.position, current.total
            ));
        }
        None => lines.push("Pack has no records".to_string()),
    }

    lines.join("\n")
}

/// Execute the show command
pub async fn execute(options: &NavOptions, pack: &str, format: OutputFormat) -> Result<()> {
    let nav = utils::load_navigator(options, pack).await?;
    let Some(current) = current(&nav, pack) else {
        anyhow::bail!("Pack '{}' is not loaded", pack);
    };

    match format {
        OutputFormat::Text => println!("{}", format_current(&current, nav.view())),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&current)?),
    }

    Ok(())
}
