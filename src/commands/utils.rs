//! Shared utilities for commands

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::PathBuf;

use packnav::config;
use packnav::navigator::{
    Navigator, NavigatorOptions, ParseMode, RestorePolicy, Source, SqliteStore, View,
};

/// Output format for record and position listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Where packs and positions live, and how packs are read
#[derive(Debug, Clone, Default)]
pub struct NavOptions {
    /// Base directory or URL (None = config default)
    pub base: Option<String>,
    /// Position store path (None = config default)
    pub store: Option<PathBuf>,
    /// Use RFC 4180 quoting
    pub quoted: bool,
    /// Clamp restored positions into range
    pub clamp: bool,
}

impl NavOptions {
    pub fn navigator_options(&self) -> NavigatorOptions {
        NavigatorOptions {
            parse_mode: if self.quoted {
                ParseMode::Quoted
            } else {
                ParseMode::Naive
            },
            restore: if self.clamp {
                RestorePolicy::Clamp
            } else {
                RestorePolicy::Unchecked
            },
        }
    }

    pub fn base(&self) -> String {
        self.base.clone().unwrap_or_else(config::default_base)
    }

    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.store {
            Some(path) => Ok(path.clone()),
            None => config::store_path(),
        }
    }
}

/// Open the position store selected by the options
pub fn open_store(options: &NavOptions) -> Result<SqliteStore> {
    let path = options.store_path()?;
    SqliteStore::open(&path)
        .with_context(|| format!("Failed to open position store: {}", path.display()))
}

/// Build a navigator and load a pack into it
pub async fn load_navigator(
    options: &NavOptions,
    pack: &str,
) -> Result<Navigator<Source, SqliteStore>> {
    let store = open_store(options)?;
    let source = Source::from_base(&options.base());

    let mut nav = Navigator::with_options(source, store, options.navigator_options());
    nav.load(pack)
        .await
        .with_context(|| format!("Failed to load pack '{}'", pack))?;
    Ok(nav)
}

/// Format the current view for the terminal
pub fn format_view(pack: &str, view: &View) -> String {
    let mut lines = vec![];

    lines.push(format!("Pack: {}", pack.bold()));

    match &view.counter {
        Some(counter) => lines.push(format!("Record: {}", counter)),
        None => lines.push(format!("Record: {}", "(none)".dimmed())),
    }

    match &view.display {
        Some(reference) => lines.push(format!("URL: {}", reference.cyan())),
        None => lines.push(format!("URL: {}", "(none)".dimmed())),
    }

    lines.push(format_controls(view));

    lines.join("\n")
}

fn format_controls(view: &View) -> String {
    let prev = if view.can_go_back {
        "[p] prev".to_string()
    } else {
        "[p] prev".dimmed().to_string()
    };
    let next = if view.can_go_forward {
        "[n] next".to_string()
    } else {
        "[n] next".dimmed().to_string()
    };
    format!("{}  {}", prev, next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("TEXT"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("yaml"), None);
    }

    #[test]
    fn test_navigator_options_from_flags() {
        let options = NavOptions {
            quoted: true,
            clamp: true,
            ..Default::default()
        };
        let nav = options.navigator_options();
        assert_eq!(nav.parse_mode, ParseMode::Quoted);
        assert_eq!(nav.restore, RestorePolicy::Clamp);

        let nav = NavOptions::default().navigator_options();
        assert_eq!(nav.parse_mode, ParseMode::Naive);
        assert_eq!(nav.restore, RestorePolicy::Unchecked);
    }

    #[test]
    fn test_format_view() {
        let view = View {
            display: Some("http://y".to_string()),
            counter: Some("2 of 3".to_string()),
            can_go_back: true,
            can_go_forward: true,
        };
        let text = format_view("pack1", &view);

        assert!(text.contains("pack1"));
        assert!(text.contains("Record: 2 of 3"));
        assert!(text.contains("http://y"));
        assert!(text.contains("[p] prev"));
    }

    #[test]
    fn test_format_unloaded_view() {
        let text = format_view("pack1", &View::default());
        assert!(text.contains("(none)"));
    }
}
