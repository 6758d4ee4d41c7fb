//! CLI commands

pub mod export;
pub mod filter;
pub mod packs;
pub mod positions;
pub mod show;
pub mod stats;
pub mod step;
pub mod utils;
pub mod view;
