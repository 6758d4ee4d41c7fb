//! packnav library
//!
//! Step through the records of a CSV pack one at a time, with the viewing
//! position saved per pack so a later session resumes where the last one
//! stopped. The [`puzzles`] module builds such packs from the Lichess
//! puzzle database.

pub mod config;
pub mod logging;
pub mod navigator;
pub mod puzzles;
