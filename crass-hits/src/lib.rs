//! Core module for filtering hmmscan domtblout search results
//!
//! This module parses per-query domain-search results [one row per
//! domain hit] into structured query/hit objects and keeps the hits
//! passing a dual significance threshold: full-sequence e-value below
//! a cutoff and profile coverage above a cutoff. Each surviving hit is
//! written as one tab-separated row of a fixed 10-column table used
//! downstream by the annotation tools.

use anyhow::Result;
use config::ArgCheck;

pub mod cli;
pub mod core;
pub mod utils;

pub fn lib_crass_hits(args: Vec<String>) -> Result<()> {
    let args = cli::Args::from(args);
    args.check()?;

    crate::core::filter_hits(args)
}
