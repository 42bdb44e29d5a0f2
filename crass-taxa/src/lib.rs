//! Core module for sampling reference genomes from a taxonomy table
//!
//! This module filters the ICTV reference taxonomy to a target class
//! [excluding one named order and rows without a resolved family] and
//! draws a bounded uniform random sample of genomes per family. Both
//! the filtered and the sampled tables are persisted as TSV. The
//! random source is injectable and seedable, so sampling is
//! reproducible under test while staying non-deterministic by default.

use anyhow::Result;
use config::ArgCheck;

pub mod cli;
pub mod core;
pub mod utils;

pub fn lib_crass_taxa(args: Vec<String>) -> Result<()> {
    let args = cli::Args::from(args);
    args.check()?;

    crate::core::sample_taxonomy(args)
}
