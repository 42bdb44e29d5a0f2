//! Core module for functional annotation of viral protein records
//!
//! This module resolves HMM-profile hits to human-readable protein
//! names and rewrites GFF annotation files in place. It offers two
//! subcommands: `table` maps profile identifiers to nicknames,
//! materializes the named hit tables and inserts a `name=` attribute
//! into every record; `colors` re-resolves those names against the
//! functional-color allow-list, coercing functions without an
//! assigned color to the catch-all category used for display.
//!
//! Two annotation flavors are supported [prodigal and refseq]; they
//! differ in how the protein identifier is recovered from the first
//! attribute of a record.

use anyhow::Result;
use config::ArgCheck;

pub mod cli;
pub mod core;
pub mod utils;

pub fn lib_crass_annot(args: Vec<String>) -> Result<()> {
    let args = cli::Args::from(args);

    match args.command {
        cli::SubArgs::Table { args } => {
            args.check()?;
            crate::core::make_annotation_tables(args)
        }
        cli::SubArgs::Colors { args } => {
            args.check()?;
            crate::core::color_annotations(args)
        }
    }
}
