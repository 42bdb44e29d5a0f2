//! Core module for per-cluster protein sequence extraction
//!
//! This module turns a pairwise protein-clustering table into a
//! per-cluster directory tree of artifacts: an id list, the extracted
//! member sequences, a member length table and a multiple alignment,
//! plus one shared statistics table covering every cluster.
//!
//! Sequence extraction and alignment are delegated to external tools
//! [seqtk and mafft] behind the `SeqToolRunner` seam; their exit
//! status is checked and failures surface as structured errors rather
//! than silently producing empty artifacts.

use anyhow::Result;
use config::ArgCheck;

pub mod cli;
pub mod core;
pub mod utils;

pub fn lib_crass_cluster(args: Vec<String>) -> Result<()> {
    let args = cli::Args::from(args);
    args.check()?;

    crate::core::extract_cluster_sequences(args)
}
