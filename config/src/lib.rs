//! Shared configuration for the crasstools pipeline
//!
//! This crate centralizes the universal constants of the pipeline
//! (functional-color table, name-resolution fallbacks, filter
//! thresholds, output file suffixes), the common CLI error type and
//! argument checks, and small I/O helpers used by every tool.

use hashbrown::HashMap;
use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod gff;

pub use gff::{AnnotationError, Attributes, GffRecord};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// name-resolution policy
pub const HP: &str = "hp";
pub const OTHER_FUNCTIONS: &str = "other_known_functions";
pub const UNKNOWN: &str = "unknown";

// hit-filter thresholds
pub const EVALUE_THRESHOLD: f64 = 0.05;
pub const COVERAGE_THRESHOLD: f64 = 0.3;

// taxonomy defaults
pub const SAMPLE_SIZE: usize = 10;
pub const TARGET_CLASS: &str = "Caudoviricetes";
pub const EXCLUDED_ORDER: &str = "Crassvirales";

// output suffixes
pub const FILTERED_HITS_SUFFIX: &str = "_filtered_0.05.txt";
pub const WITH_NAMES_SUFFIX: &str = "_with_names.txt";
pub const WITH_NAMES_UNIQUE_SUFFIX: &str = "_with_names_unique.txt";
pub const EDITED_GFF_SUFFIX: &str = "_edited.gff";
pub const FILTERED_GFF_SUFFIX: &str = "_filtered.gff";

// cluster artifacts
pub const CLUSTER_IDS_SUFFIX: &str = "_ids.txt";
pub const CLUSTER_SEQS_SUFFIX: &str = "_ids.faa";
pub const CLUSTER_MSA_SUFFIX: &str = "_ids.msa";
pub const CLUSTER_LENGTHS_SUFFIX: &str = "_lengths.txt";
pub const CLUSTER_STATS: &str = "clusters_statistics.txt";
pub const ALIGNER_LOG: &str = "mafft.log";

/// Mapping from canonical protein-function name to a display color.
///
/// Doubles as the allow-list of known functions: a resolved name absent
/// from this table is coerced to [`OTHER_FUNCTIONS`] before display.
pub type FunctionalColors = HashMap<String, String>;

/// Build the default functional-color table of the crassvirales pipeline.
///
/// Returned by value so callers (and tests) can substitute their own
/// table instead of depending on a module-level global.
pub fn functional_colors() -> FunctionalColors {
    [
        ("gene86", "#a16a2e"),
        ("PDDEXK_alpha", "#6600cc"),
        ("TerL", "#8ccfb3"),
        ("portal", "#22b2cc"),
        ("gene77", "#ffb38d"),
        ("MCP", "#0000ff"),
        ("gene75", "#008000"),
        ("gene74", "#c0d2df"),
        ("gene73", "#7990b0"),
        ("IHF_54", "#b07990"),
        ("IHF_53", "#cca9b8"),
        ("Ttub", "#c4c1e8"),
        ("Tstab", "#8d89b9"),
        ("gene49", "#ccbcac"),
        ("primase", "#ff9900"),
        ("SNF2", "#009900"),
        ("SF1", "#74ffa2"),
        ("DNApB", "#ac00e6"),
        ("PolA", "#ff0000"),
        ("PDDEXK_beta", "#6600cc"),
        ("ATP_43b", "#009999"),
        ("DnaB", "#ff99ff"),
        ("Thy1", "#c4c1e8"),
        ("dUTP", "#1a78ff"),
        ("UDG", "#ba9b97"),
        ("MPP", "#ffffb3"),
        ("Rep_Org", "#22b2cc"),
        ("RNR", "#cccc96"),
        ("phage_O", "#008080"),
        ("gene48b", "#aa872f"),
        ("dNK", "#ffd2e5"),
        (HP, "#808080"),
        (OTHER_FUNCTIONS, "#d3d3d3"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

// os
#[cfg(not(windows))]
const TICK_SETTINGS: (&str, u64) = ("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ", 80);
#[cfg(windows)]
const TICK_SETTINGS: (&str, u64) = (r"+-x| ", 200);

/// return a pre-configured progress bar
pub fn get_progress_bar(length: u64, msg: &str) -> ProgressBar {
    let progressbar_style = ProgressStyle::default_spinner()
        .tick_chars(TICK_SETTINGS.0)
        .template(" {spinner} {msg:<30} {wide_bar} ETA {eta_precise} ")
        .expect("no template error");

    let progress_bar = ProgressBar::new(length);

    progress_bar.set_style(progressbar_style);
    progress_bar.enable_steady_tick(Duration::from_millis(TICK_SETTINGS.1));
    progress_bar.set_message(msg.to_owned());

    progress_bar
}

/// open a buffered reader over an input file
pub fn reader<P: AsRef<Path>>(path: P) -> Result<BufReader<File>, std::io::Error> {
    Ok(BufReader::new(File::open(path)?))
}

/// write a collection of lines to a file
pub fn write_collection<P: AsRef<Path>>(data: &[String], fname: P) -> Result<(), std::io::Error> {
    log::info!(
        "Lines in {}: {}. Writing...",
        fname.as_ref().display(),
        data.len()
    );
    let f = File::create(fname)?;
    let mut writer = BufWriter::new(f);

    for line in data.iter() {
        writeln!(writer, "{}", line)?;
    }

    Ok(())
}

/// Derive an output path from an input one by replacing its extension
/// with a suffix, e.g. `all_genomes.gff` + `_edited.gff` ->
/// `all_genomes_edited.gff`.
pub fn swap_suffix<P: AsRef<Path>>(path: P, suffix: &str) -> PathBuf {
    let path = path.as_ref();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    path.with_file_name(format!("{}{}", stem, suffix))
}

/// Place a suffix-swapped output next to its input, or inside `outdir`
/// when the caller overrides the location.
pub fn resolve_output<P: AsRef<Path>>(input: P, suffix: &str, outdir: Option<&Path>) -> PathBuf {
    let derived = swap_suffix(&input, suffix);

    match (outdir, derived.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => derived,
    }
}

/// error handling for CLI
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// argument validation
pub fn validate(arg: &PathBuf) -> Result<(), CliError> {
    if !arg.exists() {
        return Err(CliError::InvalidInput(format!("{:?} does not exist", arg)));
    }

    if !arg.is_file() {
        return Err(CliError::InvalidInput(format!("{:?} is not a file", arg)));
    }

    match std::fs::metadata(arg) {
        Ok(metadata) if metadata.len() == 0 => {
            Err(CliError::InvalidInput(format!("file {:?} is empty", arg)))
        }
        Ok(_) => Ok(()),
        Err(e) => Err(CliError::IoError(e)),
    }
}

/// argument checker for all subcommands
pub trait ArgCheck {
    fn check(&self) -> Result<(), CliError> {
        for input in self.get_inputs() {
            validate(input)?;
        }

        Ok(())
    }

    fn get_inputs(&self) -> Vec<&PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_functional_colors_allow_list() {
        let colors = functional_colors();

        assert!(colors.contains_key("TerL"));
        assert!(colors.contains_key(HP));
        assert!(colors.contains_key(OTHER_FUNCTIONS));
        assert!(!colors.contains_key("not_a_function"));
        assert_eq!(colors.get("MCP").map(String::as_str), Some("#0000ff"));
    }

    #[test]
    fn test_swap_suffix() {
        let out = swap_suffix("annotations/all_genomes.gff", EDITED_GFF_SUFFIX);
        assert_eq!(out, PathBuf::from("annotations/all_genomes_edited.gff"));

        let out = swap_suffix("hits/all_domtblout.txt", FILTERED_HITS_SUFFIX);
        assert_eq!(out, PathBuf::from("hits/all_domtblout_filtered_0.05.txt"));
    }

    #[test]
    fn test_resolve_output_honors_outdir() {
        let input = PathBuf::from("hits/all_domtblout.txt");

        let out = resolve_output(&input, FILTERED_HITS_SUFFIX, None);
        assert_eq!(out, PathBuf::from("hits/all_domtblout_filtered_0.05.txt"));

        let outdir = PathBuf::from("results");
        let out = resolve_output(&input, FILTERED_HITS_SUFFIX, Some(&outdir));
        assert_eq!(out, PathBuf::from("results/all_domtblout_filtered_0.05.txt"));
    }

    #[test]
    fn test_validate_missing_file() {
        let missing = PathBuf::from("no/such/file.tsv");
        assert!(validate(&missing).is_err());
    }
}
