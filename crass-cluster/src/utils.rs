use hashbrown::HashMap;
use thiserror::Error;

use std::fs::{File, OpenOptions};
use std::io::{BufRead, Write};
use std::path::Path;
use std::process::Command;

pub const EXTRACT_TOOL: &str = "seqtk";
pub const ALIGN_TOOL: &str = "mafft";

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("line {line}: malformed cluster pair [expected cluster<TAB>member]: {content}")]
    MalformedPair { line: usize, content: String },
    #[error("line {line}: invalid length value {value:?}")]
    InvalidLength { line: usize, value: String },
    #[error("identifier {id:?} is missing from the length table")]
    MissingLength { id: String },
    #[error("{tool} failed with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Group (cluster, member) pairs into an ordered member list per
/// cluster, preserving first-seen member order with multiplicity.
pub fn group_clusters<R: BufRead>(
    input: R,
) -> Result<HashMap<String, Vec<String>>, ClusterError> {
    let mut clusters: HashMap<String, Vec<String>> = HashMap::new();

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let (cluster, member) =
            line.split_once('\t')
                .ok_or_else(|| ClusterError::MalformedPair {
                    line: idx + 1,
                    content: line.clone(),
                })?;

        clusters
            .entry(cluster.to_string())
            .or_default()
            .push(member.trim_end().to_string());
    }

    Ok(clusters)
}

/// Load the global identifier -> sequence length table.
pub fn load_lengths<R: BufRead>(input: R) -> Result<HashMap<String, u64>, ClusterError> {
    let mut lengths = HashMap::new();

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let (id, length) = line
            .split_once('\t')
            .ok_or_else(|| ClusterError::MalformedPair {
                line: idx + 1,
                content: line.clone(),
            })?;
        let length = length
            .trim_end()
            .parse::<u64>()
            .map_err(|_| ClusterError::InvalidLength {
                line: idx + 1,
                value: length.to_string(),
            })?;

        lengths.insert(id.to_string(), length);
    }

    Ok(lengths)
}

/// mean member length, rounded to 2 decimals
pub fn mean_length(lengths: &[u64]) -> f64 {
    if lengths.is_empty() {
        return 0.0;
    }

    let mean = lengths.iter().sum::<u64>() as f64 / lengths.len() as f64;
    (mean * 100.0).round() / 100.0
}

/// External sequence tools the extractor drives, behind a seam so the
/// core loop is testable without seqtk/mafft on PATH.
pub trait SeqToolRunner {
    /// extract the sequences named in `ids` from `faa` into `output`
    fn extract(&self, faa: &Path, ids: &Path, output: &Path) -> Result<(), ClusterError>;

    /// align `faa` into `output`, appending diagnostics to `log`
    fn align(
        &self,
        faa: &Path,
        output: &Path,
        log: &Path,
        threads: usize,
    ) -> Result<(), ClusterError>;
}

/// Production runner shelling out to seqtk and mafft. Exit status is
/// checked; a non-zero status surfaces as [`ClusterError::ToolFailed`]
/// with the captured stderr.
pub struct ExternalTools;

impl SeqToolRunner for ExternalTools {
    fn extract(&self, faa: &Path, ids: &Path, output: &Path) -> Result<(), ClusterError> {
        let out = Command::new(EXTRACT_TOOL)
            .arg("subseq")
            .arg(faa)
            .arg(ids)
            .output()?;

        if !out.status.success() {
            return Err(ClusterError::ToolFailed {
                tool: EXTRACT_TOOL.to_string(),
                status: out.status,
                stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
            });
        }

        File::create(output)?.write_all(&out.stdout)?;

        Ok(())
    }

    fn align(
        &self,
        faa: &Path,
        output: &Path,
        log: &Path,
        threads: usize,
    ) -> Result<(), ClusterError> {
        let out = Command::new(ALIGN_TOOL)
            .arg("--thread")
            .arg(threads.to_string())
            .arg("--auto")
            .arg(faa)
            .output()?;

        // INFO: mafft writes progress to stderr even on success
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(log)?
            .write_all(&out.stderr)?;

        if !out.status.success() {
            return Err(ClusterError::ToolFailed {
                tool: ALIGN_TOOL.to_string(),
                status: out.status,
                stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
            });
        }

        File::create(output)?.write_all(&out.stdout)?;

        Ok(())
    }
}
