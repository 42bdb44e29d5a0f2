use anyhow::Result;
use hashbrown::HashMap;
use log::info;

use std::fs;
use std::path::{Path, PathBuf};

use config::{
    get_progress_bar, reader, write_collection, ALIGNER_LOG, CLUSTER_IDS_SUFFIX,
    CLUSTER_LENGTHS_SUFFIX, CLUSTER_MSA_SUFFIX, CLUSTER_SEQS_SUFFIX, CLUSTER_STATS,
};

use crate::cli::Args;
use crate::utils::{
    group_clusters, load_lengths, mean_length, ClusterError, ExternalTools, SeqToolRunner,
};

pub const STATS_HEADER: &str =
    "cluster_name\tcluster_members_number\tcluster_members_mean_length";

/// Run the whole per-cluster pipeline: group the pairwise table, write
/// the id lists, extract each cluster's sequences, measure member
/// lengths, emit the shared statistics table and align each cluster.
pub fn extract_cluster_sequences(args: Args) -> Result<()> {
    let clusters = group_clusters(reader(&args.clusters)?)?;
    info!("Grouped {} clusters from the pairwise table", clusters.len());

    write_cluster_ids(&clusters, &args.outdir)?;

    let dirs = list_cluster_dirs(&args.outdir)?;
    let tools = ExternalTools;

    extract_sequences(&dirs, &args.faa, &tools)?;

    let lengths = load_lengths(reader(&args.sizes)?)?;
    let stats = write_member_lengths(&dirs, &lengths)?;
    write_statistics(&stats, &args.outdir)?;

    align_clusters(&dirs, &tools, args.threads, &args.outdir)?;

    Ok(())
}

/// Materialize one `<cluster>/<cluster>_ids.txt` id list per cluster,
/// creating directories on demand.
pub fn write_cluster_ids(
    clusters: &HashMap<String, Vec<String>>,
    outdir: &Path,
) -> Result<(), ClusterError> {
    for (cluster, members) in clusters.iter() {
        let cluster_dir = outdir.join(cluster);
        fs::create_dir_all(&cluster_dir)?;

        write_collection(
            members,
            cluster_dir.join(format!("{}{}", cluster, CLUSTER_IDS_SUFFIX)),
        )?;
    }

    Ok(())
}

/// Cluster subdirectories of `outdir`, in directory-listing order [not
/// guaranteed to be sorted]; statistics rows follow this order.
pub fn list_cluster_dirs(outdir: &Path) -> Result<Vec<(String, PathBuf)>, ClusterError> {
    let mut dirs = Vec::new();

    for entry in fs::read_dir(outdir)? {
        let entry = entry?;
        if entry.path().is_dir() {
            dirs.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
        }
    }

    Ok(dirs)
}

/// Extract each cluster's member sequences from the full collection
/// into `<cluster>_ids.faa`.
pub fn extract_sequences<T: SeqToolRunner>(
    dirs: &[(String, PathBuf)],
    faa: &Path,
    tools: &T,
) -> Result<(), ClusterError> {
    let pb = get_progress_bar(dirs.len() as u64, "Extracting sequences...");

    for (cluster, dir) in dirs {
        let ids = dir.join(format!("{}{}", cluster, CLUSTER_IDS_SUFFIX));
        let output = dir.join(format!("{}{}", cluster, CLUSTER_SEQS_SUFFIX));

        tools.extract(faa, &ids, &output)?;
        pb.inc(1);
    }

    pb.finish_and_clear();

    Ok(())
}

/// Join each cluster's members against the global length table, write
/// the per-cluster `<cluster>_lengths.txt` file and return one
/// statistics row [cluster, member count, mean length] per cluster.
///
/// A member missing from the length table is a fatal lookup error.
pub fn write_member_lengths(
    dirs: &[(String, PathBuf)],
    lengths: &HashMap<String, u64>,
) -> Result<Vec<(String, usize, f64)>, ClusterError> {
    let mut stats = Vec::with_capacity(dirs.len());

    for (cluster, dir) in dirs {
        let ids = dir.join(format!("{}{}", cluster, CLUSTER_IDS_SUFFIX));
        let members = fs::read_to_string(&ids)?;

        let mut rows = Vec::new();
        let mut member_lengths = Vec::new();

        for member in members.lines().filter(|m| !m.is_empty()) {
            let length = lengths
                .get(member)
                .copied()
                .ok_or_else(|| ClusterError::MissingLength {
                    id: member.to_string(),
                })?;

            rows.push(format!("{}\t{}", member, length));
            member_lengths.push(length);
        }

        write_collection(
            &rows,
            dir.join(format!("{}{}", cluster, CLUSTER_LENGTHS_SUFFIX)),
        )?;

        stats.push((cluster.clone(), member_lengths.len(), mean_length(&member_lengths)));
    }

    Ok(stats)
}

/// Write the shared statistics table, one row per cluster plus header.
pub fn write_statistics(
    stats: &[(String, usize, f64)],
    outdir: &Path,
) -> Result<(), ClusterError> {
    let mut lines = vec![STATS_HEADER.to_string()];

    for (cluster, members, mean) in stats {
        lines.push(format!("{}\t{}\t{:?}", cluster, members, mean));
    }

    write_collection(&lines, outdir.join(CLUSTER_STATS))?;

    Ok(())
}

/// Align each cluster's extracted sequences into `<cluster>_ids.msa`,
/// appending aligner diagnostics to the shared log file.
pub fn align_clusters<T: SeqToolRunner>(
    dirs: &[(String, PathBuf)],
    tools: &T,
    threads: usize,
    outdir: &Path,
) -> Result<(), ClusterError> {
    let log = outdir.join(ALIGNER_LOG);
    let pb = get_progress_bar(dirs.len() as u64, "Aligning clusters...");

    for (cluster, dir) in dirs {
        let faa = dir.join(format!("{}{}", cluster, CLUSTER_SEQS_SUFFIX));
        let output = dir.join(format!("{}{}", cluster, CLUSTER_MSA_SUFFIX));

        tools.align(&faa, &output, &log, threads)?;
        pb.inc(1);
    }

    pb.finish_and_clear();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Write;

    /// records invocations instead of spawning seqtk/mafft
    struct FakeTools {
        extracted: RefCell<Vec<PathBuf>>,
        aligned: RefCell<Vec<PathBuf>>,
        fail: bool,
    }

    impl FakeTools {
        fn new(fail: bool) -> Self {
            Self {
                extracted: RefCell::new(Vec::new()),
                aligned: RefCell::new(Vec::new()),
                fail,
            }
        }
    }

    impl SeqToolRunner for FakeTools {
        fn extract(&self, _faa: &Path, ids: &Path, output: &Path) -> Result<(), ClusterError> {
            if self.fail {
                use std::os::unix::process::ExitStatusExt;

                return Err(ClusterError::ToolFailed {
                    tool: "seqtk".to_string(),
                    status: std::process::ExitStatus::from_raw(1 << 8),
                    stderr: "boom".to_string(),
                });
            }

            std::fs::write(output, ">seq\nMAA\n")?;
            self.extracted.borrow_mut().push(ids.to_path_buf());

            Ok(())
        }

        fn align(
            &self,
            faa: &Path,
            output: &Path,
            _log: &Path,
            _threads: usize,
        ) -> Result<(), ClusterError> {
            std::fs::write(output, ">seq\nMAA\n")?;
            self.aligned.borrow_mut().push(faa.to_path_buf());

            Ok(())
        }
    }

    fn setup(outdir: &Path) -> Vec<(String, PathBuf)> {
        let clusters = group_clusters("A\tx1\nA\tx2\nB\tx3\n".as_bytes()).unwrap();
        write_cluster_ids(&clusters, outdir).unwrap();

        list_cluster_dirs(outdir).unwrap()
    }

    #[test]
    fn test_cluster_tree_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = setup(tmp.path());

        assert_eq!(dirs.len(), 2);

        let ids = tmp.path().join("A").join("A_ids.txt");
        let content = std::fs::read_to_string(ids).unwrap();
        assert_eq!(content, "x1\nx2\n");
    }

    #[test]
    fn test_extract_visits_every_cluster() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = setup(tmp.path());
        let tools = FakeTools::new(false);

        extract_sequences(&dirs, Path::new("proteins.faa"), &tools).unwrap();

        assert_eq!(tools.extracted.borrow().len(), 2);
        assert!(tmp.path().join("A").join("A_ids.faa").exists());
    }

    #[test]
    fn test_tool_failure_is_surfaced() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = setup(tmp.path());
        let tools = FakeTools::new(true);

        let result = extract_sequences(&dirs, Path::new("proteins.faa"), &tools);
        assert!(matches!(result, Err(ClusterError::ToolFailed { .. })));
    }

    #[test]
    fn test_lengths_and_statistics() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = setup(tmp.path());

        let lengths = load_lengths("x1\t10\nx2\t20\nx3\t7\n".as_bytes()).unwrap();
        let stats = write_member_lengths(&dirs, &lengths).unwrap();
        write_statistics(&stats, tmp.path()).unwrap();

        let a = stats.iter().find(|(c, _, _)| c == "A").unwrap();
        assert_eq!((a.1, a.2), (2, 15.0));

        let written = std::fs::read_to_string(tmp.path().join(CLUSTER_STATS)).unwrap();
        let rows = written.lines().collect::<Vec<&str>>();

        assert_eq!(rows[0], STATS_HEADER);
        assert!(rows.contains(&"A\t2\t15.0"));
        assert!(rows.contains(&"B\t1\t7.0"));

        let lengths_file =
            std::fs::read_to_string(tmp.path().join("A").join("A_lengths.txt")).unwrap();
        assert_eq!(lengths_file, "x1\t10\nx2\t20\n");
    }

    #[test]
    fn test_missing_length_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = setup(tmp.path());

        let lengths = load_lengths("x1\t10\n".as_bytes()).unwrap();
        let err = write_member_lengths(&dirs, &lengths).unwrap_err();

        assert!(matches!(err, ClusterError::MissingLength { .. }));
    }

    #[test]
    fn test_align_produces_msa_per_cluster() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = setup(tmp.path());
        let tools = FakeTools::new(false);

        extract_sequences(&dirs, Path::new("proteins.faa"), &tools).unwrap();
        align_clusters(&dirs, &tools, 4, tmp.path()).unwrap();

        assert_eq!(tools.aligned.borrow().len(), 2);
        assert!(tmp.path().join("B").join("B_ids.msa").exists());
    }

    #[test]
    fn test_idempotent_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let _ = setup(tmp.path());

        // second run overwrites the same artifacts in place
        let dirs = setup(tmp.path());
        let ids = std::fs::read_to_string(tmp.path().join("A").join("A_ids.txt")).unwrap();

        assert_eq!(dirs.len(), 2);
        assert_eq!(ids, "x1\nx2\n");
    }

    #[test]
    fn test_missing_length_error_names_the_id() {
        let err = ClusterError::MissingLength {
            id: "x9".to_string(),
        };
        let mut msg = Vec::new();
        write!(msg, "{}", err).unwrap();

        assert!(String::from_utf8(msg).unwrap().contains("x9"));
    }
}
