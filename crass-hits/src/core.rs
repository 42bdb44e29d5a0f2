use anyhow::Result;
use log::info;

use std::path::Path;

use config::{reader, resolve_output, write_collection, FILTERED_HITS_SUFFIX};

use crate::cli::Args;
use crate::utils::{parse_domtblout, Hit, QueryResult};

pub const HEADER: [&str; 10] = [
    "#HMM_family",
    "HMM_len",
    "Query_ID",
    "Query_len",
    "E-value",
    "HMM_start",
    "HMM_end",
    "Query_start",
    "Query_end",
    "Coverage",
];

pub fn filter_hits(args: Args) -> Result<()> {
    for input in &args.domtblout {
        let output = resolve_output(input, FILTERED_HITS_SUFFIX, args.outdir.as_deref());
        filter_file(input, &output, args.evalue, args.coverage)?;
    }

    Ok(())
}

/// Filter one domtblout file into its tabular significant-hits report.
pub fn filter_file<P: AsRef<Path>>(
    input: P,
    output: P,
    evalue_threshold: f64,
    coverage_threshold: f64,
) -> Result<()> {
    let queries = parse_domtblout(reader(&input)?)?;

    let mut lines = vec![HEADER.join("\t")];
    let mut kept = 0_usize;

    for query in &queries {
        for hit in &query.hits {
            if passes(hit.evalue, hit.coverage(), evalue_threshold, coverage_threshold) {
                lines.push(format_row(query, hit));
                kept += 1;
            }
        }
    }

    write_collection(&lines, &output)?;
    info!(
        "{}: kept {} of {} hits across {} queries",
        input.as_ref().display(),
        kept,
        queries.iter().map(|q| q.hits.len()).sum::<usize>(),
        queries.len()
    );

    Ok(())
}

/// Dual significance threshold: e-value strictly below, coverage
/// strictly above. Both boundaries are exclusive.
pub fn passes(
    evalue: f64,
    coverage: f64,
    evalue_threshold: f64,
    coverage_threshold: f64,
) -> bool {
    evalue < evalue_threshold && coverage > coverage_threshold
}

pub fn format_row(query: &QueryResult, hit: &Hit) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        hit.id,
        hit.seq_len,
        query.id,
        query.seq_len,
        hit.evalue_raw,
        hit.span.hit_start,
        hit.span.hit_end,
        hit.span.query_start,
        hit.span.query_end,
        hit.coverage()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::AlignmentSpan;
    use std::io::Write;

    fn hit(evalue: f64, tlen: u64, span: (u64, u64)) -> Hit {
        Hit {
            id: "TerL".to_string(),
            seq_len: tlen,
            evalue,
            evalue_raw: format!("{}", evalue),
            span: AlignmentSpan {
                hit_start: span.0,
                hit_end: span.1,
                query_start: 0,
                query_end: 10,
            },
        }
    }

    #[test]
    fn test_passing_hit_is_kept() {
        let hit = hit(0.04, 100, (0, 31));
        assert!(passes(hit.evalue, hit.coverage(), 0.05, 0.3));
    }

    #[test]
    fn test_evalue_boundary_is_excluded() {
        let hit = hit(0.05, 100, (0, 31));
        assert!(!passes(hit.evalue, hit.coverage(), 0.05, 0.3));
    }

    #[test]
    fn test_coverage_boundary_is_excluded() {
        let hit = hit(0.04, 100, (0, 30));
        assert_eq!(hit.coverage(), 0.3);
        assert!(!passes(hit.evalue, hit.coverage(), 0.05, 0.3));
    }

    #[test]
    fn test_format_row_echoes_evalue_verbatim() {
        let query = QueryResult {
            id: "q1".to_string(),
            seq_len: 512,
            hits: vec![],
        };
        let mut hit = hit(4e-23, 345, (9, 200));
        hit.evalue_raw = "4e-23".to_string();

        assert_eq!(
            format_row(&query, &hit),
            format!("TerL\t345\tq1\t512\t4e-23\t9\t200\t0\t10\t{}", 191.0 / 345.0)
        );
    }

    #[test]
    fn test_outdir_flag_redirects_filtered_tables() {
        let indir = tempfile::tempdir().unwrap();
        let outdir = tempfile::tempdir().unwrap();

        let input = indir.path().join("all_domtblout.txt");
        std::fs::write(
            &input,
            "TerL - 100 q1 - 512 0.04 77.8 0.1 1 1 1e-22 2e-21 70.1 0.0 1 31 15 210 12 215 0.90 -\n",
        )
        .unwrap();

        let args = Args {
            domtblout: vec![input],
            evalue: 0.05,
            coverage: 0.3,
            outdir: Some(outdir.path().to_path_buf()),
        };
        filter_hits(args).unwrap();

        assert!(outdir.path().join("all_domtblout_filtered_0.05.txt").exists());
        assert!(!indir.path().join("all_domtblout_filtered_0.05.txt").exists());
    }

    #[test]
    fn test_filter_file_writes_header_and_passing_rows() {
        let mut input = tempfile::NamedTempFile::new().unwrap();
        // q1 passes both cutoffs, q2 fails coverage
        writeln!(
            input,
            "TerL - 100 q1 - 512 0.04 77.8 0.1 1 1 1e-22 2e-21 70.1 0.0 1 31 15 210 12 215 0.90 -"
        )
        .unwrap();
        writeln!(
            input,
            "TerL - 100 q2 - 333 0.04 77.8 0.1 1 1 1e-22 2e-21 70.1 0.0 1 30 15 210 12 215 0.90 -"
        )
        .unwrap();

        let output = tempfile::NamedTempFile::new().unwrap();
        filter_file(
            input.path().to_path_buf(),
            output.path().to_path_buf(),
            0.05,
            0.3,
        )
        .unwrap();

        let written = std::fs::read_to_string(output.path()).unwrap();
        let lines = written.lines().collect::<Vec<&str>>();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], HEADER.join("\t"));
        assert!(lines[1].starts_with("TerL\t100\tq1\t512\t0.04\t0\t31\t14\t210\t"));
    }
}
