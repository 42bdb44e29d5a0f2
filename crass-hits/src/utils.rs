use hashbrown::HashSet;
use thiserror::Error;

use std::io::BufRead;

/// columns consumed from a domtblout row [the full format has 23]
pub const MIN_DOMTBLOUT_FIELDS: usize = 19;

const TARGET_NAME: usize = 0;
const TARGET_LEN: usize = 2;
const QUERY_NAME: usize = 3;
const QUERY_LEN: usize = 5;
const FULL_EVALUE: usize = 6;
const HMM_FROM: usize = 15;
const HMM_TO: usize = 16;
const ALI_FROM: usize = 17;
const ALI_TO: usize = 18;

#[derive(Debug, Error)]
pub enum DomtbloutError {
    #[error("line {line}: expected at least {MIN_DOMTBLOUT_FIELDS} columns, found {found}")]
    TooFewColumns { line: usize, found: usize },
    #[error("line {line}: invalid {field} value {value:?}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Aligned coordinate span of a domain hit, 0-based half-open.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentSpan {
    pub hit_start: u64,
    pub hit_end: u64,
    pub query_start: u64,
    pub query_end: u64,
}

/// One profile hit of a query sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub id: String,
    pub seq_len: u64,
    pub evalue: f64,
    /// e-value token as it appeared in the input, echoed verbatim on
    /// output so scientific notation survives the round trip
    pub evalue_raw: String,
    pub span: AlignmentSpan,
}

impl Hit {
    /// fraction of the profile's length spanned by the alignment
    pub fn coverage(&self) -> f64 {
        (self.span.hit_end - self.span.hit_start) as f64 / self.seq_len as f64
    }
}

/// All hits of one query sequence, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub id: String,
    pub seq_len: u64,
    pub hits: Vec<Hit>,
}

/// Parse a domtblout stream into per-query results.
///
/// Consecutive rows sharing a query name form one [`QueryResult`].
/// Within a query, only the first row per target defines the hit
/// [first-domain semantics]; later rows for the same target are
/// additional domains and are skipped. Comment rows [`#`-prefixed]
/// and blank rows are ignored.
pub fn parse_domtblout<R: BufRead>(input: R) -> Result<Vec<QueryResult>, DomtbloutError> {
    let mut queries: Vec<QueryResult> = Vec::new();
    let mut seen_targets: HashSet<String> = HashSet::new();

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let lineno = idx + 1;

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields = line.split_whitespace().collect::<Vec<&str>>();
        if fields.len() < MIN_DOMTBLOUT_FIELDS {
            return Err(DomtbloutError::TooFewColumns {
                line: lineno,
                found: fields.len(),
            });
        }

        let query_id = fields[QUERY_NAME];
        let target_id = fields[TARGET_NAME];

        if queries.last().map(|q| q.id.as_str()) != Some(query_id) {
            queries.push(QueryResult {
                id: query_id.to_string(),
                seq_len: parse_num::<u64>(fields[QUERY_LEN], "qlen", lineno)?,
                hits: Vec::new(),
            });
            seen_targets.clear();
        }

        if !seen_targets.insert(target_id.to_string()) {
            continue;
        }

        let hmm_from = parse_num::<u64>(fields[HMM_FROM], "hmm from", lineno)?;
        let hmm_to = parse_num::<u64>(fields[HMM_TO], "hmm to", lineno)?;
        let ali_from = parse_num::<u64>(fields[ALI_FROM], "ali from", lineno)?;
        let ali_to = parse_num::<u64>(fields[ALI_TO], "ali to", lineno)?;

        let hit = Hit {
            id: target_id.to_string(),
            seq_len: parse_num::<u64>(fields[TARGET_LEN], "tlen", lineno)?,
            evalue: parse_num::<f64>(fields[FULL_EVALUE], "e-value", lineno)?,
            evalue_raw: fields[FULL_EVALUE].to_string(),
            span: AlignmentSpan {
                hit_start: hmm_from.saturating_sub(1),
                hit_end: hmm_to,
                query_start: ali_from.saturating_sub(1),
                query_end: ali_to,
            },
        };

        queries
            .last_mut()
            .expect("query pushed above")
            .hits
            .push(hit);
    }

    Ok(queries)
}

fn parse_num<T: std::str::FromStr>(
    value: &str,
    field: &'static str,
    line: usize,
) -> Result<T, DomtbloutError> {
    value.parse::<T>().map_err(|_| DomtbloutError::InvalidNumber {
        line,
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(target: &str, tlen: u64, query: &str, qlen: u64, evalue: &str, hmm: (u64, u64)) -> String {
        format!(
            "{target} - {tlen} {query} - {qlen} {evalue} 77.8 0.1 1 1 1e-22 2e-21 70.1 0.0 {} {} 15 210 12 215 0.90 -",
            hmm.0, hmm.1
        )
    }

    #[test]
    fn test_parse_groups_consecutive_queries() {
        let input = format!(
            "# comment\n{}\n{}\n{}\n",
            row("TerL", 345, "q1", 512, "4e-23", (10, 200)),
            row("portal", 280, "q1", 512, "1e-05", (1, 100)),
            row("MCP", 400, "q2", 333, "0.002", (5, 300)),
        );

        let queries = parse_domtblout(input.as_bytes()).unwrap();

        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].id, "q1");
        assert_eq!(queries[0].seq_len, 512);
        assert_eq!(queries[0].hits.len(), 2);
        assert_eq!(queries[1].hits[0].id, "MCP");
    }

    #[test]
    fn test_first_domain_defines_the_hit() {
        let input = format!(
            "{}\n{}\n",
            row("TerL", 345, "q1", 512, "4e-23", (10, 200)),
            row("TerL", 345, "q1", 512, "4e-23", (220, 340)),
        );

        let queries = parse_domtblout(input.as_bytes()).unwrap();

        assert_eq!(queries[0].hits.len(), 1);
        assert_eq!(queries[0].hits[0].span.hit_start, 9);
        assert_eq!(queries[0].hits[0].span.hit_end, 200);
    }

    #[test]
    fn test_coverage_is_span_over_target_length() {
        let input = row("TerL", 100, "q1", 512, "1e-10", (1, 31));
        let queries = parse_domtblout(input.as_bytes()).unwrap();

        let hit = &queries[0].hits[0];
        assert_eq!(hit.coverage(), 0.31);
    }

    #[test]
    fn test_too_few_columns_is_fatal() {
        let err = parse_domtblout("TerL - 345 q1 - 512\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DomtbloutError::TooFewColumns { line: 1, found: 6 }));
    }

    #[test]
    fn test_invalid_number_is_fatal() {
        let input = row("TerL", 345, "q1", 512, "not_a_float", (10, 200));
        let err = parse_domtblout(input.as_bytes()).unwrap_err();

        assert!(matches!(
            err,
            DomtbloutError::InvalidNumber { field: "e-value", .. }
        ));
    }
}
