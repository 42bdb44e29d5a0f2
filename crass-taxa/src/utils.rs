use anyhow::{anyhow, Result};

use std::io::BufRead;

use config::UNKNOWN;

pub const CLASS_COLUMN: &str = "Class";
pub const ORDER_COLUMN: &str = "Order";
pub const FAMILY_COLUMN: &str = "Family";
pub const SUBFAMILY_COLUMN: &str = "Subfamily";

/// In-memory taxonomy table: a header plus one row of cells per
/// reference genome. Missing cells [empty fields or short rows] are
/// replaced by the `unknown` placeholder on load.
#[derive(Debug, Clone)]
pub struct TaxonomyTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TaxonomyTable {
    pub fn read<R: BufRead>(input: R) -> Result<Self> {
        let mut lines = input.lines();

        let header = lines
            .next()
            .ok_or_else(|| anyhow!("taxonomy table is empty"))??
            .split('\t')
            .map(|c| c.to_string())
            .collect::<Vec<String>>();

        let mut rows = Vec::new();
        for line in lines {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            let mut row = line
                .split('\t')
                .map(|cell| {
                    if cell.is_empty() {
                        UNKNOWN.to_string()
                    } else {
                        cell.to_string()
                    }
                })
                .collect::<Vec<String>>();
            row.resize(header.len(), UNKNOWN.to_string());

            rows.push(row);
        }

        Ok(Self { header, rows })
    }

    pub fn column(&self, name: &str) -> Result<usize> {
        self.header
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| anyhow!("taxonomy table has no {:?} column", name))
    }

    /// header plus the given rows, ready for a tab-separated file
    pub fn to_lines(&self, rows: &[Vec<String>]) -> Vec<String> {
        let mut lines = vec![self.header.join("\t")];
        lines.extend(rows.iter().map(|row| row.join("\t")));

        lines
    }
}
