//! Minimal GFF record and attribute handling
//!
//! The annotation files of the pipeline are 9-column positional records
//! whose last column is a semicolon-delimited list of `key=value`
//! attributes. The first attribute encodes an identifier suffix used to
//! recover the protein number, so this module exposes an explicit
//! last-delimiter split that surfaces a specific parse error instead of
//! letting a generic index error propagate.

use thiserror::Error;

pub const GFF_FIELDS: usize = 9;

/// index of the feature-type column [gene, CDS, ...]
pub const FEATURE_COLUMN: usize = 2;

#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("malformed annotation record [expected {GFF_FIELDS} columns, found {found}]: {line}")]
    MalformedRecord { found: usize, line: String },
    #[error("malformed identifier {id:?}: no {delimiter:?} delimiter to split on")]
    MalformedId { id: String, delimiter: char },
    #[error("identifier {id:?} has too few '_'-delimited tokens to derive a short id")]
    ShortIdTokens { id: String },
}

/// One non-comment line of a 9-column annotation file.
#[derive(Debug, Clone, PartialEq)]
pub struct GffRecord {
    fields: Vec<String>,
}

impl GffRecord {
    /// A line is a comment when its first tab-delimited field starts
    /// with `#`.
    pub fn is_comment(line: &str) -> bool {
        line.split('\t')
            .next()
            .map_or(false, |field| field.starts_with('#'))
    }

    pub fn parse(line: &str) -> Result<Self, AnnotationError> {
        let fields = line
            .split('\t')
            .map(|f| f.to_string())
            .collect::<Vec<String>>();

        if fields.len() != GFF_FIELDS {
            return Err(AnnotationError::MalformedRecord {
                found: fields.len(),
                line: line.to_string(),
            });
        }

        Ok(Self { fields })
    }

    pub fn seqname(&self) -> &str {
        &self.fields[0]
    }

    pub fn feature(&self) -> &str {
        &self.fields[FEATURE_COLUMN]
    }

    pub fn attributes(&self) -> Attributes {
        Attributes::parse(&self.fields[GFF_FIELDS - 1])
    }

    pub fn set_attributes(&mut self, attributes: &Attributes) {
        self.fields[GFF_FIELDS - 1] = attributes.to_string();
    }

    pub fn to_line(&self) -> String {
        self.fields.join("\t")
    }
}

/// The semicolon-delimited `key=value` list of the attributes column,
/// kept as an ordered list of raw entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Attributes {
    entries: Vec<String>,
}

impl Attributes {
    pub fn parse(raw: &str) -> Self {
        Self {
            entries: raw.split(';').map(|e| e.to_string()).collect(),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// `parse` always yields at least one entry [`split` on an empty
    /// string gives one empty field], so the first entry is total.
    pub fn first(&self) -> &str {
        &self.entries[0]
    }

    /// Rebuild the attribute list with a `name=<value>` entry inserted
    /// right after the first attribute.
    ///
    /// With `drop_second`, the original attribute at index 1 is removed
    /// [the `name=` entry inserted by a previous pass], so re-running the
    /// rewrite does not stack `name=` entries.
    pub fn with_name(&self, name: &str, drop_second: bool) -> Self {
        let mut entries = Vec::with_capacity(self.entries.len() + 1);

        entries.push(self.entries[0].clone());
        entries.push(format!("name={}", name));

        let rest = if drop_second { 2 } else { 1 };
        entries.extend(self.entries.iter().skip(rest).cloned());

        Self { entries }
    }
}

impl std::fmt::Display for Attributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.entries.join(";"))
    }
}

/// Split an identifier on the last occurrence of `delimiter`.
///
/// A missing delimiter violates the identifier contract and is a fatal
/// input error for the caller.
pub fn split_last(id: &str, delimiter: char) -> Result<(&str, &str), AnnotationError> {
    match id.rfind(delimiter) {
        Some(pos) => Ok((&id[..pos], &id[pos + 1..])),
        None => Err(AnnotationError::MalformedId {
            id: id.to_string(),
            delimiter,
        }),
    }
}
