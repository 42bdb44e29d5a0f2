use anyhow::{bail, Result};
use log::info;

use std::io::BufRead;
use std::path::Path;

use config::{
    functional_colors, gff::split_last, reader, resolve_output, write_collection, Attributes,
    FunctionalColors, GffRecord, EDITED_GFF_SUFFIX, FILTERED_GFF_SUFFIX, HP, OTHER_FUNCTIONS,
};

use crate::cli::{ColorsArgs, TableArgs};
use crate::utils::{apply_names_to_table, get_profile_name_map, read_name_pairs, NameMap};

/// The two annotation flavors of the pipeline. They differ in how the
/// protein identifier is recovered from the first attribute and in the
/// feature-type contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Variant {
    /// `ID=<n>_<m>`; the record identifier is `<seqname>_<m>`
    Prodigal,
    /// first attribute ends with `-<protein id>`; CDS records only
    Refseq,
}

/// `table` subcommand: resolve profile nicknames, materialize the
/// named hit tables and insert `name=` attributes into each GFF.
pub fn make_annotation_tables(args: TableArgs) -> Result<()> {
    if args.domtblout.len() != args.gff.len() {
        bail!(
            "expected as many --domtblout tables as --gff files, got {} and {}",
            args.domtblout.len(),
            args.gff.len()
        );
    }

    let profile_names = get_profile_name_map(&args.profiles)?;
    info!("Loaded {} profile nicknames", profile_names.len());

    for (table, gff) in args.domtblout.iter().zip(args.gff.iter()) {
        let names = apply_names_to_table(table, &profile_names, args.outdir.as_deref())?;
        let output = resolve_output(gff, EDITED_GFF_SUFFIX, args.outdir.as_deref());

        rewrite_annotation(gff, &output, &names, None, Variant::Prodigal)?;
    }

    match (&args.refseq_domtblout, &args.refseq_gff) {
        (Some(table), Some(gff)) => {
            let names = apply_names_to_table(table, &profile_names, args.outdir.as_deref())?;
            let output = resolve_output(gff, EDITED_GFF_SUFFIX, args.outdir.as_deref());

            rewrite_annotation(gff, &output, &names, None, Variant::Refseq)?;
        }
        (None, None) => {}
        _ => bail!("--refseq-domtblout and --refseq-gff must be given together"),
    }

    Ok(())
}

/// `colors` subcommand: re-resolve `name=` attributes against the
/// functional-color allow-list, coercing unknown functions to the
/// catch-all category.
pub fn color_annotations(args: ColorsArgs) -> Result<()> {
    if args.names.len() != args.gff.len() {
        bail!(
            "expected as many --names tables as --gff files, got {} and {}",
            args.names.len(),
            args.gff.len()
        );
    }

    let colors = functional_colors();

    for (table, gff) in args.names.iter().zip(args.gff.iter()) {
        let names = read_name_pairs(table)?;
        let output = resolve_output(gff, FILTERED_GFF_SUFFIX, args.outdir.as_deref());

        rewrite_annotation(gff, &output, &names, Some(&colors), Variant::Prodigal)?;
    }

    match (&args.refseq_names, &args.refseq_gff) {
        (Some(table), Some(gff)) => {
            let names = read_name_pairs(table)?;
            let output = resolve_output(gff, FILTERED_GFF_SUFFIX, args.outdir.as_deref());

            rewrite_annotation(gff, &output, &names, Some(&colors), Variant::Refseq)?;
        }
        (None, None) => {}
        _ => bail!("--refseq-names and --refseq-gff must be given together"),
    }

    Ok(())
}

/// Rewrite one annotation file, resolving each record's protein
/// identifier through `names` and inserting the result as a `name=`
/// attribute. Unresolved identifiers default to `hp`.
///
/// When a functional-color allow-list is supplied, resolved names
/// absent from it are replaced by `other_known_functions` and the
/// attribute previously holding the name [index 1] is dropped, so the
/// rewrite is idempotent. Comment lines are dropped from the output.
pub fn rewrite_annotation<P: AsRef<Path>>(
    input: P,
    output: P,
    names: &NameMap,
    colors: Option<&FunctionalColors>,
    variant: Variant,
) -> Result<()> {
    let mut edited = Vec::new();

    for line in reader(&input)?.lines() {
        let line = line?;

        if GffRecord::is_comment(&line) || line.is_empty() {
            continue;
        }

        if let Some(rewritten) = rewrite_record(&line, names, colors, variant)? {
            edited.push(rewritten);
        }
    }

    write_collection(&edited, &output)?;
    info!(
        "Rewrote {} records from {}",
        edited.len(),
        input.as_ref().display()
    );

    Ok(())
}

/// Rewrite a single record line; `None` means the record is outside
/// the variant's contract and is silently skipped [refseq only].
pub fn rewrite_record(
    line: &str,
    names: &NameMap,
    colors: Option<&FunctionalColors>,
    variant: Variant,
) -> Result<Option<String>> {
    let mut record = match (GffRecord::parse(line), variant) {
        (Ok(record), _) => record,
        // INFO: refseq annotations carry stray non-record lines
        (Err(_), Variant::Refseq) => return Ok(None),
        (Err(e), Variant::Prodigal) => return Err(e.into()),
    };

    if variant == Variant::Refseq && record.feature() != "CDS" {
        return Ok(None);
    }

    let attributes = record.attributes();
    let first = attributes.first();

    let id = match variant {
        Variant::Prodigal => {
            let (_, protein_number) = split_last(first, '_')?;
            format!("{}_{}", record.seqname(), protein_number)
        }
        Variant::Refseq => {
            let (_, protein_id) = split_last(first, '-')?;
            protein_id.to_string()
        }
    };

    let resolved = resolve_name(&id, names, colors);
    let edited: Attributes = attributes.with_name(&resolved, colors.is_some());

    record.set_attributes(&edited);

    Ok(Some(record.to_line()))
}

/// Resolve an identifier to its protein-function name: `hp` when the
/// identifier is unknown, and [when an allow-list is given] the
/// catch-all category when the name has no assigned color.
pub fn resolve_name(id: &str, names: &NameMap, colors: Option<&FunctionalColors>) -> String {
    let resolved = names.get(id).map(String::as_str).unwrap_or(HP);

    match colors {
        Some(colors) if !colors.contains_key(resolved) => OTHER_FUNCTIONS.to_string(),
        _ => resolved.to_string(),
    }
}
