use anyhow::Result;
use hashbrown::HashSet;
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};

use config::{reader, write_collection, UNKNOWN};

use crate::cli::Args;
use crate::utils::{TaxonomyTable, CLASS_COLUMN, FAMILY_COLUMN, ORDER_COLUMN, SUBFAMILY_COLUMN};

/// Filter the taxonomy to the target scope and draw a bounded random
/// sample per family, persisting both tables as TSV.
pub fn sample_taxonomy(args: Args) -> Result<()> {
    let table = TaxonomyTable::read(reader(&args.input)?)?;
    info!("Shape of original table: {} rows", table.rows.len());

    let filtered = filter_scope(&table, &args.class, &args.exclude_order)?;
    info!("Shape of table after filtering: {} rows", filtered.len());

    let family_idx = table.column(FAMILY_COLUMN)?;
    let subfamily_idx = table.column(SUBFAMILY_COLUMN)?;
    info!(
        "{} after filtering contains: {} families",
        args.class,
        distinct_values(&filtered, family_idx)
    );
    info!(
        "{} after filtering contains: {} subfamilies",
        args.class,
        distinct_values(&filtered, subfamily_idx)
    );

    write_collection(&table.to_lines(&filtered), &args.filtered)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(
        "The random number of genomes per {} family is equal to {}",
        args.class, args.per_family
    );
    let sampled = sample_per_family(&filtered, family_idx, args.per_family, &mut rng);
    info!("Shape of table after random selection: {} rows", sampled.len());

    write_collection(&table.to_lines(&sampled), &args.random)?;

    Ok(())
}

/// Rows of the target class, excluding the named order and rows whose
/// family is the missing-value placeholder.
pub fn filter_scope(
    table: &TaxonomyTable,
    target_class: &str,
    excluded_order: &str,
) -> Result<Vec<Vec<String>>> {
    let class_idx = table.column(CLASS_COLUMN)?;
    let order_idx = table.column(ORDER_COLUMN)?;
    let family_idx = table.column(FAMILY_COLUMN)?;

    let filtered = table
        .rows
        .iter()
        .filter(|row| {
            row[class_idx] == target_class
                && row[order_idx] != excluded_order
                && row[family_idx] != UNKNOWN
        })
        .cloned()
        .collect::<Vec<Vec<String>>>();

    Ok(filtered)
}

pub fn distinct_values(rows: &[Vec<String>], column: usize) -> usize {
    rows.iter()
        .map(|row| row[column].as_str())
        .collect::<HashSet<&str>>()
        .len()
}

/// Draw up to `per_family` rows per distinct family, uniformly without
/// replacement; smaller families are taken whole. The random source is
/// injected so runs are reproducible under test.
pub fn sample_per_family<R: Rng>(
    rows: &[Vec<String>],
    family_column: usize,
    per_family: usize,
    rng: &mut R,
) -> Vec<Vec<String>> {
    // INFO: group row indexes per family, preserving first-seen family order
    let mut families: Vec<(&str, Vec<usize>)> = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        let family = row[family_column].as_str();

        match families.iter_mut().find(|(name, _)| *name == family) {
            Some((_, members)) => members.push(idx),
            None => families.push((family, vec![idx])),
        }
    }

    let mut sampled = Vec::new();
    for (_, members) in families {
        let amount = per_family.min(members.len());
        let mut chosen = rand::seq::index::sample(rng, members.len(), amount).into_vec();
        chosen.sort_unstable();

        sampled.extend(chosen.into_iter().map(|i| rows[members[i]].clone()));
    }

    sampled
}
