use anyhow::{anyhow, Result};
use hashbrown::{HashMap, HashSet};

use std::io::BufRead;
use std::path::Path;

use config::{
    gff::AnnotationError, reader, resolve_output, write_collection, WITH_NAMES_SUFFIX,
    WITH_NAMES_UNIQUE_SUFFIX,
};

/// profile/query identifier -> canonical protein name
pub type NameMap = HashMap<String, String>;

pub const HMM_FAMILY_COLUMN: &str = "#HMM_family";
pub const QUERY_ID_COLUMN: &str = "Query_ID";

/// Derive the short identifier a GFF record resolves against: the
/// 4th-5th underscore-delimited tokens of a query identifier, joined
/// by an underscore.
pub fn derive_short_id(query_id: &str) -> Result<String, AnnotationError> {
    let tokens = query_id.split('_').collect::<Vec<&str>>();

    if tokens.len() < 5 {
        return Err(AnnotationError::ShortIdTokens {
            id: query_id.to_string(),
        });
    }

    Ok(tokens[3..5].join("_"))
}

/// Read the two-column profile list [profile ID, nickname] into a map.
/// The first line is a header and is skipped.
pub fn get_profile_name_map<P: AsRef<Path>>(path: P) -> Result<NameMap> {
    let mut map = NameMap::new();

    for (idx, line) in reader(&path)?.lines().enumerate() {
        let line = line?;
        if idx == 0 || line.is_empty() {
            continue;
        }

        let mut fields = line.split('\t');
        let profile = fields
            .next()
            .ok_or_else(|| anyhow!("{}: empty row {}", path.as_ref().display(), idx + 1))?;
        let nickname = fields.next().ok_or_else(|| {
            anyhow!(
                "{}: row {} has no nickname column",
                path.as_ref().display(),
                idx + 1
            )
        })?;

        map.insert(profile.to_string(), nickname.to_string());
    }

    Ok(map)
}

/// Rewrite the `#HMM_family` column of a filtered domtblout table
/// through the profile nickname map and materialize two companions:
/// the full rewritten table [`_with_names.txt`] and the unique
/// [`#HMM_family`, `Query_ID`] pair table [`_with_names_unique.txt`].
///
/// Returns the protein-name map keyed by the derived short identifier.
/// Later rows silently overwrite earlier ones on key collision.
pub fn apply_names_to_table<P: AsRef<Path>>(
    table: P,
    profile_names: &NameMap,
    outdir: Option<&Path>,
) -> Result<NameMap> {
    let mut lines = reader(&table)?.lines().collect::<Result<Vec<String>, _>>()?;

    if lines.is_empty() {
        return Err(anyhow!("{}: empty table", table.as_ref().display()));
    }

    let header = lines.remove(0);
    let columns = header.split('\t').collect::<Vec<&str>>();
    let family_idx = column_index(&columns, HMM_FAMILY_COLUMN, &table)?;
    let query_idx = column_index(&columns, QUERY_ID_COLUMN, &table)?;

    let mut edited = vec![header.clone()];
    let mut pairs = vec![format!("{}\t{}", HMM_FAMILY_COLUMN, QUERY_ID_COLUMN)];
    let mut seen = HashSet::new();
    let mut names = NameMap::new();

    for line in &lines {
        let mut fields = line.split('\t').map(|f| f.to_string()).collect::<Vec<String>>();
        if fields.len() <= family_idx.max(query_idx) {
            return Err(anyhow!(
                "{}: row with too few columns: {}",
                table.as_ref().display(),
                line
            ));
        }

        if let Some(nickname) = profile_names.get(&fields[family_idx]) {
            fields[family_idx] = nickname.clone();
        }

        let family = fields[family_idx].clone();
        let query = fields[query_idx].clone();

        edited.push(fields.join("\t"));

        if seen.insert((family.clone(), query.clone())) {
            pairs.push(format!("{}\t{}", family, query));
            names.insert(derive_short_id(&query)?, family);
        }
    }

    write_collection(&edited, resolve_output(&table, WITH_NAMES_SUFFIX, outdir))?;
    write_collection(&pairs, resolve_output(&table, WITH_NAMES_UNIQUE_SUFFIX, outdir))?;

    Ok(names)
}

/// Load a unique [`#HMM_family`, `Query_ID`] pair table into a
/// protein-name map keyed by the derived short identifier.
pub fn read_name_pairs<P: AsRef<Path>>(path: P) -> Result<NameMap> {
    let mut lines = reader(&path)?.lines().collect::<Result<Vec<String>, _>>()?;

    if lines.is_empty() {
        return Err(anyhow!("{}: empty table", path.as_ref().display()));
    }

    let header = lines.remove(0);
    let columns = header.split('\t').collect::<Vec<&str>>();
    let family_idx = column_index(&columns, HMM_FAMILY_COLUMN, &path)?;
    let query_idx = column_index(&columns, QUERY_ID_COLUMN, &path)?;

    let mut names = NameMap::new();
    for line in &lines {
        let fields = line.split('\t').collect::<Vec<&str>>();
        if fields.len() <= family_idx.max(query_idx) {
            return Err(anyhow!(
                "{}: row with too few columns: {}",
                path.as_ref().display(),
                line
            ));
        }

        names.insert(
            derive_short_id(fields[query_idx])?,
            fields[family_idx].to_string(),
        );
    }

    Ok(names)
}

fn column_index<P: AsRef<Path>>(columns: &[&str], name: &str, table: P) -> Result<usize> {
    columns.iter().position(|c| *c == name).ok_or_else(|| {
        anyhow!(
            "{}: missing {:?} column in header",
            table.as_ref().display(),
            name
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_derive_short_id() {
        let short = derive_short_id("genomes_meta_4_NC_024711_23").unwrap();
        assert_eq!(short, "NC_024711");

        let err = derive_short_id("too_few_tokens").unwrap_err();
        assert!(matches!(err, AnnotationError::ShortIdTokens { .. }));
    }

    #[test]
    fn test_apply_names_rewrites_family_and_dedups() {
        let mut table = tempfile::NamedTempFile::new().unwrap();
        writeln!(table, "#HMM_family\tHMM_len\tQuery_ID").unwrap();
        writeln!(table, "profile_86\t345\ta_b_c_NC_1\t").unwrap();
        writeln!(table, "profile_86\t345\ta_b_c_NC_1\t").unwrap();
        writeln!(table, "unmapped_profile\t200\ta_b_c_NC_2\t").unwrap();

        let mut profiles = NameMap::new();
        profiles.insert("profile_86".to_string(), "gene86".to_string());

        let names = apply_names_to_table(table.path().to_path_buf(), &profiles, None).unwrap();

        // mapped nickname, unmapped passes through
        assert_eq!(names.get("NC_1").map(String::as_str), Some("gene86"));
        assert_eq!(
            names.get("NC_2").map(String::as_str),
            Some("unmapped_profile")
        );

        let unique = std::fs::read_to_string(resolve_output(
            table.path(),
            WITH_NAMES_UNIQUE_SUFFIX,
            None,
        ))
        .unwrap();
        let rows = unique.lines().collect::<Vec<&str>>();

        // header + two unique pairs [duplicate dropped]
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], "gene86\ta_b_c_NC_1");
    }

    #[test]
    fn test_name_collision_is_last_write_wins() {
        let mut table = tempfile::NamedTempFile::new().unwrap();
        writeln!(table, "#HMM_family\tQuery_ID").unwrap();
        writeln!(table, "TerL\tx_y_z_NC_9").unwrap();
        writeln!(table, "portal\tw_y_z_NC_9").unwrap();

        let names = read_name_pairs(table.path().to_path_buf()).unwrap();

        assert_eq!(names.len(), 1);
        assert_eq!(names.get("NC_9").map(String::as_str), Some("portal"));
    }
}
