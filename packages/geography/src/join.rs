//! Spatial Join Engine: boundaries to statistical rows by normalized name.
//!
//! The join is boundary-preserving. Every boundary appears once in the
//! output, matched or not. Statistical rows that match no boundary are
//! dropped, never given invented geometry, and are reported in
//! [`JoinDiagnostics`].

use std::collections::{BTreeMap, BTreeSet};

use india_pop_geography_models::{BoundaryRecord, JoinDiagnostics};

use crate::normalize::normalize;

/// A boundary and the statistical row it matched, if any.
#[derive(Debug)]
pub struct JoinedRow<'a, S> {
    /// The boundary record.
    pub boundary: &'a BoundaryRecord,
    /// The matching statistical row.
    pub matched: Option<&'a S>,
}

/// Left-joins `statistics` onto `boundaries` by normalized name.
///
/// `name_of` returns a statistical row's display name. When several rows
/// share a normalized name, the first one wins. `sample_size` caps the
/// name lists in the returned diagnostics.
pub fn left_join<'a, S, F>(
    boundaries: &'a [BoundaryRecord],
    statistics: &'a [S],
    name_of: F,
    sample_size: usize,
) -> (Vec<JoinedRow<'a, S>>, JoinDiagnostics)
where
    F: Fn(&S) -> &str,
{
    left_join_described(
        boundaries,
        statistics,
        &name_of,
        |stat| name_of(stat).to_string(),
        sample_size,
    )
}

/// [`left_join`], with `describe` labelling statistical rows in the
/// duplicate-name diagnostics (for example "Aurangabad (Bihar)").
pub fn left_join_described<'a, S, F, D>(
    boundaries: &'a [BoundaryRecord],
    statistics: &'a [S],
    name_of: F,
    describe: D,
    sample_size: usize,
) -> (Vec<JoinedRow<'a, S>>, JoinDiagnostics)
where
    F: Fn(&S) -> &str,
    D: Fn(&S) -> String,
{
    let mut by_key: BTreeMap<String, &S> = BTreeMap::new();
    let mut sharing_key: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for stat in statistics {
        let key = normalize(name_of(stat));
        sharing_key
            .entry(key.clone())
            .or_default()
            .push(describe(stat));
        by_key.entry(key).or_insert(stat);
    }
    let duplicate_statistic_names: BTreeMap<String, Vec<String>> = sharing_key
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .collect();
    let duplicate_statistic_keys: usize = duplicate_statistic_names
        .values()
        .map(|names| names.len() - 1)
        .sum();

    let mut boundaries_per_key: BTreeMap<&str, usize> = BTreeMap::new();
    for boundary in boundaries {
        *boundaries_per_key.entry(boundary.key.as_str()).or_default() += 1;
    }
    let shared_boundaries: Vec<&BoundaryRecord> = boundaries
        .iter()
        .filter(|b| boundaries_per_key[b.key.as_str()] > 1)
        .collect();
    let shared_boundary_names: BTreeSet<&str> =
        shared_boundaries.iter().map(|b| b.name.as_str()).collect();

    let rows: Vec<JoinedRow<'a, S>> = boundaries
        .iter()
        .map(|boundary| JoinedRow {
            boundary,
            matched: by_key.get(&boundary.key).copied(),
        })
        .collect();

    let matched_count = rows.iter().filter(|r| r.matched.is_some()).count();

    let unmatched_boundaries: BTreeSet<&str> = rows
        .iter()
        .filter(|r| r.matched.is_none())
        .map(|r| r.boundary.name.as_str())
        .collect();

    let boundary_keys: BTreeSet<&str> = boundaries.iter().map(|b| b.key.as_str()).collect();
    let unmatched_statistics: BTreeSet<&str> = statistics
        .iter()
        .map(&name_of)
        .filter(|name| !boundary_keys.contains(normalize(*name).as_str()))
        .collect();

    let diagnostics = JoinDiagnostics {
        boundary_count: boundaries.len(),
        statistic_count: statistics.len(),
        matched_count,
        duplicate_statistic_keys,
        duplicate_statistic_names,
        shared_boundary_key_count: shared_boundaries.len(),
        shared_boundary_keys: sample(&shared_boundary_names, sample_size),
        unmatched_boundary_count: unmatched_boundaries.len(),
        unmatched_statistic_count: unmatched_statistics.len(),
        unmatched_boundaries: sample(&unmatched_boundaries, sample_size),
        unmatched_statistics: sample(&unmatched_statistics, sample_size),
    };

    log::info!(
        "Matched {}/{} boundaries ({:.1}% coverage) against {} statistical rows",
        diagnostics.matched_count,
        diagnostics.boundary_count,
        diagnostics.coverage() * 100.0,
        diagnostics.statistic_count,
    );
    for (key, names) in &diagnostics.duplicate_statistic_names {
        log::warn!("Statistical rows share the name {key}, joined the first of {names:?}");
    }
    if diagnostics.shared_boundary_key_count > 0 {
        log::warn!(
            "{} boundaries share a name with another boundary, e.g. {:?}",
            diagnostics.shared_boundary_key_count,
            diagnostics.shared_boundary_keys,
        );
    }
    if !diagnostics.unmatched_statistics.is_empty() {
        log::warn!(
            "{} statistical names have no boundary, e.g. {:?}",
            diagnostics.unmatched_statistic_count,
            diagnostics.unmatched_statistics,
        );
    }

    (rows, diagnostics)
}

fn sample(names: &BTreeSet<&str>, n: usize) -> Vec<String> {
    names.iter().take(n).map(|s| (*s).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use geo::MultiPolygon;

    use super::*;

    fn boundary(name: &str) -> BoundaryRecord {
        BoundaryRecord {
            name: name.to_string(),
            key: normalize(name),
            geometry: MultiPolygon(vec![]),
            area_km2: 100.0,
        }
    }

    struct Stat {
        name: &'static str,
        value: u32,
    }

    fn stat(name: &'static str, value: u32) -> Stat {
        Stat { name, value }
    }

    #[test]
    fn matches_despite_spelling_differences() {
        let boundaries = vec![boundary("North Goa"), boundary("Sri-Ganganagar")];
        let stats = vec![stat("NORTH GOA", 1), stat("Sri Ganganagar.", 2)];
        let (rows, diagnostics) = left_join(&boundaries, &stats, |s| s.name, 10);
        assert_eq!(diagnostics.matched_count, 2);
        assert_eq!(rows[0].matched.map(|s| s.value), Some(1));
        assert_eq!(rows[1].matched.map(|s| s.value), Some(2));
    }

    #[test]
    fn keeps_unmatched_boundaries_and_drops_unmatched_statistics() {
        let boundaries = vec![boundary("Pune"), boundary("Leh")];
        let stats = vec![stat("Pune", 1), stat("Atlantis", 2)];
        let (rows, diagnostics) = left_join(&boundaries, &stats, |s| s.name, 10);
        assert_eq!(rows.len(), 2);
        assert!(rows[1].matched.is_none());
        assert_eq!(diagnostics.unmatched_boundaries, vec!["Leh"]);
        assert_eq!(diagnostics.unmatched_statistics, vec!["Atlantis"]);
    }

    #[test]
    fn disjoint_names_match_nothing_without_error() {
        let boundaries = vec![boundary("A"), boundary("B")];
        let stats = vec![stat("C", 1), stat("D", 2)];
        let (rows, diagnostics) = left_join(&boundaries, &stats, |s| s.name, 10);
        assert_eq!(diagnostics.matched_count, 0);
        assert!(rows.iter().all(|r| r.matched.is_none()));
        assert_eq!(diagnostics.boundary_count, 2);
        assert_eq!(diagnostics.statistic_count, 2);
    }

    #[test]
    fn first_duplicate_statistic_wins() {
        let boundaries = vec![boundary("Aurangabad")];
        let stats = vec![stat("Aurangabad", 1), stat("AURANGABAD", 2)];
        let (rows, diagnostics) = left_join(&boundaries, &stats, |s| s.name, 10);
        assert_eq!(rows[0].matched.map(|s| s.value), Some(1));
        assert_eq!(diagnostics.duplicate_statistic_keys, 1);
    }

    #[test]
    fn same_name_in_two_states_is_reported() {
        struct District {
            name: &'static str,
            state: &'static str,
        }
        let boundaries = vec![boundary("Aurangabad"), boundary("Aurangabad"), boundary("Pune")];
        let stats = vec![
            District { name: "Aurangabad", state: "Bihar" },
            District { name: "Aurangabad", state: "Maharashtra" },
            District { name: "Pune", state: "Maharashtra" },
        ];

        let (rows, diagnostics) = left_join_described(
            &boundaries,
            &stats,
            |d| d.name,
            |d| format!("{} ({})", d.name, d.state),
            10,
        );

        assert_eq!(rows[0].matched.map(|d| d.state), Some("Bihar"));
        assert_eq!(rows[1].matched.map(|d| d.state), Some("Bihar"));
        assert_eq!(diagnostics.duplicate_statistic_keys, 1);
        assert_eq!(
            diagnostics.duplicate_statistic_names["AURANGABAD"],
            vec!["Aurangabad (Bihar)", "Aurangabad (Maharashtra)"]
        );
        assert_eq!(diagnostics.shared_boundary_key_count, 2);
        assert_eq!(diagnostics.shared_boundary_keys, vec!["Aurangabad"]);
    }

    #[test]
    fn unique_names_report_no_collisions() {
        let boundaries = vec![boundary("Pune"), boundary("Leh")];
        let stats = vec![stat("Pune", 1)];
        let (_, diagnostics) = left_join(&boundaries, &stats, |s| s.name, 10);
        assert!(diagnostics.duplicate_statistic_names.is_empty());
        assert_eq!(diagnostics.shared_boundary_key_count, 0);
    }

    #[test]
    fn unmatched_lists_are_sorted_and_capped() {
        let boundaries = vec![boundary("Zeta"), boundary("Alpha"), boundary("Mu")];
        let stats: Vec<Stat> = vec![];
        let (_, diagnostics) = left_join(&boundaries, &stats, |s| s.name, 2);
        assert_eq!(diagnostics.unmatched_boundaries, vec!["Alpha", "Mu"]);
        assert_eq!(diagnostics.unmatched_boundary_count, 3);
    }
}
