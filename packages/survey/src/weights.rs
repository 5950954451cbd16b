//! Weight Builder: each district's share of its state's population.
//!
//! The proxy indicator's headcount and prevalence imply a base population
//! per district. A district's weight is that base population divided by the
//! sum of base populations over the districts of the same state. Districts
//! with a missing name, state, or base population are excluded from both
//! the numerator and the denominator.

use std::collections::BTreeMap;

use india_pop_survey_models::{DistrictWeight, IndicatorRecord, LabelDictionary, WeightTable};

/// Derives district weights from the rows of one proxy indicator.
///
/// State totals are summed over base populations sorted by value, so the
/// result does not depend on the order of the indicator rows.
#[must_use]
pub fn build_weights(
    records: &[IndicatorRecord],
    labels: &LabelDictionary,
    proxy_indicator_id: i64,
) -> WeightTable {
    let mut table = WeightTable {
        proxy_indicator_id,
        ..WeightTable::default()
    };

    let mut candidates: Vec<(i64, &str, &str, f64)> = Vec::new();

    for record in records
        .iter()
        .filter(|r| r.indicator_id == Some(proxy_indicator_id))
    {
        let Some((district_id, district_name)) = record
            .district_id
            .and_then(|id| labels.district_name(id).map(|name| (id, name)))
        else {
            log::debug!("Proxy row without district name: {record:?}");
            table.missing_district_name += 1;
            continue;
        };

        let Some(state_name) = labels.district_state(district_id) else {
            log::debug!("District {district_id} ({district_name}) has no state name");
            table.missing_state_name += 1;
            continue;
        };

        let Some(base_population) = record.inferred_base_population() else {
            log::debug!("District {district_id} ({district_name}) has no usable base population");
            table.missing_base_population += 1;
            continue;
        };

        candidates.push((district_id, district_name, state_name, base_population));
    }

    let mut by_state: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (_, _, state, base) in &candidates {
        by_state.entry(*state).or_default().push(*base);
    }

    let state_totals: BTreeMap<&str, f64> = by_state
        .into_iter()
        .map(|(state, mut bases)| {
            bases.sort_by(f64::total_cmp);
            (state, bases.iter().sum::<f64>())
        })
        .collect();

    for (district_id, district_name, state_name, base_population) in candidates {
        let total = state_totals.get(state_name).copied().unwrap_or(0.0);
        let weight = base_population / total;
        if !weight.is_finite() {
            log::warn!(
                "State '{state_name}' has a non-positive base population total; \
                 dropping district {district_name}"
            );
            table.missing_base_population += 1;
            continue;
        }

        table.weights.push(DistrictWeight {
            district_id,
            district_name: district_name.to_string(),
            state_name: state_name.to_string(),
            base_population,
            weight,
        });
    }

    log::info!(
        "Built {} district weights across {} states from indicator {proxy_indicator_id} \
         ({} without district name, {} without state, {} without base population)",
        table.weights.len(),
        state_totals.len(),
        table.missing_district_name,
        table.missing_state_name,
        table.missing_base_population,
    );

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> LabelDictionary {
        let mut labels = LabelDictionary::default();
        for (id, district, state) in [
            (1, "Pune", "Maharashtra"),
            (2, "Nagpur", "Maharashtra"),
            (3, "Thane", "Maharashtra"),
            (4, "Lucknow", "Uttar Pradesh"),
            (5, "Agra", "Uttar Pradesh"),
        ] {
            labels.district_names.insert(id, district.to_string());
            labels.district_states.insert(id, state.to_string());
        }
        labels.district_names.insert(6, "Nowhere".to_string());
        labels
    }

    fn row(district: i64, indicator: i64, prevalence: f64, headcount: f64) -> IndicatorRecord {
        IndicatorRecord {
            district_id: Some(district),
            indicator_id: Some(indicator),
            prevalence: Some(prevalence),
            headcount: Some(headcount),
        }
    }

    fn records() -> Vec<IndicatorRecord> {
        vec![
            row(1, 10, 10.0, 300.0),
            row(2, 10, 20.0, 200.0),
            row(3, 10, 0.0, 50.0),
            row(4, 10, 50.0, 150.0),
            row(5, 10, 25.0, 175.0),
            row(6, 10, 10.0, 10.0),
            row(7, 10, 10.0, 10.0),
            row(1, 1, 99.0, 1.0),
        ]
    }

    #[test]
    fn weights_sum_to_one_per_state() {
        let table = build_weights(&records(), &labels(), 10);
        let sums = table.state_weight_sums();
        assert_eq!(sums.len(), 2);
        for (state, sum) in sums {
            assert!((sum - 1.0).abs() < 1e-9, "{state}: {sum}");
        }
    }

    #[test]
    fn weight_is_share_of_state_base_population() {
        let table = build_weights(&records(), &labels(), 10);
        let pune = table.weights.iter().find(|w| w.district_name == "Pune").unwrap();
        // Pune 3000, Nagpur 1000; Thane excluded (zero prevalence).
        assert!((pune.base_population - 3000.0).abs() < 1e-9);
        assert!((pune.weight - 0.75).abs() < 1e-12);
    }

    #[test]
    fn excludes_rows_instead_of_zero_filling() {
        let table = build_weights(&records(), &labels(), 10);
        assert_eq!(table.weights.len(), 4);
        assert!(table.weights.iter().all(|w| w.district_name != "Thane"));
        assert_eq!(table.missing_base_population, 1);
        assert_eq!(table.missing_state_name, 1);
        assert_eq!(table.missing_district_name, 1);
    }

    #[test]
    fn only_the_proxy_indicator_is_used() {
        let table = build_weights(&records(), &labels(), 1);
        assert_eq!(table.weights.len(), 1);
        assert!((table.weights[0].weight - 1.0).abs() < 1e-12);
    }

    #[test]
    fn row_order_does_not_change_weights() {
        let forward = build_weights(&records(), &labels(), 10);
        let mut reversed_rows = records();
        reversed_rows.reverse();
        let reversed = build_weights(&reversed_rows, &labels(), 10);

        for w in &forward.weights {
            let other = reversed
                .weights
                .iter()
                .find(|o| o.district_id == w.district_id)
                .unwrap();
            assert_eq!(w.weight.to_bits(), other.weight.to_bits());
        }
    }

    #[test]
    fn state_with_no_surviving_districts_contributes_nothing() {
        let table = build_weights(&[row(3, 10, 0.0, 50.0)], &labels(), 10);
        assert!(table.weights.is_empty());
        assert!(table.state_weight_sums().is_empty());
    }
}
