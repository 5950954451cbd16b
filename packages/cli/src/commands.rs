//! Subcommand handlers. Each prints a short report to stdout.

use india_pop_cli_utils::{IndicatifProgress, MultiProgress};
use india_pop_reconcile::checks::{run_coverage, run_sanity};
use india_pop_reconcile::config::ReconcileConfig;
use india_pop_reconcile::pipeline;
use india_pop_reconcile::verify::{SURVEY_YEAR, run_verification};

/// Runs the full pipeline and summarizes what was written.
pub fn reconcile(
    config: &ReconcileConfig,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let progress = IndicatifProgress::years_bar(multi, "Disaggregating state projections");
    let (dataset, paths) = pipeline::run(config, &progress)?;

    let matched = dataset.districts.iter().filter(|d| d.is_matched()).count();

    println!();
    println!("Districts:      {} ({matched} with data)", dataset.districts.len());
    println!("Coverage:       {:.1}%", dataset.join.coverage() * 100.0);
    println!("Years:          {}", dataset.years.len());
    println!(
        "Excluded rows:  {} without district name, {} without state, {} without base population",
        dataset.weights.missing_district_name,
        dataset.weights.missing_state_name,
        dataset.weights.missing_base_population
    );
    if !dataset.join.duplicate_statistic_names.is_empty() {
        let keys: Vec<&str> = dataset
            .join
            .duplicate_statistic_names
            .keys()
            .map(String::as_str)
            .collect();
        println!(
            "Shared names:   {} ({} boundaries share a name)",
            keys.join(", "),
            dataset.join.shared_boundary_key_count
        );
    }
    if !dataset.disaggregation.unmatched_states.is_empty() {
        println!(
            "Unmatched states: {}",
            dataset.disaggregation.unmatched_states.join(", ")
        );
    }
    println!();
    println!("Wrote {}", paths.geojson.display());
    println!("Wrote {}", paths.national.display());
    println!("Wrote {}", paths.diagnostics.display());

    Ok(())
}

/// Prints boundary and survey name coverage.
pub fn coverage(config: &ReconcileConfig) -> Result<(), Box<dyn std::error::Error>> {
    let report = run_coverage(config)?;

    println!("Boundary districts: {}", report.boundary_count);
    println!("Survey districts:   {}", report.statistic_count);
    println!(
        "Matches:            {} ({:.1}%)",
        report.matched_count,
        report.coverage() * 100.0
    );
    println!(
        "Boundaries without survey data ({}): {:?}",
        report.unmatched_boundary_count, report.unmatched_boundaries
    );
    println!(
        "Survey districts without a boundary ({}): {:?}",
        report.unmatched_statistic_count, report.unmatched_statistics
    );

    Ok(())
}

/// Prints the official versus survey-derived national population.
pub fn verify(config: &ReconcileConfig) -> Result<(), Box<dyn std::error::Error>> {
    let result = run_verification(config)?;

    println!("Official projection {SURVEY_YEAR}: {:>16.0}", result.official);
    println!("Survey-derived population: {:>16.0}", result.survey_derived);
    println!("Percentage gap:            {:>15.2}%", result.percent_gap);
    println!();
    println!("Conclusion: {}", result.agreement);

    Ok(())
}

/// Prints one indicator's headcount total.
pub fn sanity(
    config: &ReconcileConfig,
    indicator_id: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let summary = run_sanity(config, indicator_id)?;

    println!(
        "Indicator {indicator_id}: {}",
        summary.indicator_name.as_deref().unwrap_or("(unlabelled)")
    );
    println!(
        "District rows:    {} ({} with a district name)",
        summary.rows, summary.labelled_rows
    );
    println!("Total headcount:  {:.0}", summary.total_headcount);

    Ok(())
}
