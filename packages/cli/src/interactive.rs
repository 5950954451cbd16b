//! Interactive menu used when no subcommand is given.

use dialoguer::{Input, Select};
use india_pop_cli_utils::MultiProgress;
use india_pop_projection_models::{YearMode, YearSelection};
use india_pop_reconcile::config::ReconcileConfig;

use crate::commands;

/// Prompts for an action and runs it with `config`.
///
/// # Errors
///
/// Returns an error if a prompt fails or the chosen command fails.
pub fn run(
    config: &mut ReconcileConfig,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("India District Population Map");
    println!();

    let items = &[
        "Reconcile and write outputs",
        "Check name coverage",
        "Verify national population",
        "Indicator headcount sanity check",
    ];

    let selection = Select::new()
        .with_prompt("What would you like to do?")
        .items(items)
        .default(0)
        .interact()?;

    match selection {
        0 => {
            let modes = &["Every year (2011-2036)", "Milestones only", "As configured"];
            let mode = Select::new()
                .with_prompt("Which years?")
                .items(modes)
                .default(2)
                .interact()?;
            match mode {
                0 => config.years = YearSelection::Mode(YearMode::Full),
                1 => config.years = YearSelection::Mode(YearMode::Milestones),
                _ => {}
            }
            log::debug!("Interactive year selection: {:?}", config.years);
            commands::reconcile(config, multi)
        }
        1 => commands::coverage(config),
        2 => commands::verify(config),
        _ => {
            let indicator: i64 = Input::new()
                .with_prompt("Indicator ID")
                .default(1)
                .interact_text()?;
            commands::sanity(config, indicator)
        }
    }
}
