//! Asking the user to pick a depot.

use super::engine::AmbiguousChoice;
use crate::error::{ConductorError, Result};
use crate::ui::{Prompt, Table, UserInterface};

/// Prompt key for depot selection; `CONDUCTOR_PROMPT_DEPOT` answers it.
pub const DEPOT_PROMPT_KEY: &str = "depot";

/// Show the options of `choice` and return the name of the chosen depot.
///
/// The answer may be an option index or a depot name; the first option
/// is the default. Anything else is rejected and asked again when
/// interactive, and is an error otherwise.
pub fn choose_depot(ui: &mut dyn UserInterface, choice: &AmbiguousChoice) -> Result<String> {
    let default = choice
        .default_option()
        .ok_or_else(|| anyhow::anyhow!("No depots offer {}", choice.identifier()))?;

    ui.message(&format!(
        "Multiple depots for {} were found. Please specify a depot:",
        choice.identifier()
    ));
    let mut table = Table::new(vec!["", "Depot"]);
    let indices: Vec<String> = choice.options().iter().map(|o| o.index.to_string()).collect();
    for (option, index) in choice.options().iter().zip(&indices) {
        table.add_row(vec![index.as_str(), option.depot_name()]);
    }
    ui.show_table(&table);

    let prompt = Prompt::input(DEPOT_PROMPT_KEY, "Which depot?").with_default(default.depot_name());
    loop {
        let answer = ui.prompt(&prompt)?.as_string();
        if let Some(option) = choice.select(&answer) {
            tracing::debug!("Chose depot {}", option.depot_name());
            return Ok(option.depot_name().to_string());
        }

        let valid = choice
            .options()
            .iter()
            .map(|o| format!("{} or {}", o.index, o.depot_name()))
            .collect::<Vec<_>>()
            .join(", ");
        if !ui.is_interactive() {
            return Err(ConductorError::NonInteractive {
                what: format!("a depot ('{}' is not one of {})", answer.trim(), valid),
            });
        }
        ui.warning(&format!("'{}' is not a valid choice. Enter {}", answer.trim(), valid));
    }
}
