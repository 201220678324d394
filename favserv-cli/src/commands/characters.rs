//! List identities command.

use std::path::Path;

use favserv_core::CharacterLookup;
use favserv_core::models::display_identity_name;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::format::escape_csv_field;
use crate::util::load_settings;

/// Characters command handler
pub fn cmd_characters(config_path: Option<&Path>, format: OutputFormat) -> Result<(), CliError> {
    let settings = load_settings(config_path)?;
    let lookup = CharacterLookup::from_settings(&settings.identities);
    let identities = lookup.list_available_identities();

    match format {
        OutputFormat::Table => {
            if identities.is_empty() {
                println!("No identities found.");
            }
            for identity in &identities {
                println!("{}", display_identity_name(identity));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&identities)
                .map_err(|e| CliError::Config(format!("Failed to serialize to JSON: {e}")))?;
            println!("{json}");
        }
        OutputFormat::Csv => {
            println!("name");
            for identity in &identities {
                println!("{}", escape_csv_field(identity));
            }
        }
    }

    Ok(())
}
