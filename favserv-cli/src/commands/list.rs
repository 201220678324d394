//! List favorite servers command.

use std::fmt::Write as _;
use std::path::Path;

use favserv_core::models::{ServerRecord, display_identity_name};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::format::{column_width, escape_csv_field};
use crate::util::{open_store, yes_no};

/// List servers command handler
pub fn cmd_list(config_path: Option<&Path>, format: OutputFormat) -> Result<(), CliError> {
    let (_, store) = open_store(config_path)?;
    let records: Vec<&ServerRecord> = store.list().iter().collect();

    match format {
        OutputFormat::Table => println!("{}", format_table(&records)),
        OutputFormat::Json => println!("{}", format_json(&records)?),
        OutputFormat::Csv => println!("{}", format_csv(&records)),
    }

    Ok(())
}

/// Format servers as a table string
#[must_use]
pub fn format_table(records: &[&ServerRecord]) -> String {
    if records.is_empty() {
        return "No favorite servers found.".to_string();
    }

    let addresses: Vec<String> = records.iter().map(|r| r.display_address()).collect();
    let identities: Vec<String> = records
        .iter()
        .map(|r| r.preferred_identity().map(display_identity_name).unwrap_or_default())
        .collect();

    let name_width = column_width("NAME", records.iter().map(|r| r.name.as_str()));
    let addr_width = column_width("ADDRESS", addresses.iter().map(String::as_str));
    let ident_width = column_width("IDENTITY", identities.iter().map(String::as_str));

    let mut output = String::new();
    let _ = writeln!(
        output,
        "{:<name_width$}  {:<addr_width$}  {:<ident_width$}  PASSWORD",
        "NAME", "ADDRESS", "IDENTITY"
    );
    let _ = writeln!(
        output,
        "{:-<name_width$}  {:-<addr_width$}  {:-<ident_width$}  --------",
        "", "", ""
    );

    for ((record, address), identity) in records.iter().zip(&addresses).zip(&identities) {
        let _ = writeln!(
            output,
            "{:<name_width$}  {:<addr_width$}  {:<ident_width$}  {}",
            record.name,
            address,
            identity,
            yes_no(record.has_password())
        );
    }

    output.trim_end().to_string()
}

/// Format servers as a JSON string
///
/// # Errors
///
/// Returns `CliError::Config` if JSON serialization fails.
pub fn format_json(records: &[&ServerRecord]) -> Result<String, CliError> {
    let output: Vec<ServerOutput> = records.iter().map(|r| (*r).into()).collect();
    serde_json::to_string_pretty(&output)
        .map_err(|e| CliError::Config(format!("Failed to serialize to JSON: {e}")))
}

/// Format servers as a CSV string
#[must_use]
pub fn format_csv(records: &[&ServerRecord]) -> String {
    let mut output = String::from("id,name,host,port,identity,has_password\n");

    for record in records {
        let _ = writeln!(
            output,
            "{},{},{},{},{},{}",
            record.id,
            escape_csv_field(&record.name),
            escape_csv_field(&record.hostname),
            record.port,
            escape_csv_field(&record.preferred_identity),
            record.has_password()
        );
    }

    output.trim_end().to_string()
}

/// Server output for CLI listings; the password itself is never printed
#[derive(Debug, Clone, serde::Serialize)]
pub struct ServerOutput {
    pub id: String,
    pub name: String,
    pub host: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    pub has_password: bool,
}

impl From<&ServerRecord> for ServerOutput {
    fn from(record: &ServerRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.name.clone(),
            host: record.hostname.clone(),
            port: record.port,
            identity: record.preferred_identity().map(str::to_string),
            has_password: record.has_password(),
        }
    }
}
