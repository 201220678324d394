//! Add server command.

use std::path::Path;

use favserv_core::models::ServerRecord;

use crate::error::CliError;
use crate::util::{ensure_saved, open_store};

/// Parameters for the add command
pub struct AddParams<'a> {
    pub name: &'a str,
    pub host: &'a str,
    pub port: Option<u16>,
    pub password: Option<&'a str>,
    pub identity: Option<&'a str>,
}

/// Add server command handler
pub fn cmd_add(config_path: Option<&Path>, params: AddParams<'_>) -> Result<(), CliError> {
    let record = build_record(&params)?;

    let (_, mut store) = open_store(config_path)?;
    let name = record.name.clone();
    let id = store.add(record);
    ensure_saved(&mut store)?;

    println!("Added server '{name}' (ID: {id})");
    Ok(())
}

fn build_record(params: &AddParams<'_>) -> Result<ServerRecord, CliError> {
    let mut record = ServerRecord::new(params.name.trim(), params.host.trim());
    if let Some(port) = params.port {
        record = record.with_port(port);
    }
    if let Some(password) = params.password {
        record = record.with_password(password);
    }
    if let Some(identity) = params.identity {
        record = record.with_preferred_identity(identity.trim());
    }

    record
        .validate()
        .map_err(|e| CliError::Validation(e.to_string()))?;
    Ok(record)
}
