//! Update server command.

use std::path::Path;

use favserv_core::models::ServerRecord;

use crate::error::CliError;
use crate::util::{ensure_saved, open_store};

/// Parameters for the update command
pub struct UpdateParams<'a> {
    pub new_name: Option<&'a str>,
    pub host: Option<&'a str>,
    pub port: Option<u16>,
    pub password: Option<&'a str>,
    pub clear_password: bool,
    pub identity: Option<&'a str>,
}

/// Update server command handler
pub fn cmd_update(
    config_path: Option<&Path>,
    name: &str,
    params: UpdateParams<'_>,
) -> Result<(), CliError> {
    let (_, mut store) = open_store(config_path)?;
    let mut record = store.find(name)?.clone();

    apply_changes(&mut record, &params);
    record
        .validate()
        .map_err(|e| CliError::Validation(e.to_string()))?;

    let display = record.name.clone();
    let id = record.id.clone();
    if !store.update(record) {
        return Err(CliError::ServerNotFound(name.to_string()));
    }
    ensure_saved(&mut store)?;

    println!("Updated server '{display}' (ID: {id})");
    Ok(())
}

fn apply_changes(record: &mut ServerRecord, params: &UpdateParams<'_>) {
    if let Some(new_name) = params.new_name {
        record.name = new_name.trim().to_string();
    }
    if let Some(host) = params.host {
        record.hostname = host.trim().to_string();
    }
    if let Some(port) = params.port {
        record.port = port;
    }
    if params.clear_password {
        record.password.clear();
    } else if let Some(password) = params.password {
        record.password = password.to_string();
    }
    if let Some(identity) = params.identity {
        record.preferred_identity = identity.trim().to_string();
    }
}
