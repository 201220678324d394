//! Delete server command.

use std::path::Path;

use crate::error::CliError;
use crate::util::{ensure_saved, open_store};

/// Delete server command handler
pub fn cmd_delete(config_path: Option<&Path>, name: &str) -> Result<(), CliError> {
    let (_, mut store) = open_store(config_path)?;

    let record = store.find(name)?;
    let id = record.id.clone();
    let server_name = record.name.clone();

    store.delete(&id);
    ensure_saved(&mut store)?;

    println!("Deleted server '{server_name}' (ID: {id})");

    Ok(())
}
