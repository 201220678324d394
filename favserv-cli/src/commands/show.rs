//! Show server details command.

use std::path::Path;

use favserv_core::models::display_identity_name;

use crate::error::CliError;
use crate::util::open_store;

/// Show server details command handler
pub fn cmd_show(config_path: Option<&Path>, name: &str) -> Result<(), CliError> {
    let (_, store) = open_store(config_path)?;
    let record = store.find(name)?;

    println!("Server Details:");
    println!("  ID:       {}", record.id);
    println!("  Name:     {}", record.name);
    println!("  Host:     {}", record.hostname);
    println!("  Port:     {}", record.port);
    if record.has_password() {
        println!("  Password: (saved)");
    }
    match record.preferred_identity() {
        Some(identity) => println!("  Identity: {}", display_identity_name(identity)),
        None => println!("  Identity: (ask)"),
    }
    if record.show_in_launcher {
        println!("  Launcher: yes");
    }
    if let Some(ref color) = record.launcher_color {
        println!("  Color:    {color}");
    }

    Ok(())
}
