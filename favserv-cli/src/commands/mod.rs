//! Command handler modules for the CLI.

mod add;
mod characters;
mod completions;
mod connect;
mod delete;
mod list;
mod settings;
mod show;
mod update;

use std::path::Path;

use crate::cli::Commands;
use crate::error::CliError;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(config_path: Option<&Path>, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::List { format } => list::cmd_list(config_path, format),
        Commands::Show { name } => show::cmd_show(config_path, &name),
        Commands::Add {
            name,
            host,
            port,
            password,
            identity,
        } => add::cmd_add(
            config_path,
            add::AddParams {
                name: &name,
                host: &host,
                port,
                password: password.as_deref(),
                identity: identity.as_deref(),
            },
        ),
        Commands::Update {
            name,
            new_name,
            host,
            port,
            password,
            clear_password,
            identity,
        } => update::cmd_update(
            config_path,
            &name,
            update::UpdateParams {
                new_name: new_name.as_deref(),
                host: host.as_deref(),
                port,
                password: password.as_deref(),
                clear_password,
                identity: identity.as_deref(),
            },
        ),
        Commands::Delete { name } => delete::cmd_delete(config_path, &name),
        Commands::Connect { name, dry_run } => connect::cmd_connect(config_path, &name, dry_run),
        Commands::Characters { format } => characters::cmd_characters(config_path, format),
        Commands::Settings => settings::cmd_settings(config_path),
        Commands::Completions { shell } => {
            completions::cmd_completions(shell);
            Ok(())
        }
    }
}
