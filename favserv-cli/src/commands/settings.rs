//! Show effective settings command.

use std::fmt::Write as _;
use std::path::Path;

use favserv_core::config::{AppSettings, ConfigManager};

use crate::error::CliError;
use crate::util::create_config_manager;

/// Settings command handler
pub fn cmd_settings(config_path: Option<&Path>) -> Result<(), CliError> {
    let config_manager = create_config_manager(config_path)?;
    let settings = config_manager
        .load_settings()
        .map_err(|e| CliError::Config(format!("Failed to load settings: {e}")))?;

    println!("{}", format_settings(&config_manager, &settings));
    Ok(())
}

/// Renders the settings in effect, defaults included
#[must_use]
pub fn format_settings(config_manager: &ConfigManager, settings: &AppSettings) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Settings:");
    let _ = writeln!(
        output,
        "  Config dir:      {}",
        config_manager.config_dir().display()
    );
    let _ = writeln!(
        output,
        "  Favorites file:  {}",
        config_manager.favorites_path(settings).display()
    );
    let _ = writeln!(output, "  Toggle hotkey:   {}", settings.general.toggle_hotkey);
    if settings.ui.is_centered() {
        let _ = writeln!(output, "  Window position: centered");
    } else {
        let _ = writeln!(
            output,
            "  Window position: {}, {}",
            settings.ui.window_pos_x, settings.ui.window_pos_y
        );
    }

    let identities = &settings.identities;
    let _ = writeln!(
        output,
        "  Identity dir:    {}",
        identities.local_dir.as_deref().unwrap_or("(platform default)")
    );
    if identities.cloud_roots.is_empty() {
        let _ = writeln!(output, "  Cloud roots:     (platform default)");
    } else {
        let _ = writeln!(output, "  Cloud roots:     {}", identities.cloud_roots.join(", "));
    }
    let _ = writeln!(output, "  App id:          {}", identities.app_id);

    match settings.launch.program.as_deref() {
        Some(program) => {
            let _ = writeln!(
                output,
                "  Launch:          {program} {}",
                settings.launch.args.join(" ")
            );
        }
        None => {
            let _ = writeln!(output, "  Launch:          (print endpoint)");
        }
    }
    let _ = writeln!(output, "  Log level:       {}", settings.logging.tracing_level());

    output.trim_end().to_string()
}
