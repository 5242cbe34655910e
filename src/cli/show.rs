//! Show command
//!
//! Prints the loaded configuration mapping, i.e. exactly what a template
//! renderer would receive.

use std::io::Write;

use crate::config::{ConfigLoader, Settings};
use crate::error::HoistResult;

/// Load the configuration file and print it as YAML
pub fn handle_show_command<W: Write>(settings: &Settings, out: &mut W) -> HoistResult<()> {
    let document = ConfigLoader::from_settings(settings).load(&settings.config_file)?;
    out.write_all(document.to_yaml()?.as_bytes())?;
    Ok(())
}
