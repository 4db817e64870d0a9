use std::path::Path;

use anyhow::{Context, Result};

use super::Session;

pub fn cmd_help(schema: &Path) -> Result<()> {
    let session = Session::open(schema, None)?;
    let help = session.config_file.get_help().context("Failed to generate help")?;
    println!("{help}");
    Ok(())
}
