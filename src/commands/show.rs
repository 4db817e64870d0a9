use std::path::Path;

use anyhow::{Context, Result};
use confline::SaveOptions;

use super::Session;

/// Print the loaded values the way they would be saved, without comments
pub fn cmd_show(schema: &Path, file: Option<&Path>, env: bool) -> Result<()> {
    let mut session = Session::open(schema, file)?;
    session.load(file, env)?;
    session.report_errors();

    let text = session
        .config_file
        .save_to_string(&SaveOptions::new().with_comments(false))
        .context("Failed to format values")?;
    print!("{text}");
    Ok(())
}
