use std::path::Path;

use anyhow::{Context, Result};
use confline::SaveOptions;

use super::Session;

/// Load the existing config file, then write it back with every setting
pub fn cmd_save(schema: &Path, output: Option<&Path>, comments: bool, no_multi: bool) -> Result<()> {
    let mut session = Session::open(schema, None)?;
    session.load(None, false)?;
    session.report_errors();

    let mut options = SaveOptions::new().with_comments(comments);
    if no_multi {
        options = options.with_no_multi(true);
    }

    let path = match output {
        Some(path) => {
            session
                .config_file
                .save_file(path, &options)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            path.to_path_buf()
        }
        None => session
            .config_file
            .save(&options)
            .context("Failed to save config file")?,
    };
    println!("Saved {}", path.display());
    Ok(())
}
