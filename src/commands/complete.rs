use std::path::Path;

use anyhow::Result;

use super::Session;

pub fn cmd_complete(schema: &Path, line: &str, cursor: Option<usize>) -> Result<()> {
    let session = Session::open(schema, None)?;
    let cursor = cursor.unwrap_or(line.len());

    let completions = session.config_file.get_completions(line, cursor);
    for completed in completions.lines() {
        println!("{completed}");
    }
    Ok(())
}
