use std::path::Path;

use anyhow::Result;

use super::Session;

pub fn cmd_paths(schema: &Path) -> Result<()> {
    let session = Session::open(schema, None)?;
    for path in session.config_file.config_paths() {
        println!("{}", path.display());
    }
    Ok(())
}
