use std::path::Path;

use anyhow::Result;

use super::Session;

pub fn cmd_check(schema: &Path, file: Option<&Path>, env: bool) -> Result<()> {
    let mut session = Session::open(schema, file)?;
    session.load(file, env)?;

    let errors = session.report_errors();
    if errors > 0 {
        eprintln!();
        eprintln!(
            "{errors} {} found",
            if errors == 1 { "error" } else { "errors" }
        );
        std::process::exit(1);
    }

    println!("No errors found");
    Ok(())
}
