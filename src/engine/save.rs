//! Saving the current values

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::ports::FormattedWriter;
use crate::error::{ConfigError, ConfigResult};
use crate::infrastructure::ConfigFileWriter;

use super::{ConfigFile, SaveOptions};

impl ConfigFile {
    /// Save to [`ConfigFile::save_path`], creating missing directories
    /// accessible to the owner only. Returns the path written.
    ///
    /// # Errors
    ///
    /// Fails if there is no candidate path or the file cannot be written.
    pub fn save(&self, options: &SaveOptions) -> ConfigResult<PathBuf> {
        let path = self.save_path().ok_or(ConfigError::NoSavePath)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !self.fs.is_dir(parent) {
                self.fs.create_dir_all_private(parent)?;
            }
        }
        self.save_file(&path, options)?;
        Ok(path)
    }

    /// Save to a specific file, its directory must exist
    pub fn save_file(&self, path: &Path, options: &SaveOptions) -> ConfigResult<()> {
        let text = self.save_to_string(options)?;
        self.fs.write(path, &text)?;
        debug!(path = %path.display(), "saved config file");
        Ok(())
    }

    /// The content [`ConfigFile::save_file`] would write
    pub fn save_to_string(&self, options: &SaveOptions) -> io::Result<String> {
        let mut writer = ConfigFileWriter::new(Vec::new());
        self.save_to_writer(&mut writer, options)?;
        String::from_utf8(writer.into_inner()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Let every command write its part. Commands write a heading if two or more of them save.
    pub fn save_to_writer(&self, writer: &mut dyn FormattedWriter, options: &SaveOptions) -> io::Result<()> {
        let write_heading = self
            .commands
            .iter()
            .filter(|c| c.command.implements_save())
            .count()
            >= 2;
        for entry in &self.commands {
            entry.command.save(writer, self, options, write_heading)?;
        }
        Ok(())
    }
}
