//! Handlers of the subcommands

mod check;
mod complete;
mod help;
mod paths;
mod save;
mod show;

pub use check::cmd_check;
pub use complete::cmd_complete;
pub use help::cmd_help;
pub use paths::cmd_paths;
pub use save::cmd_save;
pub use show::cmd_show;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use confline::infrastructure::LocalFs;
use confline::notify::{Message, MessageFormatter, NotificationLevel};
use confline::{ConfigFile, Schema};

/// A config file engine for the settings of a schema, collecting its messages
pub struct Session {
    pub config_file: ConfigFile,
    messages: Rc<RefCell<Vec<Message>>>,
}

impl Session {
    /// Set up the engine. With `config_path` that file is the only one loaded and saved.
    pub fn open(schema_path: &Path, config_path: Option<&Path>) -> Result<Self> {
        let (schema, warnings) = Schema::load(&LocalFs::new(), schema_path)
            .with_context(|| format!("Failed to load schema {}", schema_path.display()))?;
        for warning in &warnings {
            eprintln!("Warning: {warning}");
        }

        let registry = schema.registry()?;
        let mut options = schema.options();
        if let Some(path) = config_path {
            options = options.with_config_path(path);
        }

        let mut config_file = ConfigFile::new(registry, options);
        let messages = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&messages);
        config_file.set_ui_callback(move |msg| sink.borrow_mut().push(msg));

        Ok(Self {
            config_file,
            messages,
        })
    }

    /// Load `file`, or the first existing default file if it is `None`
    pub fn load(&mut self, file: Option<&Path>, env: bool) -> Result<()> {
        match file {
            Some(path) => self
                .config_file
                .load_file(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            None => self.config_file.load(false).context("Failed to load config file")?,
        }
        if env {
            self.config_file
                .load_env()
                .context("Failed to load environment variables")?;
        }
        Ok(())
    }

    /// Print the errors reported so far to stderr and return how many there were
    pub fn report_errors(&self) -> usize {
        let mut formatter = MessageFormatter::new();
        let messages = self.messages.borrow();
        let mut count = 0;
        for msg in messages.iter().filter(|m| m.level == NotificationLevel::Error) {
            eprintln!("{}", formatter.format(msg));
            count += 1;
        }
        count
    }
}
