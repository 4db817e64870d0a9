//! A config file engine on the local file system for scenario tests.
//!
//! The config directory is a temp directory and the environment is a
//! [`MapEnv`], so scenarios never see the real user configuration.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use confline::config::Registry;
use confline::infrastructure::{FixedDirs, LocalFs, MapEnv};
use confline::notify::{Message, NotificationLevel};
use confline::{ConfigFile, ConfigFileOptions, Ports};
use tempfile::TempDir;

pub struct Session {
    pub dir: TempDir,
    pub env: MapEnv,
    pub config_file: ConfigFile,
    messages: Rc<RefCell<Vec<Message>>>,
}

impl Session {
    /// Application `app`, info messages included
    pub fn new(registry: Registry) -> Self {
        Self::with_env(registry, MapEnv::new())
    }

    pub fn with_env(registry: Registry, env: MapEnv) -> Self {
        let options = ConfigFileOptions::new("app").with_notification_level(NotificationLevel::Info);
        Self::with_options(registry, options, env)
    }

    pub fn with_options(registry: Registry, options: ConfigFileOptions, env: MapEnv) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let ports = Ports::new(LocalFs::new(), env.clone(), FixedDirs::new(dir.path()));
        let mut config_file = ConfigFile::with_ports(registry, options, ports);

        let messages = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&messages);
        config_file.set_ui_callback(move |msg| sink.borrow_mut().push(msg));

        Self {
            dir,
            env,
            config_file,
            messages,
        }
    }

    /// Path of a file in the config directory
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write a file relative to the config directory, creating parent directories
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn load(&mut self, path: &Path) {
        self.config_file
            .load_file(path)
            .unwrap_or_else(|e| panic!("Failed to load {}: {e}", path.display()));
    }

    pub fn value(&self, key: &str) -> String {
        self.config_file
            .registry()
            .format_value(key, None)
            .unwrap_or_else(|| panic!("unknown key {key}"))
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.borrow().clone()
    }

    pub fn errors(&self) -> Vec<Message> {
        self.by_level(NotificationLevel::Error)
    }

    pub fn infos(&self) -> Vec<String> {
        self.by_level(NotificationLevel::Info)
            .into_iter()
            .map(|m| m.message)
            .collect()
    }

    pub fn clear_messages(&self) {
        self.messages.borrow_mut().clear();
    }

    fn by_level(&self, level: NotificationLevel) -> Vec<Message> {
        self.messages
            .borrow()
            .iter()
            .filter(|m| m.level == level)
            .cloned()
            .collect()
    }
}
