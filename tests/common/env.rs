//! Test environment builder for isolated Confline CLI testing.
//!
//! Provides `TestEnv` - a temp directory which serves as working directory,
//! user config home (`XDG_CONFIG_HOME`) and site config dir (`XDG_CONFIG_DIRS`).

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

use super::fixtures::{DEMO_APPNAME, DEMO_SCHEMA};

/// Result of running a Confline CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated test environment with a temp directory
pub struct TestEnv {
    pub root: TempDir,
    confline_bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("Failed to create temp dir"),
            confline_bin: PathBuf::from(env!("CARGO_BIN_EXE_confline")),
        }
    }

    /// A new environment with the demo schema written to `schema.toml`
    pub fn with_demo_schema() -> Self {
        let env = Self::new();
        env.write("schema.toml", DEMO_SCHEMA);
        env
    }

    /// Get path relative to the root
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Directory the demo application looks for its config in first
    pub fn user_config_dir(&self) -> PathBuf {
        self.path("xdg").join(DEMO_APPNAME)
    }

    /// Default config file of the demo application
    pub fn user_config_file(&self) -> PathBuf {
        self.user_config_dir().join("config")
    }

    /// Write a file relative to the root, creating parent directories
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        write_file(&path, content);
        path
    }

    /// Write the default config file of the demo application
    pub fn write_user_config(&self, content: &str) -> PathBuf {
        let path = self.user_config_file();
        write_file(&path, content);
        path
    }

    pub fn read(&self, path: &Path) -> String {
        std::fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
    }

    /// Run confline with the root as working directory
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    /// Run confline with extra environment variables
    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(&self.confline_bin);
        cmd.current_dir(self.root.path())
            .args(args)
            .env("XDG_CONFIG_HOME", self.path("xdg"))
            .env("XDG_CONFIG_DIRS", self.path("site"))
            .env_remove("RUST_LOG");

        for (key, _) in std::env::vars() {
            if key.starts_with("DEMO_") {
                cmd.env_remove(key);
            }
        }
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute confline");
        output_to_result(output)
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}
