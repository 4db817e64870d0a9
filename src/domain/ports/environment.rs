//! Environment port - access to environment variables
//!
//! `${NAME:=default}` assigns to the environment, so the port supports writes.

/// Read and write access to environment variables
pub trait Environment {
    fn get(&self, name: &str) -> Option<String>;

    fn set(&self, name: &str, value: &str);

    /// All variables, sorted by name
    fn vars(&self) -> Vec<(String, String)>;

    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}
