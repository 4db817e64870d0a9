//! Environment variable adapters

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::domain::ports::Environment;

/// The environment of the current process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn set(&self, name: &str, value: &str) {
        std::env::set_var(name, value);
    }

    fn vars(&self) -> Vec<(String, String)> {
        let mut vars: Vec<_> = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        vars.sort();
        vars
    }
}

/// An in-memory environment. Clones share their variables.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let env = Self::new();
        env.vars
            .borrow_mut()
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        env
    }

    pub fn remove(&self, name: &str) -> Option<String> {
        self.vars.borrow_mut().remove(name)
    }
}

impl Environment for MapEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.borrow().get(name).cloned()
    }

    fn set(&self, name: &str, value: &str) {
        self.vars.borrow_mut().insert(name.to_string(), value.to_string());
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.vars
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
