//! In-memory file system
//!
//! Cloning shares the underlying storage, so a test can keep a handle
//! while the engine owns another one.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::ports::file_system::{FileSystem, FsError, FsResult};

#[derive(Debug, Default)]
struct Tree {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    read_only: BTreeSet<PathBuf>,
}

/// File system kept in memory, `~` expands to `/home/user`
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    tree: Arc<Mutex<Tree>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    fn tree(&self) -> MutexGuard<'_, Tree> {
        self.tree.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add a file, creating its parent directories
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = normalize(path.as_ref());
        let mut tree = self.tree();
        if let Some(parent) = path.parent() {
            add_dirs(&mut tree, parent);
        }
        tree.files.insert(path, content.into());
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        add_dirs(&mut self.tree(), &normalize(path.as_ref()));
    }

    /// Writes to this file fail with a permission error
    pub fn set_read_only(&self, path: impl AsRef<Path>) {
        self.tree().read_only.insert(normalize(path.as_ref()));
    }

    /// Content of a file, if it exists
    pub fn content(&self, path: impl AsRef<Path>) -> Option<String> {
        self.tree().files.get(&normalize(path.as_ref())).cloned()
    }
}

fn add_dirs(tree: &mut Tree, dir: &Path) {
    for ancestor in dir.ancestors() {
        if ancestor.as_os_str().is_empty() {
            continue;
        }
        tree.dirs.insert(ancestor.to_path_buf());
    }
}

/// Resolve `.` and `..` lexically
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

impl FileSystem for MemoryFs {
    fn read(&self, path: &Path) -> FsResult<String> {
        self.tree()
            .files
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| FsError::NotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, content: &str) -> FsResult<()> {
        let path = normalize(path);
        let mut tree = self.tree();
        if tree.read_only.contains(&path) {
            return Err(FsError::PermissionDenied(path));
        }
        let parent_exists = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => tree.dirs.contains(p),
            _ => true,
        };
        if !parent_exists {
            return Err(FsError::NotFound(path));
        }
        tree.files.insert(path, content.to_string());
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.tree().files.contains_key(&normalize(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.tree().dirs.contains(&normalize(path))
    }

    fn is_writable_file(&self, path: &Path) -> bool {
        let path = normalize(path);
        let tree = self.tree();
        tree.files.contains_key(&path) && !tree.read_only.contains(&path)
    }

    fn create_dir_all_private(&self, path: &Path) -> FsResult<()> {
        add_dirs(&mut self.tree(), &normalize(path));
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> FsResult<Vec<String>> {
        let dir = normalize(path);
        let tree = self.tree();
        if !tree.dirs.contains(&dir) {
            return Err(FsError::NotFound(dir));
        }
        let children = tree
            .files
            .keys()
            .chain(tree.dirs.iter())
            .filter(|p| p.parent() == Some(dir.as_path()))
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        Ok(children)
    }

    fn expand_home(&self, path: &Path) -> PathBuf {
        match path.strip_prefix("~") {
            Ok(rest) => Path::new("/home/user").join(rest),
            Err(_) => path.to_path_buf(),
        }
    }
}
