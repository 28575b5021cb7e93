// File-system asset store rooted at the repository checkout
use crate::application::asset_store::AssetStore;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Relative paths resolve against the root; absolute paths are kept.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl AssetStore for FsStore {
    fn read_to_string(&self, path: &Path) -> anyhow::Result<String> {
        let path = self.resolve(path);
        fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))
    }

    fn write(&self, path: &Path, contents: &str) -> anyhow::Result<()> {
        let path = self.resolve(path);
        fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))
    }

    fn create_dir_all(&self, path: &Path) -> anyhow::Result<()> {
        let path = self.resolve(path);
        fs::create_dir_all(&path)
            .with_context(|| format!("failed to create directory {}", path.display()))
    }
}
