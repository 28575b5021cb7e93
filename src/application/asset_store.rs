// Store trait for reading and writing generated assets
use std::path::Path;

pub trait AssetStore: Send + Sync {
    /// Read a whole file as UTF-8 text
    fn read_to_string(&self, path: &Path) -> anyhow::Result<String>;

    /// Create or overwrite a file
    fn write(&self, path: &Path, contents: &str) -> anyhow::Result<()>;

    /// Create a directory and any missing parents
    fn create_dir_all(&self, path: &Path) -> anyhow::Result<()>;
}

#[cfg(test)]
pub mod memory {
    use super::AssetStore;
    use anyhow::Context;
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// In-memory store for service tests. Writes need no parent directory.
    #[derive(Default)]
    pub struct MemoryStore {
        files: Mutex<BTreeMap<PathBuf, String>>,
    }

    impl MemoryStore {
        pub fn with_files(files: &[(&str, &str)]) -> Self {
            let store = Self::default();
            for (path, contents) in files {
                store.insert(path, contents);
            }
            store
        }

        pub fn insert(&self, path: &str, contents: &str) {
            self.files
                .lock()
                .unwrap()
                .insert(PathBuf::from(path), contents.to_string());
        }

        pub fn get(&self, path: &str) -> Option<String> {
            self.files.lock().unwrap().get(Path::new(path)).cloned()
        }
    }

    impl AssetStore for MemoryStore {
        fn read_to_string(&self, path: &Path) -> anyhow::Result<String> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .with_context(|| format!("no such file: {}", path.display()))
        }

        fn write(&self, path: &Path, contents: &str) -> anyhow::Result<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), contents.to_string());
            Ok(())
        }

        fn create_dir_all(&self, _path: &Path) -> anyhow::Result<()> {
            Ok(())
        }
    }
}
