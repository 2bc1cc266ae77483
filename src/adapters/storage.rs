use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Local filesystem storage. Relative paths resolve against `base_path`;
/// absolute paths are used as-is.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }

    fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// On failure the file exists only at `source`.
    fn copy_then_remove(
        source: &Path,
        destination: &Path,
        remove_source: impl FnOnce(&Path) -> std::io::Result<()>,
    ) -> Result<()> {
        fs::copy(source, destination)?;
        if let Err(e) = remove_source(source) {
            if let Err(cleanup) = fs::remove_file(destination) {
                tracing::warn!("Could not remove copy {}: {}", destination.display(), cleanup);
            }
            return Err(e.into());
        }
        Ok(())
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = fs::read(self.full_path(path))?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);
        Self::ensure_parent(&full_path)?;
        fs::write(full_path, data)?;
        Ok(())
    }

    async fn move_file(&self, from: &str, to: &str) -> Result<()> {
        let source = self.full_path(from);
        let destination = self.full_path(to);

        if !source.is_file() {
            return Err(EtlError::IoError(std::io::Error::new(
                ErrorKind::NotFound,
                format!("Source file not found: {}", source.display()),
            )));
        }

        Self::ensure_parent(&destination)?;

        if let Err(e) = fs::rename(&source, &destination) {
            // rename cannot cross filesystems
            tracing::debug!("rename failed ({}), copying instead", e);
            Self::copy_then_remove(&source, &destination, |path| fs::remove_file(path))?;
        }
        Ok(())
    }

    async fn remove_file(&self, path: &str) -> Result<()> {
        match fs::remove_file(self.full_path(path)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
