//! File access for plaintext inputs and sealed outputs.

use anyhow::{Context, Result, bail};
use getrandom::fill;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A single file read whole into memory or written atomically.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the entire file into memory.
    pub fn load(&self) -> Result<Vec<u8>> {
        let data = fs::read(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        debug!(path = %self.path.display(), bytes = data.len(), "loaded file");
        Ok(data)
    }

    /// Writes `data` through a synced temporary file published at the target,
    /// so readers see either the old file or the complete new one.
    ///
    /// Refuses to replace an existing file unless `overwrite` is set, even one
    /// created while the temporary file was being written.
    /// Creates parent directories if they don't exist.
    pub fn save(&self, data: &[u8], overwrite: bool) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let tmp_path = self.tmp_path()?;

        let result = write_synced(&tmp_path, data)
            .and_then(|_| publish(&tmp_path, &self.path, overwrite));
        if let Err(e) = result {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        #[cfg(unix)]
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::File::open(parent)?.sync_all()?;
        }

        debug!(path = %self.path.display(), bytes = data.len(), "saved file");
        Ok(())
    }

    /// `<name>.tmp.<16 hex chars>` next to the target.
    fn tmp_path(&self) -> Result<PathBuf> {
        let mut buf = [0u8; 8];
        fill(&mut buf).map_err(|_| anyhow::anyhow!("OS random generator unavailable"))?;

        let file_name = self
            .path
            .file_name()
            .context("output path has no file name")?
            .to_string_lossy();

        Ok(self
            .path
            .with_file_name(format!("{file_name}.tmp.{}", hex::encode(buf))))
    }
}

/// Moves `tmp` to `target`. Without `overwrite` the target is linked rather
/// than renamed, which fails instead of replacing an existing file.
fn publish(tmp: &Path, target: &Path, overwrite: bool) -> Result<()> {
    if overwrite {
        return fs::rename(tmp, target).context("failed to replace target");
    }

    match fs::hard_link(tmp, target) {
        Ok(()) => {
            let _ = fs::remove_file(tmp);
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => bail!(
            "{} already exists (use --force to overwrite)",
            target.display()
        ),
        Err(e) => Err(e).with_context(|| format!("failed to create {}", target.display())),
    }
}

fn write_synced(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .context("failed to create temporary file")?;
    file.write_all(data)?;
    file.sync_all()?;
    Ok(())
}
