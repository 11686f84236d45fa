//! Mutual exclusion on a local repository directory.
//!
//! The local repository is a shared on-disk cache. Two resolutions writing into the same
//! directory at once can leave half-downloaded files behind, so every collect+resolve runs
//! under a [`LocalRepositoryLock`]:
//!
//! - tasks of this process queue on a per-directory async mutex, and
//! - other processes are held off by an exclusive OS lock on
//!   `{local}/.locks/resolver.lock`.
//!
//! Resolutions into different directories never wait for each other.

use crate::core::Result;
use anyhow::Context;
use dashmap::DashMap;
use fs4::fs_std::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tokio::sync::{Mutex, OwnedMutexGuard};

const LOCK_FILE: &str = "resolver.lock";

static IN_PROCESS: LazyLock<DashMap<PathBuf, Arc<Mutex<()>>>> = LazyLock::new(DashMap::new);

/// Exclusive access to a local repository; released on drop.
pub struct LocalRepositoryLock {
    // Drop order: the file lock goes before the in-process guard, so the next task of
    // this process finds the file unlocked.
    file: File,
    path: PathBuf,
    _guard: OwnedMutexGuard<()>,
}

impl LocalRepositoryLock {
    /// Wait until `local_repository` is free, then lock it.
    ///
    /// Creates the directory and its `.locks/` subdirectory when missing.
    pub async fn acquire(local_repository: &Path) -> Result<Self> {
        let locks_dir = local_repository.join(".locks");
        tokio::fs::create_dir_all(&locks_dir).await?;

        let key = tokio::fs::canonicalize(local_repository)
            .await
            .unwrap_or_else(|_| local_repository.to_path_buf());
        let mutex = IN_PROCESS
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = mutex.lock_owned().await;

        let path = locks_dir.join(LOCK_FILE);
        let lock_path = path.clone();
        let file = tokio::task::spawn_blocking(move || -> anyhow::Result<File> {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&lock_path)
                .with_context(|| format!("Failed to open lock file: {}", lock_path.display()))?;
            file.lock_exclusive()
                .with_context(|| format!("Failed to lock {}", lock_path.display()))?;
            Ok(file)
        })
        .await
        .map_err(std::io::Error::other)?
        .map_err(std::io::Error::other)?;

        tracing::trace!("Locked local repository {}", local_repository.display());
        Ok(Self {
            file,
            path,
            _guard: guard,
        })
    }

    /// The lock file backing this lock.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LocalRepositoryLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!("Failed to unlock {}: {}", self.path.display(), e);
        }
    }
}
