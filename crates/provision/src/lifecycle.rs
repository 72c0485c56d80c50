//! Process lifecycle manager.
//!
//! Owns the instance-scoped storage area and the registry of live process
//! handles. Handles are transient: they exist only in the process that
//! spawned them and are lost on restart, after which [`terminate`] is a
//! no-op returning `false` until the instance is reconciled out of band.
//!
//! Spawned children are fire-and-forget. Nothing here waits on them,
//! reaps them, or limits their resources.
//!
//! [`terminate`]: LifecycleManager::terminate

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use botforge_core::error::ProvisionError;
use botforge_core::types::InstanceId;
use tokio::fs;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use uuid::Uuid;

/// A freshly provisioned runnable unit: its identity and where its
/// derived source text lives.
#[derive(Debug, Clone)]
pub struct ProvisionedUnit {
    pub id: InstanceId,
    pub source_path: PathBuf,
}

/// Spawns, registers, and terminates one OS process per instance.
pub struct LifecycleManager {
    /// Storage area for derived instance source files.
    instances_dir: PathBuf,
    /// Command used to run an instance file (e.g. `python3`).
    runtime: String,
    /// Live child handles by instance id. Entries are removed on
    /// retirement; they are never repopulated after a restart.
    processes: Mutex<HashMap<InstanceId, Child>>,
}

impl LifecycleManager {
    pub fn new(instances_dir: impl Into<PathBuf>, runtime: impl Into<String>) -> Self {
        Self {
            instances_dir: instances_dir.into(),
            runtime: runtime.into(),
            processes: Mutex::new(HashMap::new()),
        }
    }

    /// Persist `source` as a new runnable unit and launch it.
    ///
    /// On success exactly one new process is running and its handle is
    /// registered. On failure nothing is persisted: a write error leaves
    /// no file, and a spawn error removes the just-written file
    /// best-effort before surfacing.
    pub async fn provision(&self, source: &str) -> Result<ProvisionedUnit, ProvisionError> {
        fs::create_dir_all(&self.instances_dir)
            .await
            .map_err(ProvisionError::StorageWriteFailed)?;

        let id = Uuid::new_v4();
        let source_path = self.instances_dir.join(format!("{id}.py"));

        fs::write(&source_path, source)
            .await
            .map_err(ProvisionError::StorageWriteFailed)?;

        let child = match Command::new(&self.runtime).arg(&source_path).spawn() {
            Ok(child) => child,
            Err(err) => {
                if let Err(cleanup_err) = fs::remove_file(&source_path).await {
                    tracing::warn!(
                        path = %source_path.display(),
                        error = %cleanup_err,
                        "Failed to remove source file after spawn failure",
                    );
                }
                return Err(ProvisionError::SpawnFailed(err));
            }
        };

        tracing::info!(
            instance_id = %id,
            path = %source_path.display(),
            pid = child.id(),
            "Instance process launched",
        );

        self.processes.lock().await.insert(id, child);

        Ok(ProvisionedUnit { id, source_path })
    }

    /// Request termination of an instance's process.
    ///
    /// Returns whether a kill signal was issued, not whether the process
    /// exited; there is no wait or confirmation. Without a registered
    /// handle (unknown id, or any instance spawned before a restart) this
    /// is a no-op returning `false`.
    pub async fn terminate(&self, id: InstanceId) -> bool {
        let mut processes = self.processes.lock().await;
        match processes.get_mut(&id) {
            Some(child) => match child.start_kill() {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(
                        instance_id = %id,
                        error = %err,
                        "Failed to signal instance process",
                    );
                    false
                }
            },
            None => false,
        }
    }

    /// Best-effort cleanup for retirement: signal the process and drop
    /// its handle, then delete the stored source file. A missing file is
    /// not an error; every other sub-failure is logged and swallowed so
    /// the caller can always complete catalog-side deactivation.
    pub async fn retire(&self, id: InstanceId, source_path: &Path) {
        if let Some(mut child) = self.processes.lock().await.remove(&id) {
            if let Err(err) = child.start_kill() {
                tracing::warn!(
                    instance_id = %id,
                    error = %err,
                    "Failed to signal instance process during retirement",
                );
            }
        }

        match fs::remove_file(source_path).await {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(
                    instance_id = %id,
                    path = %source_path.display(),
                    error = %err,
                    "Failed to delete instance source file during retirement",
                );
            }
        }
    }

    /// Whether a live handle is registered for `id`.
    pub async fn has_handle(&self, id: InstanceId) -> bool {
        self.processes.lock().await.contains_key(&id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    /// A runtime that exists everywhere and exits immediately, so tests
    /// spawn real processes without leaving anything running.
    const NOOP_RUNTIME: &str = "true";

    #[tokio::test]
    async fn provision_writes_file_and_registers_handle() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LifecycleManager::new(dir.path(), NOOP_RUNTIME);

        let unit = manager.provision("print('hi')\n").await.unwrap();

        let written = fs::read_to_string(&unit.source_path).await.unwrap();
        assert_eq!(written, "print('hi')\n");
        assert!(manager.has_handle(unit.id).await);
    }

    #[tokio::test]
    async fn provision_surfaces_spawn_failure_and_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LifecycleManager::new(dir.path(), "/nonexistent/runtime/binary");

        let err = manager.provision("print('hi')\n").await.unwrap_err();
        assert_matches!(err, ProvisionError::SpawnFailed(_));

        // The storage area holds no leftover unit.
        let mut entries = fs::read_dir(dir.path()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn terminate_without_handle_is_noop_false() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LifecycleManager::new(dir.path(), NOOP_RUNTIME);

        assert!(!manager.terminate(Uuid::new_v4()).await);
    }

    #[tokio::test]
    async fn retire_removes_handle_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LifecycleManager::new(dir.path(), NOOP_RUNTIME);

        let unit = manager.provision("print('hi')\n").await.unwrap();
        manager.retire(unit.id, &unit.source_path).await;

        assert!(!manager.has_handle(unit.id).await);
        assert!(fs::metadata(&unit.source_path).await.is_err());
    }

    #[tokio::test]
    async fn retire_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LifecycleManager::new(dir.path(), NOOP_RUNTIME);

        // Never provisioned; nothing to clean up. Must not panic or error.
        manager
            .retire(Uuid::new_v4(), &dir.path().join("missing.py"))
            .await;
    }
}
