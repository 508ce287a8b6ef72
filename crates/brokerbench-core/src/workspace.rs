//! Ephemeral per-scenario workspaces.
//!
//! A [`Workspace`] owns a temporary directory tree with one subdirectory per
//! target. Dropping it removes the tree, so rendered drivers never outlive the
//! scenario iteration that produced them, whichever way that iteration ends.

use crate::error::{BenchError, Result};
use crate::types::Target;
use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

const WORKSPACE_PREFIX: &str = "brokerbench-";

/// Directory layout of a live workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    pub root: PathBuf,
    /// Target name -> that target's subdirectory.
    pub target_dirs: BTreeMap<String, PathBuf>,
}

impl WorkspaceLayout {
    pub fn target_dir(&self, target: &str) -> Option<&Path> {
        self.target_dirs.get(target).map(PathBuf::as_path)
    }
}

/// Handle to a live workspace; the tree is deleted on drop.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    layout: WorkspaceLayout,
}

impl Workspace {
    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the tree now, reporting any removal error.
    pub fn close(self) -> std::io::Result<()> {
        let root = self.layout.root;
        self.dir.close()?;
        debug!(path = %root.display(), "workspace removed");
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkspaceManager {
    parent: Option<PathBuf>,
}

impl WorkspaceManager {
    /// `parent` is where workspaces are created; `None` uses the system temp dir.
    pub fn new(parent: Option<PathBuf>) -> Self {
        Self { parent }
    }

    /// Create a workspace with one subdirectory per target.
    pub fn acquire(&self, targets: &[Target]) -> Result<Workspace> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);
        let dir = match &self.parent {
            Some(parent) => {
                std::fs::create_dir_all(parent).map_err(BenchError::Workspace)?;
                builder.tempdir_in(parent)
            }
            None => builder.tempdir(),
        }
        .map_err(BenchError::Workspace)?;

        // On error below `dir` is dropped, which removes the partial tree.
        let mut target_dirs = BTreeMap::new();
        for target in targets {
            let path = dir.path().join(&target.dir_name);
            std::fs::create_dir_all(&path).map_err(BenchError::Workspace)?;
            target_dirs.insert(target.name.clone(), path);
        }

        let layout = WorkspaceLayout {
            root: dir.path().to_path_buf(),
            target_dirs,
        };
        debug!(path = %layout.root.display(), "workspace created");
        Ok(Workspace { dir, layout })
    }

    /// Run `scope` inside a fresh workspace and remove it afterwards.
    ///
    /// The tree is removed on every exit path. If `scope` panics or the returned
    /// future is dropped early, the handle's drop does the removal. A failure to
    /// remove the tree is logged rather than masking the scope's own result.
    pub async fn with_workspace<F, Fut, T>(&self, targets: &[Target], scope: F) -> Result<T>
    where
        F: FnOnce(WorkspaceLayout) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let workspace = self.acquire(targets)?;
        let result = scope(workspace.layout().clone()).await;
        let root = workspace.layout().root.clone();
        if let Err(e) = workspace.close() {
            warn!(path = %root.display(), error = %e, "failed to remove workspace");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn targets() -> Vec<Target> {
        vec![Target::kafka("k:9092"), Target::hstream("h:9092")]
    }

    #[test]
    fn acquire_creates_one_dir_per_target_and_drop_removes_it() {
        let parent = tempdir().unwrap();
        let manager = WorkspaceManager::new(Some(parent.path().to_path_buf()));
        let ws = manager.acquire(&targets()).unwrap();
        let root = ws.root().to_path_buf();
        assert!(root.join("kafka").is_dir());
        assert!(root.join("hstream").is_dir());
        assert_eq!(
            ws.layout().target_dir("hstream-kafka"),
            Some(root.join("hstream").as_path())
        );
        std::fs::write(root.join("kafka").join("driver.yaml"), "x").unwrap();
        drop(ws);
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn with_workspace_removes_tree_on_error() {
        let parent = tempdir().unwrap();
        let manager = WorkspaceManager::new(Some(parent.path().to_path_buf()));
        let mut seen = None;
        let result: Result<()> = manager
            .with_workspace(&targets(), |layout| {
                seen = Some(layout.root.clone());
                async move {
                    std::fs::write(layout.root.join("kafka").join("d.yaml"), "x")?;
                    Err(BenchError::Internal(anyhow::anyhow!("boom")))
                }
            })
            .await;
        assert!(result.is_err());
        let root = seen.unwrap();
        assert!(!root.exists());
        assert_eq!(std::fs::read_dir(parent.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn with_workspace_returns_scope_value() {
        let manager = WorkspaceManager::default();
        let root = manager
            .with_workspace(&targets(), |layout| async move { Ok(layout.root) })
            .await
            .unwrap();
        assert!(!root.exists());
    }
}
