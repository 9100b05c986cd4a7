//! Asynchronous loading of JSON scene assets.
//!
//! The loader runs on a tokio runtime and reports progress (0-100) on a
//! `watch` channel: 0 before the read, 50 once the bytes are in, 100 after the
//! description parsed and validated. The editor polls [`PendingAsset`] from
//! its frame loop and never blocks on I/O.

use std::path::{Path, PathBuf};

use shared::NodeDescription;
use tokio::sync::{oneshot, watch};

/// Errors from loading an asset
#[derive(Debug)]
pub enum AssetError {
    /// The file could not be read
    Io { path: PathBuf, source: std::io::Error },
    /// The file is not a valid node description
    Parse { path: PathBuf, source: serde_json::Error },
    /// The description parsed but describes invalid geometry
    Invalid(String),
    /// The load task ended without producing a result
    Cancelled,
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetError::Io { path, source } => {
                write!(f, "Failed to read asset {}: {}", path.display(), source)
            }
            AssetError::Parse { path, source } => {
                write!(f, "Failed to parse asset {}: {}", path.display(), source)
            }
            AssetError::Invalid(msg) => write!(f, "Invalid asset: {}", msg),
            AssetError::Cancelled => write!(f, "Asset load was cancelled"),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io { source, .. } => Some(source),
            AssetError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Reads node descriptions and publishes progress
pub struct AssetLoader {
    progress: watch::Sender<u8>,
}

impl AssetLoader {
    pub fn new() -> (Self, watch::Receiver<u8>) {
        let (tx, rx) = watch::channel(0);
        (Self { progress: tx }, rx)
    }

    fn report(&self, percent: u8) {
        // No receivers left is fine: nobody is watching
        let _ = self.progress.send(percent.min(100));
    }

    pub async fn load(&self, path: impl AsRef<Path>) -> Result<NodeDescription, AssetError> {
        let path = path.as_ref();
        self.report(0);

        let bytes = tokio::fs::read(path).await.map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.report(50);

        let desc: NodeDescription =
            serde_json::from_slice(&bytes).map_err(|source| AssetError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        desc.validate().map_err(AssetError::Invalid)?;
        self.report(100);

        tracing::info!(
            "Loaded asset '{}' from {} ({} nodes)",
            desc.name,
            path.display(),
            desc.node_count()
        );
        Ok(desc)
    }
}

/// An in-flight load spawned on a runtime
pub struct PendingAsset {
    path: PathBuf,
    progress: watch::Receiver<u8>,
    result: oneshot::Receiver<Result<NodeDescription, AssetError>>,
}

impl PendingAsset {
    /// Spawn a load of `path` on `runtime`
    pub fn spawn(runtime: &tokio::runtime::Handle, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (loader, progress) = AssetLoader::new();
        let (tx, result) = oneshot::channel();
        let task_path = path.clone();
        runtime.spawn(async move {
            let outcome = loader.load(&task_path).await;
            let _ = tx.send(outcome);
        });
        Self {
            path,
            progress,
            result,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last reported progress, 0-100
    pub fn progress(&self) -> u8 {
        *self.progress.borrow()
    }

    /// The load result once available. Returns `None` while still running.
    pub fn try_take(&mut self) -> Option<Result<NodeDescription, AssetError>> {
        match self.result.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(AssetError::Cancelled)),
        }
    }
}
