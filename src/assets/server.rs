use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tokio::runtime::Runtime;

use crate::assets::io::{AssetReader, FileAssetReader};
use crate::assets::loaders::GltfLoader;
use crate::assets::prefab::Prefab;
use crate::errors::{Error, Result};

/// Process-wide runtime that runs asset I/O and parsing off the main thread.
fn asset_runtime() -> Result<&'static Runtime> {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();

    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime);
    }
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("kinema-assets")
        .build()?;
    // A concurrent initialiser may have won; its runtime is used either way.
    let _ = RUNTIME.set(runtime);
    RUNTIME
        .get()
        .ok_or_else(|| Error::TaskJoinError("asset runtime unavailable".to_string()))
}

/// Loads model files from a root directory.
///
/// The server is cheap to clone; clones share the same reader.
#[derive(Clone)]
pub struct AssetServer {
    reader: Arc<FileAssetReader>,
}

impl Default for AssetServer {
    fn default() -> Self {
        Self::new(".")
    }
}

impl AssetServer {
    /// `root` is the directory asset URIs are resolved against.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            reader: Arc::new(FileAssetReader::new(root)),
        }
    }

    #[must_use]
    pub fn root_path(&self) -> &Path {
        self.reader.root_path()
    }

    // ========================================================================
    // Async Methods
    // ========================================================================

    /// Reads and parses a glTF/GLB file. Every failure is reported as
    /// [`Error::LoadFailure`] naming `uri`.
    pub async fn load_prefab_async(&self, uri: &str) -> Result<Prefab> {
        let bytes = self
            .reader
            .read_bytes(uri)
            .await
            .map_err(|e| Error::load_failure(uri, format!("{e:#}")))?;

        let base_path: PathBuf = self
            .reader
            .root_path()
            .join(uri)
            .parent()
            .map_or_else(|| self.reader.root_path().to_path_buf(), Path::to_path_buf);

        tokio::task::spawn_blocking(move || GltfLoader::load_from_slice(&bytes, &base_path))
            .await
            .map_err(|e| Error::load_failure(uri, e))?
            .map_err(|e| Error::load_failure(uri, e))
    }

    // ========================================================================
    // Blocking / Polled Methods
    // ========================================================================

    /// Blocking variant of [`load_prefab_async`](Self::load_prefab_async).
    ///
    /// Must not be called from inside an async context.
    pub fn load_prefab(&self, uri: &str) -> Result<Prefab> {
        asset_runtime()?.block_on(self.load_prefab_async(uri))
    }

    /// Starts loading `uri` in the background and returns a handle that the
    /// frame loop can poll.
    #[must_use]
    pub fn spawn_load(&self, uri: &str) -> LoadTask {
        let (tx, rx) = flume::bounded(1);
        let uri = uri.to_string();

        match asset_runtime() {
            Ok(runtime) => {
                let server = self.clone();
                let task_uri = uri.clone();
                runtime.spawn(async move {
                    let result = server.load_prefab_async(&task_uri).await;
                    // The receiver may have been dropped; nothing to report to.
                    let _ = tx.send(result);
                });
            }
            Err(e) => {
                let _ = tx.send(Err(Error::load_failure(&uri, e)));
            }
        }

        log::info!("Loading '{uri}'...");
        LoadTask {
            uri,
            rx,
            finished: false,
        }
    }
}

/// A pending background load. Yields its result exactly once.
pub struct LoadTask {
    uri: String,
    rx: flume::Receiver<Result<Prefab>>,
    finished: bool,
}

impl LoadTask {
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// `true` once [`poll`](Self::poll) has handed out the result.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Non-blocking check. Returns `Some` the first time a result is
    /// available and `None` before that and forever after.
    pub fn poll(&mut self) -> Option<Result<Prefab>> {
        if self.finished {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.finished = true;
                Some(result)
            }
            Err(flume::TryRecvError::Empty) => None,
            Err(flume::TryRecvError::Disconnected) => {
                self.finished = true;
                Some(Err(Error::load_failure(
                    &self.uri,
                    "loader task ended without a result",
                )))
            }
        }
    }

    /// Blocks until the result arrives.
    pub fn wait(mut self) -> Result<Prefab> {
        if self.finished {
            return Err(Error::load_failure(&self.uri, "result already taken"));
        }
        self.finished = true;
        self.rx.recv().map_err(|_| {
            Error::load_failure(&self.uri, "loader task ended without a result")
        })?
    }
}
