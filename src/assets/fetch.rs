use std::{
    collections::HashMap,
    path::{Component, Path, PathBuf},
    sync::{Arc, mpsc},
};

use anyhow::Context;

use crate::{
    assets::decode::{PreparedImage, decode_image},
    foundation::error::{CineError, CineResult},
};

/// Terminal outcome of one load attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Settle {
    /// The image loaded.
    Loaded,
    /// The image could not be fetched or decoded.
    Failed,
}

/// Source of asynchronous image loads consumed by the preloader.
///
/// `begin` must not block. Completed attempts are reported later through
/// `poll_settled`, which is called from the owning thread.
pub trait AssetFetcher {
    /// Start loading `reference`; `index` identifies the attempt when it settles.
    fn begin(&mut self, index: usize, reference: &str);

    /// Append every attempt that settled since the previous poll.
    fn poll_settled(&mut self, out: &mut Vec<(usize, Settle)>);
}

type FetchMsg = (usize, String, CineResult<PreparedImage>);

/// Worker count of [`FsFetcher::new`].
pub const DEFAULT_FETCH_THREADS: usize = 4;

/// Loads image references from a directory root on a small worker pool.
///
/// References are resolved relative to the root; a leading `/` is treated as the root
/// itself so web-style paths like `/img/card.png` work unchanged.
pub struct FsFetcher {
    root: PathBuf,
    pool: rayon::ThreadPool,
    tx: mpsc::Sender<FetchMsg>,
    rx: mpsc::Receiver<FetchMsg>,
    images: HashMap<String, Arc<PreparedImage>>,
}

impl FsFetcher {
    /// Fetcher rooted at `root` with [`DEFAULT_FETCH_THREADS`] workers.
    pub fn new(root: impl Into<PathBuf>) -> CineResult<Self> {
        Self::with_threads(root, DEFAULT_FETCH_THREADS)
    }

    /// Fetcher rooted at `root` decoding on `threads` workers.
    pub fn with_threads(root: impl Into<PathBuf>, threads: usize) -> CineResult<Self> {
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            root: root.into(),
            pool: build_thread_pool(threads)?,
            tx,
            rx,
            images: HashMap::new(),
        })
    }

    /// Decoded image for `reference`, once it loaded.
    pub fn image(&self, reference: &str) -> Option<Arc<PreparedImage>> {
        self.images.get(reference).cloned()
    }

    /// Number of images decoded so far.
    pub fn loaded_count(&self) -> usize {
        self.images.len()
    }
}

/// Resolve a reference against `root`, rejecting anything that escapes it.
pub fn resolve_reference(root: &Path, reference: &str) -> CineResult<PathBuf> {
    let rel = reference.trim().trim_start_matches('/');
    if rel.is_empty() {
        return Err(CineError::validation("asset reference is empty"));
    }
    let rel_path = Path::new(rel);
    for comp in rel_path.components() {
        match comp {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(CineError::validation(format!(
                    "asset reference '{reference}' escapes the asset root"
                )));
            }
        }
    }
    Ok(root.join(rel_path))
}

fn build_thread_pool(threads: usize) -> CineResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(CineError::validation("fetch threads must be >= 1"));
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("cinereveal-fetch-{i}"))
        .build()
        .context("build fetch thread pool")?;
    Ok(pool)
}

fn load_from_disk(path: &Path) -> CineResult<PreparedImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
}

impl AssetFetcher for FsFetcher {
    fn begin(&mut self, index: usize, reference: &str) {
        let path = match resolve_reference(&self.root, reference) {
            Ok(p) => p,
            Err(err) => {
                let _ = self.tx.send((index, reference.to_string(), Err(err)));
                return;
            }
        };

        let tx = self.tx.clone();
        let reference = reference.to_string();
        self.pool.spawn(move || {
            let outcome = load_from_disk(&path);
            // The receiver is gone once the preloader was disposed; nothing to report.
            let _ = tx.send((index, reference, outcome));
        });
    }

    fn poll_settled(&mut self, out: &mut Vec<(usize, Settle)>) {
        while let Ok((index, reference, outcome)) = self.rx.try_recv() {
            match outcome {
                Ok(image) => {
                    tracing::debug!(
                        %reference,
                        width = image.width,
                        height = image.height,
                        "asset loaded"
                    );
                    self.images.insert(reference, Arc::new(image));
                    out.push((index, Settle::Loaded));
                }
                Err(err) => {
                    tracing::warn!(
                        %reference,
                        error = %err,
                        "asset failed to load; treating as settled"
                    );
                    out.push((index, Settle::Failed));
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
