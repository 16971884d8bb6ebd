use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context as _;
use async_trait::async_trait;
use tokio::fs;

use crate::error::Error;
use crate::formats::BookRecord;

/// The two persisted collections. A book may sit on both shelves,
/// either one, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Shelf {
    Favorites,
    ReadLater,
}

impl Shelf {
    /// Blob name inside the data directory (`<key>.json`).
    pub fn key(self) -> &'static str {
        match self {
            Shelf::Favorites => "favorites",
            Shelf::ReadLater => "readLater",
        }
    }

    pub fn empty_message(self) -> &'static str {
        match self {
            Shelf::Favorites => "No favorites saved.",
            Shelf::ReadLater => "No read later books saved.",
        }
    }
}

impl std::fmt::Display for Shelf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Shelf::Favorites => "favorites",
            Shelf::ReadLater => "read later",
        })
    }
}

pub type ShelfBooks = BTreeMap<String, BookRecord>;

/// Persistence boundary for the two shelves. Injected into the toggle
/// controller and the view router so tests can swap in the in-memory
/// implementation.
#[async_trait]
pub trait ShelfStore: Send + Sync {
    /// Loads the named collection. A missing blob is an empty shelf; a
    /// malformed blob is reported and also treated as empty. Neither
    /// case is an error for the caller.
    async fn load(&self, shelf: Shelf) -> anyhow::Result<ShelfBooks>;

    /// Replaces the named collection wholesale.
    async fn save(&self, shelf: Shelf, books: &ShelfBooks) -> anyhow::Result<()>;
}

#[derive(Debug, Clone)]
pub struct LocalFsShelfStore {
    base_dir: PathBuf,
}

impl LocalFsShelfStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn shelf_json_path(&self, shelf: Shelf) -> PathBuf {
        self.base_dir.join(format!("{}.json", shelf.key()))
    }
}

#[async_trait]
impl ShelfStore for LocalFsShelfStore {
    async fn load(&self, shelf: Shelf) -> anyhow::Result<ShelfBooks> {
        let path = self.shelf_json_path(shelf);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ShelfBooks::new());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("read shelf: {}", path.display()));
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(books) => Ok(books),
            Err(source) => {
                let err = Error::ShelfParse { shelf, source };
                tracing::warn!(
                    error = %err,
                    path = %path.display(),
                    "shelf blob did not parse; treating the shelf as empty"
                );
                Ok(ShelfBooks::new())
            }
        }
    }

    async fn save(&self, shelf: Shelf, books: &ShelfBooks) -> anyhow::Result<()> {
        write_json_atomic(&self.shelf_json_path(shelf), books)
            .await
            .with_context(|| format!("save {shelf} shelf"))
    }
}

/// In-memory store. Used by unit tests; keeps the same contract as the
/// filesystem store.
#[derive(Debug, Default)]
pub struct MemoryShelfStore {
    shelves: Mutex<MemoryShelves>,
}

#[derive(Debug, Default)]
struct MemoryShelves {
    favorites: ShelfBooks,
    read_later: ShelfBooks,
}

#[async_trait]
impl ShelfStore for MemoryShelfStore {
    async fn load(&self, shelf: Shelf) -> anyhow::Result<ShelfBooks> {
        let shelves = self
            .shelves
            .lock()
            .map_err(|_| anyhow::anyhow!("shelf store lock poisoned"))?;
        Ok(match shelf {
            Shelf::Favorites => shelves.favorites.clone(),
            Shelf::ReadLater => shelves.read_later.clone(),
        })
    }

    async fn save(&self, shelf: Shelf, books: &ShelfBooks) -> anyhow::Result<()> {
        let mut shelves = self
            .shelves
            .lock()
            .map_err(|_| anyhow::anyhow!("shelf store lock poisoned"))?;
        match shelf {
            Shelf::Favorites => shelves.favorites = books.clone(),
            Shelf::ReadLater => shelves.read_later = books.clone(),
        }
        Ok(())
    }
}

pub(crate) async fn write_json_atomic<T: serde::Serialize>(
    path: &Path,
    value: &T,
) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("path has no parent: {}", path.display()))?;
    fs::create_dir_all(parent)
        .await
        .with_context(|| format!("create data dir: {}", parent.display()))?;

    let tmp_path = path.with_extension(format!("tmp.{}", uuid::Uuid::new_v4().simple()));
    let data = serde_json::to_vec_pretty(value).context("serialize json")?;
    fs::write(&tmp_path, &data)
        .await
        .with_context(|| format!("write tmp: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("rename tmp to final: {}", path.display()))?;
    Ok(())
}
