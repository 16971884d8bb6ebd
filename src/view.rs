use std::path::Path;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cli::{OrderBy, VolumeFilter};
use crate::formats::BookRecord;
use crate::render::{self, Membership};
use crate::store::{Shelf, ShelfStore};

const SESSION_FILE: &str = "session.json";

/// Explicit route identifier. The original page inferred this from
/// which container element was present; here every entry point states
/// it outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Search,
    Favorites,
    ReadLater,
}

impl From<Shelf> for View {
    fn from(shelf: Shelf) -> Self {
        match shelf {
            Shelf::Favorites => View::Favorites,
            Shelf::ReadLater => View::ReadLater,
        }
    }
}

/// Last-rendered page state. The search variant carries the rendered
/// records so a later toggle can re-render them with fresh membership
/// and resolve toggled-on ids to full records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub view: View,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<VolumeFilter>,
    #[serde(default)]
    pub results: Vec<BookRecord>,
    pub saved_at: DateTime<Utc>,
}

impl Session {
    pub fn search(
        query: String,
        order_by: Option<OrderBy>,
        filter: Option<VolumeFilter>,
        results: Vec<BookRecord>,
    ) -> Self {
        Self {
            view: View::Search,
            query: Some(query),
            order_by,
            filter,
            results,
            saved_at: Utc::now(),
        }
    }

    pub fn shelf(shelf: Shelf) -> Self {
        Self {
            view: shelf.into(),
            query: None,
            order_by: None,
            filter: None,
            results: Vec::new(),
            saved_at: Utc::now(),
        }
    }
}

pub async fn load_session(data_dir: &Path) -> anyhow::Result<Option<Session>> {
    let path = data_dir.join(SESSION_FILE);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("read session: {}", path.display()));
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(session) => Ok(Some(session)),
        Err(err) => {
            tracing::warn!(
                error = %err,
                path = %path.display(),
                "session did not parse; starting fresh"
            );
            Ok(None)
        }
    }
}

pub async fn save_session(data_dir: &Path, session: &Session) -> anyhow::Result<()> {
    let path = data_dir.join(SESSION_FILE);
    crate::store::write_json_atomic(&path, session)
        .await
        .with_context(|| format!("write session: {}", path.display()))
}

/// Re-renders whatever view the session says is active, with current
/// shelf membership. This is the refresh step behind toggles.
pub async fn refresh(store: &dyn ShelfStore, session: &Session) -> anyhow::Result<String> {
    let favorites = store.load(Shelf::Favorites).await?;
    let read_later = store.load(Shelf::ReadLater).await?;
    let membership = Membership::of(&favorites, &read_later);

    Ok(match session.view {
        View::Search => render::render_books(&session.results, &membership),
        View::Favorites => render::render_shelf(Shelf::Favorites, &favorites, &membership, None),
        View::ReadLater => render::render_shelf(Shelf::ReadLater, &read_later, &membership, None),
    })
}
