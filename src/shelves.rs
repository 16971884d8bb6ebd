use std::path::Path;

use anyhow::Context as _;

use crate::cli::{ShelfListArgs, ToggleArgs};
use crate::formats::BookRecord;
use crate::render::{self, Membership};
use crate::store::{LocalFsShelfStore, Shelf, ShelfStore};
use crate::toggle::{self, ToggleOutcome};
use crate::view::{self, Session};

/// Renders a shelf, optionally narrowed by a title filter, and makes
/// it the active view.
pub async fn run_list(shelf: Shelf, args: ShelfListArgs, data_dir: &Path) -> anyhow::Result<()> {
    let store = LocalFsShelfStore::new(data_dir);

    let favorites = store.load(Shelf::Favorites).await?;
    let read_later = store.load(Shelf::ReadLater).await?;
    let membership = Membership::of(&favorites, &read_later);
    let books = match shelf {
        Shelf::Favorites => &favorites,
        Shelf::ReadLater => &read_later,
    };

    print!(
        "{}",
        render::render_shelf(shelf, books, &membership, args.filter.as_deref())
    );

    view::save_session(data_dir, &Session::shelf(shelf))
        .await
        .context("save session")?;

    Ok(())
}

/// Toggles a book on a shelf, then refreshes whatever view was last
/// rendered so the new state shows up immediately.
pub async fn run_toggle(args: ToggleArgs, data_dir: &Path) -> anyhow::Result<()> {
    let store = LocalFsShelfStore::new(data_dir);

    let record = resolve_record(&store, data_dir, &args.id)
        .await?
        .ok_or_else(|| {
            anyhow::anyhow!(
                "unknown book id: {} (search for it first, or check a shelf)",
                args.id
            )
        })?;

    let outcome = toggle::toggle(&store, args.shelf, &args.id, &record).await?;
    match outcome {
        ToggleOutcome::Added => println!("Added to {}.", args.shelf),
        ToggleOutcome::Removed => println!("Removed from {}.", args.shelf),
    }

    let session = view::load_session(data_dir)
        .await?
        .unwrap_or_else(|| Session::shelf(args.shelf));
    print!("{}", view::refresh(&store, &session).await?);

    Ok(())
}

/// Finds the full record for an id: the last search results first
/// (the CLI analog of "the cards on the page"), then either shelf.
pub(crate) async fn resolve_record(
    store: &dyn ShelfStore,
    data_dir: &Path,
    id: &str,
) -> anyhow::Result<Option<BookRecord>> {
    if let Some(session) = view::load_session(data_dir).await?
        && let Some(record) = session.results.iter().find(|record| record.id == id)
    {
        return Ok(Some(record.clone()));
    }

    for shelf in [Shelf::Favorites, Shelf::ReadLater] {
        if let Some(record) = store.load(shelf).await?.get(id) {
            return Ok(Some(record.clone()));
        }
    }

    Ok(None)
}
