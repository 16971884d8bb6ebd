use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::catalog::{self, CatalogClient};
use crate::cli::{DownloadArgs, ReadArgs, SearchArgs};
use crate::formats::BookRecord;
use crate::render::{self, Membership};
use crate::store::{LocalFsShelfStore, Shelf, ShelfStore};
use crate::view::{self, Session};

/// One-shot search: fetch, normalize, render, and remember the page
/// as the active view. Every catalog error is recovered as an inline
/// message, matching the page the original rendered into.
pub async fn run(args: SearchArgs, data_dir: &Path) -> anyhow::Result<()> {
    let catalog = CatalogClient::new(&args.base_url)?;
    let store = LocalFsShelfStore::new(data_dir);
    let query = args.query.join(" ");

    match catalog.search(&query, args.order_by, args.filter).await {
        Ok(volumes) => {
            let records: Vec<BookRecord> =
                volumes.into_iter().map(BookRecord::from_volume).collect();
            tracing::info!(query = %query, count = records.len(), "rendering search results");

            let favorites = store.load(Shelf::Favorites).await?;
            let read_later = store.load(Shelf::ReadLater).await?;
            let membership = Membership::of(&favorites, &read_later);
            print!("{}", render::render_books(&records, &membership));

            let session = Session::search(query, args.order_by, args.filter, records);
            view::save_session(data_dir, &session)
                .await
                .context("save session")?;
        }
        Err(err) => {
            tracing::debug!(error = ?err, "search did not produce results");
            println!("{err}");
        }
    }

    Ok(())
}

pub fn run_read(args: ReadArgs) -> anyhow::Result<()> {
    let url = catalog::preview_url(&args.id)?;
    println!("{url}");
    Ok(())
}

pub async fn run_download(args: DownloadArgs, data_dir: &Path) -> anyhow::Result<()> {
    let store = LocalFsShelfStore::new(data_dir);
    let record = crate::shelves::resolve_record(&store, data_dir, &args.id)
        .await?
        .ok_or_else(|| {
            anyhow::anyhow!("unknown book id: {} (search for it first)", args.id)
        })?;

    let out_path = match args.out {
        Some(out) => PathBuf::from(out),
        None => PathBuf::from(format!("{}.pdf", args.id)),
    };

    let catalog = CatalogClient::new(catalog::DEFAULT_BASE_URL)?;
    catalog.download_pdf(&record, &out_path).await?;
    println!("Saved {}", out_path.display());

    Ok(())
}
