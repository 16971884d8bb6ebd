use std::path::Path;
use std::time::Duration;

use tokio::io::AsyncBufReadExt as _;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

use crate::catalog::{self, CatalogClient};
use crate::cli::LiveArgs;
use crate::formats::BookRecord;
use crate::render::{self, Membership};
use crate::store::{LocalFsShelfStore, Shelf, ShelfStore};
use crate::toggle::{self, ToggleOutcome};
use crate::view::{self, Session, View};

/// Quiet window before a typed query goes out.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

const HELP: &str = "\
/results          show the last search results
/favorites        show the favorites shelf
/readlater        show the read later shelf
/filter TEXT      narrow the current shelf by title (blank clears)
/fav N            toggle favorites for card N
/later N          toggle read later for card N
/read N           print the preview link for card N
/quit             exit
anything else     search for it (sent after a pause in typing)";

/// Forwards only the most recent value after `delay` of input
/// silence; newer input cancels the pending one. When `input` closes,
/// a still-pending value is flushed before the output closes.
pub(crate) async fn debounce(
    mut input: mpsc::Receiver<String>,
    delay: Duration,
    output: mpsc::Sender<String>,
) {
    let mut pending: Option<String> = None;
    loop {
        match pending.take() {
            Some(query) => {
                let deadline = Instant::now() + delay;
                tokio::select! {
                    received = input.recv() => match received {
                        Some(next) => pending = Some(next),
                        None => {
                            let _ = output.send(query).await;
                            break;
                        }
                    },
                    _ = sleep_until(deadline) => {
                        if output.send(query).await.is_err() {
                            break;
                        }
                    }
                }
            }
            None => match input.recv().await {
                Some(next) => pending = Some(next),
                None => break,
            },
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct LivePage {
    view: View,
    /// Records behind the card numbers of the last render.
    visible: Vec<BookRecord>,
    results: Vec<BookRecord>,
    shelf_filter: Option<String>,
}

pub async fn run(args: LiveArgs, data_dir: &Path) -> anyhow::Result<()> {
    let catalog = CatalogClient::new(&args.base_url)?;
    let store = LocalFsShelfStore::new(data_dir);

    let (raw_tx, raw_rx) = mpsc::channel::<String>(16);
    let (query_tx, mut query_rx) = mpsc::channel::<String>(16);
    let (action_tx, mut action_rx) = mpsc::channel::<String>(16);

    tokio::spawn(debounce(raw_rx, SEARCH_DEBOUNCE, query_tx));

    tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim().to_owned();
            if line.is_empty() {
                continue;
            }
            let sent = if line.starts_with('/') {
                action_tx.send(line).await
            } else {
                raw_tx.send(line).await
            };
            if sent.is_err() {
                break;
            }
        }
        // Dropping the senders closes both channels; the debouncer
        // flushes a pending query on its way out.
    });

    let mut page = LivePage {
        view: View::Search,
        visible: Vec::new(),
        results: Vec::new(),
        shelf_filter: None,
    };

    println!("Type to search; /quit to exit, /help for commands.");

    let mut actions_open = true;
    loop {
        tokio::select! {
            query = query_rx.recv() => match query {
                Some(query) => {
                    run_search(&catalog, &store, &args, &mut page, &query, data_dir).await?;
                }
                None => break,
            },
            action = action_rx.recv(), if actions_open => match action {
                Some(action) => {
                    if handle_action(&store, &mut page, &action).await? == Flow::Quit {
                        break;
                    }
                }
                None => actions_open = false,
            },
        }
    }

    Ok(())
}

async fn run_search(
    catalog: &CatalogClient,
    store: &dyn ShelfStore,
    args: &LiveArgs,
    page: &mut LivePage,
    query: &str,
    data_dir: &Path,
) -> anyhow::Result<()> {
    match catalog.search(query, args.order_by, args.filter).await {
        Ok(volumes) => {
            page.results = volumes.into_iter().map(BookRecord::from_volume).collect();
            page.view = View::Search;
            refresh_page(store, page).await?;

            let session = Session::search(
                query.to_owned(),
                args.order_by,
                args.filter,
                page.results.clone(),
            );
            if let Err(err) = view::save_session(data_dir, &session).await {
                tracing::warn!(error = ?err, "could not save session");
            }
        }
        Err(err) => {
            tracing::debug!(error = ?err, query, "live search did not produce results");
            println!("{err}");
        }
    }
    Ok(())
}

/// Re-renders the active view and rebinds the card numbers.
async fn refresh_page(store: &dyn ShelfStore, page: &mut LivePage) -> anyhow::Result<()> {
    let favorites = store.load(Shelf::Favorites).await?;
    let read_later = store.load(Shelf::ReadLater).await?;
    let membership = Membership::of(&favorites, &read_later);

    match page.view {
        View::Search => {
            page.visible = page.results.clone();
            print!("{}", render::render_books(&page.visible, &membership));
        }
        View::Favorites | View::ReadLater => {
            let shelf = if page.view == View::Favorites {
                Shelf::Favorites
            } else {
                Shelf::ReadLater
            };
            let books = if shelf == Shelf::Favorites {
                &favorites
            } else {
                &read_later
            };
            page.visible = render::filter_by_title(books.values(), page.shelf_filter.as_deref())
                .into_iter()
                .cloned()
                .collect();
            print!(
                "{}",
                render::render_shelf(shelf, books, &membership, page.shelf_filter.as_deref())
            );
        }
    }
    Ok(())
}

async fn handle_action(
    store: &dyn ShelfStore,
    page: &mut LivePage,
    action: &str,
) -> anyhow::Result<Flow> {
    let mut parts = action.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let rest = parts.collect::<Vec<_>>().join(" ");

    match command {
        "/quit" | "/q" => return Ok(Flow::Quit),
        "/help" => println!("{HELP}"),
        "/results" => {
            page.view = View::Search;
            page.shelf_filter = None;
            refresh_page(store, page).await?;
        }
        "/favorites" => {
            page.view = View::Favorites;
            page.shelf_filter = None;
            refresh_page(store, page).await?;
        }
        "/readlater" => {
            page.view = View::ReadLater;
            page.shelf_filter = None;
            refresh_page(store, page).await?;
        }
        "/filter" => {
            if page.view == View::Search {
                println!("Filtering applies to shelf views; try /favorites first.");
            } else {
                page.shelf_filter = (!rest.is_empty()).then(|| rest.clone());
                refresh_page(store, page).await?;
            }
        }
        "/fav" => toggle_card(store, page, &rest, Shelf::Favorites).await?,
        "/later" => toggle_card(store, page, &rest, Shelf::ReadLater).await?,
        "/read" => match card_at(page, &rest) {
            Some(record) => println!("{}", catalog::preview_url(&record.id)?),
            None => println!("No card {rest} on this page."),
        },
        other => println!("Unknown command: {other} (try /help)"),
    }

    Ok(Flow::Continue)
}

async fn toggle_card(
    store: &dyn ShelfStore,
    page: &mut LivePage,
    index: &str,
    shelf: Shelf,
) -> anyhow::Result<()> {
    let Some(record) = card_at(page, index).cloned() else {
        println!("No card {index} on this page.");
        return Ok(());
    };

    match toggle::toggle(store, shelf, &record.id, &record).await {
        Ok(ToggleOutcome::Added) => println!("Added to {shelf}."),
        Ok(ToggleOutcome::Removed) => println!("Removed from {shelf}."),
        Err(err) => {
            // Validation problems surface prominently but never end
            // the session.
            println!("error: {err:#}");
            return Ok(());
        }
    }

    page.shelf_filter = None;
    refresh_page(store, page).await
}

fn card_at<'a>(page: &'a LivePage, index: &str) -> Option<&'a BookRecord> {
    let number: usize = index.trim().parse().ok()?;
    number.checked_sub(1).and_then(|i| page.visible.get(i))
}
