use std::collections::BTreeSet;

use crate::formats::BookRecord;
use crate::store::{Shelf, ShelfBooks};

pub const NO_RESULTS_MESSAGE: &str = "No books found.";

pub const ADD_FAVORITE_LABEL: &str = "Add to Favorites";
pub const REMOVE_FAVORITE_LABEL: &str = "Remove from Favorites";
pub const ADD_READ_LATER_LABEL: &str = "Add to Read Later";
pub const REMOVE_READ_LATER_LABEL: &str = "Remove from Read Later";

/// Shelf membership snapshot used to label the toggle affordances.
#[derive(Debug, Clone, Default)]
pub struct Membership {
    favorites: BTreeSet<String>,
    read_later: BTreeSet<String>,
}

impl Membership {
    pub fn of(favorites: &ShelfBooks, read_later: &ShelfBooks) -> Self {
        Self {
            favorites: favorites.keys().cloned().collect(),
            read_later: read_later.keys().cloned().collect(),
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn is_read_later(&self, id: &str) -> bool {
        self.read_later.contains(id)
    }
}

/// One card per record; the empty slice renders the no-results
/// message. Cards are numbered so interactive actions can refer to
/// them by index.
pub fn render_books(records: &[BookRecord], membership: &Membership) -> String {
    if records.is_empty() {
        return format!("{NO_RESULTS_MESSAGE}\n");
    }

    let mut out = String::new();
    for (index, record) in records.iter().enumerate() {
        out.push_str(&render_card(index, record, membership));
    }
    out
}

/// Shelf view. The filter narrows by title without touching the
/// stored collection; a shelf that is empty before filtering renders
/// its own empty-state message.
pub fn render_shelf(
    shelf: Shelf,
    books: &ShelfBooks,
    membership: &Membership,
    filter: Option<&str>,
) -> String {
    if books.is_empty() {
        return format!("{}\n", shelf.empty_message());
    }

    let records = filter_by_title(books.values(), filter);
    let mut out = String::new();
    for (index, record) in records.iter().enumerate() {
        out.push_str(&render_card(index, record, membership));
    }
    out
}

/// Case-insensitive title-substring filter. `None` or a blank filter
/// keeps everything.
pub fn filter_by_title<'a>(
    records: impl IntoIterator<Item = &'a BookRecord>,
    filter: Option<&str>,
) -> Vec<&'a BookRecord> {
    let needle = filter.unwrap_or("").trim().to_lowercase();
    records
        .into_iter()
        .filter(|record| needle.is_empty() || record.title.to_lowercase().contains(&needle))
        .collect()
}

fn render_card(index: usize, record: &BookRecord, membership: &Membership) -> String {
    let favorite_label = if membership.is_favorite(&record.id) {
        REMOVE_FAVORITE_LABEL
    } else {
        ADD_FAVORITE_LABEL
    };
    let read_later_label = if membership.is_read_later(&record.id) {
        REMOVE_READ_LATER_LABEL
    } else {
        ADD_READ_LATER_LABEL
    };

    let mut actions = vec!["Read preview"];
    if record.download_url.is_some() {
        actions.push("Download");
    }
    actions.push(favorite_label);
    actions.push(read_later_label);

    let mut out = String::new();
    out.push_str(&format!("{:>3}. {}\n", index + 1, record.title));
    out.push_str(&format!("     by {}\n", record.authors_line()));
    out.push_str(&format!(
        "     id: {}  cover: {}\n",
        record.id, record.thumbnail_url
    ));
    out.push_str(&format!("     [{}]\n", actions.join("] [")));
    out
}
