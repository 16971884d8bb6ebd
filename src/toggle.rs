use crate::error::Error;
use crate::formats::BookRecord;
use crate::store::{Shelf, ShelfStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

/// Removes `id` from the shelf if present, otherwise inserts a full
/// copy of `record`. Validation failures mutate nothing.
pub async fn toggle(
    store: &dyn ShelfStore,
    shelf: Shelf,
    id: &str,
    record: &BookRecord,
) -> anyhow::Result<ToggleOutcome> {
    if id.trim().is_empty() {
        return Err(Error::InvalidRecord("missing book id".to_owned()).into());
    }
    if record.title.trim().is_empty() {
        return Err(Error::InvalidRecord(format!("book {id} has no title")).into());
    }

    let mut books = store.load(shelf).await?;
    let outcome = if books.remove(id).is_some() {
        ToggleOutcome::Removed
    } else {
        books.insert(id.to_owned(), record.clone());
        ToggleOutcome::Added
    };
    store.save(shelf, &books).await?;

    tracing::info!(shelf = %shelf, id, ?outcome, "toggled shelf entry");
    Ok(outcome)
}

pub async fn is_member(store: &dyn ShelfStore, shelf: Shelf, id: &str) -> anyhow::Result<bool> {
    Ok(store.load(shelf).await?.contains_key(id))
}
