use thiserror::Error;

use crate::store::Shelf;

/// Recoverable error kinds. Every variant is surfaced as an inline
/// message in the active view; none of them should abort the process.
/// `Display` strings are the user-facing wording.
#[derive(Debug, Error)]
pub enum Error {
    /// The query was empty after trimming. Checked before any request
    /// goes out.
    #[error("Please enter a search term.")]
    EmptyQuery,

    /// Transport failure, non-2xx status, or an undecodable body.
    #[error("Error fetching books.")]
    Fetch(#[from] reqwest::Error),

    /// Well-formed response with an empty or absent `items` list.
    #[error("No books found.")]
    NoResults,

    /// A record that must not enter a shelf: empty id or empty title.
    #[error("Cannot update shelf: {0}.")]
    InvalidRecord(String),

    /// The persisted shelf blob did not parse. The shelf is treated as
    /// empty after this is reported.
    #[error("Error loading {shelf}.")]
    ShelfParse {
        shelf: Shelf,
        #[source]
        source: serde_json::Error,
    },
}
