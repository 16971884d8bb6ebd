use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::store::Shelf;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding the shelves and session state (`~` expands).
    #[arg(long, global = true, default_value = "~/.bookstand")]
    pub data_dir: String,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn data_dir(&self) -> PathBuf {
        shellexpand::path::tilde(std::path::Path::new(&self.data_dir)).into_owned()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search the catalog and render result cards.
    Search(SearchArgs),
    /// Show the favorites shelf.
    Favorites(ShelfListArgs),
    /// Show the read later shelf.
    ReadLater(ShelfListArgs),
    /// Add a book to a shelf, or remove it if already there.
    Toggle(ToggleArgs),
    /// Print the preview link for a book.
    Read(ReadArgs),
    /// Download a book's PDF, when the catalog offers one.
    Download(DownloadArgs),
    /// Interactive search with debounced-as-you-type queries.
    Live(LiveArgs),
    /// Capture a spoken query via an external command, then search.
    Voice(VoiceArgs),
}

/// Result ordering understood by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    Relevance,
    Newest,
}

impl OrderBy {
    pub fn as_param(self) -> &'static str {
        match self {
            OrderBy::Relevance => "relevance",
            OrderBy::Newest => "newest",
        }
    }
}

/// Availability filter understood by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeFilter {
    Partial,
    Full,
    FreeEbooks,
    PaidEbooks,
    Ebooks,
}

impl VolumeFilter {
    pub fn as_param(self) -> &'static str {
        match self {
            VolumeFilter::Partial => "partial",
            VolumeFilter::Full => "full",
            VolumeFilter::FreeEbooks => "free-ebooks",
            VolumeFilter::PaidEbooks => "paid-ebooks",
            VolumeFilter::Ebooks => "ebooks",
        }
    }
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Search text (words are joined with spaces).
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Result ordering.
    #[arg(long, value_enum)]
    pub order_by: Option<OrderBy>,

    /// Availability filter.
    #[arg(long, value_enum)]
    pub filter: Option<VolumeFilter>,

    /// Catalog API base URL.
    #[arg(long, default_value = catalog::DEFAULT_BASE_URL)]
    pub base_url: String,
}

#[derive(Debug, Args)]
pub struct ShelfListArgs {
    /// Only show books whose title contains this text.
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Debug, Args)]
pub struct ToggleArgs {
    /// Which shelf to toggle.
    #[arg(value_enum)]
    pub shelf: Shelf,

    /// Book id, as shown on result cards.
    pub id: String,
}

#[derive(Debug, Args)]
pub struct ReadArgs {
    /// Book id, as shown on result cards.
    pub id: String,
}

#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Book id, as shown on result cards.
    pub id: String,

    /// Output file (default: `<id>.pdf`).
    #[arg(long)]
    pub out: Option<String>,
}

#[derive(Debug, Args)]
pub struct LiveArgs {
    /// Result ordering.
    #[arg(long, value_enum)]
    pub order_by: Option<OrderBy>,

    /// Availability filter.
    #[arg(long, value_enum)]
    pub filter: Option<VolumeFilter>,

    /// Catalog API base URL.
    #[arg(long, default_value = catalog::DEFAULT_BASE_URL)]
    pub base_url: String,
}

#[derive(Debug, Args)]
pub struct VoiceArgs {
    /// Speech-to-text program; the first line it prints is taken as
    /// the spoken query.
    #[arg(long)]
    pub command: String,

    /// Arguments passed through to the capture program.
    #[arg(trailing_var_arg = true)]
    pub command_args: Vec<String>,

    /// Result ordering.
    #[arg(long, value_enum)]
    pub order_by: Option<OrderBy>,

    /// Availability filter.
    #[arg(long, value_enum)]
    pub filter: Option<VolumeFilter>,

    /// Catalog API base URL.
    #[arg(long, default_value = catalog::DEFAULT_BASE_URL)]
    pub base_url: String,
}
