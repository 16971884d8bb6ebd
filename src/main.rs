use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

use bookstand::store::Shelf;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    bookstand::logging::init().context("init logging")?;

    let cli = bookstand::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    let data_dir = cli.data_dir();

    match cli.command {
        bookstand::cli::Command::Search(args) => {
            bookstand::search::run(args, &data_dir)
                .await
                .context("search")?;
        }
        bookstand::cli::Command::Favorites(args) => {
            bookstand::shelves::run_list(Shelf::Favorites, args, &data_dir)
                .await
                .context("favorites")?;
        }
        bookstand::cli::Command::ReadLater(args) => {
            bookstand::shelves::run_list(Shelf::ReadLater, args, &data_dir)
                .await
                .context("read later")?;
        }
        bookstand::cli::Command::Toggle(args) => {
            bookstand::shelves::run_toggle(args, &data_dir)
                .await
                .context("toggle")?;
        }
        bookstand::cli::Command::Read(args) => {
            bookstand::search::run_read(args).context("read")?;
        }
        bookstand::cli::Command::Download(args) => {
            bookstand::search::run_download(args, &data_dir)
                .await
                .context("download")?;
        }
        bookstand::cli::Command::Live(args) => {
            bookstand::live::run(args, &data_dir).await.context("live")?;
        }
        bookstand::cli::Command::Voice(args) => {
            bookstand::voice::run(args, &data_dir)
                .await
                .context("voice")?;
        }
    }

    Ok(())
}
