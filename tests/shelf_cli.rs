mod stub;

use std::fs;
use std::path::Path;

use predicates::prelude::*;

use stub::{PDF_BYTES, TWO_VOLUMES_JSON, spawn_catalog_stub};

const SEEDED_FAVORITES_JSON: &str = r#"{
  "a": {
    "id": "a",
    "title": "Dune",
    "authors": ["Frank Herbert"],
    "thumbnailUrl": "https://via.placeholder.com/128x192"
  },
  "b": {
    "id": "b",
    "title": "Foundation",
    "authors": ["Isaac Asimov"],
    "thumbnailUrl": "https://via.placeholder.com/128x192"
  }
}"#;

fn search_once(base_url: &str, data_dir: &Path) {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bookstand");
    cmd.args([
        "search",
        "dune",
        "--base-url",
        base_url,
        "--data-dir",
        data_dir.to_str().unwrap(),
    ])
    .assert()
    .success();
}

#[test]
fn toggle_round_trips_through_the_favorites_shelf() -> anyhow::Result<()> {
    let server = spawn_catalog_stub(200, TWO_VOLUMES_JSON);
    let temp = tempfile::TempDir::new()?;
    let data_dir = temp.path();

    search_once(&server.base_url, data_dir);

    // Toggle on: the refreshed search view flips the label.
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bookstand");
    cmd.args([
        "toggle",
        "favorites",
        "abc123",
        "--data-dir",
        data_dir.to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout(
        predicate::str::contains("Added to favorites.")
            .and(predicate::str::contains("Remove from Favorites"))
            .and(predicate::str::contains("Add to Read Later")),
    );

    // The stored blob maps the id to a full record copy.
    let blob = fs::read_to_string(data_dir.join("favorites.json"))?;
    let favorites: serde_json::Value = serde_json::from_str(&blob)?;
    assert_eq!(favorites["abc123"]["title"], "Dune");
    assert_eq!(favorites["abc123"]["authors"][0], "Frank Herbert");
    assert!(favorites.get("def456").is_none());

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bookstand");
    cmd.args(["favorites", "--data-dir", data_dir.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Dune").and(predicate::str::contains("Remove from Favorites")),
        );

    // Toggle off: membership is back where it started.
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bookstand");
    cmd.args([
        "toggle",
        "favorites",
        "abc123",
        "--data-dir",
        data_dir.to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Removed from favorites."));

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bookstand");
    cmd.args(["favorites", "--data-dir", data_dir.to_str().unwrap()])
        .assert()
        .success()
        .stdout("No favorites saved.\n");

    Ok(())
}

#[test]
fn seeded_shelf_filters_by_title_case_insensitively() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    fs::write(temp.path().join("favorites.json"), SEEDED_FAVORITES_JSON)?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bookstand");
    cmd.args([
        "favorites",
        "--filter",
        "fou",
        "--data-dir",
        temp.path().to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Foundation").and(predicate::str::contains("Dune").not()));

    Ok(())
}

#[test]
fn corrupted_blob_renders_the_empty_shelf_state() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    fs::write(temp.path().join("favorites.json"), "{definitely not json")?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bookstand");
    cmd.args(["favorites", "--data-dir", temp.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout("No favorites saved.\n");

    Ok(())
}

#[test]
fn toggle_of_an_unknown_id_fails_without_mutation() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bookstand");
    cmd.args([
        "toggle",
        "favorites",
        "zzz999",
        "--data-dir",
        temp.path().to_str().unwrap(),
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown book id"));

    assert!(!temp.path().join("favorites.json").exists());

    Ok(())
}

#[test]
fn shelves_toggle_independently() -> anyhow::Result<()> {
    let server = spawn_catalog_stub(200, TWO_VOLUMES_JSON);
    let temp = tempfile::TempDir::new()?;
    let data_dir = temp.path();
    fs::write(data_dir.join("favorites.json"), SEEDED_FAVORITES_JSON)?;

    search_once(&server.base_url, data_dir);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bookstand");
    cmd.args([
        "toggle",
        "read-later",
        "abc123",
        "--data-dir",
        data_dir.to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Added to read later."));

    let favorites: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("favorites.json"))?)?;
    assert!(favorites.get("a").is_some());
    assert!(favorites.get("b").is_some());
    assert!(favorites.get("abc123").is_none());

    let read_later: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("readLater.json"))?)?;
    assert_eq!(read_later["abc123"]["title"], "Dune");

    Ok(())
}

#[test]
fn download_fetches_the_pdf_for_a_known_record() -> anyhow::Result<()> {
    let server = spawn_catalog_stub(200, TWO_VOLUMES_JSON);
    let temp = tempfile::TempDir::new()?;
    let data_dir = temp.path();

    search_once(&server.base_url, data_dir);

    let out_path = temp.path().join("dune.pdf");
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bookstand");
    cmd.args([
        "download",
        "abc123",
        "--out",
        out_path.to_str().unwrap(),
        "--data-dir",
        data_dir.to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Saved"));

    assert_eq!(fs::read(&out_path)?, PDF_BYTES);

    Ok(())
}

#[test]
fn download_of_a_record_without_pdf_fails() -> anyhow::Result<()> {
    let server = spawn_catalog_stub(200, TWO_VOLUMES_JSON);
    let temp = tempfile::TempDir::new()?;
    let data_dir = temp.path();

    search_once(&server.base_url, data_dir);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bookstand");
    cmd.args([
        "download",
        "def456",
        "--data-dir",
        data_dir.to_str().unwrap(),
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("no downloadable PDF"));

    Ok(())
}
