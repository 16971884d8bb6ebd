use std::path::Path;
use std::time::Duration;

use anyhow::Context as _;
use url::Url;

use crate::cli::{OrderBy, VolumeFilter};
use crate::error::Error;
use crate::formats::{BookRecord, Volume, VolumeList};

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1";
const PREVIEW_BASE_URL: &str = "https://books.google.com/books";
const USER_AGENT: &str = "bookstand/0.1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    volumes_url: Url,
}

impl CatalogClient {
    /// `base_url` is the API root (`.../books/v1`); overridable so
    /// tests can point at a local stub.
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base = Url::parse(base_url)
            .with_context(|| format!("parse catalog base url: {base_url}"))?;

        let mut volumes_url = base.clone();
        {
            let mut segments = volumes_url
                .path_segments_mut()
                .map_err(|()| anyhow::anyhow!("catalog base url cannot be a base: {base}"))?;
            segments.pop_if_empty().push("volumes");
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("build catalog http client")?;

        Ok(Self {
            client,
            volumes_url,
        })
    }

    /// Request URL for a search. `orderBy` and `filter` are appended
    /// only when given; a blank query is rejected before any request.
    pub fn search_url(
        &self,
        query: &str,
        order_by: Option<OrderBy>,
        filter: Option<VolumeFilter>,
    ) -> Result<Url, Error> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::EmptyQuery);
        }

        let mut url = self.volumes_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            if let Some(order_by) = order_by {
                pairs.append_pair("orderBy", order_by.as_param());
            }
            if let Some(filter) = filter {
                pairs.append_pair("filter", filter.as_param());
            }
        }
        Ok(url)
    }

    /// Runs one search. An empty or absent `items` list is
    /// `Error::NoResults`; transport and decode failures are
    /// `Error::Fetch`.
    pub async fn search(
        &self,
        query: &str,
        order_by: Option<OrderBy>,
        filter: Option<VolumeFilter>,
    ) -> Result<Vec<Volume>, Error> {
        let url = self.search_url(query, order_by, filter)?;
        tracing::debug!(%url, "search volumes");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?
            .error_for_status()?;

        let list: VolumeList = response.json().await?;
        let items = list.items.unwrap_or_default();
        if items.is_empty() {
            return Err(Error::NoResults);
        }
        Ok(items)
    }

    /// Fetches a record's PDF to `out_path`. Errors when the record
    /// has no downloadable format.
    pub async fn download_pdf(&self, record: &BookRecord, out_path: &Path) -> anyhow::Result<()> {
        let Some(download_url) = record.download_url.as_deref() else {
            anyhow::bail!("no downloadable PDF for {:?}", record.title);
        };

        let response = self
            .client
            .get(download_url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .with_context(|| format!("GET {download_url}"))?
            .error_for_status()
            .with_context(|| format!("GET {download_url}"))?;

        let bytes = response.bytes().await.context("read download body")?;

        if let Some(parent) = out_path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create download dir: {}", parent.display()))?;
        }
        tokio::fs::write(out_path, &bytes)
            .await
            .with_context(|| format!("write download: {}", out_path.display()))?;

        Ok(())
    }
}

/// Embedded-viewer link for a book id.
pub fn preview_url(volume_id: &str) -> anyhow::Result<Url> {
    let id = volume_id.trim();
    if id.is_empty() {
        anyhow::bail!("book id must not be empty");
    }

    let mut url = Url::parse(PREVIEW_BASE_URL).context("parse preview base url")?;
    url.query_pairs_mut()
        .append_pair("id", id)
        .append_pair("printsec", "frontcover")
        .append_pair("output", "embed");
    Ok(url)
}
