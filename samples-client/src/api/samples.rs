use std::{collections::HashSet, pin::Pin, time::Duration};

use async_stream::try_stream;
use futures::{Stream, TryStreamExt};
use reqwest::{Client, Url};

use super::wire::{decode_page, Page};
use crate::domain::{Query, Sample};
use crate::error::FetchError;

pub const SAMPLES_PATH: &str = "/v2/samples";
/// Field selection sent with every request.
pub const SAMPLE_FIELDS: &str = "timestamp,power,energy";
pub const DEFAULT_MAX_PAGES: usize = 10_000;

pub type PageStream = Pin<Box<dyn Stream<Item = Result<Page, FetchError>> + Send>>;

/// Client for the paginated `/v2/samples` endpoint.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct SamplesApi {
    client: Client,
    max_pages: usize,
}

impl SamplesApi {
    pub fn new(request_timeout: Duration, max_pages: usize) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            max_pages: max_pages.max(1),
        })
    }

    /// First-page URL for a query.
    pub fn request_url(query: &Query) -> Result<Url, FetchError> {
        let raw = format!("{}{}", query.base_url.trim_end_matches('/'), SAMPLES_PATH);
        let mut url = Url::parse(&raw).map_err(|e| FetchError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("aggregation_level", query.aggregation_level.as_str())
                .append_pair("filter[from]", &query.time_from.to_string())
                .append_pair("filter[to]", &query.time_to.to_string())
                .append_pair("filter[samples]", SAMPLE_FIELDS);

            let (name, id) = query.scope.filter();
            pairs.append_pair(name, id);

            if let Some(sensor_type) = query.sensor_type {
                pairs.append_pair("filter[type]", sensor_type.as_str());
            }
        }

        Ok(url)
    }

    pub async fn fetch_page(&self, url: &Url) -> Result<Page, FetchError> {
        match self.try_fetch_page(url).await {
            Ok(page) => {
                metrics::counter!("samples_api_pages_fetched_total").increment(1);
                tracing::debug!(
                    url = %url,
                    samples = page.samples.len(),
                    has_next = page.next.is_some(),
                    "fetched samples page"
                );
                Ok(page)
            }
            Err(e) => {
                metrics::counter!("samples_api_fetch_errors_total").increment(1);
                Err(e)
            }
        }
    }

    async fn try_fetch_page(&self, url: &Url) -> Result<Page, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url.clone()).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        decode_page(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Every page of a query, following `links.next`.
    ///
    /// Stops when the next link is absent, when it points at a page already
    /// fetched, or after `max_pages` pages. The last two are logged but are
    /// not errors.
    pub fn pages(&self, query: &Query) -> PageStream {
        let api = self.clone();
        let first = Self::request_url(query);
        let level = query.aggregation_level;

        let s = try_stream! {
            let mut url = first?;
            let mut visited: HashSet<String> = HashSet::new();
            visited.insert(url.to_string());
            let mut fetched: usize = 0;

            loop {
                let page = api.fetch_page(&url).await?;
                fetched += 1;
                let next = page.next.clone();
                yield page;

                let next = match next {
                    Some(next) => next,
                    None => break,
                };

                if fetched >= api.max_pages {
                    tracing::warn!(
                        level = %level,
                        max_pages = api.max_pages,
                        "page limit reached, stopping pagination"
                    );
                    break;
                }

                let next_url = resolve_next(&url, &next)?;
                if !visited.insert(next_url.to_string()) {
                    tracing::warn!(
                        level = %level,
                        cursor = %next_url,
                        "pagination cursor repeated, stopping"
                    );
                    break;
                }
                url = next_url;
            }

            tracing::debug!(level = %level, pages = fetched, "pagination finished");
        };

        Box::pin(s)
    }

    /// All samples of a query in page-arrival order.
    pub async fn fetch(&self, query: &Query) -> Result<Vec<Sample>, FetchError> {
        let mut pages = self.pages(query);
        let mut samples = Vec::new();

        while let Some(page) = pages.try_next().await? {
            samples.extend(page.samples);
        }

        Ok(samples)
    }
}

/// Resolve a next link against the page it came from. Absolute URLs are kept,
/// paths are joined onto the current origin.
pub fn resolve_next(current: &Url, next: &str) -> Result<Url, FetchError> {
    current.join(next.trim()).map_err(|e| FetchError::InvalidUrl {
        url: next.to_string(),
        reason: e.to_string(),
    })
}
