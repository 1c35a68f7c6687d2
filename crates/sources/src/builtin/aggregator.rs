use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use regex::Regex;
use std::sync::LazyLock;

use netclient::Client;

use crate::adapter::{FetchContext, SourceAdapter};
use crate::error::AdapterError;
use crate::identifier::Identifier;
use crate::record::{Provenance, SourceRecord};

/// A general-purpose metadata aggregator: one identifier resolves to one
/// detail-page URL, parsed with a handful of compiled patterns. This is
/// illustrative, not a real scraper — spec.md §4.2 explicitly leaves
/// per-site parsing depth out of scope for the core, treating adapters as
/// pluggable. Shaped like `platforms::extractor::platforms::twitch`
/// (one struct, one URL template, one `fetch`), not like the deeper
/// signature-cracking extractors (`douyin`, `huya`) elsewhere in that crate.
pub struct AggregatorAdapter {
    base_url: String,
}

impl AggregatorAdapter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for AggregatorAdapter {
    fn default() -> Self {
        Self::new("https://aggregator.example")
    }
}

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<h1[^>]*class="title"[^>]*>([^<]+)</h1>"#).unwrap());
static PERFORMER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<span class="performer">([^<]+)</span>"#).unwrap());
static GENRE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<a class="genre">([^<]+)</a>"#).unwrap());
static COVER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<meta property="og:image" content="([^"]+)""#).unwrap());
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<time class="release">([0-9]{4}-[0-9]{2}-[0-9]{2})</time>"#).unwrap());
static RATING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<span class="rating" data-votes="([0-9]+)">([0-9.]+)</span>"#).unwrap());

#[async_trait]
impl SourceAdapter for AggregatorAdapter {
    fn id(&self) -> &str {
        "aggregator"
    }

    async fn fetch(
        &self,
        ctx: &FetchContext,
        identifier: &Identifier,
    ) -> Result<SourceRecord, AdapterError> {
        let url = format!("{}/videos/{}", self.base_url, identifier.as_str());
        let html = fetch_html(&ctx.client, &url, &ctx.cancellation).await?;

        let title = TITLE_RE
            .captures(&html)
            .map(|c| c[1].trim().to_string())
            .ok_or_else(|| AdapterError::Parsing("missing title".into()))?;

        let performers: Vec<String> = PERFORMER_RE
            .captures_iter(&html)
            .map(|c| c[1].trim().to_string())
            .collect();
        let genres: Vec<String> = GENRE_RE
            .captures_iter(&html)
            .map(|c| c[1].trim().to_string())
            .collect();
        let cover_url = COVER_RE.captures(&html).map(|c| c[1].to_string());
        let release_date = DATE_RE
            .captures(&html)
            .and_then(|c| NaiveDate::parse_from_str(&c[1], "%Y-%m-%d").ok());
        let (rating, vote_count) = RATING_RE
            .captures(&html)
            .map(|c| {
                (
                    c[2].parse::<f32>().ok(),
                    c[1].parse::<u32>().ok(),
                )
            })
            .unwrap_or((None, None));

        let mut builder = SourceRecord::builder(
            identifier.as_str(),
            Provenance {
                adapter: self.id().to_string(),
                source_url: url,
                fetched_at: Utc::now(),
            },
        )
        .title(title)
        .performers(performers)
        .genres(genres);

        if let Some(cover) = cover_url {
            builder = builder.cover_url(cover);
        }
        if let Some(date) = release_date {
            builder = builder.release_date(date);
        }
        if let Some(rating) = rating {
            builder = builder.rating(rating);
        }
        if let Some(votes) = vote_count {
            builder = builder.vote_count(votes);
        }

        Ok(builder.build())
    }
}

pub(crate) async fn fetch_html(
    client: &Client,
    url: &str,
    cancellation: &netclient::CancellationToken,
) -> Result<String, AdapterError> {
    client
        .get_text(url, cancellation)
        .await
        .map_err(AdapterError::from_net)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_title_performers_and_genres() {
        let html = r#"
            <h1 class="title">Example Title</h1>
            <span class="performer">Alice</span>
            <span class="performer">Bob</span>
            <a class="genre">Drama</a>
            <meta property="og:image" content="https://img.example/cover.jpg">
            <time class="release">2024-03-01</time>
            <span class="rating" data-votes="120">4.5</span>
        "#;
        assert_eq!(TITLE_RE.captures(html).unwrap()[1].trim(), "Example Title");
        let performers: Vec<&str> = PERFORMER_RE
            .captures_iter(html)
            .map(|c| c.get(1).unwrap().as_str())
            .collect();
        assert_eq!(performers, vec!["Alice", "Bob"]);
        assert_eq!(COVER_RE.captures(html).unwrap()[1], *"https://img.example/cover.jpg");
        let caps = RATING_RE.captures(html).unwrap();
        assert_eq!(&caps[1], "120");
        assert_eq!(&caps[2], "4.5");
    }
}
