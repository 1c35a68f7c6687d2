use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use std::sync::LazyLock;

use crate::adapter::{FetchContext, SourceAdapter};
use crate::builtin::aggregator::fetch_html;
use crate::error::AdapterError;
use crate::identifier::Identifier;
use crate::record::{Provenance, SourceRecord};

/// A studio-operated catalog site: strong on `producer`/`publisher`/`series`
/// and a plot synopsis, weak on performer lists. Kept deliberately thin —
/// the core treats adapters as opaque, so depth of scraping lives outside
/// this crate.
pub struct StudioDbAdapter {
    base_url: String,
}

impl StudioDbAdapter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for StudioDbAdapter {
    fn default() -> Self {
        Self::new("https://studio-db.example")
    }
}

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""title"\s*:\s*"([^"]+)""#).unwrap());
static PLOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""synopsis"\s*:\s*"([^"]+)""#).unwrap());
static PRODUCER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""producer"\s*:\s*"([^"]+)""#).unwrap());
static PUBLISHER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""publisher"\s*:\s*"([^"]+)""#).unwrap());
static SERIES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""series"\s*:\s*"([^"]+)""#).unwrap());
static RUNTIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""runtime"\s*:\s*"([^"]+)""#).unwrap());
static FANART_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""fanart"\s*:\s*"([^"]+)""#).unwrap());

#[async_trait]
impl SourceAdapter for StudioDbAdapter {
    fn id(&self) -> &str {
        "studio_db"
    }

    async fn fetch(
        &self,
        ctx: &FetchContext,
        identifier: &Identifier,
    ) -> Result<SourceRecord, AdapterError> {
        let url = format!("{}/api/title/{}", self.base_url, identifier.as_str());
        let body = fetch_html(&ctx.client, &url, &ctx.cancellation).await?;

        let title = TITLE_RE
            .captures(&body)
            .map(|c| c[1].to_string())
            .ok_or_else(|| AdapterError::Parsing("missing title field".into()))?;

        let mut builder = SourceRecord::builder(
            identifier.as_str(),
            Provenance {
                adapter: self.id().to_string(),
                source_url: url,
                fetched_at: Utc::now(),
            },
        )
        .title(title);

        if let Some(c) = PLOT_RE.captures(&body) {
            builder = builder.plot(c[1].to_string());
        }
        if let Some(c) = PRODUCER_RE.captures(&body) {
            builder = builder.producer(c[1].to_string());
        }
        if let Some(c) = PUBLISHER_RE.captures(&body) {
            builder = builder.publisher(c[1].to_string());
        }
        if let Some(c) = SERIES_RE.captures(&body) {
            builder = builder.series(c[1].to_string());
        }
        if let Some(c) = RUNTIME_RE.captures(&body) {
            builder = builder.runtime(c[1].to_string());
        }
        if let Some(c) = FANART_RE.captures(&body) {
            builder = builder.fanart_url(c[1].to_string());
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_studio_fields_from_json_like_body() {
        let body = r#"{"title":"Example","synopsis":"A plot.","producer":"P Co","publisher":"Pub Co","series":"Vol. 1","runtime":"118 min","fanart":"https://img.example/fan.jpg"}"#;
        assert_eq!(&TITLE_RE.captures(body).unwrap()[1], "Example");
        assert_eq!(&PLOT_RE.captures(body).unwrap()[1], "A plot.");
        assert_eq!(&PRODUCER_RE.captures(body).unwrap()[1], "P Co");
        assert_eq!(&RUNTIME_RE.captures(body).unwrap()[1], "118 min");
    }
}
