use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use std::sync::LazyLock;

use crate::adapter::{FetchContext, SourceAdapter};
use crate::builtin::aggregator::fetch_html;
use crate::error::AdapterError;
use crate::identifier::Identifier;
use crate::record::{Provenance, SourceRecord};

/// A low-confidence last-resort source: a community wiki that only ever
/// carries a title, tags and sometimes an uncensored/subtitle flag. Used to
/// demonstrate the merger filling gaps from a weak source without letting
/// it clobber stronger ones — the merge policy's "first non-empty value"
/// and "logical OR" rules depend on there being a source this thin in
/// the mix.
pub struct FallbackWikiAdapter {
    base_url: String,
}

impl FallbackWikiAdapter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for FallbackWikiAdapter {
    fn default() -> Self {
        Self::new("https://wiki.example")
    }
}

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<th>Title</th>\s*<td>([^<]+)</td>"#).unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"<li class="tag">([^<]+)</li>"#).unwrap());
static UNCENSORED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<th>Uncensored</th>\s*<td>(yes|no)</td>"#).unwrap());
static SUBTITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<th>Subtitles</th>\s*<td>(yes|no)</td>"#).unwrap());

#[async_trait]
impl SourceAdapter for FallbackWikiAdapter {
    fn id(&self) -> &str {
        "fallback_wiki"
    }

    async fn fetch(
        &self,
        ctx: &FetchContext,
        identifier: &Identifier,
    ) -> Result<SourceRecord, AdapterError> {
        let url = format!("{}/wiki/{}", self.base_url, identifier.as_str());
        let html = fetch_html(&ctx.client, &url, &ctx.cancellation).await?;

        let title = TITLE_RE
            .captures(&html)
            .map(|c| c[1].trim().to_string())
            .ok_or(AdapterError::NotFound)?;

        let tags: Vec<String> = TAG_RE
            .captures_iter(&html)
            .map(|c| c[1].trim().to_string())
            .collect();

        let mut builder = SourceRecord::builder(
            identifier.as_str(),
            Provenance {
                adapter: self.id().to_string(),
                source_url: url,
                fetched_at: Utc::now(),
            },
        )
        .title(title)
        .tags(tags);

        if let Some(c) = UNCENSORED_RE.captures(&html) {
            builder = builder.uncensored(&c[1] == "yes");
        }
        if let Some(c) = SUBTITLE_RE.captures(&html) {
            builder = builder.has_subtitle(&c[1] == "yes");
        }

        Ok(builder.build())
    }
}
