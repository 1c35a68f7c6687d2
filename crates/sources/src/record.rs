use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Where a `SourceRecord` (or, later, an individual field in a
/// `MergedRecord`) came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Provenance {
    pub adapter: String,
    pub source_url: String,
    pub fetched_at: DateTime<Utc>,
}

/// Everything a single adapter was able to find for one identifier. Any
/// field an adapter could not find is left `None`/empty rather than
/// guessed; the merger is the only place that fills gaps across sources.
///
/// `runtime` is kept as the source's own raw string (e.g. `"120 min"`,
/// `"1h58"`) rather than pre-normalized minutes: normalization is the
/// merger's job ("normalize each input to minutes, then pick the
/// maximum"), so a single source's runtime string alone carries no
/// authoritative meaning until compared against the others.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceRecord {
    pub identifier: String,
    pub title: Option<String>,
    pub alternate_title: Option<String>,
    pub plot: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub runtime: Option<String>,
    pub producer: Option<String>,
    pub publisher: Option<String>,
    pub director: Option<String>,
    pub series: Option<String>,
    pub performers: Vec<String>,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub cover_url: Option<String>,
    pub fanart_url: Option<String>,
    pub preview_urls: Vec<String>,
    pub rating: Option<f32>,
    pub vote_count: Option<u32>,
    pub uncensored: bool,
    pub has_subtitle: bool,
    pub provenance: Provenance,
}

impl SourceRecord {
    pub fn builder(identifier: impl Into<String>, provenance: Provenance) -> SourceRecordBuilder {
        SourceRecordBuilder {
            record: SourceRecord {
                identifier: identifier.into(),
                provenance,
                ..Default::default()
            },
        }
    }
}

/// Fluent builder, in the style of `platforms::media::media_info::MediaInfoBuilder`.
pub struct SourceRecordBuilder {
    record: SourceRecord,
}

impl SourceRecordBuilder {
    pub fn title(mut self, value: impl Into<String>) -> Self {
        self.record.title = Some(value.into());
        self
    }

    pub fn alternate_title(mut self, value: impl Into<String>) -> Self {
        self.record.alternate_title = Some(value.into());
        self
    }

    pub fn plot(mut self, value: impl Into<String>) -> Self {
        self.record.plot = Some(value.into());
        self
    }

    pub fn release_date(mut self, value: NaiveDate) -> Self {
        self.record.release_date = Some(value);
        self
    }

    pub fn runtime(mut self, value: impl Into<String>) -> Self {
        self.record.runtime = Some(value.into());
        self
    }

    pub fn producer(mut self, value: impl Into<String>) -> Self {
        self.record.producer = Some(value.into());
        self
    }

    pub fn publisher(mut self, value: impl Into<String>) -> Self {
        self.record.publisher = Some(value.into());
        self
    }

    pub fn director(mut self, value: impl Into<String>) -> Self {
        self.record.director = Some(value.into());
        self
    }

    pub fn series(mut self, value: impl Into<String>) -> Self {
        self.record.series = Some(value.into());
        self
    }

    pub fn performers(mut self, value: Vec<String>) -> Self {
        self.record.performers = value;
        self
    }

    pub fn genres(mut self, value: Vec<String>) -> Self {
        self.record.genres = value;
        self
    }

    pub fn tags(mut self, value: Vec<String>) -> Self {
        self.record.tags = value;
        self
    }

    pub fn cover_url(mut self, value: impl Into<String>) -> Self {
        self.record.cover_url = Some(value.into());
        self
    }

    pub fn fanart_url(mut self, value: impl Into<String>) -> Self {
        self.record.fanart_url = Some(value.into());
        self
    }

    pub fn preview_urls(mut self, value: Vec<String>) -> Self {
        self.record.preview_urls = value;
        self
    }

    pub fn rating(mut self, value: f32) -> Self {
        self.record.rating = Some(value);
        self
    }

    pub fn vote_count(mut self, value: u32) -> Self {
        self.record.vote_count = Some(value);
        self
    }

    pub fn uncensored(mut self, value: bool) -> Self {
        self.record.uncensored = value;
        self
    }

    pub fn has_subtitle(mut self, value: bool) -> Self {
        self.record.has_subtitle = value;
        self
    }

    pub fn build(self) -> SourceRecord {
        self.record
    }
}
