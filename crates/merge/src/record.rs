use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sources::Provenance;

/// The reconciled, authoritative view across every `SourceRecord` collected
/// for one identifier. Mirrors `SourceRecord`'s shape field-for-field
/// (spec.md §3) plus the merge-specific additions: an ordered provenance
/// list, opaque per-field attribution, and the computed quality score.
///
/// `runtime_minutes` is the merger's own addition: `SourceRecord::runtime`
/// is a source's raw string, but the merge policy (spec.md §4.4) normalizes
/// every input to minutes before picking the maximum, so only the merged
/// record carries a numeric runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergedRecord {
    pub identifier: String,
    pub title: Option<String>,
    pub alternate_title: Option<String>,
    pub plot: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub runtime_minutes: Option<u32>,
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

    /// Every input's provenance, ordered by merge contribution (spec.md §3
    /// invariant: "for every non-empty field, the provenance of that field
    /// is one of the merged inputs' provenances").
    pub provenance: Vec<Provenance>,
    /// Opaque per-field attribution: maps a field name to the index into
    /// `provenance` that supplied its value. Absent for fields no input
    /// contributed. Spec.md allows this representation to be
    /// implementation-defined ("implementation may make this opaque").
    pub field_sources: HashMap<&'static str, usize>,
    pub quality: f32,
}

impl MergedRecord {
    /// `true` if the record satisfies the minimum-field invariant spec.md
    /// §7 (error class 7, Validation) requires before anything downstream
    /// touches it: a non-empty identifier and a title.
    pub fn is_valid(&self) -> bool {
        !self.identifier.trim().is_empty() && self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}
