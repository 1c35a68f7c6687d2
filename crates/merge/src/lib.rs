//! Field-by-field merge engine: combines 1..N `SourceRecord`s for the same
//! identifier into one `MergedRecord` plus a quality score. Deterministic
//! for a fixed input ordering and idempotent (`merge(&[r]) == r`,
//! `merge(&[r, r]) == r`).

pub mod policy;
pub mod quality;
pub mod record;
pub mod runtime;

use std::collections::HashSet;

use sources::SourceRecord;

pub use record::MergedRecord;

/// Merges `records` (in adapter-registration order) into one
/// `MergedRecord`. An empty slice produces a record with no fields set and
/// `quality == 0.0`; callers (the pipeline driver) are expected to reject
/// that via `MergedRecord::is_valid` rather than have the merger itself
/// return an error for "no inputs" (spec.md §7: validation failures are
/// data, reported with a reason, not exceptions).
pub fn merge(records: &[SourceRecord]) -> MergedRecord {
    let mut out = MergedRecord {
        identifier: records
            .iter()
            .map(|r| r.identifier.clone())
            .find(|s| !s.is_empty())
            .unwrap_or_default(),
        ..Default::default()
    };

    let mut contributors: Vec<usize> = Vec::new();
    let mut note = |out: &mut MergedRecord, field: &'static str, idx: usize| {
        out.field_sources.insert(field, idx);
        if !contributors.contains(&idx) {
            contributors.push(idx);
        }
    };

    if let Some((idx, v)) = policy::merge_scalar(
        policy::indexed(records).filter_map(|(i, r)| r.title.as_deref().map(|t| (i, t))),
    ) {
        out.title = Some(v);
        note(&mut out, "title", idx);
    }
    if let Some((idx, v)) = policy::merge_scalar(
        policy::indexed(records)
            .filter_map(|(i, r)| r.alternate_title.as_deref().map(|t| (i, t))),
    ) {
        out.alternate_title = Some(v);
        note(&mut out, "alternate_title", idx);
    }
    if let Some((idx, v)) = policy::merge_scalar(
        policy::indexed(records).filter_map(|(i, r)| r.plot.as_deref().map(|t| (i, t))),
    ) {
        out.plot = Some(v);
        note(&mut out, "plot", idx);
    }
    if let Some((idx, v)) = policy::merge_scalar(
        policy::indexed(records).filter_map(|(i, r)| r.director.as_deref().map(|t| (i, t))),
    ) {
        out.director = Some(v);
        note(&mut out, "director", idx);
    }
    if let Some((idx, v)) = policy::merge_scalar(
        policy::indexed(records).filter_map(|(i, r)| r.producer.as_deref().map(|t| (i, t))),
    ) {
        out.producer = Some(v);
        note(&mut out, "producer", idx);
    }
    if let Some((idx, v)) = policy::merge_scalar(
        policy::indexed(records).filter_map(|(i, r)| r.publisher.as_deref().map(|t| (i, t))),
    ) {
        out.publisher = Some(v);
        note(&mut out, "publisher", idx);
    }
    if let Some((idx, v)) = policy::merge_scalar(
        policy::indexed(records).filter_map(|(i, r)| r.series.as_deref().map(|t| (i, t))),
    ) {
        out.series = Some(v);
        note(&mut out, "series", idx);
    }

    if let Some((idx, d)) = policy::merge_date(
        policy::indexed(records).filter_map(|(i, r)| r.release_date.as_ref().map(|d| (i, d))),
    ) {
        out.release_date = Some(d);
        note(&mut out, "release_date", idx);
    }

    if let Some((idx, minutes)) = policy::merge_runtime(
        policy::indexed(records).filter_map(|(i, r)| r.runtime.as_deref().map(|t| (i, t))),
    ) {
        out.runtime_minutes = Some(minutes);
        note(&mut out, "runtime", idx);
    }

    let (performers, performers_idx) =
        policy::merge_ordered_dedup(policy::indexed(records).map(|(i, r)| (i, r.performers.as_slice())));
    out.performers = performers;
    if let Some(idx) = performers_idx {
        note(&mut out, "performers", idx);
    }

    let (genres, genres_idx) =
        policy::merge_ordered_dedup(policy::indexed(records).map(|(i, r)| (i, r.genres.as_slice())));
    out.genres = genres;
    if let Some(idx) = genres_idx {
        note(&mut out, "genres", idx);
    }

    let (tags, tags_idx) =
        policy::merge_ordered_dedup(policy::indexed(records).map(|(i, r)| (i, r.tags.as_slice())));
    out.tags = tags;
    if let Some(idx) = tags_idx {
        note(&mut out, "tags", idx);
    }

    let (preview_urls, preview_idx) = policy::merge_ordered_dedup(
        policy::indexed(records).map(|(i, r)| (i, r.preview_urls.as_slice())),
    );
    out.preview_urls = preview_urls;
    if let Some(idx) = preview_idx {
        note(&mut out, "preview_urls", idx);
    }

    let (rating, vote_count, rating_idx) = policy::merge_rating(
        policy::indexed(records).filter_map(|(i, r)| r.rating.map(|v| (i, v, r.vote_count))),
    );
    out.rating = rating;
    out.vote_count = vote_count;
    if let Some(idx) = rating_idx {
        note(&mut out, "rating", idx);
    }

    out.uncensored = policy::merge_bool_or(records.iter().map(|r| r.uncensored));
    out.has_subtitle = policy::merge_bool_or(records.iter().map(|r| r.has_subtitle));

    if let Some((idx, url)) = policy::merge_longest_url(
        policy::indexed(records).filter_map(|(i, r)| r.cover_url.as_deref().map(|u| (i, u))),
    ) {
        out.cover_url = Some(url);
        note(&mut out, "cover_url", idx);
    }
    if let Some((idx, url)) = policy::merge_longest_url(
        policy::indexed(records).filter_map(|(i, r)| r.fanart_url.as_deref().map(|u| (i, u))),
    ) {
        out.fanart_url = Some(url);
        note(&mut out, "fanart_url", idx);
    }

    out.provenance = contributors
        .into_iter()
        .map(|idx| records[idx].provenance.clone())
        .collect();

    out.quality = quality::score(&out);
    out
}

/// Dedup helper exposed for callers that want the same "first-seen,
/// case-insensitive" rule outside of a merge (e.g. the CLI layer reporting
/// distinct genres across a whole library run).
pub fn dedup_preserve_order(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if seen.insert(item.to_lowercase()) {
            out.push(item);
        }
    }
    out
}

/// `Provenance` re-exported for crates that only depend on `merge`.
pub use sources::Provenance as MergeProvenance;
