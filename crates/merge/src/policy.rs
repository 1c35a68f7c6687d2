use chrono::NaiveDate;
use sources::SourceRecord;

use crate::runtime::normalize_runtime_minutes;

/// First non-empty value in input order, switching to a later candidate
/// only when it is more than 20% longer (spec.md §4.4's "more detailed"
/// heuristic). Returns the winning value plus the index of the record it
/// came from, for `field_sources` attribution.
pub fn merge_scalar<'a>(values: impl Iterator<Item = (usize, &'a str)>) -> Option<(usize, String)> {
    let mut best: Option<(usize, &str)> = None;
    for (idx, value) in values {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        best = match best {
            None => Some((idx, value)),
            Some((_, current)) if (value.len() as f64) > (current.len() as f64) * 1.2 => {
                Some((idx, value))
            }
            other => other,
        };
    }
    best.map(|(idx, v)| (idx, v.to_string()))
}

/// Concatenates while preserving first-seen order and dropping
/// case-insensitive duplicates. Used for both the "ordered sequence
/// fields" (performers, preview URLs) and "set fields" (genres, tags):
/// spec.md specifies the same first-seen-order dedup for both, just with
/// different names for the invariant they're preserving.
pub fn merge_ordered_dedup<'a>(
    lists: impl Iterator<Item = (usize, &'a [String])>,
) -> (Vec<String>, Option<usize>) {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    let mut first_contributor = None;
    for (idx, list) in lists {
        for item in list {
            let key = item.to_lowercase();
            if seen.insert(key) {
                out.push(item.clone());
                first_contributor.get_or_insert(idx);
            }
        }
    }
    (out, first_contributor)
}

/// First parseable date; if any other input's date differs from it by more
/// than 7 days, the earliest date wins instead.
pub fn merge_date<'a>(
    dates: impl Iterator<Item = (usize, &'a NaiveDate)>,
) -> Option<(usize, NaiveDate)> {
    let collected: Vec<(usize, NaiveDate)> = dates.map(|(i, d)| (i, *d)).collect();
    let (first_idx, first_date) = *collected.first()?;

    let disagreement = collected
        .iter()
        .any(|(_, d)| (*d - first_date).num_days().abs() > 7);

    if !disagreement {
        return Some((first_idx, first_date));
    }

    collected.into_iter().min_by_key(|(_, d)| *d)
}

/// Normalizes each input's raw runtime string to minutes and keeps the
/// maximum (covers the "director's cut is longer" case).
pub fn merge_runtime<'a>(
    runtimes: impl Iterator<Item = (usize, &'a str)>,
) -> Option<(usize, u32)> {
    runtimes
        .filter_map(|(idx, raw)| normalize_runtime_minutes(raw).map(|m| (idx, m)))
        .max_by_key(|(_, minutes)| *minutes)
}

/// Adopts the rating with the highest vote count; averages available
/// ratings when none carry a vote count.
pub fn merge_rating<'a>(
    ratings: impl Iterator<Item = (usize, f32, Option<u32>)> + 'a,
) -> (Option<f32>, Option<u32>, Option<usize>) {
    let entries: Vec<(usize, f32, Option<u32>)> = ratings.collect();
    if entries.is_empty() {
        return (None, None, None);
    }

    if let Some((idx, rating, votes)) = entries
        .iter()
        .filter(|(_, _, votes)| votes.is_some())
        .max_by_key(|(_, _, votes)| votes.unwrap())
        .copied()
    {
        return (Some(rating), votes, Some(idx));
    }

    let sum: f32 = entries.iter().map(|(_, r, _)| r).sum();
    let avg = sum / entries.len() as f32;
    (Some(avg), None, Some(entries[0].0))
}

/// Logical OR across every source that reported the flag at all; a source
/// that never mentions it contributes nothing.
pub fn merge_bool_or(flags: impl Iterator<Item = bool>) -> bool {
    flags.fold(false, |acc, v| acc || v)
}

/// Picks the longest URL string among non-empty candidates — longer paths
/// tend to be higher-resolution endpoints. Spec.md's Open Question (ii)
/// flags this as a heuristic, implemented as specified rather than
/// replaced (see DESIGN.md).
pub fn merge_longest_url<'a>(
    urls: impl Iterator<Item = (usize, &'a str)>,
) -> Option<(usize, String)> {
    urls.filter(|(_, u)| !u.trim().is_empty())
        .max_by_key(|(_, u)| u.len())
        .map(|(idx, u)| (idx, u.to_string()))
}

/// Iterates `records` alongside their original index, skipping none — the
/// index is what makes `field_sources` attribution possible.
pub fn indexed(records: &[SourceRecord]) -> impl Iterator<Item = (usize, &SourceRecord)> {
    records.iter().enumerate()
}
