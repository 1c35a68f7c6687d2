use crate::record::MergedRecord;

/// Field weights for the quality score, summing to 1.0. Spec.md §9 Open
/// Question (i) leaves these coefficients to the implementer; fixed and
/// documented here (and in DESIGN.md) rather than guessed per-run.
pub struct Weights {
    pub title: f32,
    pub performers: f32,
    pub cover: f32,
    pub plot: f32,
    pub genres: f32,
    pub director: f32,
    pub release_date: f32,
    pub runtime: f32,
}

pub const WEIGHTS: Weights = Weights {
    title: 0.25,
    performers: 0.20,
    cover: 0.15,
    plot: 0.10,
    genres: 0.10,
    director: 0.10,
    release_date: 0.05,
    runtime: 0.05,
};

/// Weighted sum of indicator functions over `{title, performers, plot,
/// cover, genres, director, release-date, runtime}` (spec.md §4.4),
/// normalized to `[0, 1]`. Monotone in field coverage: adding any field to
/// a record that lacked it can only raise the score, never lower it.
pub fn score(record: &MergedRecord) -> f32 {
    let mut total = 0.0;
    if record.title.as_deref().is_some_and(|s| !s.trim().is_empty()) {
        total += WEIGHTS.title;
    }
    if !record.performers.is_empty() {
        total += WEIGHTS.performers;
    }
    if record.cover_url.as_deref().is_some_and(|s| !s.trim().is_empty()) {
        total += WEIGHTS.cover;
    }
    if record.plot.as_deref().is_some_and(|s| !s.trim().is_empty()) {
        total += WEIGHTS.plot;
    }
    if !record.genres.is_empty() {
        total += WEIGHTS.genres;
    }
    if record.director.as_deref().is_some_and(|s| !s.trim().is_empty()) {
        total += WEIGHTS.director;
    }
    if record.release_date.is_some() {
        total += WEIGHTS.release_date;
    }
    if record.runtime_minutes.is_some() {
        total += WEIGHTS.runtime;
    }
    total.clamp(0.0, 1.0)
}
