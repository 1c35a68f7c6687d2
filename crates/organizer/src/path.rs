use std::path::{Path, PathBuf};

use merge::MergedRecord;
use templating::TemplateContext;

use crate::config::OrganizeConfig;
use crate::error::OrganizerError;

/// Renders `config.folder_pattern` / `config.basename_pattern` against
/// `record`'s fields, then joins them under `output_root` with the
/// source file's own extension (spec.md §6: the organizer relocates an
/// existing media file, it does not transcode it).
pub fn render_destination(
    output_root: &Path,
    source: &Path,
    record: &MergedRecord,
    config: &OrganizeConfig,
) -> Result<PathBuf, OrganizerError> {
    templating::validate(&config.folder_pattern)?;
    templating::validate(&config.basename_pattern)?;

    let ctx = template_context(record);
    let folder = templating::render_path(&config.folder_pattern, &ctx);
    let basename = templating::sanitize_filename(&templating::render(&config.basename_pattern, &ctx));

    let mut destination = output_root.to_path_buf();
    for segment in folder.split('/').filter(|s| !s.is_empty()) {
        destination.push(segment);
    }

    let filename = match source.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{basename}.{ext}"),
        None => basename,
    };
    destination.push(filename);

    Ok(destination)
}

fn template_context(record: &MergedRecord) -> TemplateContext {
    let mut ctx = TemplateContext::new();
    ctx.insert("identifier", record.identifier.clone());
    ctx.insert("title", record.title.clone().unwrap_or_default());
    if let Some(date) = record.release_date {
        ctx.insert("year", date.format("%Y").to_string());
    }
    if !record.performers.is_empty() {
        ctx.insert("performers", record.performers.join(", "));
        ctx.insert("performer", record.performers[0].clone());
    }
    if !record.genres.is_empty() {
        ctx.insert("genres", record.genres.join(", "));
    }
    if let Some(director) = &record.director {
        ctx.insert("director", director.clone());
    }
    if let Some(series) = &record.series {
        ctx.insert("series", series.clone());
    }
    ctx
}
