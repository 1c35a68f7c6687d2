use std::io::Cursor;

use merge::MergedRecord;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use templating::TemplateContext;

use crate::config::SidecarConfig;
use crate::dialect::Dialect;
use crate::error::SidecarError;

/// Renders `record` as a single `<movie>` XML document per `config`.
/// Deterministic: identical `(record, config)` produces byte-identical
/// output (spec.md §4.6) because every value written is a pure function
/// of `record`'s fields and nothing here consults the clock or RNG.
pub fn generate(record: &MergedRecord, config: &SidecarConfig) -> Result<Vec<u8>, SidecarError> {
    if !record.is_valid() {
        return Err(SidecarError::Validation(
            "record has no identifier or title".into(),
        ));
    }

    if let Some(template) = &config.custom_template {
        return generate_from_template(record, template, config);
    }

    generate_builtin(record, config)
}

fn generate_from_template(
    record: &MergedRecord,
    template: &str,
    config: &SidecarConfig,
) -> Result<Vec<u8>, SidecarError> {
    templating::validate(template)?;
    let ctx = template_context(record, config);
    let rendered = templating::render(template, &ctx);

    // A custom template is free-form text; confirm it actually parses as
    // XML before handing it back, rather than silently emitting garbage.
    let mut reader = Reader::from_str(&rendered);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(_) => buf.clear(),
            Err(e) => return Err(SidecarError::MalformedCustomTemplate(e.to_string())),
        }
    }

    Ok(rendered.into_bytes())
}

fn template_context(record: &MergedRecord, config: &SidecarConfig) -> TemplateContext {
    let mut ctx = TemplateContext::new();
    ctx.insert("identifier", record.identifier.clone());
    if let Some(title) = &record.title {
        ctx.insert("title", title.clone());
    }
    if let Some(alt) = &record.alternate_title {
        ctx.insert("alternate_title", alt.clone());
    }
    if let Some(plot) = &record.plot {
        ctx.insert("plot", plot.clone());
    }
    if let Some(date) = record.release_date {
        ctx.insert("release_date", date.format("%Y-%m-%d").to_string());
        ctx.insert("year", date.format("%Y").to_string());
    }
    if let Some(minutes) = record.runtime_minutes {
        ctx.insert("runtime", minutes.to_string());
    }
    if let Some(director) = &record.director {
        ctx.insert("director", director.clone());
    }
    if let Some(producer) = &record.producer {
        ctx.insert("producer", producer.clone());
    }
    if let Some(publisher) = &record.publisher {
        ctx.insert("publisher", publisher.clone());
    }
    if let Some(series) = &record.series {
        ctx.insert("series", series.clone());
    }
    if !record.performers.is_empty() {
        ctx.insert("performers", record.performers.join(", "));
    }
    if !record.genres.is_empty() {
        ctx.insert("genres", record.genres.join(", "));
    }
    if !record.tags.is_empty() {
        ctx.insert("tags", record.tags.join(", "));
    }
    if let Some(cover) = &record.cover_url {
        ctx.insert("cover_url", cover.clone());
    }
    if let Some(fanart) = &record.fanart_url {
        ctx.insert("fanart_url", fanart.clone());
    }
    if let Some(rating) = record.rating {
        ctx.insert(
            "rating",
            format!("{:.1}", config.rating_scale.scale(rating)),
        );
    }
    ctx.insert("uncensored", record.uncensored.to_string());
    ctx.insert("has_subtitle", record.has_subtitle.to_string());
    ctx
}

fn generate_builtin(record: &MergedRecord, config: &SidecarConfig) -> Result<Vec<u8>, SidecarError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    writer
        .create_element("movie")
        .write_inner_content::<_, SidecarError>(|writer| {
            write_text_if_present(writer, "title", record.title.as_deref())?;
            write_text_if_present(writer, "originaltitle", record.alternate_title.as_deref())?;
            write_text_if_present(writer, "plot", record.plot.as_deref())?;

            if let Some(date) = record.release_date {
                write_text(writer, "premiered", &date.format("%Y-%m-%d").to_string())?;
                write_text(writer, "year", &date.format("%Y").to_string())?;
            }
            if let Some(minutes) = record.runtime_minutes {
                write_text(writer, "runtime", &minutes.to_string())?;
            }
            write_text_if_present(writer, "director", record.director.as_deref())?;
            write_text_if_present(writer, "studio", record.producer.as_deref())?;
            write_text_if_present(writer, "publisher", record.publisher.as_deref())?;

            if let Some(series) = &record.series {
                writer
                    .create_element("set")
                    .write_inner_content::<_, SidecarError>(|writer| {
                        write_text(writer, "name", series)
                    })?;
            }

            if config.include_genres {
                for genre in &record.genres {
                    write_text(writer, "genre", genre)?;
                }
                for tag in &record.tags {
                    write_text(writer, "tag", tag)?;
                }
            }

            if config.include_performers {
                for performer in &record.performers {
                    writer
                        .create_element("actor")
                        .write_inner_content::<_, SidecarError>(|writer| {
                            write_text(writer, "name", performer)
                        })?;
                }
            }

            if let Some(rating) = record.rating {
                let scaled = config.rating_scale.scale(rating);
                writer
                    .create_element("rating")
                    .write_inner_content::<_, SidecarError>(|writer| {
                        writer.write_event(Event::Text(BytesText::new(&format!("{scaled:.1}"))))?;
                        Ok(())
                    })?;
            }

            write_unique_id(writer, config.dialect, &record.identifier)?;
            write_art(
                writer,
                config.dialect,
                record.cover_url.as_deref(),
                record.fanart_url.as_deref(),
            )?;

            if config.include_previews {
                for preview in &record.preview_urls {
                    write_text(writer, "preview", preview)?;
                }
            }

            write_text(writer, "uncensored", &record.uncensored.to_string())?;
            write_text(writer, "hassubtitle", &record.has_subtitle.to_string())?;

            Ok(())
        })?;

    Ok(writer.into_inner().into_inner())
}

fn write_text<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &str,
) -> Result<(), SidecarError> {
    writer
        .create_element(name)
        .write_text_content(BytesText::new(value))?;
    Ok(())
}

fn write_text_if_present<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: Option<&str>,
) -> Result<(), SidecarError> {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        write_text(writer, name, value)?;
    }
    Ok(())
}

fn write_unique_id<W: std::io::Write>(
    writer: &mut Writer<W>,
    dialect: Dialect,
    identifier: &str,
) -> Result<(), SidecarError> {
    match dialect {
        Dialect::Plex => write_text(writer, "id", identifier),
        Dialect::Kodi => {
            let mut start = BytesStart::new("uniqueid");
            start.push_attribute(("type", "archivist"));
            start.push_attribute(("default", "true"));
            writer.write_event(Event::Start(start))?;
            writer.write_event(Event::Text(BytesText::new(identifier)))?;
            writer.write_event(Event::End(BytesEnd::new("uniqueid")))?;
            Ok(())
        }
        Dialect::Jellyfin | Dialect::Emby => {
            let mut start = BytesStart::new("uniqueid");
            start.push_attribute(("type", "archivist"));
            writer.write_event(Event::Start(start))?;
            writer.write_event(Event::Text(BytesText::new(identifier)))?;
            writer.write_event(Event::End(BytesEnd::new("uniqueid")))?;
            Ok(())
        }
    }
}

fn write_art<W: std::io::Write>(
    writer: &mut Writer<W>,
    dialect: Dialect,
    cover_url: Option<&str>,
    fanart_url: Option<&str>,
) -> Result<(), SidecarError> {
    match dialect {
        Dialect::Kodi => {
            if let Some(cover) = cover_url.filter(|v| !v.trim().is_empty()) {
                let mut start = BytesStart::new("thumb");
                start.push_attribute(("aspect", "poster"));
                writer.write_event(Event::Start(start))?;
                writer.write_event(Event::Text(BytesText::new(cover)))?;
                writer.write_event(Event::End(BytesEnd::new("thumb")))?;
            }
            if let Some(fanart) = fanart_url.filter(|v| !v.trim().is_empty()) {
                writer
                    .create_element("fanart")
                    .write_inner_content::<_, SidecarError>(|writer| {
                        write_text(writer, "thumb", fanart)
                    })?;
            }
            Ok(())
        }
        Dialect::Jellyfin | Dialect::Emby => {
            write_text_if_present(writer, "thumb", cover_url)?;
            write_text_if_present(writer, "fanart", fanart_url)?;
            Ok(())
        }
        Dialect::Plex => {
            write_text_if_present(writer, "poster", cover_url)?;
            write_text_if_present(writer, "art", fanart_url)?;
            Ok(())
        }
    }
}
