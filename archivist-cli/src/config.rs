use std::path::{Path, PathBuf};
use std::time::Duration;

use organizer::{ExistingFilePolicy, RelocateAction};
use pipeline::PipelineConfig;
use sidecar::{Dialect, RatingScale};

use crate::cli::Args;

const APP_NAME: &str = "archivist";
const CONFIG_NAME: &str = "config";

/// Loads the layered config: built-in defaults (`PipelineConfig::default`)
/// merged with an optional TOML file, per spec.md §6 — `confy` resolves
/// `~/.config/archivist/config.toml` when `--config` isn't given, creating
/// an empty one on first run so the path always exists for the user to
/// edit. CLI flags are applied on top afterward by `apply_overrides`.
pub fn load(path: Option<&Path>) -> anyhow::Result<PipelineConfig> {
    let config = match path {
        Some(path) => confy::load_path(path)?,
        None => confy::load(APP_NAME, CONFIG_NAME)?,
    };
    Ok(config)
}

pub fn save(config: &PipelineConfig, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => confy::store_path(path, config)?,
        None => confy::store(APP_NAME, CONFIG_NAME, config)?,
    }
    Ok(())
}

/// Applies every CLI flag the user actually passed on top of the loaded
/// config, in the order spec.md §6 assigns: defaults -> file -> CLI flags.
pub fn apply_overrides(config: &mut PipelineConfig, args: &Args) -> anyhow::Result<()> {
    if !args.sources.is_empty() {
        config.enabled_adapters = args.sources.clone();
    }
    if let Some(secs) = args.source_timeout_secs {
        config.crawl.per_adapter_timeout = Duration::from_secs(secs);
    }
    if let Some(retries) = args.retries {
        config.crawl.retry.max_retries = retries;
        config.net.retry.max_retries = retries;
        config.download.retry.max_retries = retries;
    }
    if let Some(max_concurrent) = args.download_max_concurrency {
        config.download.max_concurrent = max_concurrent;
    }
    if let Some(max_bytes) = args.download_max_file_size {
        config.download.max_bytes = Some(max_bytes);
    }
    if let Some(max_previews) = args.max_previews {
        config.max_previews = max_previews.min(10);
    }
    if args.no_resume_partial {
        config.download.resume_partial = false;
    }
    if let Some(dialect) = &args.dialect {
        config.sidecar.dialect = parse_dialect(dialect)?;
    }
    if let Some(template_path) = &args.sidecar_template {
        let template = std::fs::read_to_string(template_path)
            .map_err(|e| anyhow::anyhow!("reading --sidecar-template {}: {e}", template_path.display()))?;
        config.sidecar.custom_template = Some(template);
    }
    if let Some(scale) = args.rating_scale {
        config.sidecar.rating_scale = match scale {
            5 => RatingScale::Five,
            10 => RatingScale::Ten,
            other => anyhow::bail!("--rating-scale must be 5 or 10, got {other}"),
        };
    }

    if args.organize {
        config.organize_enabled = true;
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(pattern) = &args.folder_pattern {
        config.organize.folder_pattern = pattern.clone();
    }
    if let Some(pattern) = &args.basename_pattern {
        config.organize.basename_pattern = pattern.clone();
    }
    if args.overwrite {
        config.organize.existing = ExistingFilePolicy::Overwrite;
    } else if args.backup {
        config.organize.existing = ExistingFilePolicy::Backup;
    }
    if args.dry_run {
        config.organize.dry_run = true;
    }
    // Cross-device relocation always falls back to copy+delete regardless
    // of `action`; `Rename` is the cheaper common case and stays the
    // default unless a future flag asks for copy-and-keep semantics.
    let _ = RelocateAction::Rename;

    if let Some(proxy) = &args.proxy {
        config.net.proxy = Some(parse_proxy(proxy)?);
    }
    if let Some(user_agent) = &args.user_agent {
        config.net.user_agent = user_agent.clone();
    }
    if args.no_tls_verify {
        config.net.danger_accept_invalid_certs = true;
    }
    if args.no_cookies {
        config.net.cookies_enabled = false;
    }

    if config.organize_enabled && args.output_dir.is_none() && config.output_dir.as_os_str().is_empty() {
        anyhow::bail!("--organize requires --output-dir (or organize.output_dir in the config file)");
    }

    Ok(())
}

fn parse_dialect(raw: &str) -> anyhow::Result<Dialect> {
    match raw.to_ascii_lowercase().as_str() {
        "kodi" => Ok(Dialect::Kodi),
        "jellyfin" => Ok(Dialect::Jellyfin),
        "emby" => Ok(Dialect::Emby),
        "plex" => Ok(Dialect::Plex),
        other => anyhow::bail!("unknown sidecar dialect '{other}' (expected kodi, jellyfin, emby, or plex)"),
    }
}

/// Parses a `scheme://[user:pass@]host:port` proxy URL into a
/// `netclient::proxy::ProxyConfig`, matching the CLI's plain-string
/// `--proxy` flag to that crate's typed representation.
fn parse_proxy(raw: &str) -> anyhow::Result<netclient::proxy::ProxyConfig> {
    use netclient::proxy::{ProxyAuth, ProxyConfig, ProxyType};

    let parsed = url::Url::parse(raw).map_err(|e| anyhow::anyhow!("invalid --proxy value '{raw}': {e}"))?;
    let proxy_type = match parsed.scheme() {
        "http" => ProxyType::Http,
        "https" => ProxyType::Https,
        "socks5" | "socks5h" => ProxyType::Socks5,
        other => anyhow::bail!("unsupported proxy scheme '{other}' (expected http, https, or socks5)"),
    };

    let auth = if parsed.username().is_empty() {
        None
    } else {
        Some(ProxyAuth {
            username: parsed.username().to_string(),
            password: parsed.password().unwrap_or("").to_string(),
        })
    };

    Ok(ProxyConfig {
        url: raw.to_string(),
        proxy_type,
        auth,
    })
}

pub fn default_config_path() -> Option<PathBuf> {
    confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).ok()
}
