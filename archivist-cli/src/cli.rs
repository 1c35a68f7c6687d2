use std::path::PathBuf;

use clap::Parser;

/// Crawls a directory of video files, recognizes each by its catalog
/// identifier, fetches metadata from every enabled source, merges it,
/// downloads cover/fanart/preview images, writes an NFO sidecar, and
/// (optionally) relocates the video into a library layout.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory to scan for video files.
    pub input_dir: PathBuf,

    /// Path to a TOML config file. Defaults to
    /// `~/.config/archivist/config.toml` (created empty on first run).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Adapter names to enable (repeatable). Empty means every registered
    /// adapter. Overrides `sources.enabled` from the config file.
    #[arg(long = "source")]
    pub sources: Vec<String>,

    /// Per-adapter timeout in seconds. Overrides `sources.timeout`.
    #[arg(long)]
    pub source_timeout_secs: Option<u64>,

    /// Max retry attempts per request. Overrides `sources.retries` /
    /// `download.retries`.
    #[arg(long)]
    pub retries: Option<u32>,

    /// Maximum concurrent image downloads. Overrides
    /// `download.max_concurrency`.
    #[arg(long)]
    pub download_max_concurrency: Option<usize>,

    /// Maximum accepted image size in bytes. Overrides
    /// `download.max_file_size`.
    #[arg(long)]
    pub download_max_file_size: Option<u64>,

    /// Number of preview images to fetch per identifier (capped at 10).
    #[arg(long)]
    pub max_previews: Option<usize>,

    /// Disable resuming partial `.downloading` files left by a prior run;
    /// always restart image downloads from scratch. Overrides
    /// `download.resume_partial`.
    #[arg(long)]
    pub no_resume_partial: bool,

    /// Sidecar dialect: kodi, jellyfin, emby, or plex.
    #[arg(long)]
    pub dialect: Option<String>,

    /// Path to a custom sidecar template, overriding the built-in dialect.
    #[arg(long)]
    pub sidecar_template: Option<PathBuf>,

    /// Sidecar rating denominator: 5 or 10.
    #[arg(long)]
    pub rating_scale: Option<u8>,

    /// Relocate organized videos into `--output-dir` after processing.
    #[arg(long)]
    pub organize: bool,

    /// Root directory organized videos are relocated under. Required when
    /// `--organize` is set.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Folder pattern for relocated videos, e.g. `{performer}/{year}`.
    #[arg(long)]
    pub folder_pattern: Option<String>,

    /// Basename pattern for relocated videos, e.g. `{identifier} - {title}`.
    #[arg(long)]
    pub basename_pattern: Option<String>,

    /// Overwrite an existing file at the rendered destination instead of
    /// skipping or backing it up.
    #[arg(long)]
    pub overwrite: bool,

    /// Back up an existing file at the rendered destination to
    /// `<name>.backup` before overwriting it.
    #[arg(long)]
    pub backup: bool,

    /// Plan relocation without touching the filesystem.
    #[arg(long)]
    pub dry_run: bool,

    /// HTTP/HTTPS/SOCKS5 proxy URL. Overrides `net.proxy`.
    #[arg(long, env = "ARCHIVIST_PROXY")]
    pub proxy: Option<String>,

    /// User-Agent header sent with every request. Overrides
    /// `net.user_agent`.
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Disable TLS certificate verification (insecure; for self-signed
    /// mirrors only). Overrides `net.tls_verify`.
    #[arg(long)]
    pub no_tls_verify: bool,

    /// Disable the HTTP client's cookie jar. Overrides `net.cookies_enabled`.
    #[arg(long)]
    pub no_cookies: bool,

    /// Write the effective config to disk and exit without scanning.
    #[arg(long)]
    pub save_config: bool,
}
