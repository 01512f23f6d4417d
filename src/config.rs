use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use tracing::debug;
use vidshelf_core::player::DEFAULT_PLAYER_COMMAND;
use vidshelf_core::{ClientConfig, SourceKind};

use crate::i18n::Language;

const CONFIG_FILE: &str = "vidshelf.conf";

/// Everything persisted between runs.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub player_command: String,
    pub language: Language,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            player_command: DEFAULT_PLAYER_COMMAND.to_string(),
            language: Language::default(),
        }
    }
}

pub fn config_file_path() -> PathBuf {
    directories::ProjectDirs::from("org", "vidshelf", "vidshelf")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

/// Parses `key=value` lines. Unknown keys are skipped and unparsable values keep
/// their defaults.
pub fn parse_config(content: &str) -> AppConfig {
    let mut cfg = AppConfig::default();
    let defaults = ClientConfig::default();
    let c = &mut cfg.client;
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        let Some((k, v)) = line.split_once('=') else { continue };
        let v = v.trim();
        match k.trim() {
            "base_url" => c.base_url = v.to_string(),
            "auth_url" => c.auth_url = v.to_string(),
            "source" => c.source = SourceKind::parse(v).unwrap_or_default(),
            "listing_path" => c.listing_path = v.to_string(),
            "video_extensions" => {
                let exts: Vec<String> = v
                    .split(',')
                    .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                    .filter(|e| !e.is_empty())
                    .collect();
                c.video_extensions = if exts.is_empty() { defaults.video_extensions.clone() } else { exts };
            }
            "page_size" => c.page_size = v.parse::<usize>().ok().filter(|n| *n > 0).unwrap_or(defaults.page_size),
            "batch_size" => c.batch_size = v.parse::<usize>().ok().filter(|n| *n > 0).unwrap_or(defaults.batch_size),
            "thumbnail_seek_secs" => {
                c.thumbnail_seek_secs =
                    v.parse::<f32>().ok().filter(|s| *s >= 0.0).unwrap_or(defaults.thumbnail_seek_secs)
            }
            "thumbnail_parallel" => c.thumbnail_parallel = v.parse::<usize>().unwrap_or(defaults.thumbnail_parallel),
            "ffmpeg_path" => c.ffmpeg_path = v.to_string(),
            "request_timeout_secs" => {
                c.request_timeout_secs = v.parse::<u64>().unwrap_or(defaults.request_timeout_secs)
            }
            "upload_timeout_secs" => c.upload_timeout_secs = v.parse::<u64>().unwrap_or(defaults.upload_timeout_secs),
            "head_parallel" => {
                c.head_parallel = v.parse::<usize>().ok().filter(|n| *n > 0).unwrap_or(defaults.head_parallel)
            }
            "player_command" => cfg.player_command = v.to_string(),
            "language" => cfg.language = Language::parse(v),
            other => debug!(key = other, "Ignoring unknown config key"),
        }
    }
    cfg
}

/// Reads the config from the platform config dir, falling back to a local file.
pub fn read_config() -> Result<AppConfig, io::Error> {
    let primary = config_file_path();
    let content = match fs::read_to_string(&primary) {
        Ok(s) => s,
        Err(_e) => fs::read_to_string(CONFIG_FILE)?,
    };
    Ok(parse_config(&content))
}

pub fn render_config(cfg: &AppConfig) -> String {
    let c = &cfg.client;
    let mut out = String::new();
    out.push_str(&format!("base_url={}\n", c.base_url));
    if !c.auth_url.trim().is_empty() {
        out.push_str(&format!("auth_url={}\n", c.auth_url));
    }
    out.push_str(&format!("source={}\n", c.source.as_str()));
    out.push_str(&format!("listing_path={}\n", c.listing_path));
    out.push_str(&format!("video_extensions={}\n", c.video_extensions.join(",")));
    out.push_str(&format!("page_size={}\n", c.page_size));
    out.push_str(&format!("batch_size={}\n", c.batch_size));
    out.push_str(&format!("thumbnail_seek_secs={:.1}\n", c.thumbnail_seek_secs));
    out.push_str(&format!("thumbnail_parallel={}\n", c.thumbnail_parallel));
    out.push_str(&format!("ffmpeg_path={}\n", c.ffmpeg_path));
    out.push_str(&format!("request_timeout_secs={}\n", c.request_timeout_secs));
    out.push_str(&format!("upload_timeout_secs={}\n", c.upload_timeout_secs));
    out.push_str(&format!("head_parallel={}\n", c.head_parallel));
    if !cfg.player_command.is_empty() {
        out.push_str(&format!("player_command={}\n", cfg.player_command));
    }
    out.push_str(&format!("language={}\n", cfg.language.as_str()));
    out
}

pub fn save_config(cfg: &AppConfig) -> Result<(), io::Error> {
    let path = config_file_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut f = fs::File::create(&path)?;
    f.write_all(render_config(cfg).as_bytes())?;
    debug!(path = %path.display(), "Config saved");
    Ok(())
}
