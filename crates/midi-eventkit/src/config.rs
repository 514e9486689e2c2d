use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Byte budget of a packet list, matching the classic 64 KiB transport limit.
pub const DEFAULT_PACKET_LIST_CAPACITY: usize = 65_536;

/// How message payloads are laid out inside a packet list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadFormat {
    /// Every payload is three bytes, zero padded.
    #[default]
    Padded,
    /// Payloads carry only the bytes the status table calls for.
    Compact,
}

impl PayloadFormat {
    pub const fn is_compact(self) -> bool {
        matches!(self, PayloadFormat::Compact)
    }
}

/// Persisted codec settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Upper bound, in bytes, for a built packet list.
    pub packet_list_capacity: usize,
    pub payload: PayloadFormat,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            packet_list_capacity: DEFAULT_PACKET_LIST_CAPACITY,
            payload: PayloadFormat::Padded,
        }
    }
}

fn settings_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push("MidiEventKit");
    base.push("codec.json");
    Some(base)
}

/// Load settings from the user config directory. Returns defaults if loading fails.
pub fn load() -> CodecConfig {
    let Some(path) = settings_path() else {
        return CodecConfig::default();
    };
    if !path.exists() {
        return CodecConfig::default();
    }
    match load_from(&path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(?err, path = %path.display(), "failed to read codec settings");
            CodecConfig::default()
        }
    }
}

/// Save settings to the user config directory.
pub fn save(config: &CodecConfig) -> anyhow::Result<()> {
    let path = settings_path().context("no user config directory")?;
    save_to(&path, config)
}

pub fn load_from(path: &Path) -> anyhow::Result<CodecConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a valid codec config", path.display()))
}

pub fn save_to(path: &Path, config: &CodecConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
