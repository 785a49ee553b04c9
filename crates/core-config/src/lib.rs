//! Configuration loading and parsing.
//!
//! Parses `oxkeys.toml` (or an override path provided by the binary):
//!
//! * `[input] max_count`: ceiling for typed counts (saturating).
//! * `[feedback] bell`: whether the CLI rings the terminal bell on errors.
//! * `[log] filter / file`: tracing filter used when `RUST_LOG` is unset, and
//!   the log file name.
//! * `[[keymap]]`: user mappings appended after the baseline table.
//!
//! Missing or unparsable files fall back to defaults so the interpreter always
//! starts. Unknown fields are ignored (TOML deserialization tolerance).

use anyhow::{Context, Result, anyhow};
use core_keymap::{
    ArgumentKind, CommandFlags, CommandKind, CommandSpec, MappingMode, MappingSpec,
    baseline_specs, parse_keys,
};
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "oxkeys.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    #[serde(default = "InputConfig::default_max_count")]
    pub max_count: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_count: Self::default_max_count(),
        }
    }
}

impl InputConfig {
    const fn default_max_count() -> u32 {
        999_999
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedbackConfig {
    #[serde(default = "FeedbackConfig::default_bell")]
    pub bell: bool,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            bell: Self::default_bell(),
        }
    }
}

impl FeedbackConfig {
    const fn default_bell() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    #[serde(default = "LogConfig::default_filter")]
    pub filter: String,
    #[serde(default = "LogConfig::default_file")]
    pub file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: Self::default_filter(),
            file: Self::default_file(),
        }
    }
}

impl LogConfig {
    fn default_filter() -> String {
        "info".to_string()
    }
    fn default_file() -> String {
        "oxkeys.log".to_string()
    }
}

/// One `[[keymap]]` table.
#[derive(Debug, Deserialize, Clone)]
pub struct KeymapEntry {
    #[serde(default)]
    pub mode: MappingMode,
    pub keys: String,
    /// Omitted actions are kept: the interpreter reports them when reached.
    #[serde(default)]
    pub action: Option<String>,
    pub kind: CommandKind,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub argument: Option<ArgumentKind>,
}

impl KeymapEntry {
    fn to_spec(&self) -> Result<MappingSpec> {
        let sequence =
            parse_keys(&self.keys).with_context(|| format!("invalid keys `{}`", self.keys))?;
        let mut flags = CommandFlags::empty();
        for name in &self.flags {
            let flag = CommandFlags::from_name(&name.to_ascii_uppercase())
                .ok_or_else(|| anyhow!("unknown flag `{name}`"))?;
            flags |= flag;
        }
        let command = match &self.action {
            Some(action) => CommandSpec::new(action.as_str(), self.kind, flags),
            None => CommandSpec::unbound(self.kind, flags),
        };
        Ok(match self.argument {
            Some(kind) => MappingSpec::with_argument(self.mode, sequence, command, kind),
            None => MappingSpec::command(self.mode, sequence, command),
        })
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub keymap: Vec<KeymapEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("oxkeys").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_missing_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(
                target: "config",
                path = %path.display(),
                keymaps = file.keymap.len(),
                "config_loaded"
            );
            Ok(Config {
                raw: Some(content),
                file,
            })
        }
        Err(e) => {
            // Fall back to defaults rather than refusing to start.
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    pub fn max_count(&self) -> u32 {
        self.file.input.max_count.max(1)
    }

    /// User `[[keymap]]` entries as mapping specs, in file order.
    pub fn mappings(&self) -> Result<Vec<MappingSpec>> {
        self.file
            .keymap
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                entry
                    .to_spec()
                    .with_context(|| format!("keymap entry #{} (`{}`)", idx + 1, entry.keys))
            })
            .collect()
    }

    /// Baseline table followed by user mappings, so user entries win.
    pub fn trie_specs(&self) -> Result<Vec<MappingSpec>> {
        let mut specs = baseline_specs();
        specs.extend(self.mappings()?);
        Ok(specs)
    }
}
